//! Villa route handlers

use crate::auth::{require_role, Claims, Role};
use crate::error::{validation_failure, ApiResult, AppError};
use crate::models::{
    ApiResponse, CreateVillaRequest, ListVillasQuery, Pagination, UpdateVillaRequest, Villa,
    VillaDto, PAGINATION_HEADER,
};
use crate::repository::{Filter, Page};
use crate::state::SharedState;
use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

/// GET /api/villas
///
/// List villas, optionally filtered by exact occupancy and a
/// case-insensitive name search. Both filters run in the store before
/// paging, so pages are full whenever enough matches exist.
pub async fn list_villas(
    State(state): State<SharedState>,
    Query(query): Query<ListVillasQuery>,
) -> ApiResult<Response> {
    debug!("Listing villas (occupancy: {:?}, search: {:?})", query.occupancy, query.search);

    let mut filter = Filter::new();
    if let Some(occupancy) = query.occupancy {
        if occupancy > 0 {
            filter = filter.eq("occupancy", occupancy);
        }
    }
    if let Some(search) = query.search.as_deref() {
        if !search.is_empty() {
            filter = filter.contains("name", search);
        }
    }

    let page = (query.page_size > 0).then(|| Page {
        number: query.page_number.max(1),
        size: query.page_size,
    });

    let villas = state.villas.get_all(filter, page).await?;
    let dtos: Vec<VillaDto> = villas.iter().map(VillaDto::from).collect();

    let pagination = Pagination {
        page_number: query.page_number,
        page_size: query.page_size,
    };

    let mut response = ApiResponse::ok(StatusCode::OK, dtos).into_response();
    response
        .headers_mut()
        .insert(pagination_header_name()?, pagination_header_value(&pagination)?);
    Ok(response)
}

/// GET /api/villas/{id}
pub async fn get_villa(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<ApiResponse<VillaDto>> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "Villa id must be a positive integer.".to_string(),
        ));
    }

    let villa = state
        .villas
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villa with id {id} not found")))?;

    Ok(ApiResponse::ok(StatusCode::OK, VillaDto::from(villa)))
}

/// POST /api/villas
pub async fn create_villa(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateVillaRequest>,
) -> ApiResult<Response> {
    require_role(&claims, Role::Editor)?;
    payload.validate().map_err(|e| validation_failure(&e))?;

    // Duplicate names are rejected case-insensitively
    if state.villas.find_by_name(&payload.name).await?.is_some() {
        return Err(AppError::Validation(vec![
            "Villa name already exists.".to_string(),
        ]));
    }

    let now = Utc::now();
    let villa = Villa {
        id: 0,
        name: payload.name,
        details: payload.details,
        rate: payload.rate,
        sqft: payload.sqft,
        occupancy: payload.occupancy,
        image_url: payload.image_url,
        amenity: payload.amenity,
        created_at: now,
        updated_at: now,
    };

    let created = state.villas.create(&villa).await?;
    info!("Villa created: {} (id: {})", created.name, created.id);

    let location = format!("/api/villas/{}", created.id);
    let mut response =
        ApiResponse::ok(StatusCode::CREATED, VillaDto::from(created)).into_response();
    response.headers_mut().insert(
        header::LOCATION,
        HeaderValue::from_str(&location)
            .map_err(|e| AppError::Internal(format!("Invalid location header: {e}")))?,
    );
    Ok(response)
}

/// PUT /api/villas/{id}
pub async fn update_villa(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVillaRequest>,
) -> ApiResult<ApiResponse<VillaDto>> {
    require_role(&claims, Role::Editor)?;

    if id != payload.id {
        return Err(AppError::BadRequest(
            "Route id does not match body id.".to_string(),
        ));
    }
    payload.validate().map_err(|e| validation_failure(&e))?;

    let villa = Villa {
        id,
        name: payload.name,
        details: payload.details,
        rate: payload.rate,
        sqft: payload.sqft,
        occupancy: payload.occupancy,
        image_url: payload.image_url,
        amenity: payload.amenity,
        // created_at is never written by updates; the store value wins
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let updated = state.villas.update(villa).await?;
    info!("Villa updated: {} (id: {})", updated.name, updated.id);

    Ok(ApiResponse::ok(StatusCode::OK, VillaDto::from(updated)))
}

/// DELETE /api/villas/{id}
pub async fn delete_villa(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> ApiResult<ApiResponse<()>> {
    require_role(&claims, Role::Admin)?;

    if id <= 0 {
        return Err(AppError::BadRequest(
            "Villa id must be a positive integer.".to_string(),
        ));
    }

    let villa = state
        .villas
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villa with id {id} not found")))?;

    state.villas.remove(&villa).await?;
    info!("Villa deleted: {} (id: {})", villa.name, villa.id);

    Ok(ApiResponse::ok_empty(StatusCode::OK))
}

pub(super) fn pagination_header_name() -> Result<HeaderName, AppError> {
    PAGINATION_HEADER
        .parse::<HeaderName>()
        .map_err(|e| AppError::Internal(format!("Invalid pagination header name: {e}")))
}

pub(super) fn pagination_header_value(pagination: &Pagination) -> Result<HeaderValue, AppError> {
    let json = serde_json::to_string(pagination)
        .map_err(|e| AppError::Internal(format!("Failed to serialize pagination: {e}")))?;
    HeaderValue::from_str(&json)
        .map_err(|e| AppError::Internal(format!("Invalid pagination header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pagination_header_round_trip() {
        let value = pagination_header_value(&Pagination {
            page_number: 2,
            page_size: 1,
        })
        .unwrap();

        assert_eq!(value.to_str().unwrap(), r#"{"pageNumber":2,"pageSize":1}"#);
        assert_eq!(pagination_header_name().unwrap().as_str(), "x-pagination");
    }
}
