//! Villa number route handlers

use crate::auth::{require_role, Claims, Role};
use crate::error::{validation_failure, ApiResult, AppError};
use crate::models::{
    ApiResponse, CreateVillaNumberRequest, Pagination, UpdateVillaNumberRequest, VillaNumber,
    VillaNumberDto,
};
use crate::repository::{Filter, Page};
use crate::routes::villa::{pagination_header_name, pagination_header_value};
use crate::state::SharedState;
use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVillaNumbersQuery {
    #[serde(default)]
    pub page_size: u32,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
}

fn default_page_number() -> u32 {
    1
}

/// GET /api/villa-numbers
///
/// Lists villa numbers with the owning villa eager-loaded.
pub async fn list_villa_numbers(
    State(state): State<SharedState>,
    Query(query): Query<ListVillaNumbersQuery>,
) -> ApiResult<Response> {
    debug!("Listing villa numbers");

    let page = (query.page_size > 0).then(|| Page {
        number: query.page_number.max(1),
        size: query.page_size,
    });

    let numbers = state
        .villa_numbers
        .get_all_with_villa(Filter::new(), page)
        .await?;
    let dtos: Vec<VillaNumberDto> = numbers.iter().map(VillaNumberDto::from).collect();

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

/// GET /api/villa-numbers/{id}
pub async fn get_villa_number(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> ApiResult<ApiResponse<VillaNumberDto>> {
    if id <= 0 {
        return Err(AppError::BadRequest(
            "Villa number must be a positive integer.".to_string(),
        ));
    }

    let number = state
        .villa_numbers
        .get_by_number(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villa number {id} not found")))?;

    Ok(ApiResponse::ok(StatusCode::OK, VillaNumberDto::from(number)))
}

/// POST /api/villa-numbers
pub async fn create_villa_number(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateVillaNumberRequest>,
) -> ApiResult<Response> {
    require_role(&claims, Role::Editor)?;
    payload.validate().map_err(|e| validation_failure(&e))?;

    if state
        .villa_numbers
        .get_by_number(payload.villa_no)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(vec![
            "Villa number already exists.".to_string(),
        ]));
    }

    // The referenced villa must exist before anything persists
    if state.villas.get_by_id(payload.villa_id).await?.is_none() {
        return Err(AppError::Validation(vec!["Villa id is invalid.".to_string()]));
    }

    let now = Utc::now();
    let number = VillaNumber {
        villa_no: payload.villa_no,
        villa_id: payload.villa_id,
        special_details: payload.special_details,
        created_at: now,
        updated_at: now,
        villa: None,
    };

    let created = state.villa_numbers.create(&number).await?;
    info!("Villa number created: {}", created.villa_no);

    let location = format!("/api/villa-numbers/{}", created.villa_no);
    let mut response =
        ApiResponse::ok(StatusCode::CREATED, VillaNumberDto::from(created)).into_response();
    response.headers_mut().insert(
        header::LOCATION,
        HeaderValue::from_str(&location)
            .map_err(|e| AppError::Internal(format!("Invalid location header: {e}")))?,
    );
    Ok(response)
}

/// PUT /api/villa-numbers/{id}
pub async fn update_villa_number(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVillaNumberRequest>,
) -> ApiResult<ApiResponse<VillaNumberDto>> {
    require_role(&claims, Role::Editor)?;

    if id != payload.villa_no {
        return Err(AppError::BadRequest(
            "Route id does not match body villa number.".to_string(),
        ));
    }
    payload.validate().map_err(|e| validation_failure(&e))?;

    if state.villas.get_by_id(payload.villa_id).await?.is_none() {
        return Err(AppError::Validation(vec!["Villa id is invalid.".to_string()]));
    }

    let number = VillaNumber {
        villa_no: payload.villa_no,
        villa_id: payload.villa_id,
        special_details: payload.special_details,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        villa: None,
    };

    let updated = state.villa_numbers.update(number).await?;
    info!("Villa number updated: {}", updated.villa_no);

    Ok(ApiResponse::ok(StatusCode::OK, VillaNumberDto::from(updated)))
}

/// DELETE /api/villa-numbers/{id}
pub async fn delete_villa_number(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> ApiResult<ApiResponse<()>> {
    require_role(&claims, Role::Admin)?;

    if id <= 0 {
        return Err(AppError::BadRequest(
            "Villa number must be a positive integer.".to_string(),
        ));
    }

    let number = state
        .villa_numbers
        .get_by_number(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Villa number {id} not found")))?;

    state.villa_numbers.remove(&number).await?;
    info!("Villa number deleted: {}", number.villa_no);

    Ok(ApiResponse::ok_empty(StatusCode::OK))
}
