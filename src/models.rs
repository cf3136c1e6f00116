//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the response envelope, pagination descriptor, and all
//! request/response structures used by the API.

pub mod user;
pub mod villa;
pub mod villa_number;

// Re-export commonly used types
pub use user::*;
pub use villa::*;
pub use villa_number::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Uniform response envelope wrapping every API result.
///
/// The HTTP status of the response always equals `status_code`, so
/// clients can rely on either.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub is_success: bool,
    pub error_messages: Vec<String>,
    pub result: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope carrying a payload
    pub fn ok(status: StatusCode, result: T) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: true,
            error_messages: Vec::new(),
            result: Some(result),
        }
    }

    /// Successful envelope with no payload
    pub fn ok_empty(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: true,
            error_messages: Vec::new(),
            result: None,
        }
    }

    /// Failure envelope with one or more error messages
    pub fn failure(status: StatusCode, messages: Vec<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            is_success: false,
            error_messages: messages,
            result: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Pagination descriptor emitted in the `X-Pagination` response header.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
}

/// Header name carrying the serialized [`Pagination`] descriptor.
pub const PAGINATION_HEADER: &str = "X-Pagination";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = ApiResponse::ok(StatusCode::OK, vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["isSuccess"], true);
        assert_eq!(json["errorMessages"], serde_json::json!([]));
        assert_eq!(json["result"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope: ApiResponse<()> = ApiResponse::failure(
            StatusCode::BAD_REQUEST,
            vec!["Villa name already exists.".to_string()],
        );
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["errorMessages"][0], "Villa name already exists.");
        assert_eq!(json["result"], serde_json::Value::Null);
    }

    #[test]
    fn test_empty_envelope_has_null_result() {
        let envelope = ApiResponse::<()>::ok_empty(StatusCode::OK);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["result"], serde_json::Value::Null);
        assert_eq!(json["isSuccess"], true);
    }

    #[test]
    fn test_pagination_header_json() {
        let pagination = Pagination {
            page_number: 2,
            page_size: 1,
        };
        let json = serde_json::to_string(&pagination).unwrap();

        assert_eq!(json, r#"{"pageNumber":2,"pageSize":1}"#);
    }
}
