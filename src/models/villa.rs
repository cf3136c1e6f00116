//! Villa entity and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Persisted villa record. Timestamps never leave the store layer.
#[derive(Debug, Clone)]
pub struct Villa {
    pub id: i32,
    pub name: String,
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    pub image_url: Option<String>,
    pub amenity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire-facing villa shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillaDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub rate: f64,
    pub sqft: i32,
    pub occupancy: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenity: Option<String>,
}

impl From<&Villa> for VillaDto {
    fn from(villa: &Villa) -> Self {
        Self {
            id: villa.id,
            name: villa.name.clone(),
            details: villa.details.clone(),
            rate: villa.rate,
            sqft: villa.sqft,
            occupancy: villa.occupancy,
            image_url: villa.image_url.clone(),
            amenity: villa.amenity.clone(),
        }
    }
}

impl From<Villa> for VillaDto {
    fn from(villa: Villa) -> Self {
        Self::from(&villa)
    }
}

/// Request to create a new villa
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillaRequest {
    #[validate(length(min = 1, max = 100, message = "Villa name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub details: Option<String>,

    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    pub rate: f64,

    #[validate(range(min = 1, message = "Square footage must be positive"))]
    pub sqft: i32,

    #[validate(range(min = 1, max = 50, message = "Occupancy must be between 1 and 50"))]
    pub occupancy: i32,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub amenity: Option<String>,
}

/// Request to fully replace a villa
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillaRequest {
    pub id: i32,

    #[validate(length(min = 1, max = 100, message = "Villa name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    pub details: Option<String>,

    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    pub rate: f64,

    #[validate(range(min = 1, message = "Square footage must be positive"))]
    pub sqft: i32,

    #[validate(range(min = 1, max = 50, message = "Occupancy must be between 1 and 50"))]
    pub occupancy: i32,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub amenity: Option<String>,
}

/// Query parameters accepted by the villa list endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVillasQuery {
    pub occupancy: Option<i32>,
    pub search: Option<String>,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
}

fn default_page_number() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_request_validates_name_length() {
        let req = CreateVillaRequest {
            name: String::new(),
            details: None,
            rate: 100.0,
            sqft: 500,
            occupancy: 4,
            image_url: None,
            amenity: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_zero_occupancy() {
        let req = CreateVillaRequest {
            name: "Pool View".to_string(),
            details: None,
            rate: 100.0,
            sqft: 500,
            occupancy: 0,
            image_url: None,
            amenity: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_create_request_passes() {
        let req = CreateVillaRequest {
            name: "Pool View".to_string(),
            details: Some("A villa with a pool view".to_string()),
            rate: 199.99,
            sqft: 550,
            occupancy: 4,
            image_url: None,
            amenity: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_dto_omits_empty_optionals() {
        let dto = VillaDto {
            id: 1,
            name: "Pool View".to_string(),
            details: None,
            rate: 100.0,
            sqft: 100,
            occupancy: 4,
            image_url: None,
            amenity: None,
        };
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["name"], "Pool View");
        assert!(json.get("details").is_none());
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListVillasQuery = serde_json::from_str("{}").unwrap();

        assert_eq!(query.page_size, 0);
        assert_eq!(query.page_number, 1);
        assert!(query.occupancy.is_none());
        assert!(query.search.is_none());
    }
}
