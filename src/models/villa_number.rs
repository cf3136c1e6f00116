//! Villa number entity and DTOs
//!
//! A villa number is a bookable unit inside a villa. The number itself
//! is the primary key; `villa_id` references the owning villa.

use crate::models::VillaDto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Persisted villa-number record
#[derive(Debug, Clone)]
pub struct VillaNumber {
    pub villa_no: i32,
    pub villa_id: i32,
    pub special_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning villa, populated when the list query eager-loads it
    pub villa: Option<crate::models::Villa>,
}

/// Wire-facing villa-number shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillaNumberDto {
    pub villa_no: i32,
    pub villa_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villa: Option<VillaDto>,
}

impl From<&VillaNumber> for VillaNumberDto {
    fn from(number: &VillaNumber) -> Self {
        Self {
            villa_no: number.villa_no,
            villa_id: number.villa_id,
            special_details: number.special_details.clone(),
            villa: number.villa.as_ref().map(VillaDto::from),
        }
    }
}

impl From<VillaNumber> for VillaNumberDto {
    fn from(number: VillaNumber) -> Self {
        Self::from(&number)
    }
}

/// Request to create a new villa number
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillaNumberRequest {
    #[validate(range(min = 1, message = "Villa number must be positive"))]
    pub villa_no: i32,

    #[validate(range(min = 1, message = "Villa id must be positive"))]
    pub villa_id: i32,

    #[serde(default)]
    pub special_details: Option<String>,
}

/// Request to fully replace a villa number
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillaNumberRequest {
    #[validate(range(min = 1, message = "Villa number must be positive"))]
    pub villa_no: i32,

    #[validate(range(min = 1, message = "Villa id must be positive"))]
    pub villa_id: i32,

    #[serde(default)]
    pub special_details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_request_rejects_zero_villa_id() {
        let req = CreateVillaNumberRequest {
            villa_no: 101,
            villa_id: 0,
            special_details: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_dto_nests_villa_when_loaded() {
        let dto = VillaNumberDto {
            villa_no: 101,
            villa_id: 1,
            special_details: Some("Ground floor".to_string()),
            villa: Some(VillaDto {
                id: 1,
                name: "Pool View".to_string(),
                details: None,
                rate: 100.0,
                sqft: 100,
                occupancy: 4,
                image_url: None,
                amenity: None,
            }),
        };
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["villaNo"], 101);
        assert_eq!(json["villa"]["name"], "Pool View");
    }

    #[test]
    fn test_dto_omits_villa_when_not_loaded() {
        let dto = VillaNumberDto {
            villa_no: 101,
            villa_id: 1,
            special_details: None,
            villa: None,
        };
        let json = serde_json::to_value(&dto).unwrap();

        assert!(json.get("villa").is_none());
    }
}
