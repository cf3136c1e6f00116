//! Villa repository

use crate::error::AppError;
use crate::models::Villa;
use crate::repository::{Entity, Filter, Page, Repository, SqlParam};
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;

impl Entity for Villa {
    const TABLE: &'static str = "villas";
    const KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "details",
        "rate",
        "sqft",
        "occupancy",
        "image_url",
        "amenity",
        "created_at",
        "updated_at",
    ];
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "name",
        "details",
        "rate",
        "sqft",
        "occupancy",
        "image_url",
        "amenity",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Villa {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            details: row.try_get("details")?,
            rate: row.try_get("rate")?,
            sqft: row.try_get("sqft")?,
            occupancy: row.try_get("occupancy")?,
            image_url: row.try_get("image_url")?,
            amenity: row.try_get("amenity")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn insert_params(&self) -> Vec<SqlParam> {
        vec![
            Box::new(self.name.clone()),
            Box::new(self.details.clone()),
            Box::new(self.rate),
            Box::new(self.sqft),
            Box::new(self.occupancy),
            Box::new(self.image_url.clone()),
            Box::new(self.amenity.clone()),
            Box::new(self.created_at),
            Box::new(self.updated_at),
        ]
    }

    fn key(&self) -> i32 {
        self.id
    }
}

/// Data access for villas, composed over the generic repository
#[derive(Clone)]
pub struct VillaRepository {
    repo: Repository<Villa>,
}

impl VillaRepository {
    pub fn new(pool: Pool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    pub async fn get_all(&self, filter: Filter, page: Option<Page>) -> Result<Vec<Villa>, AppError> {
        self.repo.get_all(filter, None, page).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Villa>, AppError> {
        self.repo.get(Filter::new().eq("id", id)).await
    }

    /// Case-insensitive exact lookup, used by the duplicate-name pre-check
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Villa>, AppError> {
        self.repo.get(Filter::new().eq_lower("name", name)).await
    }

    pub async fn create(&self, villa: &Villa) -> Result<Villa, AppError> {
        match self.repo.create(villa).await {
            Err(AppError::Database(e))
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) =>
            {
                // The lower(name) index closed a race the pre-check missed
                Err(AppError::Validation(vec![
                    "Villa name already exists.".to_string(),
                ]))
            }
            other => other,
        }
    }

    pub async fn remove(&self, villa: &Villa) -> Result<(), AppError> {
        match self.repo.remove(villa).await {
            Err(AppError::Database(e))
                if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) =>
            {
                Err(AppError::Conflict(
                    "Villa is referenced by existing villa numbers.".to_string(),
                ))
            }
            other => other,
        }
    }

    /// Full-record replacement; stamps `updated_at`
    pub async fn update(&self, mut villa: Villa) -> Result<Villa, AppError> {
        villa.updated_at = Utc::now();

        let client = self.repo.pool().get().await?;
        let row = client
            .query_opt(
                "UPDATE villas
                 SET name = $1, details = $2, rate = $3, sqft = $4, occupancy = $5,
                     image_url = $6, amenity = $7, updated_at = $8
                 WHERE id = $9
                 RETURNING id, name, details, rate, sqft, occupancy, image_url,
                           amenity, created_at, updated_at",
                &[
                    &villa.name,
                    &villa.details,
                    &villa.rate,
                    &villa.sqft,
                    &villa.occupancy,
                    &villa.image_url,
                    &villa.amenity,
                    &villa.updated_at,
                    &villa.id,
                ],
            )
            .await?;

        match row {
            Some(row) => Ok(Villa::from_row(&row)?),
            None => Err(AppError::NotFound(format!(
                "Villa with id {} not found",
                villa.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_columns_match_params() {
        let villa = Villa {
            id: 0,
            name: "Pool View".to_string(),
            details: None,
            rate: 100.0,
            sqft: 100,
            occupancy: 4,
            image_url: None,
            amenity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(villa.insert_params().len(), Villa::INSERT_COLUMNS.len());
    }

    #[test]
    fn test_key_columns() {
        assert_eq!(Villa::TABLE, "villas");
        assert_eq!(Villa::KEY, "id");
        assert!(Villa::COLUMNS.contains(&"created_at"));
        // The key is store-generated, never inserted
        assert!(!Villa::INSERT_COLUMNS.contains(&"id"));
    }
}
