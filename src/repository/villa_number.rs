//! Villa number repository

use crate::error::AppError;
use crate::models::{Villa, VillaNumber};
use crate::repository::{Entity, Filter, Page, Relation, Repository, SqlParam};
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

impl Entity for VillaNumber {
    const TABLE: &'static str = "villa_numbers";
    const KEY: &'static str = "villa_no";
    const COLUMNS: &'static [&'static str] = &[
        "villa_no",
        "villa_id",
        "special_details",
        "created_at",
        "updated_at",
    ];
    // The villa number is caller-assigned, so the key is inserted too
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "villa_no",
        "villa_id",
        "special_details",
        "created_at",
        "updated_at",
    ];
    const RELATIONS: &'static [Relation] = &[Relation {
        name: "villa",
        join: "LEFT JOIN villas ON villas.id = villa_numbers.villa_id",
        columns: &[
            "villas.id AS villa_rel_id",
            "villas.name AS villa_rel_name",
            "villas.details AS villa_rel_details",
            "villas.rate AS villa_rel_rate",
            "villas.sqft AS villa_rel_sqft",
            "villas.occupancy AS villa_rel_occupancy",
            "villas.image_url AS villa_rel_image_url",
            "villas.amenity AS villa_rel_amenity",
            "villas.created_at AS villa_rel_created_at",
            "villas.updated_at AS villa_rel_updated_at",
        ],
    }];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(VillaNumber {
            villa_no: row.try_get("villa_no")?,
            villa_id: row.try_get("villa_id")?,
            special_details: row.try_get("special_details")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            villa: None,
        })
    }

    fn insert_params(&self) -> Vec<SqlParam> {
        vec![
            Box::new(self.villa_no),
            Box::new(self.villa_id),
            Box::new(self.special_details.clone()),
            Box::new(self.created_at),
            Box::new(self.updated_at),
        ]
    }

    fn key(&self) -> i32 {
        self.villa_no
    }

    fn attach_related(&mut self, relation: &str, row: &Row) -> Result<(), tokio_postgres::Error> {
        if relation == "villa" {
            if let Some(id) = row.try_get::<_, Option<i32>>("villa_rel_id")? {
                self.villa = Some(Villa {
                    id,
                    name: row.try_get("villa_rel_name")?,
                    details: row.try_get("villa_rel_details")?,
                    rate: row.try_get("villa_rel_rate")?,
                    sqft: row.try_get("villa_rel_sqft")?,
                    occupancy: row.try_get("villa_rel_occupancy")?,
                    image_url: row.try_get("villa_rel_image_url")?,
                    amenity: row.try_get("villa_rel_amenity")?,
                    created_at: row.try_get("villa_rel_created_at")?,
                    updated_at: row.try_get("villa_rel_updated_at")?,
                });
            }
        }
        Ok(())
    }
}

/// Data access for villa numbers, composed over the generic repository
#[derive(Clone)]
pub struct VillaNumberRepository {
    repo: Repository<VillaNumber>,
}

impl VillaNumberRepository {
    pub fn new(pool: Pool) -> Self {
        Self {
            repo: Repository::new(pool),
        }
    }

    /// List with the owning villa eager-loaded
    pub async fn get_all_with_villa(
        &self,
        filter: Filter,
        page: Option<Page>,
    ) -> Result<Vec<VillaNumber>, AppError> {
        self.repo.get_all(filter, Some("villa"), page).await
    }

    pub async fn get_by_number(&self, villa_no: i32) -> Result<Option<VillaNumber>, AppError> {
        self.repo.get(Filter::new().eq("villa_no", villa_no)).await
    }

    pub async fn create(&self, number: &VillaNumber) -> Result<VillaNumber, AppError> {
        self.repo.create(number).await
    }

    pub async fn remove(&self, number: &VillaNumber) -> Result<(), AppError> {
        self.repo.remove(number).await
    }

    /// Full-record replacement; stamps `updated_at`
    pub async fn update(&self, mut number: VillaNumber) -> Result<VillaNumber, AppError> {
        number.updated_at = Utc::now();

        let client = self.repo.pool().get().await?;
        let row = client
            .query_opt(
                "UPDATE villa_numbers
                 SET villa_id = $1, special_details = $2, updated_at = $3
                 WHERE villa_no = $4
                 RETURNING villa_no, villa_id, special_details, created_at, updated_at",
                &[
                    &number.villa_id,
                    &number.special_details,
                    &number.updated_at,
                    &number.villa_no,
                ],
            )
            .await?;

        match row {
            Some(row) => Ok(VillaNumber::from_row(&row)?),
            None => Err(AppError::NotFound(format!(
                "Villa number {} not found",
                number.villa_no
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_the_villa_number_itself() {
        assert_eq!(VillaNumber::KEY, "villa_no");
        // Not store-generated, so it is part of the insert
        assert!(VillaNumber::INSERT_COLUMNS.contains(&"villa_no"));
    }

    #[test]
    fn test_villa_relation_declared() {
        assert_eq!(VillaNumber::RELATIONS.len(), 1);
        let relation = &VillaNumber::RELATIONS[0];

        assert_eq!(relation.name, "villa");
        assert!(relation.join.contains("villas.id = villa_numbers.villa_id"));
        // Every relation column must be aliased to avoid collisions
        assert!(relation.columns.iter().all(|c| c.contains(" AS villa_rel_")));
    }

    #[test]
    fn test_insert_columns_match_params() {
        let number = VillaNumber {
            villa_no: 101,
            villa_id: 1,
            special_details: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            villa: None,
        };

        assert_eq!(
            number.insert_params().len(),
            VillaNumber::INSERT_COLUMNS.len()
        );
    }
}
