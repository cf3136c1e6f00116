//! Generic data-access layer
//!
//! Decouples route handlers from SQL construction. [`Repository`] is
//! parameterized over an [`Entity`] and provides filtered retrieval,
//! paging, optional eager-load of a named relation, creation, and
//! removal. Per-entity repositories compose it and add what their
//! resource needs (update with timestamp stamping, name lookups).

pub mod user;
pub mod villa;
pub mod villa_number;

pub use user::UserRepository;
pub use villa::VillaRepository;
pub use villa_number::VillaNumberRepository;

use crate::error::AppError;
use deadpool_postgres::Pool;
use std::marker::PhantomData;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Owned SQL parameter collected by [`Filter`] and entity inserts
pub type SqlParam = Box<dyn ToSql + Send + Sync>;

/// A named relation an entity can eager-load on list queries.
///
/// `columns` must alias every selected column so it cannot collide
/// with a base column of the owning table.
pub struct Relation {
    pub name: &'static str,
    pub join: &'static str,
    pub columns: &'static [&'static str],
}

/// Storage contract implemented once per persisted resource type
pub trait Entity: Sized + Send + Sync {
    const TABLE: &'static str;
    /// Primary key column
    const KEY: &'static str;
    /// Columns selected for reads, bare names
    const COLUMNS: &'static [&'static str];
    /// Columns written on insert, in `insert_params` order
    const INSERT_COLUMNS: &'static [&'static str];
    const RELATIONS: &'static [Relation] = &[];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;
    fn insert_params(&self) -> Vec<SqlParam>;
    fn key(&self) -> i32;

    /// Populate an eager-loaded relation from its aliased columns
    fn attach_related(&mut self, _relation: &str, _row: &Row) -> Result<(), tokio_postgres::Error> {
        Ok(())
    }
}

/// WHERE-clause builder with numbered placeholders
#[derive(Default)]
pub struct Filter {
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on a column
    pub fn eq<V>(mut self, column: &str, value: V) -> Self
    where
        V: ToSql + Send + Sync + 'static,
    {
        self.params.push(Box::new(value));
        self.clauses
            .push(format!("{} = ${}", column, self.params.len()));
        self
    }

    /// Case-insensitive exact match on a text column
    pub fn eq_lower(mut self, column: &str, value: &str) -> Self {
        self.params.push(Box::new(value.to_lowercase()));
        self.clauses
            .push(format!("lower({}) = ${}", column, self.params.len()));
        self
    }

    /// Case-insensitive substring match on a text column
    pub fn contains(mut self, column: &str, needle: &str) -> Self {
        let pattern = format!("%{}%", escape_like(needle));
        self.params.push(Box::new(pattern));
        self.clauses
            .push(format!("{} ILIKE ${}", column, self.params.len()));
        self
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

/// Escape LIKE/ILIKE wildcard characters in user-supplied search text
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// 1-based page request; `size == 0` means unpaged
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Rows skipped before this page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
    }
}

/// Generic repository over a single entity type
pub struct Repository<E: Entity> {
    pool: Pool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    fn select_list(relation: Option<&Relation>) -> String {
        let mut columns: Vec<String> = E::COLUMNS
            .iter()
            .map(|c| format!("{}.{}", E::TABLE, c))
            .collect();
        if let Some(rel) = relation {
            columns.extend(rel.columns.iter().map(|c| (*c).to_string()));
        }
        columns.join(", ")
    }

    fn list_sql(filter: &Filter, relation: Option<&Relation>, page: Option<Page>) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            Self::select_list(relation),
            E::TABLE
        );
        if let Some(rel) = relation {
            sql.push(' ');
            sql.push_str(rel.join);
        }
        sql.push_str(&filter.where_clause());
        // Key order keeps pages stable across requests
        sql.push_str(&format!(" ORDER BY {}.{}", E::TABLE, E::KEY));
        if let Some(page) = page {
            if page.size > 0 {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", page.size, page.offset()));
            }
        }
        sql
    }

    fn resolve_relation(include: Option<&str>) -> Result<Option<&'static Relation>, AppError> {
        match include {
            None => Ok(None),
            Some(name) => E::RELATIONS
                .iter()
                .find(|r| r.name == name)
                .map(Some)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown relation for {}: {}", E::TABLE, name))
                }),
        }
    }

    /// Filtered, optionally paged retrieval, with optional eager-load
    /// of a named relation
    pub async fn get_all(
        &self,
        filter: Filter,
        include: Option<&str>,
        page: Option<Page>,
    ) -> Result<Vec<E>, AppError> {
        let relation = Self::resolve_relation(include)?;
        let sql = Self::list_sql(&filter, relation, page);

        let client = self.pool.get().await?;
        let rows = client.query(sql.as_str(), &filter.params()).await?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut entity = E::from_row(row)?;
            if let Some(rel) = relation {
                entity.attach_related(rel.name, row)?;
            }
            entities.push(entity);
        }
        Ok(entities)
    }

    /// First match or None; zero matches is not an error
    pub async fn get(&self, filter: Filter) -> Result<Option<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {}{} LIMIT 1",
            Self::select_list(None),
            E::TABLE,
            filter.where_clause()
        );

        let client = self.pool.get().await?;
        let row = client.query_opt(sql.as_str(), &filter.params()).await?;
        Ok(row.as_ref().map(E::from_row).transpose()?)
    }

    /// Persist a new entity; the returned copy carries the
    /// store-assigned key
    pub async fn create(&self, entity: &E) -> Result<E, AppError> {
        let placeholders: Vec<String> = (1..=E::INSERT_COLUMNS.len())
            .map(|i| format!("${}", i))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            E::TABLE,
            E::INSERT_COLUMNS.join(", "),
            placeholders.join(", "),
            Self::select_list(None),
        );

        let params = entity.insert_params();
        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let client = self.pool.get().await?;
        let row = client.query_one(sql.as_str(), &param_refs).await?;
        Ok(E::from_row(&row)?)
    }

    /// Delete by key; fails if the entity no longer exists
    pub async fn remove(&self, entity: &E) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", E::TABLE, E::KEY);

        let client = self.pool.get().await?;
        let affected = client.execute(sql.as_str(), &[&entity.key()]).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!(
                "{} record not found",
                E::TABLE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Widget;

    impl Entity for Widget {
        const TABLE: &'static str = "widgets";
        const KEY: &'static str = "id";
        const COLUMNS: &'static [&'static str] = &["id", "name"];
        const INSERT_COLUMNS: &'static [&'static str] = &["name"];
        const RELATIONS: &'static [Relation] = &[Relation {
            name: "owner",
            join: "LEFT JOIN owners ON owners.id = widgets.owner_id",
            columns: &["owners.name AS owner_rel_name"],
        }];

        fn from_row(_row: &Row) -> Result<Self, tokio_postgres::Error> {
            Ok(Widget)
        }

        fn insert_params(&self) -> Vec<SqlParam> {
            vec![]
        }

        fn key(&self) -> i32 {
            0
        }
    }

    #[test]
    fn test_filter_numbers_placeholders() {
        let filter = Filter::new()
            .eq("occupancy", 4)
            .contains("name", "pool");

        assert_eq!(
            filter.where_clause(),
            " WHERE occupancy = $1 AND name ILIKE $2"
        );
        assert_eq!(filter.params().len(), 2);
    }

    #[test]
    fn test_empty_filter_has_no_where() {
        assert_eq!(Filter::new().where_clause(), "");
    }

    #[test]
    fn test_eq_lower_wraps_column() {
        let filter = Filter::new().eq_lower("name", "Pool View");
        assert_eq!(filter.where_clause(), " WHERE lower(name) = $1");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_page_offset_math() {
        // skip = (pageNumber - 1) * pageSize
        assert_eq!(Page { number: 1, size: 10 }.offset(), 0);
        assert_eq!(Page { number: 2, size: 1 }.offset(), 1);
        assert_eq!(Page { number: 3, size: 25 }.offset(), 50);
        assert_eq!(Page { number: 0, size: 10 }.offset(), 0);
    }

    #[test]
    fn test_list_sql_unfiltered_orders_by_key() {
        let sql = Repository::<Widget>::list_sql(&Filter::new(), None, None);
        assert_eq!(
            sql,
            "SELECT widgets.id, widgets.name FROM widgets ORDER BY widgets.id"
        );
    }

    #[test]
    fn test_list_sql_applies_filter_before_paging() {
        let filter = Filter::new().eq("occupancy", 2);
        let sql = Repository::<Widget>::list_sql(
            &filter,
            None,
            Some(Page { number: 2, size: 1 }),
        );
        assert_eq!(
            sql,
            "SELECT widgets.id, widgets.name FROM widgets \
             WHERE occupancy = $1 ORDER BY widgets.id LIMIT 1 OFFSET 1"
        );
    }

    #[test]
    fn test_list_sql_zero_page_size_is_unpaged() {
        let sql = Repository::<Widget>::list_sql(
            &Filter::new(),
            None,
            Some(Page { number: 5, size: 0 }),
        );
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_list_sql_with_relation_joins_and_aliases() {
        let relation = &Widget::RELATIONS[0];
        let sql = Repository::<Widget>::list_sql(&Filter::new(), Some(relation), None);
        assert_eq!(
            sql,
            "SELECT widgets.id, widgets.name, owners.name AS owner_rel_name \
             FROM widgets LEFT JOIN owners ON owners.id = widgets.owner_id \
             ORDER BY widgets.id"
        );
    }

    #[test]
    fn test_unknown_relation_is_rejected() {
        let result = Repository::<Widget>::resolve_relation(Some("bogus"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_known_relation_resolves() {
        let relation = Repository::<Widget>::resolve_relation(Some("owner"))
            .unwrap()
            .unwrap();
        assert_eq!(relation.name, "owner");
    }
}
