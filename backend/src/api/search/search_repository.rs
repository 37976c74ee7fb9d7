//! Database access for the search endpoint.

use async_trait::async_trait;
use tokio_postgres::Row;

use crate::db_utils::{postgres_utils::query_sql, sql_fragment::SqlFragment};

/// One row of the result page statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecreationResourceSearchRow {
    pub rec_resource_id: String,
    pub name: Option<String>,
    pub closest_community: Option<String>,
    pub district_description: Option<String>,
    pub recreation_resource_type: Option<String>,
    pub recreation_resource_type_code: Option<String>,
    pub recreation_activity: Option<serde_json::Value>,
    pub recreation_status: Option<serde_json::Value>,
    pub recreation_resource_images: Option<serde_json::Value>,
    pub has_toilets: Option<bool>,
    pub has_tables: Option<bool>,
    pub site_point_geometry: Option<String>,
    pub distance: Option<f64>,
    pub total_count: i32,
}

impl TryFrom<&Row> for RecreationResourceSearchRow {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            rec_resource_id: row.try_get("rec_resource_id")?,
            name: row.try_get("name")?,
            closest_community: row.try_get("closest_community")?,
            district_description: row.try_get("district_description")?,
            recreation_resource_type: row.try_get("recreation_resource_type")?,
            recreation_resource_type_code: row.try_get("recreation_resource_type_code")?,
            recreation_activity: row.try_get("recreation_activity")?,
            recreation_status: row.try_get("recreation_status")?,
            recreation_resource_images: row.try_get("recreation_resource_images")?,
            has_toilets: row.try_get("has_toilets")?,
            has_tables: row.try_get("has_tables")?,
            site_point_geometry: row.try_get("site_point_geometry")?,
            distance: row.try_get("distance")?,
            total_count: row.try_get("total_count")?,
        })
    }
}

/// One row of the filter option counts statement.
///
/// `kind` is a facet name (`district`, `activity`, ...) or one of the summary
/// rows `ids` and `extent`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptionCountRow {
    pub kind: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub count: Option<i32>,
    pub rec_resource_ids: Option<Vec<String>>,
    pub extent: Option<String>,
}

impl TryFrom<&Row> for FilterOptionCountRow {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: row.try_get("type")?,
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            count: row.try_get("count")?,
            rec_resource_ids: row.try_get("rec_resource_ids")?,
            extent: row.try_get("extent")?,
        })
    }
}

#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn fetch_resource_page(&self, sql: &SqlFragment) -> anyhow::Result<Vec<RecreationResourceSearchRow>>;

    async fn fetch_filter_option_counts(&self, sql: &SqlFragment) -> anyhow::Result<Vec<FilterOptionCountRow>>;
}

pub struct PostgresSearchRepository {
    pool: deadpool_postgres::Pool,
}

impl PostgresSearchRepository {
    pub fn new(pool: deadpool_postgres::Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchRepository for PostgresSearchRepository {
    async fn fetch_resource_page(&self, sql: &SqlFragment) -> anyhow::Result<Vec<RecreationResourceSearchRow>> {
        let rows = query_sql(&self.pool, sql).await?;
        let rows = rows
            .iter()
            .map(RecreationResourceSearchRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn fetch_filter_option_counts(&self, sql: &SqlFragment) -> anyhow::Result<Vec<FilterOptionCountRow>> {
        let rows = query_sql(&self.pool, sql).await?;
        let rows = rows
            .iter()
            .map(FilterOptionCountRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
