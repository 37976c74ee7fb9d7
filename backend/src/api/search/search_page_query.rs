//! Statement for one page of search results.

use common::search_query::SearchQuery;

use crate::api::search::search_sql::{SQL_FROM_CLAUSE, SQL_SITE_POINT_GEOGRAPHY, point_geography};
use crate::db_utils::sql_fragment::SqlFragment;


/// Selects one page of matching resources.
///
/// `total_count` is computed over the whole match set before `LIMIT` applies,
/// so every row of the page carries the unpaginated total.
pub fn build_recreation_resource_page_query(
    where_clause: &SqlFragment,
    query: &SearchQuery,
    take: u64,
    skip: u64,
) -> SqlFragment {
    let mut sql = SqlFragment::new(
        "
    SELECT rec_resource_id,
        name,
        closest_community,
        district_description,
        recreation_resource_type,
        recreation_resource_type_code,
        recreation_activity,
        recreation_status,
        recreation_resource_images,
        has_toilets,
        has_tables,
        public.ST_AsGeoJSON(recreation_site_point) AS site_point_geometry,
        ",
    );

    let location = query.location();
    match location {
        Some((lon, lat)) => {
            sql.push_sql("public.ST_Distance(")
                .push_sql(SQL_SITE_POINT_GEOGRAPHY)
                .push_sql(", ")
                .push_fragment(&point_geography(lon, lat))
                .push_sql(")");
        }
        None => {
            sql.push_sql("NULL::float8");
        }
    }
    sql.push_sql(" AS distance,\n        COUNT(*) OVER()::INT AS total_count\n    ")
        .push_sql(SQL_FROM_CLAUSE)
        .push_sql("\n    ")
        .push_fragment(where_clause)
        .push_sql("\n    ORDER BY ");

    let mut order_by = Vec::new();
    if location.is_some() {
        order_by.push(SqlFragment::new("distance ASC"));
    }
    if let Some(term) = query.search_term() {
        let mut similarity = SqlFragment::new("similarity(name, ");
        similarity.push_value(term).push_sql(") DESC");
        order_by.push(similarity);
    }
    order_by.push(SqlFragment::new("name ASC"));

    sql.push_fragment(&SqlFragment::join(order_by, ", "))
        .push_sql("\n    LIMIT ")
        .push_value(i64::try_from(take).unwrap_or(i64::MAX))
        .push_sql(" OFFSET ")
        .push_value(i64::try_from(skip).unwrap_or(i64::MAX));
    sql
}
