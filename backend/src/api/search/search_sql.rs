//! SQL builder helpers for recreation resource search queries.

use common::{
    search_const::{SEARCH_RADIUS_METERS, TRIGRAM_SIMILARITY_THRESHOLD},
    search_query::{SearchQuery, split_filter_codes},
};

use crate::db_utils::sql_fragment::{SqlFragment, SqlValue};

pub const SQL_FROM_CLAUSE: &str = "FROM recreation_resource_search_view";

const SQL_PUBLIC_SITE_CLAUSE: &str = "where display_on_public_site is true";

/// Point of the resource, reprojected so distances come out in meters.
pub(crate) const SQL_SITE_POINT_GEOGRAPHY: &str = "public.ST_Transform(recreation_site_point, 4326)::geography";


/// Builds the `where` clause shared by the result page and the filter option counts.
///
/// Clauses are appended in a fixed order: free text, access, district, type,
/// activities, facilities, status, location, fees. Values are bound in that
/// same order.
pub fn build_search_filter_query(query: &SearchQuery) -> SqlFragment {
    let mut terms = Vec::new();

    if let Some(term) = query.search_term() {
        terms.push(text_search_clause(term));
    }

    let code_filters = [
        ("access_code", &query.access),
        ("district_code", &query.district),
        ("recreation_resource_type_code", &query.type_),
    ];
    for (column, value) in code_filters {
        let codes = split_filter_codes(value.as_deref());
        if !codes.is_empty() {
            terms.push(code_list_clause(column, &codes));
        }
    }

    terms.extend(activities_clause(query.activities.as_deref()));
    terms.extend(facilities_clause(query.facilities.as_deref()));
    terms.extend(status_clause(query.status.as_deref()));
    if let Some((lon, lat)) = query.location() {
        terms.push(location_clause(lon, lat));
    }
    terms.extend(fees_clause(query.fees.as_deref()));

    let mut sql = SqlFragment::new(SQL_PUBLIC_SITE_CLAUSE);
    for term in terms {
        sql.push_sql("\n    and ").push_fragment(&term);
    }
    sql
}

fn text_search_clause(term: &str) -> SqlFragment {
    let pattern = format!("%{term}%");
    let similar = format!(") > {TRIGRAM_SIMILARITY_THRESHOLD}");
    let mut sql = SqlFragment::new("(name ilike ");
    sql.push_value(pattern.clone())
        .push_sql(" or closest_community ilike ")
        .push_value(pattern)
        .push_sql("\n        or similarity(name, ")
        .push_value(term)
        .push_sql(&similar)
        .push_sql(" or similarity(closest_community, ")
        .push_value(term)
        .push_sql(&similar)
        .push_sql("\n        or name % ")
        .push_value(term)
        .push_sql(" or closest_community % ")
        .push_value(term)
        .push_sql(")");
    sql
}

fn code_list_clause(column: &str, codes: &[&str]) -> SqlFragment {
    let mut sql = SqlFragment::new(format!("{column} in ("));
    sql.push_values_list(codes.iter().copied()).push_sql(")");
    sql
}

/// Resource must offer every listed activity, not just one of them.
fn activities_clause(activities: Option<&str>) -> Option<SqlFragment> {
    let codes = split_filter_codes(activities);
    if codes.is_empty() {
        return None;
    }
    // Non-numeric codes are bound as NaN and rejected by the database.
    let values = codes
        .iter()
        .map(|code| code.parse::<i64>().map(SqlValue::Int).unwrap_or(SqlValue::Float(f64::NAN)));

    let mut sql = SqlFragment::new(
        "(
        select count(*)
        from jsonb_array_elements(recreation_activity) AS activity
        where (activity->>'recreation_activity_code')::bigint in (",
    );
    sql.push_values_list(values)
        .push_sql(")\n    ) = ")
        .push_value(codes.len() as i64);
    Some(sql)
}

fn facilities_clause(facilities: Option<&str>) -> Option<SqlFragment> {
    let codes = split_filter_codes(facilities);
    if codes.is_empty() {
        return None;
    }
    let conditions = codes.iter().map(|code| {
        let mut condition = SqlFragment::new(
            "COUNT(*) FILTER (
                WHERE facility->>'description' ILIKE ",
        );
        condition.push_value(format!("%{code}%")).push_sql("\n            ) > 0");
        condition
    });

    let mut sql = SqlFragment::new(
        "(
        SELECT COUNT(*)
        FROM (
            SELECT rec_resource_id
            FROM jsonb_array_elements(recreation_structure) AS facility
            GROUP BY rec_resource_id
            HAVING ",
    );
    sql.push_fragment(&SqlFragment::join(conditions, "\n            AND "))
        .push_sql("\n        ) AS filtered_resources\n    ) > 0");
    Some(sql)
}

/// Resources without any status are implicitly open.
fn status_clause(status: Option<&str>) -> Option<SqlFragment> {
    let codes = split_filter_codes(status);
    if codes.is_empty() {
        return None;
    }
    let includes_open = codes.iter().any(|code| code.eq_ignore_ascii_case("open"));

    let mut sql = SqlFragment::new("(lower(recreation_status->>'description') in (");
    sql.push_values_list(codes.iter().map(|code| code.to_lowercase())).push_sql(")");
    if includes_open {
        sql.push_sql("\n        or recreation_status IS NULL OR recreation_status->>'description' IS NULL");
    }
    sql.push_sql(")");
    Some(sql)
}

fn location_clause(lon: f64, lat: f64) -> SqlFragment {
    let mut sql = SqlFragment::new("public.ST_DWithin(\n        ");
    sql.push_sql(SQL_SITE_POINT_GEOGRAPHY)
        .push_sql(",\n        ")
        .push_fragment(&point_geography(lon, lat))
        .push_sql(",\n        ")
        .push_value(SEARCH_RADIUS_METERS)
        .push_sql("\n    )");
    sql
}

/// `ST_MakePoint` takes longitude first.
pub(crate) fn point_geography(lon: f64, lat: f64) -> SqlFragment {
    let mut sql = SqlFragment::new("public.ST_SetSRID(public.ST_MakePoint(");
    sql.push_value(lon).push_sql(", ").push_value(lat).push_sql("), 4326)::geography");
    sql
}

fn fees_clause(fees: Option<&str>) -> Option<SqlFragment> {
    let mut predicates: Vec<&str> = Vec::new();
    for token in split_filter_codes(fees) {
        let predicate = match token.to_ascii_uppercase().as_str() {
            "R" => "is_reservable = true",
            "F" => "is_fees = true",
            "NF" => "(is_fees = false OR is_fees IS NULL)",
            _ => continue,
        };
        if !predicates.contains(&predicate) {
            predicates.push(predicate);
        }
    }
    if predicates.is_empty() {
        return None;
    }
    Some(SqlFragment::new(format!("({})", predicates.join(" OR "))))
}
