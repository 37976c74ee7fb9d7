//! Statement counting matching resources for every filter option.

use common::{
    search_const::{EXCLUDED_ACTIVITY_CODES, SUMMARY_RECORD_LIMIT},
    search_query::SearchQuery,
};

use crate::api::search::search_sql::SQL_FROM_CLAUSE;
use crate::db_utils::sql_fragment::SqlFragment;

/// Filter combinations that change how option counts are computed.
///
/// District and type counts already ignore their own filter through the
/// excluding where clauses, so only access needs a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterTypes {
    /// Access is the only active filter; access counts then cover every public resource.
    pub is_only_access_filter: bool,
}

pub fn get_filter_types(query: &SearchQuery) -> FilterTypes {
    let set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    let others = [&query.district, &query.type_, &query.status, &query.fees, &query.activities, &query.facilities];

    FilterTypes {
        is_only_access_filter: set(&query.access) && !others.into_iter().any(set),
    }
}

pub struct FilterOptionCountsInput<'a> {
    pub where_clause: &'a SqlFragment,
    /// Same filters minus `type`, so the type facet keeps its unselected options.
    pub where_clause_excluding_type: &'a SqlFragment,
    /// Same filters minus `district`, so the district facet keeps its unselected options.
    pub where_clause_excluding_district: &'a SqlFragment,
    pub filter_types: FilterTypes,
}

/// Builds one `UNION ALL` statement returning `(type, code, description, count,
/// rec_resource_ids, extent)` rows.
///
/// Besides the per-option counts there is one `ids` row listing the matching
/// resource ids and one `extent` row with the GeoJSON bounds of their points.
/// Both only look at the first [`SUMMARY_RECORD_LIMIT`] matches.
pub fn build_filter_option_counts_query(input: FilterOptionCountsInput<'_>) -> SqlFragment {
    let mut sql = SqlFragment::new(
        "
  WITH filtered_resources AS (
    SELECT
      rec_resource_id,
      district_code,
      access_code,
      recreation_resource_type_code,
      has_toilets,
      has_tables,
      recreation_site_point
    ",
    );
    sql.push_sql(SQL_FROM_CLAUSE)
        .push_sql("\n    ")
        .push_fragment(input.where_clause)
        .push_sql(
            "
  ),
  district_filter_resources AS (
    SELECT rec_resource_id, district_code
    ",
        )
        .push_sql(SQL_FROM_CLAUSE)
        .push_sql("\n    ")
        .push_fragment(input.where_clause_excluding_district)
        .push_sql(
            "
  ),
  type_filter_resources AS (
    SELECT rec_resource_id, recreation_resource_type_code
    ",
        )
        .push_sql(SQL_FROM_CLAUSE)
        .push_sql("\n    ")
        .push_fragment(input.where_clause_excluding_type)
        .push_sql(&format!(
            "
  ),
  summary_resources AS (
    SELECT rec_resource_id, recreation_site_point
    FROM filtered_resources
    ORDER BY rec_resource_id
    LIMIT {SUMMARY_RECORD_LIMIT}
  ),
  activity_counts AS (
    SELECT
      rac.recreation_activity_code,
      rac.description,
      COUNT(DISTINCT fr.rec_resource_id)::INT AS recreation_activity_count
    FROM recreation_activity_code rac
    LEFT JOIN recreation_activity ra ON rac.recreation_activity_code = ra.recreation_activity_code
    LEFT JOIN filtered_resources fr ON fr.rec_resource_id = ra.rec_resource_id
    WHERE rac.recreation_activity_code::bigint NOT IN ("
        ))
        .push_values_list(EXCLUDED_ACTIVITY_CODES)
        .push_sql(
            ")
    GROUP BY rac.recreation_activity_code, rac.description
    ORDER BY rac.description ASC
  ),
  district_counts AS (
    SELECT
      dcv.district_code AS code,
      MAX(dcv.description) AS description,
      COUNT(dfr.district_code)::INT AS count
    FROM recreation_resource_district_count_view dcv
    LEFT JOIN district_filter_resources dfr ON dfr.district_code = dcv.district_code
    WHERE dcv.district_code != 'NULL'
    GROUP BY dcv.district_code, dcv.description
    ORDER BY dcv.description ASC
  ),
  access_counts AS (
    SELECT
      acv.access_code AS code,
      acv.access_description AS description,
      CASE
        WHEN ",
        )
        .push_value(input.filter_types.is_only_access_filter)
        .push_sql(
            " THEN (SELECT COUNT(*) FROM recreation_resource_search_view WHERE access_code = acv.access_code AND display_on_public_site = true)::INT
        ELSE COUNT(fr.access_code)::INT
      END AS count
    FROM recreation_resource_access_count_view acv
    LEFT JOIN filtered_resources fr ON fr.access_code = acv.access_code
    WHERE acv.access_code != 'NULL'
    GROUP BY acv.access_code, acv.access_description
    ORDER BY acv.access_description ASC
  ),
  type_counts AS (
    SELECT
      tcv.rec_resource_type_code AS code,
      MAX(tcv.description) AS description,
      COUNT(tfr.recreation_resource_type_code)::INT AS count
    FROM recreation_resource_type_count_view tcv
    LEFT JOIN type_filter_resources tfr ON tfr.recreation_resource_type_code = tcv.rec_resource_type_code
    GROUP BY tcv.rec_resource_type_code, tcv.description
    ORDER BY tcv.rec_resource_type_code DESC
  ),
  facility_counts AS (
    SELECT
      COUNT(CASE WHEN has_toilets THEN 1 END)::INT AS total_toilet_count,
      COUNT(CASE WHEN has_tables THEN 1 END)::INT AS total_table_count
    FROM filtered_resources
  )
  SELECT
    'activity'::TEXT AS type,
    ac.recreation_activity_code::TEXT AS code,
    ac.description::TEXT AS description,
    ac.recreation_activity_count AS count,
    NULL::TEXT[] AS rec_resource_ids,
    NULL::TEXT AS extent
  FROM activity_counts ac

  UNION ALL

  SELECT 'district', dc.code::TEXT, dc.description::TEXT, dc.count, NULL, NULL
  FROM district_counts dc

  UNION ALL

  SELECT 'access', ac.code::TEXT, ac.description::TEXT, ac.count, NULL, NULL
  FROM access_counts ac

  UNION ALL

  SELECT 'type', tc.code::TEXT, tc.description::TEXT, tc.count, NULL, NULL
  FROM type_counts tc

  UNION ALL

  SELECT 'facilities', 'toilet', 'Toilets', fc.total_toilet_count, NULL, NULL
  FROM facility_counts fc

  UNION ALL

  SELECT 'facilities', 'table', 'Tables', fc.total_table_count, NULL, NULL
  FROM facility_counts fc

  UNION ALL

  SELECT 'ids', NULL, NULL, NULL, COALESCE(ARRAY_AGG(sr.rec_resource_id::TEXT), ARRAY[]::TEXT[]), NULL
  FROM summary_resources sr

  UNION ALL

  SELECT 'extent', NULL, NULL, NULL, NULL, public.ST_AsGeoJSON(public.ST_Extent(sr.recreation_site_point)::geometry)
  FROM summary_resources sr
",
        );
    sql
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::search::search_sql::build_search_filter_query;
    use crate::db_utils::sql_fragment::SqlValue;

    fn counts_query(query: &SearchQuery) -> SqlFragment {
        let where_clause = build_search_filter_query(query);
        let where_clause_excluding_type = build_search_filter_query(&query.without_type());
        let where_clause_excluding_district = build_search_filter_query(&query.without_district());
        build_filter_option_counts_query(FilterOptionCountsInput {
            where_clause: &where_clause,
            where_clause_excluding_type: &where_clause_excluding_type,
            where_clause_excluding_district: &where_clause_excluding_district,
            filter_types: get_filter_types(query),
        })
    }

    #[test]
    fn counts_query_contains_every_facet() {
        let result = counts_query(&SearchQuery::default());
        let sql = result.sql();
        assert!(sql.contains("WITH filtered_resources AS"));
        assert!(sql.contains("FROM recreation_resource_search_view"));
        assert!(sql.contains("UNION ALL"));
        assert!(sql.contains("type_filter_resources"));
        assert!(sql.contains("COUNT(tfr.recreation_resource_type_code)::INT AS count"));
        assert!(sql.contains("district_filter_resources"));
        assert!(sql.contains("COUNT(dfr.district_code)::INT AS count"));
        assert!(sql.contains("ELSE COUNT(fr.access_code)::INT"));
        assert!(sql.contains("LIMIT 5000"));
        for code in EXCLUDED_ACTIVITY_CODES {
            assert!(result.values().contains(&SqlValue::Int(code)));
        }
        assert_eq!(result.placeholder_count(), result.values().len());
    }

    #[test]
    fn district_counts_ignore_the_district_filter() {
        let query = SearchQuery {
            district: Some("RDCK".into()),
            access: Some("B".into()),
            ..Default::default()
        };
        let result = counts_query(&query);
        let district = SqlValue::Text("RDCK".into());
        let access = SqlValue::Text("B".into());

        // filtered_resources and type_filter_resources filter on district, district_filter_resources does not
        assert_eq!(result.values().iter().filter(|v| **v == district).count(), 2);
        assert_eq!(result.values().iter().filter(|v| **v == access).count(), 3);
        assert_eq!(result.placeholder_count(), result.values().len());
    }

    #[test]
    fn access_flag_is_bound_as_a_value() {
        let only_access = SearchQuery { access: Some("AC1".into()), ..Default::default() };
        let result = counts_query(&only_access);
        assert!(result.sql().contains(
            "WHEN ? THEN (SELECT COUNT(*) FROM recreation_resource_search_view WHERE access_code = acv.access_code AND display_on_public_site = true)::INT"
        ));
        assert_eq!(result.values().last(), Some(&SqlValue::Bool(true)));

        let mixed = SearchQuery {
            access: Some("AC1".into()),
            district: Some("D1".into()),
            ..Default::default()
        };
        assert_eq!(counts_query(&mixed).values().last(), Some(&SqlValue::Bool(false)));
    }

    #[test]
    fn text_and_location_filters_reach_every_facet_source() {
        let query = SearchQuery {
            search_text: "park".into(),
            lat: Some(50.0),
            lon: Some(-120.0),
            ..Default::default()
        };
        let result = counts_query(&query);
        assert!(result.sql().contains("name ilike"));
        assert!(result.sql().contains("ST_DWithin"));
        assert!(result.values().contains(&SqlValue::Text("%park%".into())));
        assert!(result.values().contains(&SqlValue::Float(50.0)));
        assert!(result.values().contains(&SqlValue::Float(-120.0)));
    }

    #[test]
    fn access_flag_needs_access_alone() {
        let only_access = SearchQuery { access: Some("AC1".into()), ..Default::default() };
        assert_eq!(get_filter_types(&only_access), FilterTypes { is_only_access_filter: true });

        let with_activity = SearchQuery {
            access: Some("AC1".into()),
            activities: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(get_filter_types(&with_activity), FilterTypes::default());

        let only_district = SearchQuery { district: Some("D1".into()), ..Default::default() };
        assert_eq!(get_filter_types(&only_district), FilterTypes::default());

        let empty_value = SearchQuery { access: Some(String::new()), ..Default::default() };
        assert_eq!(get_filter_types(&empty_value), FilterTypes::default());
    }
}
