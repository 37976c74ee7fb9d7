//! Shared search query models and helpers.

use serde::{Deserialize, Serialize};

use crate::search_const::FILTER_CODE_DELIMITER;


/// Filter dimensions of one recreation resource search.
///
/// Every multi-code dimension is an underscore-joined list of codes, exactly as
/// it arrives on the query string (`"RDMH_RDCK"` selects two districts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub search_text: String,
    pub activities: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub district: Option<String>,
    pub access: Option<String>,
    pub facilities: Option<String>,
    pub status: Option<String>,
    pub fees: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl SearchQuery {
    /// Trimmed free-text term, `None` when there is nothing to search for.
    ///
    /// Surrounding whitespace is dropped before the term is bound, so `" site"`
    /// searches for `%site%`, not `% site%`. Inner whitespace is kept.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search_text.trim();
        if term.is_empty() { None } else { Some(term) }
    }

    /// Both coordinates, longitude first.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }

    /// Same query with the district filter dropped, used for district facet counts.
    pub fn without_district(&self) -> Self {
        Self { district: None, ..self.clone() }
    }

    /// Same query with the type filter dropped, used for type facet counts.
    pub fn without_type(&self) -> Self {
        Self { type_: None, ..self.clone() }
    }
}

/// Splits an underscore-joined filter value into its codes.
///
/// Missing values, empty strings and empty segments produce no codes.
pub fn split_filter_codes(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| v.split(FILTER_CODE_DELIMITER).filter(|code| !code.is_empty()).collect())
        .unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_filter_codes_handles_missing_and_empty_values() {
        assert!(split_filter_codes(None).is_empty());
        assert!(split_filter_codes(Some("")).is_empty());
        assert_eq!(split_filter_codes(Some("RDMH_RDCK")), vec!["RDMH", "RDCK"]);
        assert_eq!(split_filter_codes(Some("A1__A2_")), vec!["A1", "A2"]);
    }

    #[test]
    fn search_term_ignores_whitespace_only_text() {
        let query = SearchQuery { search_text: "   ".into(), ..Default::default() };
        assert_eq!(query.search_term(), None);

        let query = SearchQuery { search_text: "  lake ".into(), ..Default::default() };
        assert_eq!(query.search_term(), Some("lake"));
    }

    #[test]
    fn search_term_keeps_inner_whitespace() {
        let query = SearchQuery { search_text: " Aileen  Lake\t".into(), ..Default::default() };
        assert_eq!(query.search_term(), Some("Aileen  Lake"));
    }

    #[test]
    fn location_requires_both_coordinates() {
        let query = SearchQuery { lat: Some(49.2), ..Default::default() };
        assert_eq!(query.location(), None);

        let query = SearchQuery { lat: Some(49.2), lon: Some(-123.1), ..Default::default() };
        assert_eq!(query.location(), Some((-123.1, 49.2)));
    }

    #[test]
    fn type_field_uses_wire_name() {
        let query: SearchQuery = serde_json::from_str(r#"{"type":"SIT_RTR"}"#).unwrap();
        assert_eq!(query.type_.as_deref(), Some("SIT_RTR"));
        assert_eq!(query.search_text, "");
    }

    #[test]
    fn facet_variants_only_drop_their_own_dimension() {
        let query = SearchQuery {
            district: Some("RDCK".into()),
            type_: Some("SIT".into()),
            access: Some("B".into()),
            ..Default::default()
        };
        let no_district = query.without_district();
        assert_eq!(no_district.district, None);
        assert_eq!(no_district.type_.as_deref(), Some("SIT"));

        let no_type = query.without_type();
        assert_eq!(no_type.type_, None);
        assert_eq!(no_type.district.as_deref(), Some("RDCK"));
        assert_eq!(no_type.access.as_deref(), Some("B"));
    }
}
