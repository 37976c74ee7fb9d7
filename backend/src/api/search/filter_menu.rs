//! Sidebar filter menu built from aggregated option counts.

use common::search_result::{AggregatedRecordCount, FilterCountKind, SearchFilterMenu, SearchFilterOption};

const MULTI_SELECT: &str = "multi-select";

/// Facilities are always offered, even when nothing matched them.
const FACILITY_OPTIONS: [(&str, &str); 2] = [("table", "Tables"), ("toilet", "Toilets")];

pub fn build_filter_menu(counts: &[AggregatedRecordCount]) -> Vec<SearchFilterMenu> {
    let options_of = |kind: FilterCountKind| -> Vec<SearchFilterOption> {
        counts
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| SearchFilterOption {
                id: c.code.clone(),
                description: c.description.clone(),
                count: c.count,
            })
            .collect()
    };

    let facilities = FACILITY_OPTIONS
        .iter()
        .map(|(id, description)| SearchFilterOption {
            id: id.to_string(),
            description: description.to_string(),
            count: counts
                .iter()
                .find(|c| c.kind == FilterCountKind::Facilities && c.code == *id)
                .map(|c| c.count)
                .unwrap_or(0),
        })
        .collect();

    let access = options_of(FilterCountKind::Access)
        .into_iter()
        .map(|option| SearchFilterOption {
            description: format!("{} access", option.description),
            ..option
        })
        .collect();

    vec![
        menu("District", "district", options_of(FilterCountKind::District)),
        menu("Type", "type", options_of(FilterCountKind::Type)),
        menu("Things to do", "activities", options_of(FilterCountKind::Activity)),
        menu("Facilities", "facilities", facilities),
        menu("Access type", "access", access),
    ]
}

fn menu(label: &str, param: &str, options: Vec<SearchFilterOption>) -> SearchFilterMenu {
    SearchFilterMenu {
        menu_type: MULTI_SELECT.to_string(),
        label: label.to_string(),
        param: param.to_string(),
        options,
    }
}
