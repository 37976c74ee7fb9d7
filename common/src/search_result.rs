use serde::{Deserialize, Serialize};

use crate::search_const::{OPEN_STATUS_CODE, OPEN_STATUS_DESCRIPTION};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedRecreationResources {
    pub data: Vec<RecreationResourceSearchItem>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub filters: Vec<SearchFilterMenu>,
    #[serde(rename = "recResourceIds")]
    pub rec_resource_ids: Vec<String>,
    pub extent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecreationResourceSearchItem {
    pub rec_resource_id: String,
    pub name: String,
    pub closest_community: Option<String>,
    pub district_description: Option<String>,
    pub rec_resource_type: Option<String>,
    pub rec_resource_type_code: Option<String>,
    pub recreation_activity: Vec<RecreationActivity>,
    pub recreation_status: RecreationStatus,
    pub recreation_resource_images: Vec<RecreationResourceImage>,
    pub recreation_structure: RecreationStructure,
    pub site_point_geometry: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecreationActivity {
    pub recreation_activity_code: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecreationStatus {
    pub status_code: i32,
    pub description: String,
    pub comment: Option<String>,
}

impl Default for RecreationStatus {
    fn default() -> Self {
        Self {
            status_code: OPEN_STATUS_CODE,
            description: OPEN_STATUS_DESCRIPTION.to_string(),
            comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecreationResourceImage {
    pub ref_id: String,
    pub caption: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecreationStructure {
    pub has_toilet: bool,
    pub has_table: bool,
}


/// One selectable facet in the search page sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilterMenu {
    #[serde(rename = "type")]
    pub menu_type: String,
    pub label: String,
    pub param: String,
    pub options: Vec<SearchFilterOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilterOption {
    pub id: String,
    pub description: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FilterCountKind {
    District,
    Type,
    Activity,
    Facilities,
    Access,
}

impl FilterCountKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "district" => Some(Self::District),
            "type" => Some(Self::Type),
            "activity" => Some(Self::Activity),
            "facilities" => Some(Self::Facilities),
            "access" => Some(Self::Access),
            _ => None,
        }
    }
}

/// Number of matching resources for one facet option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRecordCount {
    pub kind: FilterCountKind,
    pub code: String,
    pub description: String,
    pub count: u64,
}
