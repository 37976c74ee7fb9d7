//! Shapes raw search rows into the public response items.

use common::{
    search_const::PREVIEW_IMAGE_SIZE_CODE,
    search_result::{
        RecreationActivity, RecreationResourceImage, RecreationResourceSearchItem, RecreationStatus,
        RecreationStructure,
    },
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::search::search_repository::RecreationResourceSearchRow;

#[derive(Debug, Deserialize)]
struct RawActivity {
    recreation_activity_code: Value,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    status_code: Option<i32>,
    description: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    ref_id: Option<Value>,
    #[serde(default)]
    image_id: Option<Value>,
    caption: Option<String>,
}

pub fn format_search_results(
    rows: Vec<RecreationResourceSearchRow>,
    cloudfront_url: &str,
) -> Vec<RecreationResourceSearchItem> {
    rows.into_iter().map(|row| format_search_result(row, cloudfront_url)).collect()
}

fn format_search_result(row: RecreationResourceSearchRow, cloudfront_url: &str) -> RecreationResourceSearchItem {
    let recreation_activity = parse_array::<RawActivity>(row.recreation_activity, &row.rec_resource_id)
        .into_iter()
        .filter_map(|activity| {
            Some(RecreationActivity {
                recreation_activity_code: json_to_i64(&activity.recreation_activity_code)?,
                description: activity.description.unwrap_or_default(),
            })
        })
        .collect();

    let recreation_resource_images = parse_array::<RawImage>(row.recreation_resource_images, &row.rec_resource_id)
        .into_iter()
        .filter_map(|image| {
            let ref_id = image.ref_id.as_ref().and_then(json_to_string);
            let image_id = image.image_id.as_ref().and_then(json_to_string);
            // storage keys use image_id, older rows only carry ref_id
            let key = image_id.clone().or_else(|| ref_id.clone())?;
            let ref_id = ref_id.or(image_id)?;
            Some(RecreationResourceImage {
                url: image_url(cloudfront_url, &row.rec_resource_id, &key, PREVIEW_IMAGE_SIZE_CODE),
                ref_id,
                caption: image.caption,
            })
        })
        .collect();

    RecreationResourceSearchItem {
        name: row.name.unwrap_or_default(),
        closest_community: row.closest_community,
        district_description: row.district_description,
        rec_resource_type: row.recreation_resource_type,
        rec_resource_type_code: row.recreation_resource_type_code,
        recreation_activity,
        recreation_status: parse_status(row.recreation_status),
        recreation_resource_images,
        recreation_structure: RecreationStructure {
            has_toilet: row.has_toilets.unwrap_or(false),
            has_table: row.has_tables.unwrap_or(false),
        },
        site_point_geometry: row.site_point_geometry,
        distance: row.distance,
        rec_resource_id: row.rec_resource_id,
    }
}

pub fn image_url(cloudfront_url: &str, rec_resource_id: &str, image_id: &str, size_code: &str) -> String {
    format!(
        "{}/images/{rec_resource_id}/{image_id}/{size_code}.webp",
        cloudfront_url.trim_end_matches('/')
    )
}

/// Missing status, or one without a description, reads as open.
fn parse_status(value: Option<Value>) -> RecreationStatus {
    let Some(raw) = value.and_then(|v| serde_json::from_value::<RawStatus>(v).ok()) else {
        return RecreationStatus::default();
    };
    let Some(description) = raw.description else {
        return RecreationStatus::default();
    };
    RecreationStatus {
        status_code: raw.status_code.unwrap_or(RecreationStatus::default().status_code),
        description,
        comment: raw.comment,
    }
}

fn parse_array<T: serde::de::DeserializeOwned>(value: Option<Value>, rec_resource_id: &str) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<T>>(value).unwrap_or_else(|e| {
            tracing::warn!(rec_resource_id, "ignoring malformed json column: {}", e);
            Vec::new()
        }),
    }
}

fn json_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn json_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> RecreationResourceSearchRow {
        RecreationResourceSearchRow {
            rec_resource_id: "REC204117".into(),
            name: Some("Aileen Lake".into()),
            closest_community: Some("Nelson".into()),
            district_description: Some("Chilliwack".into()),
            recreation_resource_type: Some("Recreation Site".into()),
            recreation_resource_type_code: Some("SIT".into()),
            total_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn missing_json_columns_use_defaults() {
        let items = format_search_results(vec![row()], "https://cdn.example.com");
        let item = &items[0];
        assert_eq!(item.rec_resource_id, "REC204117");
        assert_eq!(item.name, "Aileen Lake");
        assert!(item.recreation_activity.is_empty());
        assert!(item.recreation_resource_images.is_empty());
        assert_eq!(item.recreation_status, RecreationStatus::default());
        assert_eq!(item.recreation_status.description, "Open");
        assert_eq!(item.recreation_structure, RecreationStructure::default());
    }

    #[test]
    fn activities_accept_numeric_and_text_codes() {
        let row = RecreationResourceSearchRow {
            recreation_activity: Some(json!([
                { "recreation_activity_code": 1, "description": "Angling" },
                { "recreation_activity_code": "9", "description": "Picnicking" },
                { "recreation_activity_code": null, "description": "Broken" }
            ])),
            ..row()
        };
        let item = &format_search_results(vec![row], "")[0];
        assert_eq!(
            item.recreation_activity,
            vec![
                RecreationActivity { recreation_activity_code: 1, description: "Angling".into() },
                RecreationActivity { recreation_activity_code: 9, description: "Picnicking".into() },
            ]
        );
    }

    #[test]
    fn status_and_structure_come_from_row() {
        let row = RecreationResourceSearchRow {
            recreation_status: Some(json!({
                "status_code": 2,
                "description": "Closed",
                "comment": "Closed due to wildfire activity in the area"
            })),
            has_toilets: Some(true),
            has_tables: None,
            ..row()
        };
        let item = &format_search_results(vec![row], "")[0];
        assert_eq!(item.recreation_status.status_code, 2);
        assert_eq!(item.recreation_status.description, "Closed");
        assert_eq!(
            item.recreation_status.comment.as_deref(),
            Some("Closed due to wildfire activity in the area")
        );
        assert_eq!(item.recreation_structure, RecreationStructure { has_toilet: true, has_table: false });
    }

    #[test]
    fn image_urls_point_at_preview_size() {
        let row = RecreationResourceSearchRow {
            recreation_resource_images: Some(json!([{ "ref_id": 1000, "caption": "Lake view" }])),
            ..row()
        };
        let item = &format_search_results(vec![row], "https://cdn.example.com/")[0];
        assert_eq!(
            item.recreation_resource_images,
            vec![RecreationResourceImage {
                ref_id: "1000".into(),
                caption: Some("Lake view".into()),
                url: "https://cdn.example.com/images/REC204117/1000/pre.webp".into(),
            }]
        );
    }

    #[test]
    fn image_id_takes_precedence_for_storage_key() {
        let row = RecreationResourceSearchRow {
            recreation_resource_images: Some(json!([
                { "ref_id": "1000", "image_id": "7f3c", "caption": null },
                { "caption": "no ids" }
            ])),
            ..row()
        };
        let item = &format_search_results(vec![row], "https://cdn.example.com")[0];
        assert_eq!(item.recreation_resource_images.len(), 1);
        assert_eq!(item.recreation_resource_images[0].ref_id, "1000");
        assert_eq!(
            item.recreation_resource_images[0].url,
            "https://cdn.example.com/images/REC204117/7f3c/pre.webp"
        );
    }

    #[test]
    fn malformed_json_columns_are_skipped() {
        let row = RecreationResourceSearchRow {
            recreation_activity: Some(json!({ "not": "an array" })),
            ..row()
        };
        let item = &format_search_results(vec![row], "")[0];
        assert!(item.recreation_activity.is_empty());
    }
}
