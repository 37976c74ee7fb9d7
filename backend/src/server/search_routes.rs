use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::search_query::SearchQuery;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::search::SearchRequestError;
use crate::server::AppState;

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequestParams {
    pub filter: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
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

impl SearchRequestParams {
    pub fn into_search_query(self) -> (SearchQuery, u64, Option<u64>) {
        let query = SearchQuery {
            search_text: self.filter.unwrap_or_default(),
            activities: self.activities,
            type_: self.type_,
            district: self.district,
            access: self.access,
            facilities: self.facilities,
            status: self.status,
            fees: self.fees,
            lat: self.lat,
            lon: self.lon,
        };
        (query, self.page.unwrap_or(1), self.limit)
    }
}

async fn _search_recreation_resources(state: AppState, params: SearchRequestParams) -> anyhow::Result<Response> {
    let (query, page, limit) = params.into_search_query();
    info!(page, ?limit, "Searching recreation resources");
    let result = crate::api::search::search_recreation_resources(
        state.repository.as_ref(),
        &state.cloudfront_url,
        query,
        page,
        limit,
    )
    .await?;
    Ok(Json(result).into_response())
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

pub async fn search_recreation_resources(
    State(state): State<AppState>,
    params: Result<Query<SearchRequestParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            info!("search_recreation_resources: malformed query string: {}", rejection.body_text());
            return bad_request(rejection.body_text());
        }
    };
    match _search_recreation_resources(state, params).await {
        Ok(response) => response,
        Err(e) => match e.downcast_ref::<SearchRequestError>() {
            Some(request_error) => {
                info!("search_recreation_resources: rejected request: {}", request_error);
                bad_request(request_error.to_string())
            }
            None => {
                tracing::error!("search_recreation_resources: request failed: {:#?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        },
    }
}
