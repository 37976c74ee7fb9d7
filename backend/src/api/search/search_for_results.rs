//! Search endpoint for result lists.

use common::{
    search_const::{MAX_PAGE_NUMBER, PAGE_SIZE},
    search_query::{SearchQuery, split_filter_codes},
    search_result::{AggregatedRecordCount, FilterCountKind, PaginatedRecreationResources},
};

use crate::api::search::{
    filter_menu::build_filter_menu,
    format_search_results::format_search_results,
    search_error::SearchRequestError,
    search_filter_option_counts::{FilterOptionCountsInput, build_filter_option_counts_query, get_filter_types},
    search_page_query::build_recreation_resource_page_query,
    search_repository::{FilterOptionCountRow, SearchRepository},
    search_sql::build_search_filter_query,
};

/// Page size and row offset for a validated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub take: u64,
    pub skip: u64,
}

pub fn page_window(page: u64, limit: Option<u64>) -> Result<PageWindow, SearchRequestError> {
    if page < 1 {
        return Err(SearchRequestError::InvalidPage);
    }
    if page > MAX_PAGE_NUMBER && limit.is_none() {
        return Err(SearchRequestError::PageOutOfRange { max: MAX_PAGE_NUMBER });
    }
    let take = match limit {
        None | Some(0) => PAGE_SIZE,
        Some(limit) => limit.min(PAGE_SIZE),
    };
    // OFFSET is bound as a bigint
    let skip = (page - 1)
        .checked_mul(take)
        .filter(|skip| i64::try_from(*skip).is_ok())
        .ok_or(SearchRequestError::PageOffsetOutOfRange)?;
    Ok(PageWindow { take, skip })
}

pub fn validate_search_query(query: &SearchQuery) -> Result<(), SearchRequestError> {
    match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(SearchRequestError::InvalidCoordinates);
            }
        }
        (None, None) => {}
        _ => return Err(SearchRequestError::IncompleteCoordinates),
    }
    for code in split_filter_codes(query.activities.as_deref()) {
        if code.parse::<i64>().is_err() {
            return Err(SearchRequestError::InvalidActivityCode(code.to_string()));
        }
    }
    Ok(())
}

/// Option counts plus the two summary rows of the counts statement.
#[derive(Debug, Default, PartialEq)]
struct SplitCountRows {
    counts: Vec<AggregatedRecordCount>,
    rec_resource_ids: Vec<String>,
    extent: Option<String>,
}

fn split_count_rows(rows: Vec<FilterOptionCountRow>) -> SplitCountRows {
    let mut result = SplitCountRows::default();
    for row in rows {
        match row.kind.as_str() {
            "ids" => result.rec_resource_ids = row.rec_resource_ids.unwrap_or_default(),
            "extent" => result.extent = row.extent,
            kind => {
                let Some(kind) = FilterCountKind::parse(kind) else {
                    tracing::warn!("unknown filter count row type: {}", kind);
                    continue;
                };
                result.counts.push(AggregatedRecordCount {
                    kind,
                    code: row.code.unwrap_or_default(),
                    description: row.description.unwrap_or_default(),
                    count: row.count.unwrap_or(0).max(0) as u64,
                });
            }
        }
    }
    result
}

pub async fn search_recreation_resources(
    repository: &dyn SearchRepository,
    cloudfront_url: &str,
    query: SearchQuery,
    page: u64,
    limit: Option<u64>,
) -> anyhow::Result<PaginatedRecreationResources> {
    let window = page_window(page, limit)?;
    validate_search_query(&query)?;

    let where_clause = build_search_filter_query(&query);
    let where_clause_excluding_type = build_search_filter_query(&query.without_type());
    let where_clause_excluding_district = build_search_filter_query(&query.without_district());

    let page_sql = build_recreation_resource_page_query(&where_clause, &query, window.take, window.skip);
    let counts_sql = build_filter_option_counts_query(FilterOptionCountsInput {
        where_clause: &where_clause,
        where_clause_excluding_type: &where_clause_excluding_type,
        where_clause_excluding_district: &where_clause_excluding_district,
        filter_types: get_filter_types(&query),
    });

    let (page_rows, count_rows) = tokio::try_join!(
        repository.fetch_resource_page(&page_sql),
        repository.fetch_filter_option_counts(&counts_sql),
    )?;

    let total = page_rows.first().map(|row| row.total_count.max(0) as u64).unwrap_or(0);
    let split = split_count_rows(count_rows);
    tracing::info!(page, take = window.take, total, returned = page_rows.len(), "search done");

    Ok(PaginatedRecreationResources {
        data: format_search_results(page_rows, cloudfront_url),
        total,
        page,
        limit: window.take,
        filters: build_filter_menu(&split.counts),
        rec_resource_ids: split.rec_resource_ids,
        extent: split.extent,
    })
}
