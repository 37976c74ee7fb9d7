//! Search limits and fixed values shared by the query builders and the API.

/// Largest page the search endpoint will return, also the default page size.
pub const PAGE_SIZE: u64 = 10;

/// Highest page number reachable without an explicit `limit`.
pub const MAX_PAGE_NUMBER: u64 = 10;

pub const SEARCH_RADIUS_METERS: f64 = 50_000.0;

pub const TRIGRAM_SIMILARITY_THRESHOLD: f64 = 0.3;

pub const FILTER_CODE_DELIMITER: char = '_';

/// Unpaginated summary data (counts, ids, extent) only looks at this many matches.
pub const SUMMARY_RECORD_LIMIT: u64 = 5000;

/// Activities that never show up in the "Things to do" menu.
pub const EXCLUDED_ACTIVITY_CODES: [i64; 2] = [26, 35];

pub const OPEN_STATUS_DESCRIPTION: &str = "Open";
pub const OPEN_STATUS_CODE: i32 = 1;

pub const PREVIEW_IMAGE_SIZE_CODE: &str = "pre";
