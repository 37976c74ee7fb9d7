//! Search API operations and module exports.

mod search_for_results;
pub use search_for_results::{PageWindow, page_window, search_recreation_resources, validate_search_query};

mod search_error;
pub use search_error::SearchRequestError;

pub mod filter_menu;
pub mod format_search_results;
pub mod search_filter_option_counts;
pub mod search_page_query;
pub mod search_repository;
pub mod search_sql;
