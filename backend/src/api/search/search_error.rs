//! Request problems reported back to the caller as `400 Bad Request`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchRequestError {
    #[error("Page number cannot exceed {max} without a limit")]
    PageOutOfRange { max: u64 },

    #[error("Page number must be at least 1")]
    InvalidPage,

    #[error("Page number is too large")]
    PageOffsetOutOfRange,

    #[error("Both lat and lon must be provided")]
    IncompleteCoordinates,

    #[error("Invalid coordinates: lat must be within [-90, 90] and lon within [-180, 180]")]
    InvalidCoordinates,

    #[error("Invalid activity code: {0}")]
    InvalidActivityCode(String),
}
