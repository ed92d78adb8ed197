use thiserror::Error;

/// Validation and contract errors exposed by `aurum-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be ISO 8601 YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date arithmetic overflowed from {date} by {days} days")]
    DateOutOfRange { date: String, days: i64 },

    #[error("invalid window policy '{value}', expected 'week' or 'trailing:<days>'")]
    InvalidWindowPolicy { value: String },
    #[error("trailing window of {days} days exceeds max {max}")]
    WindowTooLong { days: u32, max: u32 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("asset code must be a 3-letter ISO code: '{value}'")]
    InvalidAssetCode { value: String },
}
