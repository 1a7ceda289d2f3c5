//! Error types for worksheet operations.
//!
//! Every failure a caller can trigger (bad row input, missing index, unknown
//! session) is returned as a [`WorksheetError`] value. An unrecognized band
//! is deliberately absent: it prices at zero instead of failing.

use thiserror::Error;
use uuid::Uuid;

/// Per-row input problems. A row that fails validation is never stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Activity name cannot be empty")]
    EmptyActivity,

    #[error("Sub-Activity name cannot be empty")]
    EmptySubActivity,

    #[error("Hours must not be negative (got {0})")]
    NegativeHours(f64),

    #[error("Hours must be a finite number")]
    InvalidHours,

    #[error("Margin must be between 0 and 1 (got {0})")]
    MarginOutOfRange(f64),

    #[error("Total cost is too large to represent ({0} hours)")]
    CostOverflow(f64),
}

#[derive(Debug, Error)]
pub enum WorksheetError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Row {index} not found (worksheet has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("CSV export failed: {0}")]
    Export(String),

    #[error("Invalid rate table: {0}")]
    InvalidRateTable(String),
}

impl From<csv::Error> for WorksheetError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorksheetError>;
