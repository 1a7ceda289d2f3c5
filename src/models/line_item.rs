use serde::{Deserialize, Serialize};

use super::band::BandLevel;
use crate::error::ValidationError;

/// Hours given to a row added without an explicit value.
pub const DEFAULT_ADDED_HOURS: f64 = 5.0;

/// Hours given to every seeded catalog row.
pub const DEFAULT_SEED_HOURS: f64 = 10.0;

/// Markup applied when none is specified (25%).
pub const DEFAULT_MARGIN: f64 = 0.25;

/// One worksheet row: a sub-activity's estimate.
///
/// The row never stores its cost. Cost is derived on every read by
/// [`crate::cost::compute_cost`], so it cannot drift from the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Parent grouping key.
    pub activity: String,
    /// Row label. Duplicates within an activity are allowed.
    pub sub_activity: String,
    pub band_level: BandLevel,
    pub hours: f64,
    /// Fractional markup in `[0, 1]`.
    pub margin: f64,
}

impl LineItem {
    /// Check every stored field against the row invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.activity.trim().is_empty() {
            return Err(ValidationError::EmptyActivity);
        }
        if self.sub_activity.trim().is_empty() {
            return Err(ValidationError::EmptySubActivity);
        }
        validate_hours(self.hours)?;
        validate_margin(self.margin)
    }
}

fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() {
        return Err(ValidationError::InvalidHours);
    }
    if hours < 0.0 {
        return Err(ValidationError::NegativeHours(hours));
    }
    Ok(())
}

fn validate_margin(margin: f64) -> Result<(), ValidationError> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&margin) {
        return Err(ValidationError::MarginOutOfRange(margin));
    }
    Ok(())
}

/// A row together with its derived cost, as produced by the cost engine.
///
/// The row fields are flattened into the JSON response, with an additional
/// `total_cost` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostedLineItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub total_cost: f64,
}

/// Input for appending a row. Omitted fields take the add-row defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddRowInput {
    pub activity: String,
    pub sub_activity: String,
    /// Defaults to the lowest band of the rate table.
    pub band_level: Option<BandLevel>,
    /// Defaults to [`DEFAULT_ADDED_HOURS`].
    pub hours: Option<f64>,
    /// Defaults to [`DEFAULT_MARGIN`].
    pub margin: Option<f64>,
}

impl AddRowInput {
    pub fn new(activity: impl Into<String>, sub_activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            sub_activity: sub_activity.into(),
            ..Default::default()
        }
    }
}

/// Input for editing a row. All fields are optional for partial updates.
///
/// `activity` and `sub_activity` are read-only once a row exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRowInput {
    pub band_level: Option<BandLevel>,
    pub hours: Option<f64>,
    pub margin: Option<f64>,
}

/// A row dropped by a bulk replace, with its position in the submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub index: usize,
    pub row: LineItem,
    pub reason: String,
}

/// Result of a bulk replace: the rows now in the worksheet and those filtered out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    pub kept: usize,
    pub rejected: Vec<RejectedRow>,
}
