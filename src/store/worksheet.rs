use crate::catalog;
use crate::cost;
use crate::error::ValidationError;
use crate::error::{Result, WorksheetError};
use crate::models::*;

/// The ordered rows of one editing session.
///
/// Insertion order is display order. A worksheet starts empty and is seeded
/// from the catalog at most once; afterwards it changes only through the
/// row operations below, each of which validates before mutating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    rows: Vec<LineItem>,
    seeded: bool,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A worksheet already populated from the catalog.
    pub fn seeded(rates: &RateTable) -> Self {
        let mut worksheet = Self::new();
        worksheet.seed(rates);
        worksheet
    }

    /// Populate from the default catalog. Returns the number of rows added,
    /// which is zero on every call after the first.
    pub fn seed(&mut self, rates: &RateTable) -> usize {
        if self.seeded {
            tracing::debug!("Worksheet already seeded, skipping");
            return 0;
        }

        let rows = catalog::seed_rows(rates.default_band());
        let added = rows.len();
        self.rows.extend(rows);
        self.seeded = true;
        added
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Append a row. The sub-activity name is trimmed; omitted fields take
    /// the add-row defaults.
    pub fn add_row(&mut self, input: AddRowInput, rates: &RateTable) -> Result<LineItem> {
        let item = LineItem {
            activity: input.activity.trim().to_string(),
            sub_activity: input.sub_activity.trim().to_string(),
            band_level: input
                .band_level
                .unwrap_or_else(|| rates.default_band().clone()),
            hours: input.hours.unwrap_or(DEFAULT_ADDED_HOURS),
            margin: input.margin.unwrap_or(DEFAULT_MARGIN),
        };

        if let Err(e) = validate_priced(&item, rates) {
            tracing::warn!("Rejected new row: {}", e);
            return Err(e.into());
        }
        warn_unknown_band(&item.band_level, rates);

        tracing::debug!(
            "Added sub-activity '{}' to {}",
            item.sub_activity,
            item.activity
        );
        self.rows.push(item.clone());
        Ok(item)
    }

    /// Apply the given band, hours and margin to the row at `index`.
    /// Either every provided field is applied or none is.
    pub fn update_row(
        &mut self,
        index: usize,
        input: UpdateRowInput,
        rates: &RateTable,
    ) -> Result<LineItem> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(WorksheetError::IndexOutOfRange { index, len })?;

        let mut updated = row.clone();
        if let Some(band) = input.band_level {
            updated.band_level = band;
        }
        if let Some(hours) = input.hours {
            updated.hours = hours;
        }
        if let Some(margin) = input.margin {
            updated.margin = margin;
        }

        if let Err(e) = validate_priced(&updated, rates) {
            tracing::warn!("Rejected edit of row {}: {}", index, e);
            return Err(e.into());
        }
        warn_unknown_band(&updated.band_level, rates);

        *row = updated.clone();
        tracing::debug!("Updated row {} ({})", index, updated.sub_activity);
        Ok(updated)
    }

    pub fn remove_row(&mut self, index: usize) -> Result<LineItem> {
        if index >= self.rows.len() {
            return Err(WorksheetError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let removed = self.rows.remove(index);
        tracing::debug!("Removed row {} ({})", index, removed.sub_activity);
        Ok(removed)
    }

    /// Replace every row with `rows`, as returned by a bulk table editor.
    ///
    /// Invalid rows are filtered out and reported in the outcome, never
    /// silently dropped. Valid rows keep their submitted order.
    pub fn replace_all(&mut self, rows: Vec<LineItem>, rates: &RateTable) -> ReplaceOutcome {
        let mut kept = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            match validate_priced(&row, rates) {
                Ok(()) => {
                    warn_unknown_band(&row.band_level, rates);
                    kept.push(row);
                }
                Err(e) => {
                    tracing::warn!("Dropping row {} from bulk edit: {}", index, e);
                    rejected.push(RejectedRow {
                        index,
                        row,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let outcome = ReplaceOutcome {
            kept: kept.len(),
            rejected,
        };
        self.rows = kept;
        outcome
    }

    /// Read-only view of the rows in display order.
    pub fn snapshot(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Row invariants plus a finite cost under `rates`.
fn validate_priced(
    item: &LineItem,
    rates: &RateTable,
) -> std::result::Result<(), ValidationError> {
    item.validate()?;
    if !cost::compute_cost(item, rates).is_finite() {
        return Err(ValidationError::CostOverflow(item.hours));
    }
    Ok(())
}

fn warn_unknown_band(band: &BandLevel, rates: &RateTable) {
    if !rates.contains(band) {
        tracing::warn!("Unknown band '{}', row will be priced at zero", band);
    }
}
