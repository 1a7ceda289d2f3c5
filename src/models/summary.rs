use serde::{Deserialize, Serialize};

use super::line_item::CostedLineItem;

/// Total cost of one activity across all of its sub-activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTotal {
    pub activity: String,
    pub total_cost: f64,
}

/// Per-activity roll-up, in the order each activity first appears in the worksheet.
///
/// Derived on every read and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivitySummary {
    pub totals: Vec<ActivityTotal>,
}

impl ActivitySummary {
    pub fn get(&self, activity: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.activity == activity)
            .map(|t| t.total_cost)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityTotal> {
        self.totals.iter()
    }
}

/// Everything a presentation layer needs to draw one worksheet view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub rows: Vec<CostedLineItem>,
    pub summary: ActivitySummary,
    pub grand_total: f64,
}

/// The roll-up part of a [`CostReport`], without the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: ActivitySummary,
    pub grand_total: f64,
}

impl From<CostReport> for SummaryResponse {
    fn from(report: CostReport) -> Self {
        Self {
            summary: report.summary,
            grand_total: report.grand_total,
        }
    }
}
