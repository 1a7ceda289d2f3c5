//! Cost engine: pure functions from worksheet rows to costs and roll-ups.
//!
//! Nothing here caches. Every call recomputes from the rows it is given,
//! so a reported cost always matches the current field values.

use crate::models::{
    ActivitySummary, ActivityTotal, CostReport, CostedLineItem, LineItem, RateTable,
};

/// `hours * rate(band) * (1 + margin)`. An unknown band prices at zero.
pub fn compute_cost(item: &LineItem, rates: &RateTable) -> f64 {
    item.hours * rates.rate(&item.band_level) * (1.0 + item.margin)
}

/// Cost every row, preserving worksheet order.
pub fn compute_all(rows: &[LineItem], rates: &RateTable) -> Vec<CostedLineItem> {
    rows.iter()
        .map(|item| CostedLineItem {
            item: item.clone(),
            total_cost: compute_cost(item, rates),
        })
        .collect()
}

/// Sum costs per activity. Activities appear in the order they are first
/// seen in `computed`.
pub fn aggregate_by_activity(computed: &[CostedLineItem]) -> ActivitySummary {
    let mut totals: Vec<ActivityTotal> = Vec::new();

    for row in computed {
        match totals.iter_mut().find(|t| t.activity == row.item.activity) {
            Some(total) => total.total_cost += row.total_cost,
            None => totals.push(ActivityTotal {
                activity: row.item.activity.clone(),
                total_cost: row.total_cost,
            }),
        }
    }

    ActivitySummary { totals }
}

pub fn grand_total(computed: &[CostedLineItem]) -> f64 {
    computed.iter().map(|row| row.total_cost).sum()
}

/// Rows, roll-up and grand total in one pass over the worksheet.
pub fn report(rows: &[LineItem], rates: &RateTable) -> CostReport {
    let rows = compute_all(rows, rates);
    let summary = aggregate_by_activity(&rows);
    let grand_total = grand_total(&rows);
    CostReport {
        rows,
        summary,
        grand_total,
    }
}
