//! Plain-text rendering of worksheets, roll-ups and the rate card for the CLI.

use crate::models::{ActivitySummary, CostedLineItem, RateTable};

const BAR: char = '█';
const BAR_WIDTH: usize = 40;

/// Format an amount as dollars with thousands separators, e.g. `$13,125.00`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Format a fractional margin as a percentage with at most two decimals,
/// e.g. `0.07` as `7` and `0.125` as `12.5`.
fn format_percent(margin: f64) -> String {
    let pct = (margin * 100.0 * 100.0).round() / 100.0;
    format!("{}", pct)
}

/// Render the rate card, one band per line.
///
/// ```text
/// - Band 1 - Junior Analyst: $50/hour
/// - Band 2 - Associate: $80/hour
/// ```
pub fn render_rates(rates: &RateTable) -> String {
    let mut output = String::new();
    for entry in rates.entries() {
        output.push_str(&format!(
            "- {}: ${}/hour\n",
            entry.band_level, entry.hourly_rate
        ));
    }
    output
}

/// Render costed rows as a tree grouped by activity, in worksheet order.
///
/// Example output:
/// ```text
/// Activity 1
/// ├── Design Phase  [Band 1 - Junior Analyst, 10h, 25%]  $625.00
/// └── Documentation  [Band 1 - Junior Analyst, 10h, 25%]  $625.00
/// ```
pub fn render_worksheet(rows: &[CostedLineItem]) -> String {
    let mut output = String::new();
    let mut activities: Vec<&str> = Vec::new();
    for row in rows {
        if !activities.contains(&row.item.activity.as_str()) {
            activities.push(&row.item.activity);
        }
    }

    for activity in activities {
        output.push_str(activity);
        output.push('\n');

        let children: Vec<&CostedLineItem> =
            rows.iter().filter(|r| r.item.activity == activity).collect();
        for (i, child) in children.iter().enumerate() {
            let branch = if i == children.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            output.push_str(branch);
            output.push_str(&format!(
                "{}  [{}, {}h, {}%]  {}\n",
                child.item.sub_activity,
                child.item.band_level,
                child.item.hours,
                format_percent(child.item.margin),
                format_currency(child.total_cost)
            ));
        }
    }
    output
}

/// Render the activity roll-up as a horizontal bar chart scaled to the
/// largest activity.
pub fn render_summary(summary: &ActivitySummary) -> String {
    let max = summary
        .iter()
        .map(|t| t.total_cost)
        .fold(0.0_f64, f64::max);
    let label_width = summary.iter().map(|t| t.activity.len()).max().unwrap_or(0);

    let mut output = String::new();
    for total in summary.iter() {
        let len = if max > 0.0 {
            ((total.total_cost / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR).take(len).collect();
        output.push_str(&format!(
            "{:<width$}  {} {}\n",
            total.activity,
            bar,
            format_currency(total.total_cost),
            width = label_width
        ));
    }
    output
}
