//! CSV export of a costed worksheet.
//!
//! Numbers are written with Rust's shortest round-trip float formatting, so
//! reading an export back and recomputing yields the same costs.

use crate::error::{Result, WorksheetError};
use crate::models::{CostedLineItem, LineItem};

/// File name offered to the user for download.
pub const EXPORT_FILE_NAME: &str = "cro_cost_estimation.csv";

pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

pub const HEADER: [&str; 6] = [
    "Activity",
    "Sub-Activity",
    "Band Level",
    "Hours",
    "Margin",
    "Total Cost",
];

/// Encode `computed` as UTF-8 CSV: a header row then one record per row,
/// in worksheet order.
pub fn to_csv_bytes(computed: &[CostedLineItem]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in computed {
        let item = &row.item;
        let hours = item.hours.to_string();
        let margin = item.margin.to_string();
        let total_cost = row.total_cost.to_string();
        writer.write_record([
            item.activity.as_str(),
            item.sub_activity.as_str(),
            item.band_level.as_str(),
            hours.as_str(),
            margin.as_str(),
            total_cost.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| WorksheetError::Export(e.to_string()))
}

/// Read the rows of an export back. The `Total Cost` column is ignored;
/// costs are always recomputed from the row fields.
pub fn from_csv_bytes(bytes: &[u8]) -> Result<Vec<LineItem>> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader.headers()?.clone();
    let expected = &HEADER[..5];
    if headers.len() < expected.len() || headers.iter().zip(expected).any(|(h, e)| h != *e) {
        return Err(WorksheetError::Export(format!(
            "unexpected header row: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Record 1 is the first data row after the header.
        let line = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        rows.push(LineItem {
            activity: field(0).to_string(),
            sub_activity: field(1).to_string(),
            band_level: field(2).into(),
            hours: parse_number(field(3), "Hours", line)?,
            margin: parse_number(field(4), "Margin", line)?,
        });
    }

    Ok(rows)
}

fn parse_number(value: &str, column: &str, line: usize) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        WorksheetError::Export(format!(
            "record {}: {} is not a number: '{}'",
            line, column, value
        ))
    })
}
