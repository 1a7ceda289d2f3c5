use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorksheetError};

/// A seniority tier identifier, e.g. `"Band 3 - Senior Associate"`.
///
/// Bands are stored exactly as entered. A row may carry a band the
/// [`RateTable`] does not know; such a row prices at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandLevel(String);

impl BandLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BandLevel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BandLevel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One entry of the rate card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRate {
    pub band_level: BandLevel,
    /// Currency units per hour. Always finite and positive.
    pub hourly_rate: f64,
}

const STANDARD_RATES: &[(&str, f64)] = &[
    ("Band 1 - Junior Analyst", 50.0),
    ("Band 2 - Associate", 80.0),
    ("Band 3 - Senior Associate", 120.0),
    ("Band 4 - Manager", 150.0),
    ("Band 5 - Director/Expert", 200.0),
];

/// Hourly billing rate per band, ordered from the lowest tier up.
///
/// The table is loaded once per process and never mutated afterwards.
/// Lookups of unknown bands return `0.0` rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    entries: Vec<BandRate>,
}

impl RateTable {
    /// Build a table from explicit entries. The first entry is the default band.
    pub fn new(entries: Vec<BandRate>) -> Result<Self> {
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    /// The five standard CRO bands.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_RATES
                .iter()
                .map(|(name, rate)| BandRate {
                    band_level: BandLevel::new(*name),
                    hourly_rate: *rate,
                })
                .collect(),
        }
    }

    /// Hourly rate for `band`, or `0.0` when the band is not in the table.
    pub fn rate(&self, band: &BandLevel) -> f64 {
        self.entries
            .iter()
            .find(|e| &e.band_level == band)
            .map(|e| e.hourly_rate)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, band: &BandLevel) -> bool {
        self.entries.iter().any(|e| &e.band_level == band)
    }

    /// The lowest tier, used for seeded and newly added rows.
    pub fn default_band(&self) -> &BandLevel {
        &self.entries[0].band_level
    }

    pub fn entries(&self) -> &[BandRate] {
        &self.entries
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_entries(entries: &[BandRate]) -> Result<()> {
    if entries.is_empty() {
        return Err(WorksheetError::InvalidRateTable(
            "at least one band is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        let name = entry.band_level.as_str();
        if name.trim().is_empty() {
            return Err(WorksheetError::InvalidRateTable(
                "band name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(WorksheetError::InvalidRateTable(format!(
                "duplicate band '{}'",
                name
            )));
        }
        if !entry.hourly_rate.is_finite() || entry.hourly_rate <= 0.0 {
            return Err(WorksheetError::InvalidRateTable(format!(
                "rate for '{}' must be a positive number (got {})",
                name, entry.hourly_rate
            )));
        }
    }

    Ok(())
}

impl<'de> Deserialize<'de> for RateTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<BandRate>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}
