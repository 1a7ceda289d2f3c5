//! Process configuration, read once at startup from environment variables
//! and an optional JSON rates file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::RateTable;
use crate::store::DEFAULT_MAX_SESSIONS;

const APP_NAME: &str = "cro-estimator";
const RATES_FILE: &str = "rates.json";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Bind address for the HTTP service (from CRO_ESTIMATOR_HOST)
    pub host: String,
    /// Port for the HTTP service (from CRO_ESTIMATOR_PORT)
    pub port: u16,
    /// Allowed CORS origins (from CRO_ESTIMATOR_CORS_ORIGINS, comma-separated).
    /// `None` means permissive CORS.
    pub cors_origins: Option<Vec<String>>,
    /// Cap on live sessions; the least recently used is evicted beyond it
    /// (from CRO_ESTIMATOR_MAX_SESSIONS)
    pub max_sessions: usize,
    /// Hourly rate per band, shared read-only for the life of the process.
    pub rates: RateTable,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Rates come from `CRO_ESTIMATOR_RATES` if set, else from
    /// `<config dir>/cro-estimator/rates.json` if it exists, else the
    /// standard table. A rates file that exists but is invalid is an error.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("CRO_ESTIMATOR_HOST").unwrap_or_else(|_| DEFAULT_HOST.into());

        let port = match std::env::var("CRO_ESTIMATOR_PORT") {
            Ok(s) => s
                .parse::<u16>()
                .with_context(|| format!("Invalid CRO_ESTIMATOR_PORT: {}", s))?,
            Err(_) => DEFAULT_PORT,
        };

        let max_sessions = match std::env::var("CRO_ESTIMATOR_MAX_SESSIONS") {
            Ok(s) => s
                .parse::<usize>()
                .with_context(|| format!("Invalid CRO_ESTIMATOR_MAX_SESSIONS: {}", s))?,
            Err(_) => DEFAULT_MAX_SESSIONS,
        };

        let cors_origins = std::env::var("CRO_ESTIMATOR_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .filter(|origins| !origins.is_empty());

        let rates = match std::env::var_os("CRO_ESTIMATOR_RATES") {
            Some(path) => load_rates(Path::new(&path))?,
            None => match default_rates_path() {
                Some(path) if path.exists() => load_rates(&path)?,
                _ => RateTable::standard(),
            },
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            max_sessions,
            rates,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            rates: RateTable::standard(),
        }
    }
}

/// Read a JSON rate table: an array of `{ "band_level", "hourly_rate" }`,
/// lowest tier first.
pub fn load_rates(path: &Path) -> Result<RateTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rates file {}", path.display()))?;
    let rates: RateTable = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rates file {}", path.display()))?;
    tracing::info!(
        "Loaded {} bands from {}",
        rates.entries().len(),
        path.display()
    );
    Ok(rates)
}

fn default_rates_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(APP_NAME);
    path.push(RATES_FILE);
    Some(path)
}

fn parse_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
