use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::line_item::CostedLineItem;

/// An editing session owning exactly one worksheet.
///
/// Sessions are **ephemeral**: the worksheet lives in memory until the
/// session is ended, and nothing is written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub row_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Response when creating a session, includes the seeded rows with costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: SessionInfo,
    pub rows: Vec<CostedLineItem>,
}

/// Result of asking a session to seed its worksheet.
///
/// `rows_added` is zero whenever the worksheet was already seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResult {
    pub rows_added: usize,
    pub row_count: usize,
}
