//! Worksheet state: the per-session [`Worksheet`] and the [`SessionStore`]
//! that keeps one worksheet per session for the HTTP service.

mod worksheet;

pub use worksheet::Worksheet;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, WorksheetError};
use crate::models::{RateTable, SessionInfo};

/// Default cap on live sessions held by a [`SessionStore`].
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

struct SessionEntry {
    worksheet: Worksheet,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

/// In-memory sessions, each owning its own worksheet.
///
/// Cloning is cheap and shares the same sessions. No worksheet is ever
/// reachable from two session ids. At most `max_sessions` are held; creating
/// one more evicts the least recently used session.
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }

    /// A store holding at most `max_sessions` sessions (at least one).
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Start a session with a freshly seeded worksheet.
    pub fn create_session(&self, rates: &RateTable) -> SessionInfo {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!("Evicted idle session {} (limit {})", oldest, self.max_sessions);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let worksheet = Worksheet::seeded(rates);
        let row_count = worksheet.len();

        sessions.insert(
            id,
            SessionEntry {
                worksheet,
                created_at: now,
                last_used: now,
            },
        );
        tracing::info!("Created session {} with {} rows", id, row_count);

        SessionInfo {
            id,
            row_count,
            created_at: now,
        }
    }

    pub fn get_session(&self, id: Uuid) -> Result<SessionInfo> {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        sessions
            .get_mut(&id)
            .map(|entry| {
                entry.last_used = Utc::now();
                entry
            })
            .map(|entry| SessionInfo {
                id,
                row_count: entry.worksheet.len(),
                created_at: entry.created_at,
            })
            .ok_or(WorksheetError::SessionNotFound(id))
    }

    /// Run `f` against the session's worksheet without modifying it.
    pub fn with_worksheet<T>(&self, id: Uuid, f: impl FnOnce(&Worksheet) -> T) -> Result<T> {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let entry = sessions
            .get_mut(&id)
            .ok_or(WorksheetError::SessionNotFound(id))?;
        entry.last_used = Utc::now();
        Ok(f(&entry.worksheet))
    }

    /// Run `f` against the session's worksheet with exclusive access.
    pub fn with_worksheet_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Worksheet) -> T,
    ) -> Result<T> {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let entry = sessions
            .get_mut(&id)
            .ok_or(WorksheetError::SessionNotFound(id))?;
        entry.last_used = Utc::now();
        Ok(f(&mut entry.worksheet))
    }

    /// Discard the session and its worksheet. Returns `false` if it did not exist.
    pub fn end_session(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let removed = sessions.remove(&id).is_some();
        if removed {
            tracing::info!("Ended session {}", id);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            max_sessions: self.max_sessions,
        }
    }
}
