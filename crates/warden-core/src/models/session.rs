//! Session ledger domain model.
//!
//! A [`SessionLedger`] is the per-user record of which (bearer, refresh)
//! pairs are currently authorized. Sessions are ordered most-recent first
//! and bounded by a fixed capacity; inserting into a full ledger drops the
//! tail entry. Using a session never reorders it.

use serde::{Deserialize, Serialize};

/// Default number of concurrent device sessions per user.
pub const MAX_SESSIONS: usize = 3;

/// One authenticated device. A slot is identified by the pair, not by an
/// independent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub bearer_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLedger {
    pub user_id: String,
    /// Unix milliseconds of the most recent login. Advisory only.
    pub last_login_time: i64,
    pub sessions: Vec<SessionEntry>,
}

impl SessionLedger {
    pub fn new(user_id: impl Into<String>, last_login_time: i64) -> Self {
        Self {
            user_id: user_id.into(),
            last_login_time,
            sessions: Vec::new(),
        }
    }

    /// Place a new session at the front, dropping the oldest entry when
    /// the ledger already holds `capacity` sessions.
    pub fn insert_session(
        &mut self,
        bearer_token: impl Into<String>,
        refresh_token: impl Into<String>,
        capacity: usize,
        login_time: i64,
    ) {
        let capacity = capacity.max(1);
        self.sessions.truncate(capacity - 1);
        self.sessions.insert(
            0,
            SessionEntry {
                bearer_token: bearer_token.into(),
                refresh_token: refresh_token.into(),
            },
        );
        self.last_login_time = login_time;
    }

    pub fn contains_bearer(&self, bearer_token: &str) -> bool {
        self.sessions.iter().any(|s| s.bearer_token == bearer_token)
    }

    /// Both fields must match the same entry.
    pub fn contains_refresh_pair(&self, bearer_token: &str, refresh_token: &str) -> bool {
        self.position_of_pair(bearer_token, refresh_token).is_some()
    }

    /// Swap the bearer token of the entry matching `(old_bearer, refresh)`
    /// in place. Returns `false`, leaving the ledger untouched, when no
    /// entry matches.
    pub fn replace_bearer(&mut self, old_bearer: &str, refresh_token: &str, new_bearer: &str) -> bool {
        match self.position_of_pair(old_bearer, refresh_token) {
            Some(idx) => {
                self.sessions[idx].bearer_token = new_bearer.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove the session holding `bearer_token`. Returns whether anything
    /// was removed.
    pub fn remove_bearer(&mut self, bearer_token: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.bearer_token != bearer_token);
        self.sessions.len() != before
    }

    pub fn clear_all(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn position_of_pair(&self, bearer_token: &str, refresh_token: &str) -> Option<usize> {
        self.sessions
            .iter()
            .position(|s| s.bearer_token == bearer_token && s.refresh_token == refresh_token)
    }
}
