//! Key-value implementation of [`SessionLedgerRepository`].
//!
//! The ledger for a user is stored as a JSON document under the user's
//! identity string, with no expiry.

use tracing::debug;
use warden_core::error::WardenResult;
use warden_core::models::session::SessionLedger;
use warden_core::repository::{KeyValueStore, SessionLedgerRepository};

use crate::error::StoreError;

#[derive(Clone)]
pub struct KvSessionLedgerRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvSessionLedgerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> SessionLedgerRepository for KvSessionLedgerRepository<S> {
    async fn load(&self, user_id: &str) -> WardenResult<Option<SessionLedger>> {
        let Some(raw) = self.store.get(user_id).await? else {
            return Ok(None);
        };

        let ledger = serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: user_id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(ledger))
    }

    async fn save(&self, ledger: &SessionLedger) -> WardenResult<()> {
        let raw = serde_json::to_string(ledger)?;
        debug!(user_id = %ledger.user_id, sessions = ledger.sessions.len(), "Saving session ledger");
        self.store.set(&ledger.user_id, raw).await
    }
}
