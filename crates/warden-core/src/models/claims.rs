//! Identity claims carried inside bearer tokens and refresh envelopes.

use serde::{Deserialize, Serialize};

/// Identity claims embedded in every credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Unique user identity; also the session ledger key.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl UserClaims {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
