//! User identity records supplied by the claims source.

use serde::{Deserialize, Serialize};

use super::claims::UserClaims;

/// A user as seen by the authentication core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Argon2 PHC string. `None` for accounts created through an external
    /// provider, which cannot log in with a password.
    pub password_hash: Option<String>,
}

impl UserRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Claims minted into tokens at login.
    pub fn claims(&self) -> UserClaims {
        UserClaims::new(self.id.clone(), self.display_name())
    }
}

/// Profile returned by the external OAuth provider callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
