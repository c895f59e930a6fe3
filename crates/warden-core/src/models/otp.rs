//! Pending one-time passcode challenges.

use serde::{Deserialize, Serialize};

/// A passcode awaiting verification, stored under its nonce with a short
/// TTL. The login it was issued for is kept alongside the code so a nonce
/// cannot be redeemed for a different account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOtp {
    pub login: String,
    pub code: String,
}
