//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `warden-store`; the authentication layer depends only on these traits.

use std::time::Duration;

use crate::error::WardenResult;
use crate::models::{
    otp::PendingOtp,
    session::SessionLedger,
    user::{ExternalProfile, UserRecord},
};

// ---------------------------------------------------------------------------
// Raw key-value storage
// ---------------------------------------------------------------------------

/// Minimal key-value store. Values written with [`KeyValueStore::set`]
/// persist until deleted.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = WardenResult<Option<String>>> + Send;
    fn set(&self, key: &str, value: String) -> impl Future<Output = WardenResult<()>> + Send;
    fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> impl Future<Output = WardenResult<()>> + Send;
    /// Atomically read and delete.
    fn take(&self, key: &str) -> impl Future<Output = WardenResult<Option<String>>> + Send;
    /// Atomically delete `key` only if its current value equals
    /// `expected`. Returns whether the entry was removed.
    fn delete_if_eq(
        &self,
        key: &str,
        expected: &str,
    ) -> impl Future<Output = WardenResult<bool>> + Send;
    fn delete(&self, key: &str) -> impl Future<Output = WardenResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Session ledger
// ---------------------------------------------------------------------------

pub trait SessionLedgerRepository: Send + Sync {
    /// `Ok(None)` when the user has never logged in.
    fn load(&self, user_id: &str)
    -> impl Future<Output = WardenResult<Option<SessionLedger>>> + Send;
    /// Full overwrite of the record.
    fn save(&self, ledger: &SessionLedger) -> impl Future<Output = WardenResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// One-time passcodes
// ---------------------------------------------------------------------------

pub trait OtpRepository: Send + Sync {
    fn store(
        &self,
        nonce: &str,
        otp: &PendingOtp,
        ttl: Duration,
    ) -> impl Future<Output = WardenResult<()>> + Send;
    /// `Ok(None)` once the entry has expired or been consumed.
    fn get(&self, nonce: &str) -> impl Future<Output = WardenResult<Option<PendingOtp>>> + Send;
    /// Remove the entry under `nonce` if and only if it equals `expected`,
    /// as one atomic step. At most one caller ever sees `true` for a given
    /// entry; a mismatch leaves the entry in place.
    fn consume(
        &self,
        nonce: &str,
        expected: &PendingOtp,
    ) -> impl Future<Output = WardenResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Claims source (user management boundary)
// ---------------------------------------------------------------------------

pub trait ClaimsSource: Send + Sync {
    /// Look a user up by e-mail address or phone number.
    fn find_by_login(
        &self,
        login: &str,
    ) -> impl Future<Output = WardenResult<Option<UserRecord>>> + Send;
    /// Resolve an external-provider profile to a local user, registering
    /// it on first sight.
    fn lookup_or_create_identity(
        &self,
        profile: ExternalProfile,
    ) -> impl Future<Output = WardenResult<UserRecord>> + Send;
}
