//! Authorizer — login, validation, rotation and logout orchestration.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use warden_core::models::claims::UserClaims;
use warden_core::models::session::SessionLedger;
use warden_core::models::user::ExternalProfile;
use warden_core::repository::{ClaimsSource, OtpRepository, SessionLedgerRepository};

use crate::codec::CredentialCodec;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::locks::UserLocks;
use crate::{otp, password};

/// Input for the password login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// E-mail address or phone number.
    pub login: String,
    pub password: String,
}

/// Input for the passcode login flow.
#[derive(Debug)]
pub struct OtpLoginInput {
    pub login: String,
    /// Nonce returned by [`Authorizer::request_otp`].
    pub nonce: String,
    pub code: String,
}

/// A freshly issued passcode challenge. The code is for out-of-band
/// delivery only; the nonce goes back to the client.
#[derive(Debug)]
pub struct OtpChallenge {
    pub nonce: String,
    pub code: String,
    /// Challenge lifetime in seconds.
    pub expires_in: u64,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// `"Bearer "`-prefixed signed token.
    pub bearer_token: String,
    /// Opaque encrypted refresh envelope.
    pub refresh_token: String,
    pub claims: UserClaims,
    /// Bearer token lifetime in seconds.
    pub expires_in: u64,
}

/// Input for the refresh flow: the last bearer token issued for the
/// session together with its refresh token.
#[derive(Debug)]
pub struct RefreshInput {
    pub bearer_token: String,
    pub refresh_token: String,
}

/// Successful refresh result. The refresh token is unchanged.
#[derive(Debug)]
pub struct RefreshOutput {
    pub bearer_token: String,
    pub expires_in: u64,
}

/// Token lifecycle service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the storage crate. Every ledger
/// read-modify-write runs under the owning user's lock.
pub struct Authorizer<L: SessionLedgerRepository, O: OtpRepository, C: ClaimsSource> {
    ledgers: L,
    otps: O,
    claims_source: C,
    codec: CredentialCodec,
    locks: UserLocks,
    config: AuthConfig,
}

impl<L, O, C> Authorizer<L, O, C>
where
    L: SessionLedgerRepository,
    O: OtpRepository,
    C: ClaimsSource,
{
    pub fn new(ledgers: L, otps: O, claims_source: C, config: AuthConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let codec = CredentialCodec::new(&config)?;
        Ok(Self {
            ledgers,
            otps,
            claims_source,
            codec,
            locks: UserLocks::new(),
            config,
        })
    }

    pub fn codec(&self) -> &CredentialCodec {
        &self.codec
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    /// Authenticate with e-mail/phone + password and open a session.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        let user = self
            .claims_source
            .find_by_login(&input.login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Externally provisioned accounts have no password.
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(&input.password, hash, self.config.pepper.as_deref())? {
            return Err(AuthError::InvalidCredentials);
        }

        self.open_session(user.claims()).await
    }

    /// Issue a passcode challenge for a known login.
    pub async fn request_otp(&self, login: &str) -> Result<OtpChallenge, AuthError> {
        if self.claims_source.find_by_login(login).await?.is_none() {
            return Err(AuthError::InvalidCredentials);
        }

        let (nonce, code) = otp::issue(
            &self.otps,
            login,
            self.config.otp_digits,
            Duration::from_secs(self.config.otp_lifetime_secs),
        )
        .await?;

        Ok(OtpChallenge {
            nonce,
            code,
            expires_in: self.config.otp_lifetime_secs,
        })
    }

    /// Consume a passcode challenge and open a session.
    pub async fn login_with_otp(&self, input: OtpLoginInput) -> Result<LoginOutput, AuthError> {
        let user = self
            .claims_source
            .find_by_login(&input.login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !otp::verify(&self.otps, &input.nonce, &input.login, &input.code).await? {
            return Err(AuthError::InvalidOtp);
        }

        self.open_session(user.claims()).await
    }

    /// External-provider callback: resolve or register the identity and
    /// open a session.
    pub async fn oauth_login(&self, profile: ExternalProfile) -> Result<LoginOutput, AuthError> {
        let user = self.claims_source.lookup_or_create_identity(profile).await?;
        self.open_session(user.claims()).await
    }

    async fn open_session(&self, claims: UserClaims) -> Result<LoginOutput, AuthError> {
        let bearer_token = self.codec.issue_bearer_token(&claims)?;
        let refresh_token = self.codec.encode_refresh_envelope(&claims)?;

        let _guard = self.locks.acquire(&claims.id).await;
        let now = Utc::now().timestamp_millis();
        let mut ledger = self
            .ledgers
            .load(&claims.id)
            .await?
            .unwrap_or_else(|| SessionLedger::new(claims.id.clone(), now));

        ledger.insert_session(
            bearer_token.clone(),
            refresh_token.clone(),
            self.config.max_sessions,
            now,
        );
        self.ledgers.save(&ledger).await?;

        info!(user_id = %claims.id, sessions = ledger.len(), "session opened");

        Ok(LoginOutput {
            bearer_token,
            refresh_token,
            claims,
            expires_in: self.config.bearer_token_lifetime_secs,
        })
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Verify a bearer token and confirm its session is still live.
    pub async fn validate_bearer(&self, token: &str) -> Result<UserClaims, AuthError> {
        let claims = self.codec.verify_bearer_token(token)?.user;

        let ledger = self
            .ledgers
            .load(&claims.id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !ledger.contains_bearer(token) {
            warn!(user_id = %claims.id, "revoked bearer token presented");
            return Err(AuthError::Revoked);
        }

        Ok(claims)
    }

    /// Open a refresh envelope and check its expiry. Ledger membership is
    /// checked by [`Authorizer::rotate`].
    pub fn validate_refresh(&self, refresh_token: &str) -> Result<UserClaims, AuthError> {
        let envelope = self.codec.decode_refresh_envelope(refresh_token)?;

        if envelope.is_expired_at(Utc::now().timestamp()) {
            warn!(user_id = %envelope.claims.id, "expired refresh token presented");
            return Err(AuthError::RefreshExpired);
        }

        Ok(envelope.claims)
    }

    /// Identity of a correctly signed bearer token, expired or not.
    pub fn identity_of(&self, token: &str) -> Result<UserClaims, AuthError> {
        self.codec.identity_of(token)
    }

    // -----------------------------------------------------------------------
    // Rotation
    // -----------------------------------------------------------------------

    /// Replace `old_bearer` with a newly minted token in the session whose
    /// refresh token is `refresh_token`.
    ///
    /// Each pairing rotates at most once: after success, presenting
    /// `old_bearer` again fails with [`AuthError::StaleRotation`].
    pub async fn rotate(
        &self,
        claims: &UserClaims,
        old_bearer: &str,
        refresh_token: &str,
    ) -> Result<String, AuthError> {
        let new_bearer = self.codec.issue_bearer_token(claims)?;

        let _guard = self.locks.acquire(&claims.id).await;
        let mut ledger = self
            .ledgers
            .load(&claims.id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !ledger.replace_bearer(old_bearer, refresh_token, &new_bearer) {
            warn!(user_id = %claims.id, "stale refresh pairing presented");
            return Err(AuthError::StaleRotation);
        }
        self.ledgers.save(&ledger).await?;

        info!(user_id = %claims.id, "bearer token rotated");
        Ok(new_bearer)
    }

    /// Validate the refresh envelope, then rotate its session.
    pub async fn refresh(&self, input: RefreshInput) -> Result<RefreshOutput, AuthError> {
        let claims = self.validate_refresh(&input.refresh_token)?;
        let bearer_token = self
            .rotate(&claims, &input.bearer_token, &input.refresh_token)
            .await?;

        Ok(RefreshOutput {
            bearer_token,
            expires_in: self.config.bearer_token_lifetime_secs,
        })
    }

    // -----------------------------------------------------------------------
    // Logout
    // -----------------------------------------------------------------------

    /// End the session holding `bearer_token`.
    pub async fn logout(&self, bearer_token: &str) -> Result<(), AuthError> {
        let claims = self.validate_bearer(bearer_token).await?;

        let _guard = self.locks.acquire(&claims.id).await;
        let mut ledger = self
            .ledgers
            .load(&claims.id)
            .await?
            .ok_or(AuthError::NotFound)?;

        // Lost a race with another logout of the same session.
        if !ledger.remove_bearer(bearer_token) {
            return Err(AuthError::Revoked);
        }
        self.ledgers.save(&ledger).await?;

        info!(user_id = %claims.id, sessions = ledger.len(), "session closed");
        Ok(())
    }

    /// End every session of the user owning `bearer_token`.
    pub async fn logout_all(&self, bearer_token: &str) -> Result<(), AuthError> {
        let claims = self.validate_bearer(bearer_token).await?;
        self.revoke_all_sessions(&claims.id).await
    }

    /// Clear a user's ledger, e.g. on credential change. The record itself
    /// is kept.
    pub async fn revoke_all_sessions(&self, user_id: &str) -> Result<(), AuthError> {
        let _guard = self.locks.acquire(user_id).await;
        let mut ledger = self
            .ledgers
            .load(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        let revoked = ledger.len();
        ledger.clear_all();
        self.ledgers.save(&ledger).await?;

        info!(user_id, revoked, "all sessions closed");
        Ok(())
    }

    /// Live sessions for `user_id`; zero when the user never logged in.
    pub async fn session_count(&self, user_id: &str) -> Result<usize, AuthError> {
        Ok(self
            .ledgers
            .load(user_id)
            .await?
            .map_or(0, |ledger| ledger.len()))
    }
}
