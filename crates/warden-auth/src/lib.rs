//! Warden Auth — bearer token signing, encrypted refresh envelopes,
//! the per-user session ledger protocol, and OTP login.

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod locks;
pub mod otp;
pub mod password;
pub mod service;
pub mod token;

pub use codec::CredentialCodec;
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{
    Authorizer, LoginInput, LoginOutput, OtpChallenge, OtpLoginInput, RefreshInput, RefreshOutput,
};
pub use token::BearerClaims;
