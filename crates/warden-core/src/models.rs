//! Domain models for Warden.

pub mod claims;
pub mod otp;
pub mod session;
pub mod user;
