//! Repository implementations over any [`KeyValueStore`](warden_core::repository::KeyValueStore).

mod otp;
mod session;
mod user;

pub use otp::KvOtpRepository;
pub use session::KvSessionLedgerRepository;
pub use user::MemoryUserDirectory;
