//! One-time passcodes for passwordless login.
//!
//! A challenge is a random nonce handed to the client plus a numeric code
//! delivered out of band. The pair is stored bound to the login it was
//! issued for and expires on its own.

use std::time::Duration;

use rand::Rng;
use uuid::Uuid;
use warden_core::models::otp::PendingOtp;
use warden_core::repository::OtpRepository;

use crate::error::AuthError;

/// Random decimal code of exactly `digits` digits. Leading zeros kept.
pub fn generate_code(digits: usize) -> String {
    let mut rng = rand::rng();
    (0..digits)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Create and store a challenge for `login`. Returns `(nonce, code)`.
pub async fn issue<O: OtpRepository>(
    repo: &O,
    login: &str,
    digits: usize,
    ttl: Duration,
) -> Result<(String, String), AuthError> {
    let nonce = Uuid::new_v4().to_string();
    let code = generate_code(digits);
    repo.store(
        &nonce,
        &PendingOtp {
            login: login.to_string(),
            code: code.clone(),
        },
        ttl,
    )
    .await?;
    Ok((nonce, code))
}

/// Check `code` against the challenge stored under `nonce`.
///
/// A match consumes the challenge in the same atomic step, so concurrent
/// redemptions of one code admit exactly one caller. A mismatch leaves it
/// in place until it expires.
pub async fn verify<O: OtpRepository>(
    repo: &O,
    nonce: &str,
    login: &str,
    code: &str,
) -> Result<bool, AuthError> {
    let presented = PendingOtp {
        login: login.to_string(),
        code: code.to_string(),
    };
    Ok(repo.consume(nonce, &presented).await?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use warden_core::error::WardenResult;

    use super::*;

    #[derive(Default)]
    struct MapRepo(Mutex<HashMap<String, PendingOtp>>);

    impl OtpRepository for MapRepo {
        async fn store(&self, nonce: &str, otp: &PendingOtp, _ttl: Duration) -> WardenResult<()> {
            self.0.lock().unwrap().insert(nonce.into(), otp.clone());
            Ok(())
        }

        async fn get(&self, nonce: &str) -> WardenResult<Option<PendingOtp>> {
            Ok(self.0.lock().unwrap().get(nonce).cloned())
        }

        async fn consume(&self, nonce: &str, expected: &PendingOtp) -> WardenResult<bool> {
            let mut map = self.0.lock().unwrap();
            if map.get(nonce) == Some(expected) {
                map.remove(nonce);
                return Ok(true);
            }
            Ok(false)
        }
    }

    const TTL: Duration = Duration::from_secs(120);

    #[test]
    fn code_has_requested_length() {
        for digits in [1, 4, 6, 8] {
            let code = generate_code(digits);
            assert_eq!(code.len(), digits);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn matching_code_is_consumed() {
        let repo = MapRepo::default();
        let (nonce, code) = issue(&repo, "alice@example.com", 6, TTL).await.unwrap();

        assert!(verify(&repo, &nonce, "alice@example.com", &code).await.unwrap());
        assert!(!verify(&repo, &nonce, "alice@example.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_code_keeps_challenge() {
        let repo = MapRepo::default();
        let (nonce, code) = issue(&repo, "alice@example.com", 6, TTL).await.unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        assert!(!verify(&repo, &nonce, "alice@example.com", wrong).await.unwrap());
        assert!(verify(&repo, &nonce, "alice@example.com", &code).await.unwrap());
    }

    #[tokio::test]
    async fn simultaneous_redemptions_admit_one() {
        let repo = MapRepo::default();
        let (nonce, code) = issue(&repo, "alice@example.com", 6, TTL).await.unwrap();

        let (first, second) = tokio::join!(
            verify(&repo, &nonce, "alice@example.com", &code),
            verify(&repo, &nonce, "alice@example.com", &code),
        );
        let admitted = [first.unwrap(), second.unwrap()];
        assert_eq!(admitted.iter().filter(|ok| **ok).count(), 1);
    }

    #[tokio::test]
    async fn challenge_is_bound_to_login() {
        let repo = MapRepo::default();
        let (nonce, code) = issue(&repo, "alice@example.com", 6, TTL).await.unwrap();

        assert!(!verify(&repo, &nonce, "mallory@example.com", &code).await.unwrap());
        assert!(!verify(&repo, "unknown-nonce", "alice@example.com", &code).await.unwrap());
    }
}
