//! Process configuration read from the environment.
//!
//! # Required
//! - `TOKEN_SECRET`: bearer token signing secret
//! - `REFRESH_SECRET`: refresh envelope secret
//!
//! # Optional
//! - `REDIS_URL`: key-value store; in-memory when unset
//! - `MAX_SESSIONS`, `BEARER_TTL_SECS`, `REFRESH_TTL_SECS`
//! - `PASSWORD_PEPPER`
//! - `STORE_TIMEOUT_SECS`

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use warden_auth::AuthConfig;
use warden_store::StoreConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("{name}: cannot parse {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Every missing required
    /// variable is reported in one error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let token_secret = get("TOKEN_SECRET");
        let refresh_secret = get("REFRESH_SECRET");
        let missing: Vec<&'static str> = [
            ("TOKEN_SECRET", token_secret.is_none()),
            ("REFRESH_SECRET", refresh_secret.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        let (Some(token_secret), Some(refresh_secret)) = (token_secret, refresh_secret) else {
            return Err(ConfigError::Missing(missing));
        };

        let mut auth = AuthConfig {
            token_secret,
            refresh_secret,
            pepper: get("PASSWORD_PEPPER"),
            ..AuthConfig::default()
        };
        if let Some(n) = parse(&get, "MAX_SESSIONS")? {
            auth.max_sessions = n;
        }
        if let Some(secs) = parse(&get, "BEARER_TTL_SECS")? {
            auth.bearer_token_lifetime_secs = secs;
        }
        if let Some(secs) = parse(&get, "REFRESH_TTL_SECS")? {
            auth.refresh_token_lifetime_secs = secs;
        }

        let mut store = StoreConfig {
            url: get("REDIS_URL"),
            ..StoreConfig::default()
        };
        if let Some(secs) = parse(&get, "STORE_TIMEOUT_SECS")? {
            store.io_timeout = Duration::from_secs(secs);
        }

        Ok(Self { auth, store })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
