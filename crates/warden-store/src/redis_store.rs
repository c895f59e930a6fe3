//! Redis implementation of [`KeyValueStore`].

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use tracing::info;
use warden_core::error::WardenResult;
use warden_core::repository::KeyValueStore;

use crate::error::StoreError;

/// Delete `KEYS[1]` only when its value equals `ARGV[1]`.
const COMPARE_AND_DELETE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

/// Redis-backed key-value store over a multiplexed async connection.
///
/// Every command is bounded by `io_timeout`.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    io_timeout: Duration,
}

impl RedisStore {
    pub async fn connect(url: &str, io_timeout: Duration) -> Result<Self, StoreError> {
        info!(url = %url, "Connecting to Redis");

        let client = redis::Client::open(url)?;
        let mut conn = tokio::time::timeout(io_timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| StoreError::Timeout(io_timeout))??;

        let _: String = tokio::time::timeout(io_timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout(io_timeout))??;

        info!("Successfully connected to Redis");

        Ok(Self { conn, io_timeout })
    }

    async fn run<T: redis::FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T, StoreError> {
        let mut conn = self.conn.clone();
        tokio::time::timeout(self.io_timeout, cmd.query_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout(self.io_timeout))?
            .map_err(StoreError::from)
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> WardenResult<Option<String>> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        Ok(self.run(cmd).await?)
    }

    async fn set(&self, key: &str, value: String) -> WardenResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        self.run::<()>(cmd).await?;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> WardenResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl.as_secs().max(1));
        self.run::<()>(cmd).await?;
        Ok(())
    }

    async fn take(&self, key: &str) -> WardenResult<Option<String>> {
        let mut cmd = redis::cmd("GETDEL");
        cmd.arg(key);
        Ok(self.run(cmd).await?)
    }

    async fn delete_if_eq(&self, key: &str, expected: &str) -> WardenResult<bool> {
        let script = redis::Script::new(COMPARE_AND_DELETE);
        let mut conn = self.conn.clone();
        let removed: i64 = tokio::time::timeout(
            self.io_timeout,
            script.key(key).arg(expected).invoke_async(&mut conn),
        )
        .await
        .map_err(|_| StoreError::Timeout(self.io_timeout))?
        .map_err(StoreError::from)?;
        Ok(removed == 1)
    }

    async fn delete(&self, key: &str) -> WardenResult<()> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        self.run::<i64>(cmd).await?;
        Ok(())
    }
}
