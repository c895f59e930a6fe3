//! In-memory [`ClaimsSource`].
//!
//! User registration and profile storage belong to the user-management
//! service; this directory stands in for it in tests and single-process
//! deployments.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use warden_core::error::WardenResult;
use warden_core::models::user::{ExternalProfile, UserRecord};
use warden_core::repository::ClaimsSource;

#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

fn matches_login(user: &UserRecord, login: &str) -> bool {
    user.email.as_deref() == Some(login) || user.phone.as_deref() == Some(login)
}

impl ClaimsSource for MemoryUserDirectory {
    async fn find_by_login(&self, login: &str) -> WardenResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| matches_login(u, login))
            .cloned())
    }

    async fn lookup_or_create_identity(&self, profile: ExternalProfile) -> WardenResult<UserRecord> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.values().find(|u| matches_login(u, &profile.email)) {
            return Ok(existing.clone());
        }

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: Some(profile.email),
            phone: None,
            password_hash: None,
        };
        info!(user_id = %user.id, "Registered user from external provider");
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}
