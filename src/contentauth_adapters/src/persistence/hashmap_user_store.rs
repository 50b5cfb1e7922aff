use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use contentauth_core::{NormalizedEmail, NormalizedEmailStore, NormalizedEmailStoreError};

#[derive(Debug, Clone)]
struct StoredUser {
    email: String,
    normalized_email: Option<String>,
}

/// In-memory user table keyed by user id.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seeds a user row with no normalized email, as the host would create it.
    pub async fn add_user(&self, id: &str, email: &str) {
        self.users.write().await.insert(
            id.to_string(),
            StoredUser {
                email: email.to_string(),
                normalized_email: None,
            },
        );
    }

    pub async fn email(&self, id: &str) -> Option<String> {
        self.users.read().await.get(id).map(|user| user.email.clone())
    }

    pub async fn normalized_email(&self, id: &str) -> Option<String> {
        self.users
            .read()
            .await
            .get(id)
            .and_then(|user| user.normalized_email.clone())
    }
}

#[async_trait::async_trait]
impl NormalizedEmailStore for HashMapUserStore {
    async fn find_user_by_normalized_email(
        &self,
        normalized: &NormalizedEmail,
    ) -> Result<Option<String>, NormalizedEmailStoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|(_, user)| user.normalized_email.as_deref() == Some(normalized.as_str()))
            .map(|(id, _)| id.clone()))
    }

    async fn set_normalized_email(
        &self,
        user_id: &str,
        normalized: &NormalizedEmail,
    ) -> Result<bool, NormalizedEmailStoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(user_id) else {
            return Ok(false);
        };

        if user.normalized_email.as_deref() == Some(normalized.as_str()) {
            return Ok(false);
        }
        user.normalized_email = Some(normalized.as_str().to_string());
        Ok(true)
    }
}
