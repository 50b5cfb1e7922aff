use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::normalized_email::NormalizedEmail;

// NormalizedEmailStore port trait and errors
#[derive(Debug, Error)]
pub enum NormalizedEmailStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for NormalizedEmailStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DatabaseError(_), Self::DatabaseError(_))
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Read/write access to the normalized-email column of the mapped user table.
#[async_trait]
pub trait NormalizedEmailStore: Send + Sync {
    /// Id of any user whose normalized email equals `normalized`.
    async fn find_user_by_normalized_email(
        &self,
        normalized: &NormalizedEmail,
    ) -> Result<Option<String>, NormalizedEmailStoreError>;

    /// Stores `normalized` for `user_id` unless it is already the stored
    /// value. Returns whether a row changed.
    async fn set_normalized_email(
        &self,
        user_id: &str,
        normalized: &NormalizedEmail,
    ) -> Result<bool, NormalizedEmailStoreError>;
}

#[async_trait]
impl<T: NormalizedEmailStore + ?Sized> NormalizedEmailStore for Arc<T> {
    async fn find_user_by_normalized_email(
        &self,
        normalized: &NormalizedEmail,
    ) -> Result<Option<String>, NormalizedEmailStoreError> {
        (**self).find_user_by_normalized_email(normalized).await
    }

    async fn set_normalized_email(
        &self,
        user_id: &str,
        normalized: &NormalizedEmail,
    ) -> Result<bool, NormalizedEmailStoreError> {
        (**self).set_normalized_email(user_id, normalized).await
    }
}
