use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Answer of a bot-challenge verification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeVerdict {
    Passed {
        hostname: Option<String>,
    },
    /// The token was checked and refused. `reason` is safe to show to users.
    Rejected {
        reason: String,
        error_codes: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum ChallengeVerifierError {
    /// The service could not be reached or answered with something unusable.
    #[error("Verification service unavailable: {0}")]
    Unavailable(String),
}

/// Port trait for bot-challenge verification
#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<ChallengeVerdict, ChallengeVerifierError>;
}

#[async_trait]
impl<T: ChallengeVerifier + ?Sized> ChallengeVerifier for Arc<T> {
    async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<ChallengeVerdict, ChallengeVerifierError> {
        (**self).verify(token, remote_ip).await
    }
}
