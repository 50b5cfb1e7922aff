use contentauth_core::{ChallengeVerdict, ChallengeVerifier, ChallengeVerifierError};

/// Answers every token with the same verdict.
#[derive(Debug, Clone)]
pub struct MockChallengeVerifier {
    verdict: ChallengeVerdict,
}

impl MockChallengeVerifier {
    pub fn new(verdict: ChallengeVerdict) -> Self {
        Self { verdict }
    }

    pub fn passing() -> Self {
        Self::new(ChallengeVerdict::Passed { hostname: None })
    }

    pub fn rejecting(reason: &str) -> Self {
        Self::new(ChallengeVerdict::Rejected {
            reason: reason.to_string(),
            error_codes: Vec::new(),
        })
    }
}

impl Default for MockChallengeVerifier {
    fn default() -> Self {
        Self::passing()
    }
}

#[async_trait::async_trait]
impl ChallengeVerifier for MockChallengeVerifier {
    async fn verify(
        &self,
        _token: &str,
        _remote_ip: Option<&str>,
    ) -> Result<ChallengeVerdict, ChallengeVerifierError> {
        Ok(self.verdict.clone())
    }
}
