use contentauth_core::{
    BeforeHookContext, ChallengeVerdict, ChallengeVerifier, HookRejection, NormalizedEmail,
    NormalizedEmailStore, NormalizedEmailStoreError,
};

/// Path fragment identifying the email/password sign-up endpoint.
pub const SIGN_UP_EMAIL_PATH: &str = "/sign-up/email";

/// Body field carrying the bot-challenge token.
pub const CHALLENGE_TOKEN_FIELD: &str = "turnstileToken";

const DEFAULT_CHALLENGE_FAILURE: &str = "Security challenge failed. Please try again.";

/// Reasons the guard refuses a sign-up
#[derive(Debug, thiserror::Error)]
pub enum SignupGuardError {
    #[error("Please complete the security challenge")]
    ChallengeRequired,
    #[error("{reason}")]
    ChallengeFailed {
        reason: String,
        error_codes: Vec<String>,
    },
    #[error("Security challenge could not be verified. Please try again later.")]
    VerificationUnavailable(String),
    #[error("An account with this email already exists")]
    EmailExists,
    #[error("Unable to complete sign-up right now. Please try again later.")]
    EmailLookupFailed(#[from] NormalizedEmailStoreError),
}

impl PartialEq for SignupGuardError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl SignupGuardError {
    /// Machine-readable code sent to the client.
    pub fn code(&self) -> &'static str {
        match self {
            SignupGuardError::ChallengeRequired => "CHALLENGE_REQUIRED",
            SignupGuardError::ChallengeFailed { .. } => "CHALLENGE_FAILED",
            SignupGuardError::VerificationUnavailable(_) => "VERIFICATION_UNAVAILABLE",
            SignupGuardError::EmailExists => "EMAIL_EXISTS",
            SignupGuardError::EmailLookupFailed(_) => "EMAIL_LOOKUP_FAILED",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            SignupGuardError::ChallengeRequired | SignupGuardError::ChallengeFailed { .. } => 400,
            SignupGuardError::EmailExists => 409,
            SignupGuardError::VerificationUnavailable(_)
            | SignupGuardError::EmailLookupFailed(_) => 503,
        }
    }
}

impl From<SignupGuardError> for HookRejection {
    fn from(error: SignupGuardError) -> Self {
        let rejection = HookRejection::new(error.status(), error.code(), error.to_string());
        match error.status() {
            503 => rejection.with_header("retry-after", "5"),
            _ => rejection,
        }
    }
}

/// Signup guard use case - blocks bot and duplicate-account sign-ups
#[derive(Clone)]
pub struct SignupGuard<S, V>
where
    S: NormalizedEmailStore,
    V: ChallengeVerifier,
{
    store: S,
    verifier: Option<V>,
    normalization_enabled: bool,
}

impl<S, V> SignupGuard<S, V>
where
    S: NormalizedEmailStore,
    V: ChallengeVerifier,
{
    pub fn new(store: S, verifier: Option<V>, normalization_enabled: bool) -> Self {
        Self {
            store,
            verifier,
            normalization_enabled,
        }
    }

    /// Whether requests to `path` go through the guard.
    pub fn applies_to(path: &str) -> bool {
        path.contains(SIGN_UP_EMAIL_PATH)
    }

    /// Execute the signup guard
    ///
    /// The challenge is checked before the duplicate lookup, so a request
    /// without a token never reaches the database.
    ///
    /// # Returns
    /// Ok(()) when the sign-up may proceed, or the reason it may not
    #[tracing::instrument(name = "SignupGuard::execute", skip_all, fields(path = %ctx.path))]
    pub async fn execute(&self, ctx: &BeforeHookContext) -> Result<(), SignupGuardError> {
        if let Some(verifier) = &self.verifier {
            self.check_challenge(verifier, ctx).await?;
        }

        if self.normalization_enabled
            && let Some(email) = ctx.body_str("email").filter(|email| !email.is_empty())
        {
            self.check_duplicate(email).await?;
        }

        Ok(())
    }

    async fn check_challenge(
        &self,
        verifier: &V,
        ctx: &BeforeHookContext,
    ) -> Result<(), SignupGuardError> {
        let token = ctx
            .body_str(CHALLENGE_TOKEN_FIELD)
            .filter(|token| !token.is_empty())
            .ok_or(SignupGuardError::ChallengeRequired)?;

        let verdict = verifier
            .verify(token, ctx.remote_ip.as_deref())
            .await
            .map_err(|e| SignupGuardError::VerificationUnavailable(e.to_string()))?;

        match verdict {
            ChallengeVerdict::Passed { .. } => Ok(()),
            ChallengeVerdict::Rejected {
                reason,
                error_codes,
            } => Err(SignupGuardError::ChallengeFailed {
                reason: if reason.is_empty() {
                    DEFAULT_CHALLENGE_FAILURE.to_string()
                } else {
                    reason
                },
                error_codes,
            }),
        }
    }

    async fn check_duplicate(&self, email: &str) -> Result<(), SignupGuardError> {
        let normalized = NormalizedEmail::from(email);

        match self.store.find_user_by_normalized_email(&normalized).await? {
            Some(_) => Err(SignupGuardError::EmailExists),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentauth_core::ChallengeVerifierError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Mock store keyed by normalized email, counting lookups
    #[derive(Clone, Default)]
    struct MockStore {
        users: HashMap<String, String>,
        lookups: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MockStore {
        fn with_user(mut self, email: &str, id: &str) -> Self {
            self.users
                .insert(NormalizedEmail::from(email).as_str().to_string(), id.to_string());
            self
        }
    }

    #[async_trait::async_trait]
    impl NormalizedEmailStore for MockStore {
        async fn find_user_by_normalized_email(
            &self,
            normalized: &NormalizedEmail,
        ) -> Result<Option<String>, NormalizedEmailStoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NormalizedEmailStoreError::DatabaseError(
                    "connection reset".to_string(),
                ));
            }
            Ok(self.users.get(normalized.as_str()).cloned())
        }

        async fn set_normalized_email(
            &self,
            _user_id: &str,
            _normalized: &NormalizedEmail,
        ) -> Result<bool, NormalizedEmailStoreError> {
            unimplemented!()
        }
    }

    #[derive(Clone)]
    enum MockVerifier {
        Pass,
        Reject(&'static str),
        Down,
    }

    #[async_trait::async_trait]
    impl ChallengeVerifier for MockVerifier {
        async fn verify(
            &self,
            token: &str,
            _remote_ip: Option<&str>,
        ) -> Result<ChallengeVerdict, ChallengeVerifierError> {
            assert!(!token.is_empty());
            match self {
                MockVerifier::Pass => Ok(ChallengeVerdict::Passed { hostname: None }),
                MockVerifier::Reject(reason) => Ok(ChallengeVerdict::Rejected {
                    reason: reason.to_string(),
                    error_codes: vec!["timeout-or-duplicate".to_string()],
                }),
                MockVerifier::Down => Err(ChallengeVerifierError::Unavailable(
                    "connection refused".to_string(),
                )),
            }
        }
    }

    fn signup(body: serde_json::Value) -> BeforeHookContext {
        BeforeHookContext::new("/api/auth/sign-up/email", Some(body))
    }

    #[tokio::test]
    async fn test_missing_token_rejected_before_lookup() {
        let store = MockStore::default();
        let lookups = store.lookups.clone();
        let guard = SignupGuard::new(store, Some(MockVerifier::Pass), true);

        let result = guard
            .execute(&signup(json!({ "email": "a@b.com", "password": "pw" })))
            .await;

        assert_eq!(result, Err(SignupGuardError::ChallengeRequired));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_token_and_missing_body_require_challenge() {
        let guard = SignupGuard::new(MockStore::default(), Some(MockVerifier::Pass), true);

        let empty_token = signup(json!({ "email": "a@b.com", "turnstileToken": "" }));
        assert_eq!(
            guard.execute(&empty_token).await,
            Err(SignupGuardError::ChallengeRequired)
        );

        let no_body = BeforeHookContext::new("/api/auth/sign-up/email", None);
        assert_eq!(
            guard.execute(&no_body).await,
            Err(SignupGuardError::ChallengeRequired)
        );
    }

    #[tokio::test]
    async fn test_rejected_challenge_surfaces_reason() {
        let guard = SignupGuard::new(
            MockStore::default(),
            Some(MockVerifier::Reject(
                "Challenge expired or already used. Please try again.",
            )),
            true,
        );

        let error = guard
            .execute(&signup(json!({ "email": "a@b.com", "turnstileToken": "t" })))
            .await
            .unwrap_err();

        assert_eq!(error.code(), "CHALLENGE_FAILED");
        assert_eq!(error.status(), 400);
        assert_eq!(
            error.to_string(),
            "Challenge expired or already used. Please try again."
        );
    }

    #[tokio::test]
    async fn test_rejection_without_reason_uses_default_message() {
        let guard = SignupGuard::new(MockStore::default(), Some(MockVerifier::Reject("")), false);

        let error = guard
            .execute(&signup(json!({ "turnstileToken": "t" })))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), DEFAULT_CHALLENGE_FAILURE);
    }

    #[tokio::test]
    async fn test_unreachable_verifier_is_a_service_failure() {
        let guard = SignupGuard::new(MockStore::default(), Some(MockVerifier::Down), true);

        let error = guard
            .execute(&signup(json!({ "email": "a@b.com", "turnstileToken": "t" })))
            .await
            .unwrap_err();

        assert_eq!(error.code(), "VERIFICATION_UNAVAILABLE");
        assert_eq!(error.status(), 503);
    }

    #[tokio::test]
    async fn test_gmail_variant_of_existing_account_rejected() {
        let store = MockStore::default().with_user("a.b@gmail.com", "u_1");
        let guard = SignupGuard::new(store, Some(MockVerifier::Pass), true);

        let result = guard
            .execute(&signup(json!({
                "email": "ab+x@gmail.com",
                "password": "pw",
                "turnstileToken": "t"
            })))
            .await;

        assert_eq!(result, Err(SignupGuardError::EmailExists));
    }

    #[tokio::test]
    async fn test_new_email_passes() {
        let store = MockStore::default().with_user("someone@example.com", "u_1");
        let lookups = store.lookups.clone();
        let guard = SignupGuard::new(store, Some(MockVerifier::Pass), true);

        let result = guard
            .execute(&signup(json!({
                "email": "someone.else@example.com",
                "turnstileToken": "t"
            })))
            .await;

        assert!(result.is_ok());
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let store = MockStore {
            fail: true,
            ..MockStore::default()
        };
        let guard: SignupGuard<_, MockVerifier> = SignupGuard::new(store, None, true);

        let error = guard
            .execute(&signup(json!({ "email": "a@b.com" })))
            .await
            .unwrap_err();

        assert_eq!(error.code(), "EMAIL_LOOKUP_FAILED");
        assert_eq!(error.status(), 503);
    }

    #[tokio::test]
    async fn test_disabled_checks_pass_everything() {
        let store = MockStore::default().with_user("a@b.com", "u_1");
        let lookups = store.lookups.clone();
        let guard: SignupGuard<_, MockVerifier> = SignupGuard::new(store, None, false);

        assert!(guard.execute(&signup(json!({ "email": "a@b.com" }))).await.is_ok());
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rejection_conversion() {
        let rejection = HookRejection::from(SignupGuardError::EmailExists);
        assert_eq!(rejection.status, 409);
        assert_eq!(
            rejection.body(),
            json!({
                "code": "EMAIL_EXISTS",
                "message": "An account with this email already exists"
            })
        );
        assert!(rejection.headers.is_empty());

        let rejection = HookRejection::from(SignupGuardError::VerificationUnavailable(
            "timeout".to_string(),
        ));
        assert_eq!(rejection.status, 503);
        assert_eq!(
            rejection.headers,
            vec![("retry-after".to_string(), "5".to_string())]
        );
    }

    #[test]
    fn test_applies_to() {
        type Guard = SignupGuard<MockStore, MockVerifier>;
        assert!(Guard::applies_to("/api/auth/sign-up/email"));
        assert!(!Guard::applies_to("/api/auth/sign-in/email"));
        assert!(!Guard::applies_to("/api/auth/sign-up/social"));
    }
}
