use contentauth_core::{
    AfterHookContext, NormalizedEmail, NormalizedEmailStore, NormalizedEmailStoreError,
};

/// Path fragments after which a user may have been created or linked.
pub const NORMALIZED_PATHS: [&str; 2] = ["/sign-up", "/callback"];

/// What the normalizer did for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationOutcome {
    /// Path not covered or user identity incomplete.
    Skipped,
    /// The stored value already matched.
    Unchanged,
    Updated,
}

/// Post-auth normalizer use case - records the normalized email of a user
/// who just signed up or completed an OAuth callback
#[derive(Clone)]
pub struct PostAuthNormalizer<S>
where
    S: NormalizedEmailStore,
{
    store: S,
}

impl<S> PostAuthNormalizer<S>
where
    S: NormalizedEmailStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn applies_to(path: &str) -> bool {
        NORMALIZED_PATHS.iter().any(|fragment| path.contains(fragment))
    }

    /// Execute the post-auth normalizer
    ///
    /// The caller decides what to do with a store error; the authentication
    /// itself already succeeded.
    #[tracing::instrument(name = "PostAuthNormalizer::execute", skip_all, fields(path = %ctx.path))]
    pub async fn execute(
        &self,
        ctx: &AfterHookContext,
    ) -> Result<NormalizationOutcome, NormalizedEmailStoreError> {
        if !Self::applies_to(&ctx.path) {
            return Ok(NormalizationOutcome::Skipped);
        }
        let Some(user) = ctx.user.as_ref().filter(|user| user.is_complete()) else {
            return Ok(NormalizationOutcome::Skipped);
        };

        let normalized = NormalizedEmail::from(user.email.as_str());
        let changed = self.store.set_normalized_email(&user.id, &normalized).await?;

        Ok(if changed {
            NormalizationOutcome::Updated
        } else {
            NormalizationOutcome::Unchanged
        })
    }
}
