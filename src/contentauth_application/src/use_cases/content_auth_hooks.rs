use std::sync::Arc;

use async_trait::async_trait;
use contentauth_core::{
    AfterHook, AfterHookContext, BeforeHook, BeforeHookContext, ChallengeVerifier,
    HookAugmentation, HookOutcome, HookRejection, NormalizedEmailStore,
};

use super::post_auth_normalizer::{NormalizationOutcome, PostAuthNormalizer};
use super::signup_guard::SignupGuard;

type DynStore = Arc<dyn NormalizedEmailStore>;
type DynVerifier = Arc<dyn ChallengeVerifier>;

/// The hook pair handed to the host framework.
///
/// Runs the signup guard and the post-auth normalizer, then delegates to the
/// caller's own hooks so installing this pipeline never discards them.
#[derive(Clone)]
pub struct ContentAuthHooks {
    guard: SignupGuard<DynStore, DynVerifier>,
    normalizer: Option<PostAuthNormalizer<DynStore>>,
    before_hook: Option<Arc<dyn BeforeHook>>,
    after_hook: Option<Arc<dyn AfterHook>>,
}

impl ContentAuthHooks {
    pub fn new(
        store: DynStore,
        verifier: Option<DynVerifier>,
        normalization_enabled: bool,
    ) -> Self {
        let normalizer = normalization_enabled.then(|| PostAuthNormalizer::new(store.clone()));

        Self {
            guard: SignupGuard::new(store, verifier, normalization_enabled),
            normalizer,
            before_hook: None,
            after_hook: None,
        }
    }

    /// Caller hook run after the guard lets a request through.
    pub fn with_before_hook(mut self, hook: Arc<dyn BeforeHook>) -> Self {
        self.before_hook = Some(hook);
        self
    }

    /// Caller hook run after normalization; its augmentation is returned.
    pub fn with_after_hook(mut self, hook: Arc<dyn AfterHook>) -> Self {
        self.after_hook = Some(hook);
        self
    }
}

#[async_trait]
impl BeforeHook for ContentAuthHooks {
    #[tracing::instrument(name = "ContentAuthHooks::before", skip_all, fields(path = %ctx.path))]
    async fn before(&self, ctx: &BeforeHookContext) -> HookOutcome {
        if SignupGuard::<DynStore, DynVerifier>::applies_to(&ctx.path)
            && let Err(e) = self.guard.execute(ctx).await
        {
            tracing::warn!(code = e.code(), error = %e, "[ContentAuth] Sign-up rejected");
            return HookOutcome::Reject(HookRejection::from(e));
        }

        match &self.before_hook {
            Some(hook) => hook.before(ctx).await,
            None => HookOutcome::Continue,
        }
    }
}

#[async_trait]
impl AfterHook for ContentAuthHooks {
    #[tracing::instrument(name = "ContentAuthHooks::after", skip_all, fields(path = %ctx.path))]
    async fn after(&self, ctx: &AfterHookContext) -> HookAugmentation {
        if let Some(normalizer) = &self.normalizer {
            match normalizer.execute(ctx).await {
                Ok(NormalizationOutcome::Updated) => {
                    tracing::debug!("[ContentAuth] Stored normalized email")
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "[ContentAuth] Failed to set normalized email")
                }
            }
        }

        match &self.after_hook {
            Some(hook) => hook.after(ctx).await,
            None => HookAugmentation::empty(),
        }
    }
}
