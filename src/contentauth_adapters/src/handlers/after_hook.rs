//! Framework-agnostic after-hook handler.

use contentauth_core::{AfterHook, AfterHookContext, HookUser};
use serde_json::Value;

/// Runs the after hook once the host answered successfully.
///
/// # Arguments
/// * `hooks` - The hook pipeline
/// * `path` - Request path
/// * `user` - User reported by the host, if any
/// * `body` - The host's JSON response body
///
/// # Returns
/// The response body with the hook's augmentation merged in
pub async fn handle_after_hook<H>(
    hooks: &H,
    path: &str,
    user: Option<HookUser>,
    mut body: Value,
) -> Value
where
    H: AfterHook + ?Sized,
{
    let ctx = AfterHookContext::new(path, user);
    let augmentation = hooks.after(&ctx).await;

    if !augmentation.is_empty() {
        augmentation.apply_to(&mut body);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contentauth_core::HookAugmentation;
    use serde_json::json;

    struct OnboardingHook;

    #[async_trait]
    impl AfterHook for OnboardingHook {
        async fn after(&self, ctx: &AfterHookContext) -> HookAugmentation {
            match &ctx.user {
                Some(user) => HookAugmentation::empty().insert("onboarding", json!(user.id)),
                None => HookAugmentation::empty(),
            }
        }
    }

    #[tokio::test]
    async fn test_augmentation_is_merged() {
        let body = json!({ "token": "t", "user": { "id": "u_1" } });

        let body = handle_after_hook(
            &OnboardingHook,
            "/api/auth/sign-up/email",
            Some(HookUser::new("u_1", "a@b.com")),
            body,
        )
        .await;

        assert_eq!(body["onboarding"], json!("u_1"));
        assert_eq!(body["token"], json!("t"));
    }

    #[tokio::test]
    async fn test_empty_augmentation_leaves_body_untouched() {
        let body = json!({ "status": true });

        let result = handle_after_hook(&OnboardingHook, "/api/auth/sign-out", None, body.clone()).await;

        assert_eq!(result, body);
    }
}
