//! Framework-agnostic before-hook handler.

use contentauth_core::{
    BeforeHook, BeforeHookContext, HookOutcome, HookRequest, HookResponseBuilder, client_ip,
};
use serde_json::Value;

/// Runs the before hook for one request.
///
/// # Type Parameters
/// * `H` - The hook pipeline
/// * `R` - Request metadata for the framework being used
/// * `B` - Response builder for the framework being used
///
/// # Returns
/// The rejection response, or `None` when the request may reach the host
pub async fn handle_before_hook<H, R, B>(
    hooks: &H,
    request: &R,
    body: Option<Value>,
    builder: B,
) -> Option<B::Response>
where
    H: BeforeHook + ?Sized,
    R: HookRequest,
    B: HookResponseBuilder,
{
    let ctx = BeforeHookContext::new(request.path(), body).with_remote_ip(client_ip(request));

    match hooks.before(&ctx).await {
        HookOutcome::Continue => None,
        HookOutcome::Reject(rejection) => Some(builder.rejection(&rejection)),
    }
}
