//! Middleware running the hook pipeline around the host's auth routes.

use std::sync::Arc;

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use contentauth_adapters::config::MAX_HOOK_BODY_BYTES;
use contentauth_adapters::handlers::{handle_after_hook, handle_before_hook};
use contentauth_core::{
    AfterHook, BeforeHook, HookRejection, HookRequest, HookResponseBuilder, HookUser,
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::adapters::{AxumRequestParts, response_builder};

/// Runs the before hook on the buffered request, then the after hook on a
/// successful or redirecting host response.
///
/// Hosts report the authenticated user either as a [`HookUser`] response
/// extension or as the `user` object of their JSON body. OAuth callbacks
/// usually answer with a redirect, so they must use the extension.
///
/// ```ignore
/// let app = host_router.layer(axum::middleware::from_fn_with_state(
///     Arc::new(hooks),
///     auth_hooks::<ContentAuthHooks>,
/// ));
/// ```
pub async fn auth_hooks<H>(State(hooks): State<Arc<H>>, request: Request, next: Next) -> Response
where
    H: BeforeHook + AfterHook + 'static,
{
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_HOOK_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "[ContentAuth] Request body rejected");
            return unreadable_body(&e);
        }
    };

    let request_parts = AxumRequestParts(parts);
    let path = request_parts.path().to_string();

    if let Some(rejection) = handle_before_hook(
        hooks.as_ref(),
        &request_parts,
        parse_json(&bytes),
        response_builder(),
    )
    .await
    {
        return rejection;
    }

    let request = Request::from_parts(request_parts.into(), Body::from(bytes));
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let extension_user = parts.extensions.get::<HookUser>().cloned();

    if !is_json(&parts.headers) {
        // Nothing to merge into; the hook still sees the user.
        handle_after_hook(hooks.as_ref(), &path, extension_user, Value::Null).await;
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "[ContentAuth] Failed to read host response");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let Some(json) = parse_json(&bytes) else {
        handle_after_hook(hooks.as_ref(), &path, extension_user, Value::Null).await;
        return Response::from_parts(parts, Body::from(bytes));
    };

    let user = extension_user.or_else(|| HookUser::from_response_body(&json));
    let merged = handle_after_hook(hooks.as_ref(), &path, user, json.clone()).await;

    if merged == json {
        return Response::from_parts(parts, Body::from(bytes));
    }

    match serde_json::to_vec(&merged) {
        Ok(body) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "[ContentAuth] Failed to serialize augmented response");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

fn parse_json(bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// 413 when the body exceeded the buffer limit, 400 for any other read failure.
fn unreadable_body(error: &axum::Error) -> Response {
    let rejection = if exceeded_length_limit(error) {
        HookRejection::new(
            StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
            "PAYLOAD_TOO_LARGE",
            "Request body is too large",
        )
    } else {
        HookRejection::new(
            StatusCode::BAD_REQUEST.as_u16(),
            "INVALID_BODY",
            "Request body could not be read",
        )
    };
    response_builder().rejection(&rejection)
}

fn exceeded_length_limit(error: &axum::Error) -> bool {
    std::iter::successors(
        Some(error as &(dyn std::error::Error + 'static)),
        |e| e.source(),
    )
    .any(|e| e.is::<LengthLimitError>())
}
