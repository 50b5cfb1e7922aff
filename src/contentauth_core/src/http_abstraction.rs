//! Zero-cost HTTP abstraction traits for the hook pipeline.
//!
//! Frameworks implement these traits on newtype wrappers of their own request
//! and response-builder types, so the hook handlers stay framework agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  contentauth_core: Defines HTTP traits   │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  contentauth_axum: Newtype wrappers      │
//! │  struct AxumRequestParts(Parts)          │
//! │  impl HookRequest for AxumRequestParts   │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  contentauth_adapters::handlers run the  │
//! │  hooks against the trait methods         │
//! └──────────────────────────────────────────┘
//! ```

use crate::hooks::HookRejection;

/// Trait for HTTP requests the hook pipeline inspects.
///
/// Only request metadata is exposed; the body is buffered and parsed by the
/// framework integration before the hooks run.
pub trait HookRequest {
    /// Get a header value by name.
    ///
    /// Header lookup should be case-insensitive (per HTTP spec).
    /// Returns `None` if the header doesn't exist or isn't valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;

    /// Get the HTTP method (GET, POST, etc.)
    fn method(&self) -> &str;

    /// Get the request path
    fn path(&self) -> &str;
}

/// Trait for building HTTP responses from hook results.
///
/// Follows the builder pattern:
/// ```ignore
/// builder
///     .status(400)
///     .header("retry-after", "0")
///     .json_body(json!({"code": "CHALLENGE_REQUIRED", "message": "..."}))
///     .build()
/// ```
pub trait HookResponseBuilder: Sized {
    /// The final response type produced by this builder
    type Response;

    /// Set the HTTP status code
    fn status(self, code: u16) -> Self;

    /// Add an HTTP header
    fn header(self, name: &str, value: &str) -> Self;

    /// Set a JSON body with Content-Type header
    fn json_body(self, body: serde_json::Value) -> Self;

    /// Build the final response
    fn build(self) -> Self::Response;

    /// Turn a hook rejection into a complete response.
    fn rejection(self, rejection: &HookRejection) -> Self::Response {
        let builder = rejection
            .headers
            .iter()
            .fold(self.status(rejection.status), |builder, (name, value)| {
                builder.header(name, value)
            });

        builder.json_body(rejection.body()).build()
    }
}

/// Address of the client that sent the request.
///
/// Prefers Cloudflare's `cf-connecting-ip`, then the first hop of
/// `x-forwarded-for`.
pub fn client_ip<R: HookRequest>(request: &R) -> Option<String> {
    if let Some(ip) = request.header("cf-connecting-ip") {
        let ip = ip.trim();
        if !ip.is_empty() {
            return Some(ip.to_string());
        }
    }

    request
        .header("x-forwarded-for")?
        .split(',')
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .map(String::from)
}
