//! Axum implementations of the hook HTTP traits.
//!
//! `HookRequest` and `HookResponseBuilder` live in `contentauth_core`; the
//! newtype wrappers here implement them for Axum's types without running into
//! the orphan rule.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  contentauth_core::HookRequest (trait)     │
//! └────────────────┬───────────────────────────┘
//!                  │
//!                  ▼
//! ┌────────────────────────────────────────────┐
//! │  AxumRequestParts(http::request::Parts)    │
//! │  impl HookRequest for AxumRequestParts { } │
//! └────────────────────────────────────────────┘
//! ```
//!
//! The middleware splits the request to buffer its body, so the wrapper holds
//! the request head rather than a whole `Request`.

use axum::body::Body;
use axum::extract::OriginalUri;
use axum::http::request::Parts;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use contentauth_core::{HookRequest, HookResponseBuilder};

/// Newtype wrapper around the head of an Axum request.
#[repr(transparent)]
pub struct AxumRequestParts(pub Parts);

impl From<Parts> for AxumRequestParts {
    fn from(parts: Parts) -> Self {
        AxumRequestParts(parts)
    }
}

impl From<AxumRequestParts> for Parts {
    fn from(wrapper: AxumRequestParts) -> Self {
        wrapper.0
    }
}

impl HookRequest for AxumRequestParts {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.headers.get(name)?.to_str().ok()
    }

    fn method(&self) -> &str {
        self.0.method.as_str()
    }

    /// The full path, even inside a nested router.
    fn path(&self) -> &str {
        match self.0.extensions.get::<OriginalUri>() {
            Some(original) => original.0.path(),
            None => self.0.uri.path(),
        }
    }
}

/// Builds Axum responses for hook rejections.
pub struct AxumResponseBuilder {
    builder: axum::http::response::Builder,
    body: Option<String>,
}

impl AxumResponseBuilder {
    pub fn new() -> Self {
        Self {
            builder: Response::builder(),
            body: None,
        }
    }
}

impl Default for AxumResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HookResponseBuilder for AxumResponseBuilder {
    type Response = Response<Body>;

    fn status(mut self, code: u16) -> Self {
        self.builder = self.builder.status(code);
        self
    }

    fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    fn json_body(mut self, body: serde_json::Value) -> Self {
        self.builder = self.builder.header("content-type", "application/json");
        self.body = Some(body.to_string());
        self
    }

    fn build(self) -> Self::Response {
        let body = self.body.unwrap_or_default();
        self.builder
            .body(Body::from(body))
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Invalid hook response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

/// Shorthand for [`AxumResponseBuilder::new`].
pub fn response_builder() -> AxumResponseBuilder {
    AxumResponseBuilder::new()
}
