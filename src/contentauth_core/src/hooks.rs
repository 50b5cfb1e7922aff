//! Hook protocol between the host authentication framework and this library.
//!
//! The host calls a `before` hook with the request path and body before its
//! own handler runs, and an `after` hook with the resulting user once the
//! handler succeeded. A `before` hook either lets the request continue or
//! answers it with a structured rejection; an `after` hook can only add fields
//! to the host's response.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::hook_user::HookUser;

/// What a `before` hook sees of an incoming request.
#[derive(Debug, Clone, Default)]
pub struct BeforeHookContext {
    pub path: String,
    pub body: Option<Value>,
    pub remote_ip: Option<String>,
}

impl BeforeHookContext {
    pub fn new(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            path: path.into(),
            body,
            remote_ip: None,
        }
    }

    pub fn with_remote_ip(mut self, remote_ip: Option<String>) -> Self {
        self.remote_ip = remote_ip;
        self
    }

    /// A string field of the JSON body, if present and a string.
    pub fn body_str(&self, key: &str) -> Option<&str> {
        self.body.as_ref()?.get(key)?.as_str()
    }
}

/// What an `after` hook sees once the host handled a request.
#[derive(Debug, Clone, Default)]
pub struct AfterHookContext {
    pub path: String,
    pub user: Option<HookUser>,
}

impl AfterHookContext {
    pub fn new(path: impl Into<String>, user: Option<HookUser>) -> Self {
        Self {
            path: path.into(),
            user,
        }
    }
}

/// Structured refusal returned to the client instead of the host's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRejection {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Serialize)]
struct RejectionBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl HookRejection {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// JSON body sent to the client: `{"code": ..., "message": ...}`.
    pub fn body(&self) -> Value {
        serde_json::to_value(RejectionBody {
            code: &self.code,
            message: &self.message,
        })
        .unwrap_or(Value::Null)
    }
}

/// Result of a `before` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Reject(HookRejection),
}

impl HookOutcome {
    pub fn is_continue(&self) -> bool {
        matches!(self, HookOutcome::Continue)
    }
}

/// Fields an `after` hook adds to the host's JSON response. Usually empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookAugmentation(pub Map<String, Value>);

impl HookAugmentation {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Merges the augmentation into a JSON object body. Non-object bodies are
    /// left untouched.
    pub fn apply_to(self, body: &mut Value) {
        if let Value::Object(target) = body {
            target.extend(self.0);
        }
    }
}

/// Hook invoked before the host's handler.
#[async_trait]
pub trait BeforeHook: Send + Sync {
    async fn before(&self, ctx: &BeforeHookContext) -> HookOutcome;
}

/// Hook invoked after the host's handler succeeded.
#[async_trait]
pub trait AfterHook: Send + Sync {
    async fn after(&self, ctx: &AfterHookContext) -> HookAugmentation;
}
