use serde::{Deserialize, Serialize};

/// The user entity an authentication flow produced, as seen by after hooks.
///
/// Hosts report users with more fields than this; only the identity and the
/// email matter here, everything else is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
}

impl HookUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Both identity fields are present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.email.is_empty()
    }

    /// Reads the `user` object out of a host JSON response.
    pub fn from_response_body(body: &serde_json::Value) -> Option<Self> {
        let user = body.get("user")?;
        serde_json::from_value(user.clone()).ok()
    }
}
