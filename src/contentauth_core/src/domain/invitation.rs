use serde::Deserialize;

/// Invitation payload handed to the host's invitation-email callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvitationLinkData {
    pub id: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Link a recipient follows to accept an invitation.
///
/// Prefers whatever link the host already generated and falls back to
/// `{base_url}/accept-invitation/{id}`.
pub fn invitation_link(data: &InvitationLinkData, base_url: &str) -> String {
    let host_link = [data.link.as_deref(), data.url.as_deref()]
        .into_iter()
        .flatten()
        .find(|link| !link.is_empty());

    if let Some(link) = host_link {
        return link.to_string();
    }

    format!(
        "{}/accept-invitation/{}",
        base_url.trim_end_matches('/'),
        data.id
    )
}
