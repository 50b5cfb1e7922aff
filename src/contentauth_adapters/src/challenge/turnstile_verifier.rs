use contentauth_core::{ChallengeVerdict, ChallengeVerifier, ChallengeVerifierError};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Cloudflare Turnstile `siteverify` client.
///
/// The `Client` carries the request timeout; none is added here.
pub struct TurnstileVerifier {
    http_client: Client,
    base_url: String,
    secret_key: Secret<String>,
}

impl TurnstileVerifier {
    pub fn new(base_url: String, secret_key: Secret<String>, http_client: Client) -> Self {
        Self {
            http_client,
            base_url,
            secret_key,
        }
    }
}

#[async_trait::async_trait]
impl ChallengeVerifier for TurnstileVerifier {
    #[tracing::instrument(name = "Verifying Turnstile token", skip_all)]
    async fn verify(
        &self,
        token: &str,
        remote_ip: Option<&str>,
    ) -> Result<ChallengeVerdict, ChallengeVerifierError> {
        let url = siteverify_url(&self.base_url).map_err(unavailable)?;

        let request_body = SiteverifyRequest {
            secret: self.secret_key.expose_secret(),
            response: token,
            remoteip: remote_ip,
        };

        let response = self
            .http_client
            .post(url)
            .form(&request_body)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        let body = response.bytes().await.map_err(unavailable)?;
        let outcome: SiteverifyResponse = serde_json::from_slice(&body).map_err(|e| {
            ChallengeVerifierError::Unavailable(format!(
                "Unparseable siteverify response ({status}): {e}"
            ))
        })?;

        if outcome.success {
            return Ok(ChallengeVerdict::Passed {
                hostname: outcome.hostname,
            });
        }

        if !status.is_success() && outcome.error_codes.is_empty() {
            return Err(ChallengeVerifierError::Unavailable(format!(
                "siteverify returned {status}"
            )));
        }

        tracing::debug!(error_codes = ?outcome.error_codes, "Turnstile rejected token");

        Ok(ChallengeVerdict::Rejected {
            reason: rejection_reason(&outcome.error_codes).to_string(),
            error_codes: outcome.error_codes,
        })
    }
}

/// User-facing message for a set of Turnstile error codes.
///
/// The first code in priority order wins, whatever order the service lists
/// them in.
pub fn rejection_reason(error_codes: &[String]) -> &'static str {
    let has = |code: &str| error_codes.iter().any(|c| c == code);

    if has("timeout-or-duplicate") {
        "Challenge expired or already used. Please try again."
    } else if has("invalid-input-response") {
        "Invalid challenge response. Please try again."
    } else if has("bad-request") {
        "Invalid request. Please refresh and try again."
    } else if has("internal-error") {
        "Verification service error. Please try again later."
    } else {
        "Challenge verification failed. Please try again."
    }
}

fn unavailable(e: impl std::fmt::Display) -> ChallengeVerifierError {
    ChallengeVerifierError::Unavailable(e.to_string())
}

const SITEVERIFY_PATH: &str = "turnstile/v0/siteverify";

/// `siteverify` endpoint below `base_url`, keeping any path prefix of a proxy.
fn siteverify_url(base_url: &str) -> Result<Url, String> {
    let mut base = Url::parse(base_url).map_err(|e| e.to_string())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(SITEVERIFY_PATH).map_err(|e| e.to_string())
}

#[derive(Serialize, Debug)]
struct SiteverifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}
