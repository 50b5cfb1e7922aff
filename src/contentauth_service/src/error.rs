use contentauth_adapters::SettingsError;
use contentauth_core::SchemaError;
use thiserror::Error;

/// Start-up failures of the auth service
#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Invalid schema mapping: {0}")]
    Schema(#[from] SchemaError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
