pub mod challenge;
pub mod config;
pub mod handlers;
pub mod persistence;

pub use challenge::{MockChallengeVerifier, TurnstileVerifier};
pub use config::{Settings, SettingsError};
pub use persistence::{HashMapUserStore, PostgresNormalizedEmailStore, apply_schema};
