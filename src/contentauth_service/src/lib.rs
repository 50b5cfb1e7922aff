mod auth_service;
mod error;
mod helpers;
pub mod telemetry;
mod tracing;

pub use auth_service::AuthService;
pub use error::AuthServiceError;
pub use helpers::{configure_postgresql, get_postgres_pool, resolve_schema};

// Re-export commonly used types
pub use contentauth_adapters::config::{AllowedOrigins, Settings};
pub use contentauth_application::ContentAuthHooks;
pub use contentauth_core::{AfterHook, BeforeHook, ChallengeVerifier, NormalizedEmailStore};
