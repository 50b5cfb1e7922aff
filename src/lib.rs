//! # contentauth
//!
//! Facade crate re-exporting the public API of the contentauth workspace:
//! sign-up protection and email normalization hooks for an external
//! authentication framework, plus schema remapping of its seven models onto
//! an application's existing tables.
//!
//! ## Usage
//!
//! ```ignore
//! use contentauth::{AuthService, Settings};
//!
//! let settings = Settings::load()?;
//! let service = AuthService::from_settings(&settings, host_router).await?;
//! service
//!     .run_standalone(listener, Some(settings.application.allowed_origins.clone()))
//!     .await?;
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `NormalizedEmail`, `HookUser`, hook contexts and outcomes
//! - **Schema remapping**: `SchemaMapping`, `SchemaRemapper`, `ResolvedSchema`
//! - **Ports**: `NormalizedEmailStore`, `ChallengeVerifier`
//! - **Use cases**: `SignupGuard`, `PostAuthNormalizer`, `ContentAuthHooks`
//! - **Adapters**: `TurnstileVerifier`, `PostgresNormalizedEmailStore`, `HashMapUserStore`
//! - **Service**: `AuthService` - mounts the host router behind the hooks

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, hook protocol and schema remapping
pub mod core {
    pub use contentauth_core::*;
}

pub use contentauth_core::{
    AfterHook, AfterHookContext, BeforeHook, BeforeHookContext, HookAugmentation, HookOutcome,
    HookRejection, HookUser, InvitationLinkData, NormalizedEmail, invitation_link,
    is_gmail_address, normalize_email,
};

// ============================================================================
// Schema Remapping
// ============================================================================

pub use contentauth_core::{
    FieldAttribute, Model, ModelBinding, ResolvedSchema, SchemaError, SchemaMapping,
    SchemaRemapper, TableMapping, UserTableBinding,
};

// ============================================================================
// Ports
// ============================================================================

pub use contentauth_core::{
    ChallengeVerdict, ChallengeVerifier, ChallengeVerifierError, NormalizedEmailStore,
    NormalizedEmailStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use contentauth_application::*;
}

pub use contentauth_application::{
    ContentAuthHooks, PostAuthNormalizer, SignupGuard, SignupGuardError,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Bot-challenge verifiers
    pub mod challenge {
        pub use contentauth_adapters::challenge::*;
    }

    /// Normalized-email stores
    pub mod persistence {
        pub use contentauth_adapters::persistence::*;
    }

    /// Framework-agnostic hook handlers
    pub mod handlers {
        pub use contentauth_adapters::handlers::*;
    }

    /// Configuration
    pub mod config {
        pub use contentauth_adapters::config::*;
    }
}

pub use contentauth_adapters::{
    HashMapUserStore, MockChallengeVerifier, PostgresNormalizedEmailStore, Settings,
    SettingsError, TurnstileVerifier, apply_schema,
};

// ============================================================================
// Axum Integration
// ============================================================================

/// Axum adapters and middleware
pub mod axum_integration {
    pub use contentauth_axum::*;
}

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

pub use contentauth_service::{
    AllowedOrigins, AuthService, AuthServiceError, configure_postgresql, get_postgres_pool,
    resolve_schema, telemetry,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing hook and port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use axum;
pub use http;
