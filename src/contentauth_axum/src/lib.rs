//! Axum integration for the contentauth hook pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  contentauth_core: hook + HTTP traits    │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  contentauth_axum: Axum implementations  │
//! │  - AxumRequestParts newtype wrapper      │
//! │  - AxumResponseBuilder                   │
//! │  - auth_hooks middleware                 │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use contentauth_axum::auth_hooks;
//!
//! let app = Router::new().nest(
//!     "/api/auth",
//!     host_router.layer(axum::middleware::from_fn_with_state(
//!         Arc::new(hooks),
//!         auth_hooks::<ContentAuthHooks>,
//!     )),
//! );
//! ```

pub mod adapters;
pub mod middleware;

// Re-export for convenience
pub use adapters::{AxumRequestParts, AxumResponseBuilder, response_builder};
pub use middleware::auth_hooks;
