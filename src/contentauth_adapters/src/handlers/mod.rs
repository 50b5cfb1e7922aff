//! Framework-agnostic hook handlers.
//!
//! Framework integrations (Axum, Actix, etc.) extract the path, headers and
//! buffered JSON body, call these handlers, and turn the results back into
//! framework responses.

pub mod after_hook;
pub mod before_hook;

pub use after_hook::handle_after_hook;
pub use before_hook::handle_before_hook;
