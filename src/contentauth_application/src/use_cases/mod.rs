pub mod content_auth_hooks;
pub mod post_auth_normalizer;
pub mod signup_guard;
