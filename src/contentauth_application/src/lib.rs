//! Use cases run by the authentication hooks.

pub mod use_cases;

pub use use_cases::{
    content_auth_hooks::ContentAuthHooks,
    post_auth_normalizer::{NORMALIZED_PATHS, NormalizationOutcome, PostAuthNormalizer},
    signup_guard::{CHALLENGE_TOKEN_FIELD, SIGN_UP_EMAIL_PATH, SignupGuard, SignupGuardError},
};
