pub mod mock_challenge_verifier;
pub mod turnstile_verifier;

pub use mock_challenge_verifier::MockChallengeVerifier;
pub use turnstile_verifier::{TurnstileVerifier, rejection_reason};
