//! Canonical email form used for duplicate-account detection.
//!
//! The normalized form is never shown to users and never replaces the stored
//! email. It only backs the duplicate lookup that runs before a signup.

use std::fmt;

const GMAIL_DOMAIN: &str = "gmail.com";
const GOOGLEMAIL_DOMAIN: &str = "googlemail.com";

/// Normalizes an email address for duplicate detection.
///
/// - Gmail addresses (including `googlemail.com`) lose plus-addressing and dots
///   in the local part.
/// - Every other address is only lowercased and trimmed.
///
/// Input without an `@` is returned lowercased and trimmed; format validation
/// belongs to the caller.
pub fn normalize_email(email: &str) -> String {
    let lower_email = email.to_lowercase();
    let lower_email = lower_email.trim();

    let Some((local, domain)) = lower_email.rsplit_once('@') else {
        return lower_email.to_string();
    };

    let domain = if domain == GOOGLEMAIL_DOMAIN {
        GMAIL_DOMAIN
    } else {
        domain
    };

    if domain != GMAIL_DOMAIN {
        return lower_email.to_string();
    }

    let without_tag = local.split('+').next().unwrap_or_default();
    let stripped: String = without_tag.chars().filter(|c| *c != '.').collect();

    // Dot removal can expose whitespace that trimming kept inside the address.
    format!("{}@{}", stripped.trim_start(), GMAIL_DOMAIN)
}

/// Checks if an email is a Gmail address (including googlemail.com)
pub fn is_gmail_address(email: &str) -> bool {
    let lower_email = email.to_lowercase();
    lower_email.ends_with("@gmail.com") || lower_email.ends_with("@googlemail.com")
}

/// An email address in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedEmail {
    fn from(email: &str) -> Self {
        Self(normalize_email(email))
    }
}

impl AsRef<str> for NormalizedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
