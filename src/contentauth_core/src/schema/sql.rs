//! Identifier handling for statements built from mapped table and column names.

use std::sync::LazyLock;

use regex::Regex;

// Postgres truncates identifiers past 63 bytes.
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
});

/// Whether `name` can be used as a table or column name.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Double-quotes an identifier so mixed-case names like `emailVerified`
/// survive Postgres case folding.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
