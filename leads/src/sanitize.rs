//! Input hygiene applied before leads reach a store.

use sha2::{Digest, Sha256};

/// Trims, folds every whitespace run (including newlines) into a single
/// space and truncates to `max_len` characters.
pub fn safe_str(value: &str, max_len: usize) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_len)
        .collect()
}

/// Prefixes a `'` when the value would be read as a spreadsheet formula.
pub fn escape_sheet_formula(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

pub fn safe_sheet_str(value: &str, max_len: usize) -> String {
    escape_sheet_formula(&safe_str(value, max_len))
}

pub fn normalize_email(email: &str) -> String {
    email
        .trim()
        .to_lowercase()
        .chars()
        .take(crate::lead::MAX_EMAIL_LEN)
        .collect()
}

/// Minimal shape check: one `@`, non-empty local part, a dotted domain and
/// no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// One-way hash of a client IP. The raw address is never persisted.
pub fn hash_ip(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.trim().as_bytes()))
}
