//! Derivation rules shared by the processors.

use crate::error::DomainError;
use regex::Regex;
use std::sync::OnceLock;

static NON_ALNUM_RUN: OnceLock<Regex> = OnceLock::new();

fn non_alnum_run() -> &'static Regex {
    NON_ALNUM_RUN.get_or_init(|| {
        Regex::new(r"[^a-z0-9]+").expect("email local-part pattern is a valid regex")
    })
}

/// Collapse whitespace and capitalize each word: `"senior   DATA engineer"` → `"Senior Data Engineer"`.
pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase the name, collapse every non-alphanumeric run to `.`, append `@domain`.
///
/// Leading or trailing runs are kept as dots, so `"Ana "` becomes `ana.@domain`.
pub fn synthesize_email(name: &str, domain: &str) -> String {
    let lowered = name.to_lowercase();
    let local = non_alnum_run().replace_all(&lowered, ".");
    format!("{local}@{domain}")
}

/// Exactly one `@` with non-empty local and domain parts.
pub fn validate_email(field: &str, value: &str) -> Result<(), DomainError> {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation(
            field,
            format!("{value:?} is not an email address"),
        )),
    }
}
