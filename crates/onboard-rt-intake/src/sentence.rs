//! Natural-language fallback parser.

use regex::Regex;
use std::sync::OnceLock;

/// Name and role pulled out of an "Onboard <Full Name> as <Role>" sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardSentence {
    pub full_name: String,
    pub role: String,
}

impl OnboardSentence {
    /// Split the full name into a first word and the remainder.
    pub fn split_name(&self) -> (&str, Option<&str>) {
        match self.full_name.split_once(char::is_whitespace) {
            Some((first, rest)) => {
                let rest = rest.trim();
                (first, (!rest.is_empty()).then_some(rest))
            }
            None => (self.full_name.as_str(), None),
        }
    }
}

static ONBOARD_SENTENCE: OnceLock<Regex> = OnceLock::new();

fn onboard_sentence() -> &'static Regex {
    ONBOARD_SENTENCE.get_or_init(|| {
        Regex::new(r"(?i)\bonboard\s+(.+?)\s+as\s+(?:an?\s+)?(.+)$")
            .expect("onboard sentence pattern is a valid regex")
    })
}

/// Parse `"Onboard <Full Name> as <Role>"`.
///
/// Matching is case-insensitive, the sentence may be preceded by other words, and a
/// single leading `a`/`an` article before the role is dropped. Trailing periods are
/// stripped from both captures.
pub fn parse_onboard_sentence(text: &str) -> Option<OnboardSentence> {
    let captures = onboard_sentence().captures(text.trim())?;
    let clean = |index: usize| {
        captures
            .get(index)
            .map(|m| m.as_str().trim().trim_end_matches('.').trim_end().to_string())
            .unwrap_or_default()
    };
    Some(OnboardSentence {
        full_name: clean(1),
        role: clean(2),
    })
}
