//! Application name extraction from free text.

use super::rules::IntentRules;
use crate::app_config::sanitize_name;
use regex::Regex;
use std::sync::OnceLock;

/// Words that fill the "my <name> app" slot without naming anything.
const FILLER_WORDS: &[&str] = &[
    "new", "own", "web", "simple", "small", "little", "first", "cool", "test", "demo", "the",
];

struct NamePatterns {
    quoted: Regex,
    called: Regex,
    my_app: Regex,
}

static PATTERNS: OnceLock<NamePatterns> = OnceLock::new();

fn patterns() -> &'static NamePatterns {
    PATTERNS.get_or_init(|| NamePatterns {
        quoted: Regex::new(r#"(?:^|\s)["'`]([A-Za-z0-9][A-Za-z0-9 _.-]{0,60})["'`]"#)
            .expect("quoted-name pattern is valid"),
        called: Regex::new(r"(?i)\b(?:called|named)\s+([A-Za-z0-9][A-Za-z0-9_.-]*)")
            .expect("called-name pattern is valid"),
        my_app: Regex::new(
            r"(?i)\bmy\s+([A-Za-z0-9][A-Za-z0-9_.-]*)\s+(?:app|application|api|service|site|website|project|backend|server)\b",
        )
        .expect("my-app pattern is valid"),
    })
}

/// Extracts an explicit application name, if the request contains one.
///
/// Quoted names are taken verbatim. The "called X" and "my X app" forms are
/// skipped when X is a framework, provider or mode keyword ("my Flask app")
/// or a filler word ("my new app").
pub fn extract_name(text: &str, rules: &IntentRules) -> Option<String> {
    let patterns = patterns();

    if let Some(name) = patterns
        .quoted
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .find_map(|m| sanitize_name(m.as_str()))
    {
        return Some(name);
    }

    for pattern in [&patterns.called, &patterns.my_app] {
        for cap in pattern.captures_iter(text) {
            let Some(token) = cap.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let lowered = token.to_lowercase();
            if rules.is_keyword(&lowered) || FILLER_WORDS.contains(&lowered.as_str()) {
                continue;
            }
            if let Some(name) = sanitize_name(token) {
                return Some(name);
            }
        }
    }

    None
}
