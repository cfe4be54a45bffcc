//! Listening-port detection over well-known entry-point files.

use super::scanner::FileHit;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Entry points larger than this are not read.
pub const MAX_ENTRYPOINT_BYTES: u64 = 1024 * 1024;

/// Patterns in priority order. A call that binds the server outranks a bare
/// `port = N`, so `Redis(port=6379)` above `app.run(port=8000)` yields 8000.
/// Within one rank the earliest match in the file wins.
pub const PORT_PATTERNS: &[(&str, &str)] = &[
    (r"listen\(\s*(\d{2,5})\b", "listen-call"),
    (r"(?i)\.run\([^)]*?\bport\s*=\s*(\d{2,5})\b", "run-call"),
    (r"runserver\s+(?:[\w.]+:)?(\d{2,5})\b", "runserver"),
    (r"(?i)\bport\s*[=:]\s*(\d{2,5})\b", "port-assignment"),
    (r"(?i)\bport\b[^\d\n]{0,40}?(\d{2,5})\b", "port-fallback"),
];

/// Number of leading `PORT_PATTERNS` entries that bind a server.
const BINDING_PATTERNS: usize = 3;

static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn compiled() -> &'static [(Regex, &'static str)] {
    COMPILED.get_or_init(|| {
        PORT_PATTERNS
            .iter()
            .filter_map(|(pattern, name)| Regex::new(pattern).ok().map(|re| (re, *name)))
            .collect()
    })
}

/// Earliest valid port matched by any of `patterns`.
fn earliest(
    content: &str,
    patterns: &[(Regex, &'static str)],
) -> Option<(usize, u16, &'static str)> {
    let mut best: Option<(usize, u16, &'static str)> = None;

    for (re, name) in patterns {
        let first = re.captures_iter(content).find_map(|cap| {
            let m = cap.get(1)?;
            let port = m.as_str().parse::<u32>().ok().and_then(valid_port)?;
            Some((m.start(), port))
        });
        if let Some((pos, port)) = first {
            if best.map(|(b, _, _)| pos < b).unwrap_or(true) {
                best = Some((pos, port, *name));
            }
        }
    }

    best
}

/// Port the entry point most likely binds: server-binding calls first, then
/// assignments, each by position in the text.
pub fn find_port(content: &str) -> Option<u16> {
    let patterns = compiled();
    let split = BINDING_PATTERNS.min(patterns.len());
    let (binding, loose) = patterns.split_at(split);

    earliest(content, binding)
        .or_else(|| earliest(content, loose))
        .map(|(_, port, name)| {
            debug!(port, pattern = name, "Matched port pattern");
            port
        })
}

fn valid_port(value: u32) -> Option<u16> {
    u16::try_from(value).ok().filter(|p| *p >= 1)
}

/// Scans `files` in order and returns the first port found with the file it
/// came from.
pub fn detect_port<'a>(files: impl IntoIterator<Item = &'a FileHit>) -> Option<(u16, String)> {
    for hit in files {
        let too_large = std::fs::metadata(&hit.path)
            .map(|m| m.len() > MAX_ENTRYPOINT_BYTES)
            .unwrap_or(true);
        if too_large {
            debug!(path = %hit.rel_path, "Skipping unreadable or oversized entry point");
            continue;
        }

        let Ok(content) = std::fs::read_to_string(&hit.path) else {
            debug!(path = %hit.rel_path, "Skipping non-text entry point");
            continue;
        };

        if let Some(port) = find_port(&content) {
            return Some((port, hit.rel_path.clone()));
        }
    }
    None
}
