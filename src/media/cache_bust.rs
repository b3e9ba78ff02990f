//! # Cache-busting source rewrites.
//!
//! A decode failure usually means the cached copy of an asset is corrupt. Retrying
//! with the same source would hit the same cache entry, so the retry rewrites the
//! source with a `t=<token>` query parameter.
//!
//! ## Rules
//! - Tokens are wall-clock milliseconds, bumped when needed so that every token is
//!   **strictly greater** than the previous one from the same buster.
//! - A previous `t=` parameter is replaced rather than accumulated.
//! - Other query parameters and the fragment are preserved.
//!
//! ```text
//! "a.mp4"            → "a.mp4?t=1700000000000"
//! "a.mp4?q=hd"       → "a.mp4?q=hd&t=1700000000000"
//! "a.mp4?t=1&q=hd#x" → "a.mp4?q=hd&t=1700000000000#x"
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

const PARAM: &str = "t";

/// Monotonic cache-busting token source.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: u64,
}

impl CacheBuster {
    /// Creates a buster with no tokens issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next token, strictly greater than every token issued before.
    pub fn next_token(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
            .unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }

    /// Rewrites `src` with a fresh token.
    pub fn bust(&mut self, src: &str) -> String {
        let token = self.next_token();
        with_token(src, token)
    }

    /// Extracts the cache-busting token from a source, if present.
    pub fn token_of(src: &str) -> Option<u64> {
        let (head, _) = split_fragment(src);
        let (_, query) = head.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(k, _)| *k == PARAM)
            .filter_map(|(_, v)| v.parse().ok())
            .last()
    }
}

fn with_token(src: &str, token: u64) -> String {
    let (head, fragment) = split_fragment(src);
    let (path, query) = match head.split_once('?') {
        Some((path, query)) => (path, query),
        None => (head, ""),
    };

    let fresh = format!("{PARAM}={token}");
    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .filter(|p| p.split('=').next() != Some(PARAM))
        .collect();
    params.push(&fresh);

    let mut out = format!("{path}?{}", params.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn split_fragment(src: &str) -> (&str, Option<&str>) {
    match src.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (src, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_query_when_absent() {
        let out = with_token("a.mp4", 42);
        assert_eq!(out, "a.mp4?t=42");
    }

    #[test]
    fn test_keeps_other_params_and_fragment() {
        assert_eq!(with_token("a.mp4?q=hd#x", 7), "a.mp4?q=hd&t=7#x");
    }

    #[test]
    fn test_replaces_previous_token() {
        let out = with_token("a.mp4?t=1&q=hd", 9);
        assert_eq!(out, "a.mp4?q=hd&t=9");
        assert_eq!(CacheBuster::token_of(&out), Some(9));
    }

    #[test]
    fn test_tokens_strictly_increase() {
        let mut buster = CacheBuster::new();
        let mut src = "a.mp4".to_string();
        let mut prev = 0;
        for _ in 0..100 {
            src = buster.bust(&src);
            let token = CacheBuster::token_of(&src).expect("token present");
            assert!(token > prev, "token {token} not after {prev}");
            prev = token;
        }
        assert_eq!(src.matches("t=").count(), 1);
    }
}
