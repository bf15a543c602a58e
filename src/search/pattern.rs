//! Compiled regular expressions used for search and colourization.

use crate::error::{PagerError, Result};
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use std::fmt;

/// A compiled pattern together with its source text.
///
/// Smart case applies: a pattern with no uppercase letters matches
/// case-insensitively.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    matcher: RegexMatcher,
}

impl Pattern {
    pub fn compile(source: &str) -> Result<Self> {
        let matcher = RegexMatcherBuilder::new()
            .case_smart(true)
            .build(source)
            .map_err(|e| PagerError::pattern(e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            matcher,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.matcher.is_match(haystack).unwrap_or(false)
    }

    /// Byte ranges of all non-overlapping matches.
    pub fn find_ranges(&self, haystack: &[u8]) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let _ = self.matcher.find_iter(haystack, |m| {
            if m.start() < m.end() {
                ranges.push((m.start(), m.end()));
            }
            true
        });
        ranges
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_ranges() {
        let pattern = Pattern::compile("err(or)?").unwrap();
        assert_eq!(
            pattern.find_ranges(b"error: err again"),
            vec![(0, 5), (7, 10)]
        );
    }

    #[test]
    fn smart_case() {
        let lower = Pattern::compile("warn").unwrap();
        assert!(lower.is_match(b"WARN disk almost full"));

        let upper = Pattern::compile("Warn").unwrap();
        assert!(!upper.is_match(b"WARN disk almost full"));
        assert!(upper.is_match(b"Warn disk almost full"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Pattern::compile("(unclosed").unwrap_err();
        assert!(matches!(err, PagerError::PatternError { .. }));
    }

    #[test]
    fn empty_matches_are_ignored() {
        let pattern = Pattern::compile("x*").unwrap();
        assert_eq!(pattern.find_ranges(b"abxxc"), vec![(2, 4)]);
    }
}
