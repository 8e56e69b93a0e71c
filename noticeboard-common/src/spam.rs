//! Coarse link-spam heuristic for post bodies.
//!
//! Counts how many distinct suspicious substrings occur in the text. A post that
//! merely mentions several different sites trips it as well, so treat it as a
//! filter against the obvious cases only.

use serde::Deserialize;
use std::collections::BTreeSet;

pub const DEFAULT_SPAM_PATTERNS: [&str; 6] =
    ["http://", "https://", "www.", ".com", ".net", ".org"];
pub const DEFAULT_SPAM_THRESHOLD: usize = 3;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct SpamPolicy {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Text matching more than this many patterns is spam.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_patterns() -> Vec<String> {
    DEFAULT_SPAM_PATTERNS.map(str::to_owned).to_vec()
}

fn default_threshold() -> usize {
    DEFAULT_SPAM_THRESHOLD
}

impl Default for SpamPolicy {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            threshold: default_threshold(),
        }
    }
}

impl SpamPolicy {
    /// Number of distinct patterns found in `text`, ignoring case.
    #[must_use]
    pub fn matches(&self, text: &str) -> usize {
        let haystack = text.to_lowercase();
        self.patterns
            .iter()
            .map(|pattern| pattern.to_lowercase())
            .filter(|pattern| !pattern.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|pattern| haystack.contains(pattern.as_str()))
            .count()
    }

    #[must_use]
    pub fn is_spam(&self, text: &str) -> bool {
        self.matches(text) > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use crate::spam::SpamPolicy;

    #[test]
    fn counts_distinct_patterns() {
        let policy = SpamPolicy::default();

        assert_eq!(policy.matches("nothing to see"), 0);
        assert_eq!(policy.matches("example.com example.com example.com"), 1);
        assert_eq!(policy.matches("HTTPS://Example.COM"), 2);
        assert_eq!(policy.matches("https://www.example.com"), 3);
    }

    #[test]
    fn threshold_is_exclusive() {
        let policy = SpamPolicy::default();

        assert!(!policy.is_spam("https://www.example.com"));
        assert!(policy.is_spam("https://www.example.com and example.org"));
        // Four different sites in plain prose are rejected as well.
        assert!(policy.is_spam("I like a.com, b.net, c.org and www.d.io"));
    }

    #[test]
    fn custom_policy() {
        let policy = SpamPolicy {
            patterns: vec!["casino".to_owned(), "CASINO".to_owned(), String::new()],
            threshold: 0,
        };

        assert_eq!(policy.matches("Best Casino in town"), 1);
        assert!(policy.is_spam("casino"));
        assert!(!policy.is_spam("anything else"));
    }
}
