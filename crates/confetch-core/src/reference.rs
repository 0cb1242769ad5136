//! Requested-key parsing
//!
//! A requested key may carry per-key options after a `?`, in query-string
//! form: `alias?ttl=30000&note=x`. The bare name before the `?` addresses
//! the value in the backend; options tune how it is resolved. Resolution
//! maps always use the original string, options included.

use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Option name carrying the per-key refresh hint, in milliseconds
pub const TTL_OPTION: &str = "ttl";

/// A requested key split into its bare name and option pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    /// Key name with any option suffix removed
    pub name: String,
    /// Option pairs from the suffix
    pub options: HashMap<String, String>,
}

impl ParsedKey {
    /// Split a requested key on the first `?` into name and options.
    ///
    /// Options are `&`-separated `name=value` pairs, split on the first `=`;
    /// a pair with no `=` is skipped. Parsing never fails: a key without `?`
    /// is its own name with no options.
    pub fn parse(raw: &str) -> Self {
        let Some((name, suffix)) = raw.split_once('?') else {
            return Self {
                name: raw.to_string(),
                options: HashMap::new(),
            };
        };

        let mut options = HashMap::new();
        for pair in suffix.split('&') {
            match pair.split_once('=') {
                Some((option, value)) => {
                    options.insert(option.to_string(), value.to_string());
                }
                None => debug!("Skipping malformed key option {:?}", pair),
            }
        }

        Self {
            name: name.to_string(),
            options,
        }
    }

    /// The `ttl` option as a duration, when present and parseable as a
    /// non-negative integer count of milliseconds. Anything else counts as
    /// absent, never as an error.
    pub fn ttl(&self) -> Option<Duration> {
        let raw = self.options.get(TTL_OPTION)?;
        match raw.parse::<u64>() {
            Ok(millis) => Some(Duration::from_millis(millis)),
            Err(_) => {
                debug!("Ignoring unparsable ttl option {:?}", raw);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_without_options_is_unchanged() {
        let parsed = ParsedKey::parse("password");
        assert_eq!(parsed.name, "password");
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.ttl(), None);
    }

    #[test]
    fn test_ttl_option_is_extracted_and_others_kept_aside() {
        let parsed = ParsedKey::parse("password?ttl=30000&note=x");
        assert_eq!(parsed.name, "password");
        assert_eq!(parsed.ttl(), Some(Duration::from_millis(30_000)));
        assert_eq!(parsed.options.get("note"), Some(&"x".to_string()));
    }

    #[test]
    fn test_pair_without_equals_is_skipped() {
        let parsed = ParsedKey::parse("password?orphan&ttl=10");
        assert_eq!(parsed.ttl(), Some(Duration::from_millis(10)));
        assert!(!parsed.options.contains_key("orphan"));
    }

    #[test]
    fn test_unparsable_ttl_counts_as_absent() {
        assert_eq!(ParsedKey::parse("k?ttl=soon").ttl(), None);
        assert_eq!(ParsedKey::parse("k?ttl=-5").ttl(), None);
        assert_eq!(ParsedKey::parse("k?ttl=").ttl(), None);
    }

    #[test]
    fn test_only_the_first_question_mark_splits() {
        let parsed = ParsedKey::parse("k?ttl=5?x");
        assert_eq!(parsed.name, "k");
        // "ttl=5?x" still splits on its first `=`
        assert_eq!(parsed.options.get("ttl"), Some(&"5?x".to_string()));
        assert_eq!(parsed.ttl(), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let parsed = ParsedKey::parse("k?note=a=b");
        assert_eq!(parsed.options.get("note"), Some(&"a=b".to_string()));
    }
}
