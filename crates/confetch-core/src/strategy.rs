//! Not-found handling policy

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What to do when a requested value does not exist in the backend.
///
/// Applied independently per missed key: a miss under `Empty` or `Ignore`
/// never disturbs sibling keys in the same batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotFoundStrategy {
    /// Abort the whole batch with a not-found error
    #[default]
    Fail,
    /// Record the key with an empty-string value
    Empty,
    /// Leave the key out of the resolution map
    Ignore,
}

impl NotFoundStrategy {
    /// Parse a configured strategy name, case-insensitively.
    ///
    /// Unrecognized names fall back to `Ignore`: a typo in configuration
    /// weakens the policy instead of failing startup.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "fail" => Self::Fail,
            "empty" => Self::Empty,
            "ignore" => Self::Ignore,
            other => {
                warn!("Unknown not-found strategy {:?}, falling back to ignore", other);
                Self::Ignore
            }
        }
    }

    /// Apply this strategy for one missed key.
    ///
    /// `original_key` is the key as requested, option suffix intact;
    /// `identifier` is the backend identifier that missed.
    pub fn apply(
        &self,
        data: &mut HashMap<String, String>,
        original_key: &str,
        identifier: &str,
    ) -> Result<()> {
        match self {
            Self::Fail => Err(Error::not_found(identifier)),
            Self::Empty => {
                debug!("Recording missing value for {} as empty", identifier);
                data.insert(original_key.to_string(), String::new());
                Ok(())
            }
            Self::Ignore => {
                debug!("Ignoring missing value for {}", identifier);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!(NotFoundStrategy::parse("FAIL"), NotFoundStrategy::Fail);
        assert_eq!(NotFoundStrategy::parse("Empty"), NotFoundStrategy::Empty);
        assert_eq!(NotFoundStrategy::parse("ignore"), NotFoundStrategy::Ignore);
    }

    #[test]
    fn test_unknown_names_fall_back_to_ignore() {
        assert_eq!(NotFoundStrategy::parse("explode"), NotFoundStrategy::Ignore);
        assert_eq!(NotFoundStrategy::parse(""), NotFoundStrategy::Ignore);
    }

    #[test]
    fn test_the_default_is_fail() {
        assert_eq!(NotFoundStrategy::default(), NotFoundStrategy::Fail);
    }

    #[test]
    fn test_fail_aborts_without_touching_the_map() {
        let mut data = HashMap::new();
        let err = NotFoundStrategy::Fail
            .apply(&mut data, "missingKey?ttl=5", "/app/missingKey")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { identifier } if identifier == "/app/missingKey"));
        assert!(data.is_empty());
    }

    #[test]
    fn test_empty_records_the_original_key_with_an_empty_value() {
        let mut data = HashMap::new();
        NotFoundStrategy::Empty
            .apply(&mut data, "missingKey", "/app/missingKey")
            .unwrap();
        assert_eq!(data.get("missingKey"), Some(&String::new()));
    }

    #[test]
    fn test_ignore_leaves_the_map_untouched() {
        let mut data = HashMap::new();
        NotFoundStrategy::Ignore
            .apply(&mut data, "missingKey", "/app/missingKey")
            .unwrap();
        assert!(data.is_empty());
    }
}
