//! Provider configuration parameters
//!
//! Providers are configured from a flat string map handed over by the host
//! before first use. Names not recognized by a provider are simply never
//! read.

use std::collections::HashMap;

/// AWS region override, recognized by every provider
pub const REGION: &str = "region";

/// Service endpoint override, for resolving against local stand-ins
pub const ENDPOINT: &str = "endpoint";

/// Not-found strategy name: `fail`, `empty` or `ignore`
pub const NOT_FOUND_STRATEGY: &str = "NotFoundStrategy";

/// Hierarchy delimiter used to join paths and keys into parameter names
pub const DELIMITER: &str = "delimiter";

/// Directory imported objects are materialized into
pub const LOCAL_DIR: &str = "local_dir";

/// Flat provider configuration map
#[derive(Debug, Clone, Default)]
pub struct ProviderParams {
    values: HashMap<String, String>,
}

impl ProviderParams {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for a parameter name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value for a parameter name, treating blank values as unset
    pub fn get_nonblank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }
}

impl From<HashMap<String, String>> for ProviderParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, String)> for ProviderParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ProviderParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}
