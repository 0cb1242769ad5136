//! Resolved configuration data shared by all providers

use std::collections::HashMap;
use std::time::Duration;

/// The result of resolving one batch of requested keys.
///
/// Map keys are the original requested strings, option suffix and all, so
/// the host can substitute values back into the tokens it parsed them from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigData {
    /// Resolved values keyed by the requested key strings
    pub data: HashMap<String, String>,
    /// Refresh hint: how long the values should be considered current
    pub ttl: Option<Duration>,
}

impl ConfigData {
    /// Create resolved data with no refresh hint
    pub fn new(data: HashMap<String, String>) -> Self {
        Self { data, ttl: None }
    }

    /// Create resolved data carrying a refresh hint
    pub fn with_ttl(data: HashMap<String, String>, ttl: Option<Duration>) -> Self {
        Self { data, ttl }
    }
}

/// Outcome of a single backend lookup.
///
/// Backend-specific miss classification (missing secret, missing parameter)
/// is normalized into `NotFound` at the adapter boundary; everything
/// downstream only distinguishes hit from miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The value exists
    Found(String),
    /// The backend reported the value as absent
    NotFound,
}

/// Fold two refresh hints, keeping the soonest.
///
/// A batch expires when its most impatient key does.
pub fn min_ttl(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}
