//! Provider trait definition

use async_trait::async_trait;
use confetch_core::{ConfigData, ProviderParams, Result};
use std::collections::HashSet;

/// Capability interface for configuration providers.
///
/// A provider resolves batches of requested keys against one backing store.
/// The host owns the indirection token grammar: it parses tokens, groups the
/// keys that share a path, and calls [`get`](ConfigProvider::get) once per
/// group, treating the returned values as opaque strings.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Short implementation name, for diagnostics
    fn name(&self) -> &'static str;

    /// Apply configuration parameters. Called once before the first `get`.
    ///
    /// Never fails: a misconfigured tuning parameter is logged and replaced
    /// by its default, so configuration cannot block construction.
    fn configure(&mut self, params: &ProviderParams);

    /// Resolve every key in `keys` under `path` into a map keyed by the
    /// requested strings. When both `path` and `keys` are empty the result
    /// is empty and the backend is not contacted.
    async fn get(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigData>;

    /// Release the backend connection. Idempotent.
    async fn close(&self);
}
