//! AWS Systems Manager Parameter Store provider
//!
//! Resolves each requested key as one parameter. The request `path` is a
//! hierarchy prefix joined to the bare key with the configured delimiter;
//! parameters are fetched with decryption enabled, so `SecureString`
//! values work as long as the caller holds `ssm:GetParameter` and the
//! matching KMS permissions.

use crate::aws::AwsSettings;
use crate::traits::ConfigProvider;
use async_trait::async_trait;
use aws_sdk_ssm::Client;
use confetch_core::params::{ProviderParams, DELIMITER, NOT_FOUND_STRATEGY};
use confetch_core::{
    min_ttl, resolve_identifier, ConfigData, Error, Lookup, NotFoundStrategy, ParsedKey, Result,
};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_DELIMITER: &str = "/";

/// Configuration provider backed by AWS SSM Parameter Store
pub struct SsmParameterStoreProvider {
    settings: AwsSettings,
    strategy: NotFoundStrategy,
    delimiter: String,
    client: RwLock<Option<Client>>,
}

impl SsmParameterStoreProvider {
    /// Create an unconfigured provider
    pub fn new() -> Self {
        Self {
            settings: AwsSettings::default(),
            strategy: NotFoundStrategy::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            client: RwLock::new(None),
        }
    }

    /// Client handle, built once on first use
    async fn client(&self) -> Client {
        {
            let guard = self.client.read().await;
            if let Some(client) = guard.as_ref() {
                return client.clone();
            }
        }

        let mut guard = self.client.write().await;
        if let Some(client) = guard.as_ref() {
            return client.clone();
        }
        let client = self.build_client().await;
        *guard = Some(client.clone());
        client
    }

    async fn build_client(&self) -> Client {
        let sdk_config = self.settings.sdk_config().await;
        let mut builder = aws_sdk_ssm::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &self.settings.endpoint {
            debug!("Using custom SSM endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }
        Client::from_conf(builder.build())
    }

    /// Fetch one parameter, normalizing the missing-parameter case
    async fn fetch_parameter(&self, name: &str) -> Result<Lookup> {
        let client = self.client().await;
        match client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
        {
            Ok(resp) => {
                let value = resp.parameter.and_then(|p| p.value).ok_or_else(|| {
                    Error::backend(
                        "SSM",
                        name,
                        format!("Parameter {name} exists but has no value"),
                    )
                })?;
                Ok(Lookup::Found(value))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_parameter_not_found() {
                    debug!("Parameter {} does not exist", name);
                    Ok(Lookup::NotFound)
                } else {
                    Err(Error::backend("SSM", name, service_error))
                }
            }
        }
    }
}

impl Default for SsmParameterStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for SsmParameterStoreProvider {
    fn name(&self) -> &'static str {
        "ssm"
    }

    fn configure(&mut self, params: &ProviderParams) {
        self.settings = AwsSettings::from_params(params);
        // An absent strategy defaults to fail; a set one, blank included,
        // goes through parse and may weaken to ignore
        self.strategy = params
            .get(NOT_FOUND_STRATEGY)
            .map(NotFoundStrategy::parse)
            .unwrap_or_default();
        self.delimiter = params
            .get_nonblank(DELIMITER)
            .unwrap_or(DEFAULT_DELIMITER)
            .to_string();
    }

    async fn get(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigData> {
        if path.trim().is_empty() && keys.is_empty() {
            return Ok(ConfigData::default());
        }

        let mut data = ConfigData::default();
        for original in keys {
            let name = resolve_identifier(path, &ParsedKey::parse(original).name, &self.delimiter);
            let lookup = self.fetch_parameter(&name).await?;
            fold_parameter(&mut data, original, &name, lookup, self.strategy)?;
        }
        Ok(data)
    }

    async fn close(&self) {
        let mut guard = self.client.write().await;
        if guard.take().is_some() {
            debug!("Released SSM client");
        }
    }
}

/// Fold one parameter lookup into the accumulated resolution data.
///
/// Hits are recorded under `original_key`, option suffix intact; misses go
/// through `strategy` with the resolved parameter name as the identifier.
/// The key's `ttl` option tightens the batch TTL either way.
fn fold_parameter(
    data: &mut ConfigData,
    original_key: &str,
    parameter_name: &str,
    lookup: Lookup,
    strategy: NotFoundStrategy,
) -> Result<()> {
    data.ttl = min_ttl(data.ttl, ParsedKey::parse(original_key).ttl());
    match lookup {
        Lookup::Found(value) => {
            debug!("Resolved parameter {}", parameter_name);
            data.data.insert(original_key.to_string(), value);
            Ok(())
        }
        Lookup::NotFound => strategy.apply(&mut data.data, original_key, parameter_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_configure_reads_strategy_and_delimiter() {
        let mut provider = SsmParameterStoreProvider::new();
        provider.configure(&ProviderParams::from_iter([
            (NOT_FOUND_STRATEGY, "empty"),
            (DELIMITER, "."),
        ]));
        assert_eq!(provider.strategy, NotFoundStrategy::Empty);
        assert_eq!(provider.delimiter, ".");
    }

    #[test]
    fn test_defaults_apply_when_params_are_absent() {
        let mut provider = SsmParameterStoreProvider::new();
        provider.configure(&ProviderParams::new());
        assert_eq!(provider.strategy, NotFoundStrategy::Fail);
        assert_eq!(provider.delimiter, DEFAULT_DELIMITER);
    }

    #[test]
    fn test_unknown_strategy_weakens_to_ignore() {
        let mut provider = SsmParameterStoreProvider::new();
        provider.configure(&ProviderParams::from_iter([(NOT_FOUND_STRATEGY, "panic")]));
        assert_eq!(provider.strategy, NotFoundStrategy::Ignore);
    }

    #[test]
    fn test_blank_strategy_weakens_to_ignore() {
        let mut provider = SsmParameterStoreProvider::new();
        provider.configure(&ProviderParams::from_iter([(NOT_FOUND_STRATEGY, "")]));
        assert_eq!(provider.strategy, NotFoundStrategy::Ignore);

        provider.configure(&ProviderParams::from_iter([(NOT_FOUND_STRATEGY, "  ")]));
        assert_eq!(provider.strategy, NotFoundStrategy::Ignore);
    }

    #[test]
    fn test_fold_records_hits_under_the_original_key() {
        let mut data = ConfigData::default();
        fold_parameter(
            &mut data,
            "stringParam?ttl=30000",
            "/test/stringParam",
            Lookup::Found("dummyvalue".to_string()),
            NotFoundStrategy::Fail,
        )
        .unwrap();

        assert_eq!(
            data.data.get("stringParam?ttl=30000"),
            Some(&"dummyvalue".to_string())
        );
        assert!(!data.data.contains_key("stringParam"));
        assert_eq!(data.ttl, Some(Duration::from_millis(30_000)));
    }

    #[test]
    fn test_fold_miss_under_fail_names_the_parameter() {
        let mut data = ConfigData::default();
        let err = fold_parameter(
            &mut data,
            "missingParam",
            "/test/missingParam",
            Lookup::NotFound,
            NotFoundStrategy::Fail,
        )
        .unwrap_err();

        assert!(matches!(err, Error::NotFound { identifier } if identifier == "/test/missingParam"));
        assert!(data.data.is_empty());
    }

    #[test]
    fn test_fold_miss_under_empty_records_the_original_key() {
        let mut data = ConfigData::default();
        fold_parameter(
            &mut data,
            "missingParam?ttl=5000",
            "/test/missingParam",
            Lookup::NotFound,
            NotFoundStrategy::Empty,
        )
        .unwrap();

        assert_eq!(data.data.get("missingParam?ttl=5000"), Some(&String::new()));
        assert!(!data.data.contains_key("/test/missingParam"));
        assert_eq!(data.ttl, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_fold_miss_under_ignore_leaves_the_map_alone() {
        let mut data = ConfigData::default();
        fold_parameter(
            &mut data,
            "missingParam",
            "/test/missingParam",
            Lookup::NotFound,
            NotFoundStrategy::Ignore,
        )
        .unwrap();

        assert!(data.data.is_empty());
        assert_eq!(data.ttl, None);
    }
}
