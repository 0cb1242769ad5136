//! AWS Secrets Manager provider
//!
//! Resolves requested keys as fields of one JSON secret document. The
//! request `path` names the secret (percent-decoded, so full ARNs work) and
//! each bare key names a field of the document. One `GetSecretValue` call
//! serves the whole batch.

use crate::aws::AwsSettings;
use crate::traits::ConfigProvider;
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use confetch_core::params::{ProviderParams, NOT_FOUND_STRATEGY};
use confetch_core::{
    min_ttl, percent_decode, ConfigData, Error, Lookup, NotFoundStrategy, ParsedKey, Result,
};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

/// Configuration provider backed by AWS Secrets Manager
pub struct SecretsManagerProvider {
    settings: AwsSettings,
    strategy: NotFoundStrategy,
    client: RwLock<Option<Client>>,
}

impl SecretsManagerProvider {
    /// Create an unconfigured provider
    pub fn new() -> Self {
        Self {
            settings: AwsSettings::default(),
            strategy: NotFoundStrategy::default(),
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
        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &self.settings.endpoint {
            debug!("Using custom Secrets Manager endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }
        Client::from_conf(builder.build())
    }

    /// Fetch the secret document, normalizing the missing-secret case
    async fn fetch_document(&self, secret_id: &str) -> Result<Lookup> {
        let client = self.client().await;
        match client.get_secret_value().secret_id(secret_id).send().await {
            Ok(resp) => Ok(Lookup::Found(
                resp.secret_string().unwrap_or_default().to_string(),
            )),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_resource_not_found_exception() {
                    debug!("Secret {} does not exist", secret_id);
                    Ok(Lookup::NotFound)
                } else {
                    Err(Error::backend("Secrets Manager", secret_id, service_error))
                }
            }
        }
    }
}

impl Default for SecretsManagerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for SecretsManagerProvider {
    fn name(&self) -> &'static str {
        "secretsmanager"
    }

    fn configure(&mut self, params: &ProviderParams) {
        self.settings = AwsSettings::from_params(params);
        // An absent strategy defaults to fail; a set one, blank included,
        // goes through parse and may weaken to ignore
        self.strategy = params
            .get(NOT_FOUND_STRATEGY)
            .map(NotFoundStrategy::parse)
            .unwrap_or_default();
    }

    async fn get(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigData> {
        if path.trim().is_empty() && keys.is_empty() {
            return Ok(ConfigData::default());
        }
        if path.trim().is_empty() {
            return Err(Error::config(
                "A secret name or ARN is required to resolve keys",
            ));
        }

        let secret_id = percent_decode(path);
        debug!("Resolving {} keys from secret {}", keys.len(), secret_id);

        match self.fetch_document(&secret_id).await? {
            Lookup::Found(body) => {
                let document = parse_document(&secret_id, &body)?;
                fold_document(&document, keys, self.strategy, &secret_id)
            }
            Lookup::NotFound => fold_missing_document(keys, self.strategy, &secret_id),
        }
    }

    async fn close(&self) {
        let mut guard = self.client.write().await;
        if guard.take().is_some() {
            debug!("Released Secrets Manager client");
        }
    }
}

/// Parse a secret body as a flat string-to-string JSON object
fn parse_document(secret_id: &str, body: &str) -> Result<HashMap<String, String>> {
    serde_json::from_str(body).map_err(|e| Error::secret_format(secret_id, e))
}

/// Resolve requested keys against a parsed secret document
fn fold_document(
    document: &HashMap<String, String>,
    keys: &HashSet<String>,
    strategy: NotFoundStrategy,
    secret_id: &str,
) -> Result<ConfigData> {
    let mut data = HashMap::new();
    let mut ttl = None;
    for original in keys {
        let parsed = ParsedKey::parse(original);
        ttl = min_ttl(ttl, parsed.ttl());
        let field = percent_decode(&parsed.name);
        match document.get(&field) {
            Some(value) => {
                data.insert(original.clone(), value.clone());
            }
            None => strategy.apply(&mut data, original, &format!("{secret_id}:{field}"))?,
        }
    }
    Ok(ConfigData::with_ttl(data, ttl))
}

/// Resolve requested keys when the secret itself does not exist.
///
/// `Fail` aborts the whole batch, keys or no keys. Otherwise every
/// requested key missed at once: `Empty` records each as an empty string,
/// `Ignore` records none, and `ttl` options still tighten the batch TTL.
fn fold_missing_document(
    keys: &HashSet<String>,
    strategy: NotFoundStrategy,
    secret_id: &str,
) -> Result<ConfigData> {
    if strategy == NotFoundStrategy::Fail {
        return Err(Error::not_found(secret_id));
    }
    let mut data = HashMap::new();
    let mut ttl = None;
    for original in keys {
        ttl = min_ttl(ttl, ParsedKey::parse(original).ttl());
        strategy.apply(&mut data, original, secret_id)?;
    }
    Ok(ConfigData::with_ttl(data, ttl))
}
