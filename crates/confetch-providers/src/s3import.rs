//! S3 object import provider
//!
//! Rather than returning object bytes inline, this provider downloads each
//! referenced object to a local file once and resolves the key to that
//! file's path, so file-shaped configuration (keystores, truststores)
//! can be referenced like any other value. An existing destination is
//! trusted as-is, which makes repeated resolution of the same reference
//! idempotent across process restarts.

use crate::aws::AwsSettings;
use crate::traits::ConfigProvider;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use confetch_core::params::{ProviderParams, LOCAL_DIR};
use confetch_core::{min_ttl, ConfigData, Error, ObjectLocation, ParsedKey, Result};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration provider that imports S3 objects to local files.
///
/// The request `path` is not an object prefix: it optionally overrides the
/// AWS region for that call. Bucket and object key both come from the
/// requested key itself.
pub struct S3ImportProvider {
    settings: AwsSettings,
    local_dir: PathBuf,
    /// Clients keyed by effective region, each built at most once
    clients: RwLock<HashMap<String, Client>>,
}

impl S3ImportProvider {
    /// Create an unconfigured provider importing into the system temp dir
    pub fn new() -> Self {
        Self {
            settings: AwsSettings::default(),
            local_dir: std::env::temp_dir(),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Client for the effective region, built once per distinct region
    async fn client(&self, region_override: &str) -> Client {
        let region = if region_override.trim().is_empty() {
            self.settings.region.clone().unwrap_or_default()
        } else {
            region_override.trim().to_string()
        };

        {
            let guard = self.clients.read().await;
            if let Some(client) = guard.get(&region) {
                return client.clone();
            }
        }

        let mut guard = self.clients.write().await;
        if let Some(client) = guard.get(&region) {
            return client.clone();
        }
        let client = self.build_client(&region).await;
        guard.insert(region, client.clone());
        client
    }

    async fn build_client(&self, region: &str) -> Client {
        let sdk_config = self
            .settings
            .sdk_config_for_region((!region.is_empty()).then_some(region))
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &self.settings.endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint);
            // Path-style addressing for MinIO and other S3-compatible stores
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Client::from_conf(builder.build())
    }

    /// Open the object's body as a stream, normalizing the missing-object case
    async fn fetch_stream(
        &self,
        region: &str,
        location: ObjectLocation,
    ) -> Result<impl AsyncRead + Unpin> {
        let client = self.client(region).await;
        debug!("Downloading s3://{}/{}", location.bucket, location.key);
        match client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
        {
            Ok(resp) => Ok(resp.body.into_async_read()),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Err(Error::object_missing(&location.bucket, &location.key))
                } else {
                    Err(Error::backend(
                        "S3",
                        format!("s3://{}/{}", location.bucket, location.key),
                        service_error,
                    ))
                }
            }
        }
    }
}

impl Default for S3ImportProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for S3ImportProvider {
    fn name(&self) -> &'static str {
        "s3import"
    }

    fn configure(&mut self, params: &ProviderParams) {
        self.settings = AwsSettings::from_params(params);
        self.local_dir = params
            .get_nonblank(LOCAL_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
    }

    async fn get(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigData> {
        if path.trim().is_empty() && keys.is_empty() {
            return Ok(ConfigData::default());
        }
        import_objects(&self.local_dir, keys, |location| {
            self.fetch_stream(path, location)
        })
        .await
    }

    async fn close(&self) {
        let mut guard = self.clients.write().await;
        if !guard.is_empty() {
            debug!("Released {} S3 client(s)", guard.len());
            guard.clear();
        }
    }
}

/// Resolve each requested key to a local file, fetching at most once.
///
/// An existing destination short-circuits without calling `fetch`; only
/// keys whose destination is absent cost a download.
async fn import_objects<F, Fut, R>(
    local_dir: &Path,
    keys: &HashSet<String>,
    mut fetch: F,
) -> Result<ConfigData>
where
    F: FnMut(ObjectLocation) -> Fut,
    Fut: Future<Output = Result<R>>,
    R: AsyncRead + Unpin,
{
    let mut data = HashMap::new();
    let mut ttl = None;
    for original in keys {
        let parsed = ParsedKey::parse(original);
        ttl = min_ttl(ttl, parsed.ttl());
        let location = ObjectLocation::parse(&parsed.name)?;
        let destination = location.destination(local_dir);

        if destination.exists() {
            // Existence is the idempotency marker; the file is trusted
            // without refetching or verifying its contents
            debug!("Reusing previously imported {}", destination.display());
        } else {
            if let Some(parent) = destination.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::materialize(parent.display().to_string(), e))?;
            }
            let source = format!("s3://{}/{}", location.bucket, location.key);
            let mut reader = fetch(location).await?;
            materialize(&destination, &mut reader).await?;
            info!("Imported {} to {}", source, destination.display());
        }

        data.insert(original.clone(), destination.display().to_string());
    }
    Ok(ConfigData::with_ttl(data, ttl))
}

/// Stream `reader` into `destination`.
///
/// A partially written destination is removed on failure so a later call
/// fetches again instead of trusting a truncated file.
async fn materialize(destination: &Path, reader: &mut (impl AsyncRead + Unpin)) -> Result<()> {
    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| Error::materialize(destination.display().to_string(), e))?;
    if let Err(e) = tokio::io::copy(reader, &mut file).await {
        drop(file);
        let _ = tokio::fs::remove_file(destination).await;
        return Err(Error::materialize(destination.display().to_string(), e));
    }
    Ok(())
}
