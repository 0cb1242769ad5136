//! Shared AWS client settings
//!
//! Every provider accepts the same `region` and `endpoint` parameters; this
//! module centralizes reading them and loading the base SDK configuration.
//! Service clients themselves are built by each provider, lazily, on first
//! use.

use aws_config::{BehaviorVersion, Region};
use confetch_core::params::{ProviderParams, ENDPOINT, REGION};
use tracing::{debug, error};
use url::Url;

/// Region and endpoint settings shared by the AWS-backed providers
#[derive(Debug, Clone, Default)]
pub(crate) struct AwsSettings {
    /// Region override; `None` defers to the ambient provider chain
    pub region: Option<String>,
    /// Endpoint override, already validated as a URL
    pub endpoint: Option<String>,
}

impl AwsSettings {
    /// Read `region` and `endpoint` from provider parameters.
    ///
    /// A blank region is treated as unset. An endpoint that does not parse
    /// as a URL is logged and dropped, so a bad tuning parameter cannot
    /// block provider construction.
    pub fn from_params(params: &ProviderParams) -> Self {
        let region = params.get_nonblank(REGION).map(str::to_string);
        let endpoint = params.get_nonblank(ENDPOINT).and_then(|raw| match Url::parse(raw) {
            Ok(_) => Some(raw.to_string()),
            Err(e) => {
                error!("Ignoring invalid endpoint {:?}: {}", raw, e);
                None
            }
        });
        Self { region, endpoint }
    }

    /// Load base SDK configuration, honoring the configured region when set
    pub async fn sdk_config(&self) -> aws_config::SdkConfig {
        self.sdk_config_for_region(self.region.as_deref()).await
    }

    /// Load base SDK configuration for an explicit region override
    pub async fn sdk_config_for_region(&self, region: Option<&str>) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            debug!("Using region {}", region);
            loader = loader.region(Region::new(region.to_string()));
        }
        loader.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_region_and_endpoint_read_as_unset() {
        let params = ProviderParams::from_iter([(REGION, " "), (ENDPOINT, "")]);
        let settings = AwsSettings::from_params(&params);
        assert_eq!(settings.region, None);
        assert_eq!(settings.endpoint, None);
    }

    #[test]
    fn test_valid_endpoints_are_kept() {
        let params = ProviderParams::from_iter([
            (REGION, "us-east-1"),
            (ENDPOINT, "http://localhost:4566"),
        ]);
        let settings = AwsSettings::from_params(&params);
        assert_eq!(settings.region.as_deref(), Some("us-east-1"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_invalid_endpoints_are_dropped() {
        let params = ProviderParams::from_iter([(ENDPOINT, "not a url")]);
        let settings = AwsSettings::from_params(&params);
        assert_eq!(settings.endpoint, None);
    }
}
