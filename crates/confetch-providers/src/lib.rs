//! AWS-backed configuration providers
//!
//! This crate provides the provider layer for resolving configuration
//! references against AWS services:
//!
//! - Secrets Manager (keys are fields of one JSON secret document)
//! - SSM Parameter Store (one parameter per key, decrypted)
//! - S3 import (objects materialized to local files, resolved to paths)
//!
//! Providers share a common lifecycle: [`ConfigProvider::configure`] once,
//! any number of [`ConfigProvider::get`] calls, then
//! [`ConfigProvider::close`]. Backend clients are built lazily on the first
//! `get` that needs them.

pub mod s3import;
pub mod secretsmanager;
pub mod ssm;
pub mod traits;

mod aws;

pub use s3import::S3ImportProvider;
pub use secretsmanager::SecretsManagerProvider;
pub use ssm::SsmParameterStoreProvider;
pub use traits::ConfigProvider;

use confetch_core::{Error, Result};
use std::str::FromStr;

/// Provider implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    SecretsManager,
    SsmParameterStore,
    S3Import,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secretsmanager" => Ok(Self::SecretsManager),
            "ssm" => Ok(Self::SsmParameterStore),
            "s3import" => Ok(Self::S3Import),
            other => Err(Error::config(format!(
                "Unknown provider: {other}. Valid providers: secretsmanager, ssm, s3import"
            ))),
        }
    }
}

/// Create a provider instance by kind.
///
/// The host still owns the binding of token qualifiers to instances; this
/// only maps implementation names.
pub fn create_provider(kind: ProviderKind) -> Box<dyn ConfigProvider> {
    match kind {
        ProviderKind::SecretsManager => Box::new(SecretsManagerProvider::new()),
        ProviderKind::SsmParameterStore => Box::new(SsmParameterStoreProvider::new()),
        ProviderKind::S3Import => Box::new(S3ImportProvider::new()),
    }
}
