//! Error types for confetch-core

use thiserror::Error;

/// Result type alias using confetch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while resolving configuration references
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced value does not exist and the not-found strategy is `Fail`
    #[error("Configuration value not found: {identifier}")]
    NotFound { identifier: String },

    /// A secret document is not a flat string-to-string JSON object
    #[error("Secret {secret_id} is not a flat JSON object of strings: {source}")]
    SecretFormat {
        secret_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A referenced object does not exist in the object store
    #[error("Object not found: s3://{bucket}/{key}")]
    ObjectMissing { bucket: String, key: String },

    /// Writing an object to its local destination failed
    #[error("Failed to materialize {path}: {source}")]
    Materialize {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The request itself is malformed
    #[error("Invalid request: {0}")]
    Config(String),

    /// The backend call failed for a reason other than a missing value
    #[error("{service} request failed for {identifier}: {source}")]
    Backend {
        service: &'static str,
        identifier: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Create a not-found error for the given backend identifier
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create a secret format error
    pub fn secret_format(secret_id: impl Into<String>, source: serde_json::Error) -> Self {
        Self::SecretFormat {
            secret_id: secret_id.into(),
            source,
        }
    }

    /// Create a missing-object error
    pub fn object_missing(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectMissing {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create a materialization error for a local path
    pub fn materialize(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Materialize {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid request error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a backend failure error
    pub fn backend(
        service: &'static str,
        identifier: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            service,
            identifier: identifier.into(),
            source: source.into(),
        }
    }

    /// Whether this error reports a missing value rather than a failed call
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ObjectMissing { .. })
    }
}
