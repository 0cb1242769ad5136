//! Backend identifier resolution
//!
//! Hosts percent-encode characters that would collide with their token
//! grammar (`:` in secret ARNs, `/` in hierarchical parameter names), so
//! paths and keys are decoded before they reach a backend. Object-store
//! references are split here into bucket, key and local destination.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Percent-decode a path or key component.
///
/// Decoding is unconditional and lossless: input without `%` escapes comes
/// back unchanged, stray `%` sequences pass through, and input that does
/// not decode to valid UTF-8 is returned as-is.
pub fn percent_decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            debug!("Percent-decoding {:?} produced invalid UTF-8, keeping it verbatim", raw);
            raw.to_string()
        }
    }
}

/// Resolve the backend identifier for one requested key.
///
/// A blank `path` leaves the decoded key standing alone. Otherwise the
/// decoded path and key are joined with `delimiter`, without doubling it
/// when the path already ends with the delimiter.
pub fn resolve_identifier(path: &str, key: &str, delimiter: &str) -> String {
    let key = percent_decode(key);
    if path.trim().is_empty() {
        return key;
    }
    let path = percent_decode(path);
    if path.ends_with(delimiter) {
        format!("{path}{key}")
    } else {
        format!("{path}{delimiter}{key}")
    }
}

/// A bucket/key pair addressing one object in the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name, the first `/`-separated segment of the reference
    pub bucket: String,
    /// Object key, the remaining segments re-joined
    pub key: String,
}

impl ObjectLocation {
    /// Split a bare requested key into bucket and object key.
    ///
    /// Leading slashes and empty segments are collapsed. A reference needs
    /// at least a bucket segment and one key segment.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = raw.split('/').filter(|segment| !segment.is_empty());
        let bucket = segments
            .next()
            .ok_or_else(|| Error::config(format!("Object reference {raw:?} has no bucket")))?;
        let key = segments.collect::<Vec<_>>().join("/");
        if key.is_empty() {
            return Err(Error::config(format!(
                "Object reference {raw:?} has no key after the bucket"
            )));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key,
        })
    }

    /// Final segment of the object key
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// Local path this object materializes to under `local_dir`
    pub fn destination(&self, local_dir: &Path) -> PathBuf {
        local_dir.join(self.file_name())
    }
}
