//! Static key source backed by a JWK Set file.

use std::path::Path;

use crate::error::{JwtError, JwtResult};
use crate::jwk::{JwkSet, Key};

/// Keys loaded once from a file at construction. Lookups are pure in-memory
/// reads; this source performs no I/O and cannot fail after construction.
#[derive(Debug)]
pub struct LocalKeySource {
    keys: Vec<Key>,
}

impl LocalKeySource {
    /// Read and parse a JWK Set file. Missing/unreadable files and
    /// unparseable documents are configuration errors.
    pub fn load(path: &Path) -> JwtResult<Self> {
        let raw = std::fs::read(path).map_err(|err| {
            JwtError::configuration(format!(
                "cannot read key set file {}: {err}",
                path.display()
            ))
        })?;
        let set: JwkSet = serde_json::from_slice(&raw).map_err(|err| {
            JwtError::configuration(format!(
                "key set file {} is not a valid JWK Set: {err}",
                path.display()
            ))
        })?;
        let keys = set
            .into_keys()
            .map_err(|msg| {
                JwtError::configuration(format!("key set file {}: {msg}", path.display()))
            })?;
        Ok(Self { keys })
    }

    /// Wrap an already-built key list. Used by callers that assemble keys
    /// programmatically rather than from a file.
    #[must_use]
    pub fn from_keys(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// All keys, in document order.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }
}
