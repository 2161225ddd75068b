//! Verification key sources.
//!
//! Resolution happens exactly once, at processor construction: a non-empty
//! key-set URL produces a [`RemoteKeySource`] (no I/O yet), otherwise the
//! configured file is read and parsed into a [`LocalKeySource`]. A
//! resolution failure is a [`crate::JwtError::Configuration`] and is fatal
//! to the processor.

mod local;
mod remote;

pub use local::LocalKeySource;
pub use remote::RemoteKeySource;

use tracing::debug;
use url::Url;

use crate::config::JwtConfig;
use crate::error::{JwtError, JwtResult};

/// Where verification keys live.
#[derive(Debug)]
pub enum KeySource {
    /// Keys loaded once from a file.
    Local(LocalKeySource),
    /// Keys fetched and cached from an HTTP(S) endpoint.
    Remote(RemoteKeySource),
}

impl KeySource {
    /// Resolve the key source for a configuration. Evaluated once,
    /// synchronously, at processor construction.
    pub fn resolve(config: &JwtConfig) -> JwtResult<Self> {
        if let Some(raw) = config.effective_url() {
            let url = Url::parse(raw).map_err(|err| {
                JwtError::configuration(format!("invalid key set url {raw:?}: {err}"))
            })?;
            debug!(url = %url, "resolved remote key source");
            Ok(KeySource::Remote(RemoteKeySource::new(
                url,
                config.fetch_timeout,
            )?))
        } else {
            let path = config.jwk_source_file.as_deref().ok_or_else(|| {
                JwtError::configuration("neither a key set url nor a key set file is configured")
            })?;
            let local = LocalKeySource::load(path)?;
            debug!(path = %path.display(), keys = local.keys().len(), "loaded local key source");
            Ok(KeySource::Local(local))
        }
    }
}
