//! Processor configuration.
//!
//! A [`JwtConfig`] is a one-time snapshot assembled at process start and
//! passed explicitly into [`crate::JwtProcessor`]; nothing in the validation
//! path reads ambient process state. It is immutable after construction.

use std::path::PathBuf;
use std::time::Duration;

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Time-claim validation knobs applied after signature verification.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Leeway for `exp`/`nbf` comparisons.
    pub leeway: chrono::Duration,
    /// Reject tokens whose `exp` is in the past.
    pub validate_exp: bool,
    /// Reject tokens whose `nbf` is in the future.
    pub validate_nbf: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            leeway: chrono::Duration::seconds(60),
            validate_exp: true,
            validate_nbf: true,
        }
    }
}

impl ValidationOptions {
    /// Skip all time-claim validation. Signature checks still apply.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            leeway: chrono::Duration::zero(),
            validate_exp: false,
            validate_nbf: false,
        }
    }

    /// Set the leeway for time-claim comparisons.
    #[must_use]
    pub fn with_leeway(mut self, leeway: chrono::Duration) -> Self {
        self.leeway = leeway;
        self
    }
}

/// Immutable processor configuration.
///
/// A non-empty `jwk_source_url` (after trimming) takes exclusive precedence
/// over `jwk_source_file`; the file is consulted only when no URL is set.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// The only algorithm tokens are accepted under.
    pub expected_algorithm: Algorithm,
    /// Remote JWK Set endpoint. Empty or whitespace means unset.
    pub jwk_source_url: Option<String>,
    /// Local JWK Set file, read once at construction.
    pub jwk_source_file: Option<PathBuf>,
    /// Upper bound on a single remote key-set fetch.
    pub fetch_timeout: Duration,
    /// Time-claim validation applied after signature verification.
    pub validation: ValidationOptions,
}

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

impl JwtConfig {
    /// Start a configuration expecting the given algorithm.
    #[must_use]
    pub fn new(expected_algorithm: Algorithm) -> Self {
        Self {
            expected_algorithm,
            jwk_source_url: None,
            jwk_source_file: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            validation: ValidationOptions::default(),
        }
    }

    /// Verify against a remote JWK Set endpoint.
    #[must_use]
    pub fn with_jwk_url(mut self, url: impl Into<String>) -> Self {
        self.jwk_source_url = Some(url.into());
        self
    }

    /// Verify against a local JWK Set file.
    #[must_use]
    pub fn with_jwk_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.jwk_source_file = Some(path.into());
        self
    }

    /// Bound the remote key-set fetch.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Replace the time-claim validation options.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    /// The URL to use, if one is set and non-empty after trimming.
    pub(crate) fn effective_url(&self) -> Option<&str> {
        self.jwk_source_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Assemble a configuration from flat `key=value` properties, the shape
    /// a CLI or environment layer hands over at startup:
    ///
    /// - `jwt.algorithm` (required) — expected algorithm name
    /// - `jwt.jwks.url` — remote key-set endpoint
    /// - `jwt.jwks.file` — local key-set file
    /// - `jwt.fetch.timeout.secs` — remote fetch bound in seconds
    ///
    /// Unrelated properties are ignored; property bags routinely carry
    /// entries for other components.
    pub fn from_properties<I, K, V>(properties: I) -> JwtResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut algorithm = None;
        let mut url = None;
        let mut file = None;
        let mut timeout = DEFAULT_FETCH_TIMEOUT;

        for (key, value) in properties {
            let value = value.as_ref();
            match key.as_ref() {
                "jwt.algorithm" => algorithm = Some(value.parse::<Algorithm>()?),
                "jwt.jwks.url" => url = Some(value.to_string()),
                "jwt.jwks.file" => file = Some(PathBuf::from(value)),
                "jwt.fetch.timeout.secs" => {
                    let secs: u64 = value.parse().map_err(|_| {
                        JwtError::configuration(format!(
                            "jwt.fetch.timeout.secs is not a number: {value:?}"
                        ))
                    })?;
                    timeout = Duration::from_secs(secs);
                }
                _ => {}
            }
        }

        let expected_algorithm =
            algorithm.ok_or_else(|| JwtError::configuration("jwt.algorithm is not set"))?;

        Ok(Self {
            expected_algorithm,
            jwk_source_url: url,
            jwk_source_file: file,
            fetch_timeout: timeout,
            validation: ValidationOptions::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_precedence_ignores_blank_urls() {
        let config = JwtConfig::new(Algorithm::RS256)
            .with_jwk_url("   ")
            .with_jwk_file("/keys.jwk");
        assert!(config.effective_url().is_none());

        let config = JwtConfig::new(Algorithm::RS256)
            .with_jwk_url(" https://issuer/jwks.json ")
            .with_jwk_file("/keys.jwk");
        assert_eq!(config.effective_url(), Some("https://issuer/jwks.json"));
    }

    #[test]
    fn from_properties_builds_a_snapshot() {
        let config = JwtConfig::from_properties([
            ("jwt.algorithm", "HS256"),
            ("jwt.jwks.file", "/keys.jwk"),
            ("jwt.fetch.timeout.secs", "3"),
            ("other.component.setting", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.expected_algorithm, Algorithm::HS256);
        assert_eq!(config.jwk_source_file.as_deref().unwrap().to_str(), Some("/keys.jwk"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn from_properties_requires_a_known_algorithm() {
        assert!(matches!(
            JwtConfig::from_properties([("jwt.jwks.file", "/keys.jwk")]).unwrap_err(),
            JwtError::Configuration(_)
        ));
        assert!(matches!(
            JwtConfig::from_properties([("jwt.algorithm", "none")]).unwrap_err(),
            JwtError::Configuration(_)
        ));
    }
}
