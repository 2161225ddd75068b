//! Token processing pipeline.
//!
//! Construction is two-phase: [`JwtProcessor::new`] resolves the key source
//! and returns a ready, immutable processor or a configuration error;
//! [`JwtProcessor::from_config`] is the never-failing variant that yields a
//! permanently poisoned processor instead. Poisoned is terminal: the stored
//! error is returned on every call and resolution is never re-attempted,
//! because misconfiguration is permanent, not transient.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{JwtConfig, ValidationOptions};
use crate::error::{JwtError, JwtResult};
use crate::jwk::Key;
use crate::select::select;
use crate::source::KeySource;
use crate::token::parse_compact;
use crate::verify::verify_any;

/// Claims of a verified token, exactly as encoded in its payload.
pub type Claims = serde_json::Map<String, Value>;

/// Validates compact JWTs against a configured algorithm and key source.
///
/// Long-lived and read-mostly: `process` takes `&self` and is safe to call
/// concurrently from many tasks. The configuration and any local key set
/// are immutable after construction; the remote key cache is the only
/// shared mutable state and is swapped atomically.
#[derive(Debug)]
pub struct JwtProcessor {
    state: State,
}

#[derive(Debug)]
enum State {
    Ready(Ready),
    Poisoned(JwtError),
}

#[derive(Debug)]
struct Ready {
    config: JwtConfig,
    source: KeySource,
}

impl JwtProcessor {
    /// Resolve the key source and return a ready processor. Fails with
    /// [`JwtError::Configuration`] when the URL is malformed, the key file
    /// is missing or unreadable, or its content is not a valid JWK Set.
    pub fn new(config: JwtConfig) -> JwtResult<Self> {
        let source = KeySource::resolve(&config)?;
        debug!(algorithm = config.expected_algorithm.name(), "processor ready");
        Ok(Self {
            state: State::Ready(Ready { config, source }),
        })
    }

    /// Never-failing construction for callers that must keep a handle even
    /// when startup configuration is broken: a failed resolution yields a
    /// poisoned processor whose every [`process`](Self::process) call
    /// returns the stored configuration error.
    #[must_use]
    pub fn from_config(config: JwtConfig) -> Self {
        match Self::new(config) {
            Ok(processor) => processor,
            Err(err) => {
                warn!(error = %err, "key source resolution failed; processor is poisoned");
                Self {
                    state: State::Poisoned(err),
                }
            }
        }
    }

    /// Whether construction succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// The construction error of a poisoned processor. Callers that treat
    /// misconfiguration as fatal (the normal case) abort startup on `Some`.
    #[must_use]
    pub fn construction_error(&self) -> Option<&JwtError> {
        match &self.state {
            State::Ready(_) => None,
            State::Poisoned(err) => Some(err),
        }
    }

    /// Validate a compact JWT and return its claims.
    ///
    /// The pipeline: parse, algorithm check, key selection, signature
    /// verification, claims extraction, time-claim validation. Exactly one
    /// claims mapping or one [`JwtError`] is the outcome of every call. The
    /// only suspension point is the bounded remote key fetch; the local
    /// path never awaits I/O.
    pub async fn process(&self, token: &str) -> JwtResult<Claims> {
        match &self.state {
            State::Ready(ready) => ready.process(token).await,
            State::Poisoned(err) => Err(err.clone()),
        }
    }
}

impl Ready {
    async fn process(&self, token: &str) -> JwtResult<Claims> {
        let parsed = parse_compact(token)?;
        let expected = self.config.expected_algorithm;

        // Algorithm check precedes key lookup unconditionally so a token
        // declaring an unintended algorithm ("none" included) is rejected
        // before any key is consulted.
        if parsed.header.alg != expected.name() {
            warn!(
                declared = %parsed.header.alg,
                expected = expected.name(),
                "rejecting token with mismatched algorithm"
            );
            return Err(JwtError::AlgorithmMismatch {
                expected: expected.name(),
                found: parsed.header.alg,
            });
        }

        let kid = parsed.header.kid.as_deref();
        let keys = match &self.source {
            KeySource::Local(local) => Candidates::Borrowed(local.keys()),
            KeySource::Remote(remote) => Candidates::Shared(remote.fetch(kid).await?),
        };
        let candidates = select(keys.as_slice(), expected, kid);
        if candidates.is_empty() {
            return Err(JwtError::NoMatchingKey);
        }

        verify_any(
            expected,
            parsed.signing_input.as_bytes(),
            &parsed.signature,
            &candidates,
        )?;

        // The payload is interpreted as JSON only now that the signature is
        // known good.
        let claims: Claims = serde_json::from_slice(&parsed.payload)
            .map_err(|_| JwtError::parse("payload is not a JSON object"))?;
        validate_time_claims(&claims, &self.config.validation)?;
        Ok(claims)
    }
}

/// Key slices from either source, without copying the remote snapshot.
enum Candidates<'a> {
    Borrowed(&'a [Key]),
    Shared(Arc<Vec<Key>>),
}

impl Candidates<'_> {
    fn as_slice(&self) -> &[Key] {
        match self {
            Candidates::Borrowed(keys) => keys,
            Candidates::Shared(keys) => keys,
        }
    }
}

fn validate_time_claims(claims: &Claims, options: &ValidationOptions) -> JwtResult<()> {
    let now = chrono::Utc::now().timestamp();
    let leeway = options.leeway.num_seconds();

    // Saturating arithmetic: claims are attacker-supplied i64s, and a
    // signed token may legitimately carry an extreme timestamp.
    if options.validate_exp {
        if let Some(exp) = claims.get("exp").and_then(Value::as_i64) {
            if now > exp.saturating_add(leeway) {
                return Err(JwtError::Expired);
            }
        }
    }
    if options.validate_nbf {
        if let Some(nbf) = claims.get("nbf").and_then(Value::as_i64) {
            if now.saturating_add(leeway) < nbf {
                return Err(JwtError::NotYetValid);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(json: serde_json::Value) -> Claims {
        match json {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn expired_beyond_leeway_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let options = ValidationOptions::default();

        let fresh = claims(serde_json::json!({ "exp": now + 600 }));
        assert!(validate_time_claims(&fresh, &options).is_ok());

        let stale = claims(serde_json::json!({ "exp": now - 3600 }));
        assert!(matches!(
            validate_time_claims(&stale, &options).unwrap_err(),
            JwtError::Expired
        ));

        // inside the default 60s leeway
        let borderline = claims(serde_json::json!({ "exp": now - 10 }));
        assert!(validate_time_claims(&borderline, &options).is_ok());
    }

    #[test]
    fn not_yet_valid_and_disabled_validation() {
        let now = chrono::Utc::now().timestamp();
        let future = claims(serde_json::json!({ "nbf": now + 3600 }));
        assert!(matches!(
            validate_time_claims(&future, &ValidationOptions::default()).unwrap_err(),
            JwtError::NotYetValid
        ));
        assert!(validate_time_claims(&future, &ValidationOptions::disabled()).is_ok());
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let options = ValidationOptions::default();

        let far_future = claims(serde_json::json!({ "exp": i64::MAX }));
        assert!(validate_time_claims(&far_future, &options).is_ok());

        let distant_past = claims(serde_json::json!({ "exp": i64::MIN }));
        assert!(matches!(
            validate_time_claims(&distant_past, &options).unwrap_err(),
            JwtError::Expired
        ));

        let never_valid = claims(serde_json::json!({ "nbf": i64::MAX }));
        assert!(matches!(
            validate_time_claims(&never_valid, &options).unwrap_err(),
            JwtError::NotYetValid
        ));
    }

    #[test]
    fn tokens_without_time_claims_pass() {
        let bare = claims(serde_json::json!({ "sub": "alice" }));
        assert!(validate_time_claims(&bare, &ValidationOptions::default()).is_ok());
    }
}
