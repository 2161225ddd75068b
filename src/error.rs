//! Validation error taxonomy.
//!
//! Every `process()` call resolves to exactly one claims mapping or exactly
//! one of these kinds. Callers map [`JwtError::Configuration`] to a permanent
//! service failure and everything else to a per-request rejection;
//! [`JwtError::is_transient`] distinguishes the one retry-later kind.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type JwtResult<T> = Result<T, JwtError>;

/// Validation failure kinds.
///
/// Display messages never include key material or token contents beyond the
/// declared algorithm name.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    /// Key-source resolution failed at construction, or the processor is
    /// permanently poisoned by an earlier resolution failure.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token is not a well-formed compact JWT.
    #[error("malformed token: {0}")]
    Parse(String),

    /// Header `alg` differs from the configured algorithm. Checked before
    /// any key lookup; treat as a security event rather than a bug.
    #[error("algorithm mismatch: token declares {found:?}, expected {expected}")]
    AlgorithmMismatch {
        /// Name of the configured algorithm.
        expected: &'static str,
        /// Raw `alg` value the token declared.
        found: String,
    },

    /// No candidate key survived algorithm and key-id filtering.
    #[error("no key matches the token's algorithm and key id")]
    NoMatchingKey,

    /// Remote key-set fetch failed, timed out, or returned a malformed
    /// document. Transient: the caller may retry later.
    #[error("key resolution failed: {0}")]
    KeyResolution(String),

    /// Every candidate key failed signature verification.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// The `exp` claim is in the past (beyond the configured leeway).
    #[error("token has expired")]
    Expired,

    /// The `nbf` claim is in the future (beyond the configured leeway).
    #[error("token not yet valid")]
    NotYetValid,
}

impl JwtError {
    /// Whether retrying the same token later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, JwtError::KeyResolution(_))
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        JwtError::Configuration(msg.into())
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        JwtError::Parse(msg.into())
    }

    pub(crate) fn key_resolution(msg: impl Into<String>) -> Self {
        JwtError::KeyResolution(msg.into())
    }
}
