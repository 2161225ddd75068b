//! Signature verification primitives, one per key family.
//!
//! The registry maps a [`KeyFamily`] to a verifier exposing a single
//! capability: does this signature match this message under this key. A
//! defective key (undecodable material) is treated as a non-match so the
//! remaining candidates still get their turn.

mod ecdsa;
mod hmac;
mod rsa;

use tracing::warn;

use crate::algorithm::{Algorithm, KeyFamily};
use crate::error::{JwtError, JwtResult};
use crate::jwk::Key;

/// One verification capability per algorithm family.
pub(crate) trait SignatureVerifier: Send + Sync {
    /// Whether `signature` is valid for `message` under `key`.
    fn verify(
        &self,
        algorithm: Algorithm,
        message: &[u8],
        signature: &[u8],
        key: &Key,
    ) -> JwtResult<bool>;
}

/// Look up the verifier for a key family.
pub(crate) fn verifier_for(family: KeyFamily) -> &'static dyn SignatureVerifier {
    match family {
        KeyFamily::Hmac => &hmac::HmacVerifier,
        KeyFamily::Rsa => &rsa::RsaVerifier,
        KeyFamily::Ec => &ecdsa::EcdsaVerifier,
    }
}

/// Try each candidate in order; the first success short-circuits. When every
/// candidate fails the outcome is [`JwtError::SignatureInvalid`].
pub(crate) fn verify_any(
    algorithm: Algorithm,
    message: &[u8],
    signature: &[u8],
    candidates: &[&Key],
) -> JwtResult<()> {
    let verifier = verifier_for(algorithm.family());
    for key in candidates {
        match verifier.verify(algorithm, message, signature, key) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => {
                warn!(key_id = ?key.key_id, error = %err, "candidate key unusable, trying next");
            }
        }
    }
    Err(JwtError::SignatureInvalid)
}
