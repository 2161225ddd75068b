//! ECDSA verification (ES256 on P-256, ES384 on P-384).
//!
//! JWS carries ECDSA signatures as the raw fixed-width `r || s`
//! concatenation, not DER.

use p256::ecdsa::signature::Verifier as _;

use super::SignatureVerifier;
use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::jwk::Key;

pub(crate) struct EcdsaVerifier;

impl SignatureVerifier for EcdsaVerifier {
    fn verify(
        &self,
        algorithm: Algorithm,
        message: &[u8],
        signature: &[u8],
        key: &Key,
    ) -> JwtResult<bool> {
        match algorithm {
            Algorithm::ES256 => {
                let verifying = p256::ecdsa::VerifyingKey::from_sec1_bytes(key.material())
                    .map_err(|err| {
                        JwtError::key_resolution(format!("invalid P-256 public key: {err}"))
                    })?;
                let signature = match p256::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(verifying.verify(message, &signature).is_ok())
            }
            Algorithm::ES384 => {
                let verifying = p384::ecdsa::VerifyingKey::from_sec1_bytes(key.material())
                    .map_err(|err| {
                        JwtError::key_resolution(format!("invalid P-384 public key: {err}"))
                    })?;
                let signature = match p384::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(verifying.verify(message, &signature).is_ok())
            }
            _ => Ok(false),
        }
    }
}
