//! RSASSA-PKCS1-v1_5 verification (RS256/RS384/RS512).

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;

use super::SignatureVerifier;
use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::jwk::Key;

pub(crate) struct RsaVerifier;

impl SignatureVerifier for RsaVerifier {
    fn verify(
        &self,
        algorithm: Algorithm,
        message: &[u8],
        signature: &[u8],
        key: &Key,
    ) -> JwtResult<bool> {
        let public = RsaPublicKey::from_public_key_der(key.material())
            .map_err(|err| JwtError::key_resolution(format!("invalid RSA public key: {err}")))?;
        let signature = match Signature::try_from(signature) {
            Ok(signature) => signature,
            // wrong length for this modulus; a mismatch, not a failure
            Err(_) => return Ok(false),
        };
        let ok = match algorithm {
            Algorithm::RS256 => VerifyingKey::<Sha256>::new(public)
                .verify(message, &signature)
                .is_ok(),
            Algorithm::RS384 => VerifyingKey::<Sha384>::new(public)
                .verify(message, &signature)
                .is_ok(),
            Algorithm::RS512 => VerifyingKey::<Sha512>::new(public)
                .verify(message, &signature)
                .is_ok(),
            _ => false,
        };
        Ok(ok)
    }
}
