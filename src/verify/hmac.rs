//! HMAC-SHA verification (HS256/HS384/HS512).

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::SignatureVerifier;
use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::jwk::Key;

pub(crate) struct HmacVerifier;

impl SignatureVerifier for HmacVerifier {
    fn verify(
        &self,
        algorithm: Algorithm,
        message: &[u8],
        signature: &[u8],
        key: &Key,
    ) -> JwtResult<bool> {
        let expected = match algorithm {
            Algorithm::HS256 => tag::<Hmac<Sha256>>(message, key.material())?,
            Algorithm::HS384 => tag::<Hmac<Sha384>>(message, key.material())?,
            Algorithm::HS512 => tag::<Hmac<Sha512>>(message, key.material())?,
            _ => return Ok(false),
        };
        // Constant-time compare over the signature bytes.
        Ok(expected.ct_eq(signature).into())
    }
}

fn tag<M: Mac + hmac::digest::KeyInit>(message: &[u8], secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| JwtError::key_resolution("HMAC key rejected by the primitive"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::KeyFamily;

    #[test]
    fn recomputed_tag_matches() {
        let key = Key::new(None, KeyFamily::Hmac, b"secret".to_vec());
        let mut mac = Hmac::<Sha512>::new_from_slice(b"secret").unwrap();
        mac.update(b"msg");
        let sig = mac.finalize().into_bytes().to_vec();

        assert!(HmacVerifier
            .verify(Algorithm::HS512, b"msg", &sig, &key)
            .unwrap());
        assert!(!HmacVerifier
            .verify(Algorithm::HS512, b"other", &sig, &key)
            .unwrap());
        // same secret, different digest width
        assert!(!HmacVerifier
            .verify(Algorithm::HS256, b"msg", &sig, &key)
            .unwrap());
    }
}
