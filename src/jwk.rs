//! JSON Web Key (RFC 7517) documents and the verification keys loaded
//! from them.
//!
//! A [`JwkSet`] is the wire/file representation; [`Key`] is what the rest of
//! the crate works with: an optional key id, a key family, and opaque public
//! material (raw secret bytes for HMAC, SPKI DER for RSA, an uncompressed
//! SEC1 point for EC).

use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroize;

use crate::algorithm::KeyFamily;
use crate::token::b64_decode;

/// A verification key. Immutable once loaded; HMAC secret material is
/// zeroized on drop.
#[derive(Clone)]
pub struct Key {
    /// Key id (`kid`) this key was published under, if any.
    pub key_id: Option<String>,
    /// Family of algorithms this key verifies.
    pub family: KeyFamily,
    material: Vec<u8>,
}

impl Key {
    /// Build a key from already-decoded public material.
    #[must_use]
    pub fn new(key_id: Option<String>, family: KeyFamily, material: Vec<u8>) -> Self {
        Self {
            key_id,
            family,
            material,
        }
    }

    /// The opaque verification material. Interpretation depends on
    /// [`Key::family`].
    #[must_use]
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        // Only HMAC material is secret; public keys need no scrubbing.
        if self.family == KeyFamily::Hmac {
            self.material.zeroize();
        }
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("key_id", &self.key_id)
            .field("family", &self.family)
            .field("material_len", &self.material.len())
            .finish()
    }
}

/// A single JWK entry. Flat representation: the populated parameter fields
/// depend on `kty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type: `oct`, `RSA`, or `EC`.
    pub kty: String,
    /// Key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended algorithm, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Intended use (`sig`/`enc`), informational.
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    /// Symmetric secret (base64url), `oct` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    /// RSA modulus (base64url big-endian).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent (base64url big-endian).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// EC curve name (`P-256`/`P-384`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC x coordinate (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// EC y coordinate (base64url).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// A JWK Set document: `{"keys": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    /// Keys in document order. Duplicate `(kid, kty)` pairs are legal.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Decode every supported entry into a [`Key`], preserving document
    /// order. Entries with an unsupported `kty` are skipped with a warning;
    /// a supported entry with defective parameters fails the whole set,
    /// since serving a partially loaded key set would make verification
    /// outcomes depend on which half parsed.
    pub(crate) fn into_keys(self) -> Result<Vec<Key>, String> {
        let mut keys = Vec::with_capacity(self.keys.len());
        for jwk in &self.keys {
            match jwk.decode()? {
                Some(key) => keys.push(key),
                None => warn!(kty = %jwk.kty, "skipping JWK with unsupported kty"),
            }
        }
        Ok(keys)
    }
}

impl Jwk {
    fn decode(&self) -> Result<Option<Key>, String> {
        let kid = self.kid.clone();
        match self.kty.as_str() {
            "oct" => {
                let k = self.k.as_deref().ok_or("oct key missing 'k'")?;
                let secret =
                    b64_decode(k).map_err(|_| "oct key 'k' is not valid base64url".to_string())?;
                Ok(Some(Key::new(kid, KeyFamily::Hmac, secret)))
            }
            "RSA" => {
                let n = decode_param(self.n.as_deref(), "n")?;
                let e = decode_param(self.e.as_deref(), "e")?;
                Ok(Some(Key::new(kid, KeyFamily::Rsa, rsa_spki_der(&n, &e)?)))
            }
            "EC" => {
                let crv = self.crv.as_deref().ok_or("EC key missing 'crv'")?;
                let coord_len = match crv {
                    "P-256" => 32,
                    "P-384" => 48,
                    other => return Err(format!("unsupported EC curve {other:?}")),
                };
                let x = decode_param(self.x.as_deref(), "x")?;
                let y = decode_param(self.y.as_deref(), "y")?;
                if x.len() != coord_len || y.len() != coord_len {
                    return Err(format!("EC coordinates must be {coord_len} bytes for {crv}"));
                }
                // Uncompressed SEC1 point: 0x04 || x || y.
                let mut point = Vec::with_capacity(1 + 2 * coord_len);
                point.push(0x04);
                point.extend_from_slice(&x);
                point.extend_from_slice(&y);
                Ok(Some(Key::new(kid, KeyFamily::Ec, point)))
            }
            _ => Ok(None),
        }
    }
}

fn decode_param(value: Option<&str>, name: &str) -> Result<Vec<u8>, String> {
    let value = value.ok_or_else(|| format!("key missing {name:?}"))?;
    b64_decode(value).map_err(|_| format!("key parameter {name:?} is not valid base64url"))
}

/// Rebuild an SPKI DER public key from the JWK's modulus and exponent, the
/// form the RSA verifier consumes.
fn rsa_spki_der(n: &[u8], e: &[u8]) -> Result<Vec<u8>, String> {
    use rsa::pkcs8::EncodePublicKey;

    let public = rsa::RsaPublicKey::new(
        rsa::BigUint::from_bytes_be(n),
        rsa::BigUint::from_bytes_be(e),
    )
    .map_err(|err| format!("invalid RSA key components: {err}"))?;
    public
        .to_public_key_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|err| format!("RSA key encoding failed: {err}"))
}
