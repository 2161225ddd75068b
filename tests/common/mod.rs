//! Shared helpers: token minting and key-set documents.
#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use std::io::Write as _;

pub fn b64(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

fn b64_decode(data: &str) -> Vec<u8> {
    URL_SAFE_NO_PAD.decode(data).expect("segment decodes")
}

/// Assemble a compact token from a header, payload and signing closure.
pub fn mint(header: &Value, payload: &Value, sign: impl FnOnce(&[u8]) -> Vec<u8>) -> String {
    let signing_input = format!(
        "{}.{}",
        b64(header.to_string().as_bytes()),
        b64(payload.to_string().as_bytes())
    );
    let signature = sign(signing_input.as_bytes());
    format!("{signing_input}.{}", b64(&signature))
}

pub fn hs256_token(secret: &[u8], kid: Option<&str>, payload: &Value) -> String {
    let header = match kid {
        Some(kid) => json!({ "alg": "HS256", "typ": "JWT", "kid": kid }),
        None => json!({ "alg": "HS256", "typ": "JWT" }),
    };
    mint(&header, payload, |input| {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("hmac accepts any key");
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    })
}

pub fn rs256_token(private: &RsaPrivateKey, kid: &str, payload: &Value) -> String {
    let header = json!({ "alg": "RS256", "typ": "JWT", "kid": kid });
    let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new(private.clone());
    mint(&header, payload, |input| {
        signing_key.sign(input).to_bytes().to_vec()
    })
}

pub fn oct_jwk(secret: &[u8], kid: Option<&str>) -> Value {
    match kid {
        Some(kid) => json!({ "kty": "oct", "kid": kid, "k": b64(secret) }),
        None => json!({ "kty": "oct", "k": b64(secret) }),
    }
}

pub fn rsa_jwk(private: &RsaPrivateKey, kid: &str) -> Value {
    use rsa::traits::PublicKeyParts;
    let public = private.to_public_key();
    json!({
        "kty": "RSA",
        "kid": kid,
        "n": b64(&public.n().to_bytes_be()),
        "e": b64(&public.e().to_bytes_be()),
    })
}

pub fn jwks_document(keys: &[Value]) -> String {
    json!({ "keys": keys }).to_string()
}

/// Write a JWK Set document to a temp file; keep the handle alive for the
/// test's duration.
pub fn jwks_file(keys: &[Value]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(jwks_document(keys).as_bytes())
        .expect("write key set");
    file.flush().expect("flush key set");
    file
}

/// Flip one bit inside the decoded bytes of a token segment (0 = header,
/// 1 = payload, 2 = signature) and re-encode it.
pub fn flip_bit_in_segment(token: &str, segment: usize) -> String {
    let mut segments: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut bytes = b64_decode(&segments[segment]);
    bytes[0] ^= 0x01;
    segments[segment] = b64(&bytes);
    segments.join(".")
}

pub fn test_rsa_key() -> RsaPrivateKey {
    RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("rsa keygen")
}
