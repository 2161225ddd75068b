//! Compact-serialization (JWS) token parsing.
//!
//! Splits `header.payload.signature`, base64url-decodes each segment, and
//! parses the header JSON. The payload is left as raw bytes: it is only
//! interpreted as JSON after the signature has been verified.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::{JwtError, JwtResult};

/// Base64 URL-safe encoding without padding (RFC 7515).
#[cfg(test)]
pub(crate) fn b64_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515).
pub(crate) fn b64_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// Decoded JOSE header. Fields other than `alg` and `kid` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Header {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
}

/// A structurally valid compact token, not yet verified.
#[derive(Debug)]
pub(crate) struct ParsedToken<'a> {
    pub header: Header,
    /// The `header.payload` substring the signature covers.
    pub signing_input: &'a str,
    /// Decoded payload bytes; parsed as JSON only after verification.
    pub payload: Vec<u8>,
    /// Decoded signature bytes.
    pub signature: Vec<u8>,
}

/// Split and decode a compact JWT. Any structural defect maps to
/// [`JwtError::Parse`].
pub(crate) fn parse_compact(token: &str) -> JwtResult<ParsedToken<'_>> {
    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => {
            return Err(JwtError::parse(
                "expected three dot-separated base64url segments",
            ))
        }
    };

    let header_bytes =
        b64_decode(header_b64).map_err(|_| JwtError::parse("header is not valid base64url"))?;
    let payload =
        b64_decode(payload_b64).map_err(|_| JwtError::parse("payload is not valid base64url"))?;
    let signature = b64_decode(signature_b64)
        .map_err(|_| JwtError::parse("signature is not valid base64url"))?;

    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|_| JwtError::parse("header is not a valid JOSE JSON object"))?;

    Ok(ParsedToken {
        header,
        signing_input: &token[..header_b64.len() + 1 + payload_b64.len()],
        payload,
        signature,
    })
}
