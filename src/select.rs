//! Candidate key selection.

use crate::algorithm::Algorithm;
use crate::jwk::Key;

/// Filter a key set down to verification candidates, preserving order.
///
/// A key qualifies when its family supports `algorithm`. When the token
/// header names a `kid`, only keys with exactly that id remain; keys
/// published without an id are excluded once a `kid` is specified.
/// Duplicates are legal and all survive; the verifier tries them in order.
pub(crate) fn select<'a>(keys: &'a [Key], algorithm: Algorithm, kid: Option<&str>) -> Vec<&'a Key> {
    keys.iter()
        .filter(|key| key.family == algorithm.family())
        .filter(|key| match kid {
            None => true,
            Some(kid) => key.key_id.as_deref() == Some(kid),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::KeyFamily;

    fn key(kid: Option<&str>, family: KeyFamily) -> Key {
        Key::new(kid.map(str::to_string), family, vec![0u8; 4])
    }

    #[test]
    fn filters_by_family() {
        let keys = vec![
            key(Some("k1"), KeyFamily::Rsa),
            key(Some("k1"), KeyFamily::Hmac),
        ];
        let selected = select(&keys, Algorithm::RS256, Some("k1"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].family, KeyFamily::Rsa);
    }

    #[test]
    fn kid_excludes_anonymous_keys() {
        let keys = vec![key(None, KeyFamily::Hmac), key(Some("k1"), KeyFamily::Hmac)];
        assert_eq!(select(&keys, Algorithm::HS256, Some("k1")).len(), 1);
        // without a kid, every family-compatible key is a candidate
        assert_eq!(select(&keys, Algorithm::HS256, None).len(), 2);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let keys = vec![
            key(Some("k1"), KeyFamily::Hmac),
            key(Some("k1"), KeyFamily::Hmac),
        ];
        let selected = select(&keys, Algorithm::HS512, Some("k1"));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn unknown_kid_yields_no_candidates() {
        let keys = vec![key(Some("k1"), KeyFamily::Ec)];
        assert!(select(&keys, Algorithm::ES256, Some("k2")).is_empty());
    }
}
