//! Resumption token encoding.
//!
//! A token is the cursor serialized to canonical JSON, integrity-protected
//! with HMAC-SHA256 under a server-held key, and wrapped in URL-safe
//! unpadded base64 as `payload.tag`. The contents are not confidential
//! (they mirror the original request parameters), but tamper-evidence is
//! mandatory: a harvester must not be able to forge a cursor claiming a
//! different format or an earlier `issued_at` to dodge expiry.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use gleaner_core::{Cursor, Error, InvalidInputError, Result};

type HmacSha256 = Hmac<Sha256>;

/// A symmetric token-signing key.
///
/// # Security
///
/// Never logged or displayed in Debug output.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Create a key from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Hide key material in Debug output
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

/// The server's signing keys, loaded once at process start.
///
/// During a rotation window tokens signed with the previous key still
/// verify, so in-flight harvests survive the rotation; tokens older than
/// the grace window die on the expiry check regardless.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    current: SigningKey,
    previous: Option<SigningKey>,
}

impl SigningKeys {
    /// A key set with no rotation predecessor.
    pub fn new(current: SigningKey) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    /// A key set mid-rotation: signs with `current`, verifies against
    /// `current` then `previous`.
    pub fn with_previous(current: SigningKey, previous: SigningKey) -> Self {
        Self {
            current,
            previous: Some(previous),
        }
    }

    fn verification_keys(&self) -> impl Iterator<Item = &SigningKey> {
        std::iter::once(&self.current).chain(self.previous.as_ref())
    }
}

/// Encodes cursors into opaque tokens and back.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: SigningKeys,
}

impl TokenCodec {
    /// Create a codec over the given key set.
    pub fn new(keys: SigningKeys) -> Self {
        Self { keys }
    }

    /// Encode a cursor into an opaque, URL-safe token string.
    pub fn encode(&self, cursor: &Cursor) -> Result<String> {
        let payload = serde_json::to_vec(cursor).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("cursor serialization failed: {}", e),
            })
        })?;
        let tag = sign(&self.keys.current, &payload);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Decode and validate a token back into a cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadResumptionToken`] for every failure mode:
    /// malformed encoding, integrity-tag mismatch, and expiry are
    /// deliberately indistinguishable to the caller.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Cursor> {
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(Error::BadResumptionToken)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| Error::BadResumptionToken)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| Error::BadResumptionToken)?;

        if !self.verify(&payload, &tag) {
            return Err(Error::BadResumptionToken);
        }

        let cursor: Cursor =
            serde_json::from_slice(&payload).map_err(|_| Error::BadResumptionToken)?;

        if cursor.is_expired(now) {
            return Err(Error::BadResumptionToken);
        }

        Ok(cursor)
    }

    fn verify(&self, payload: &[u8], tag: &[u8]) -> bool {
        self.keys.verification_keys().any(|key| {
            let Ok(mut mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
                return false;
            };
            mac.update(payload);
            // Constant-time comparison.
            mac.verify_slice(tag).is_ok()
        })
    }
}

fn sign(key: &SigningKey, payload: &[u8]) -> Vec<u8> {
    let Ok(mut mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
        // HMAC accepts keys of any length; new_from_slice cannot fail.
        return Vec::new();
    };
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gleaner_core::{Granularity, MetadataPrefix, RecordId, SetSpec, Watermark};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(SigningKeys::new(SigningKey::new(b"test key".to_vec())))
    }

    fn cursor() -> Cursor {
        Cursor::first_page(
            MetadataPrefix::new("oai_dc").unwrap(),
            Some(SetSpec::new("inst:college").unwrap()),
            Some(ts("2024-01-01T00:00:00Z")),
            Some(ts("2024-12-31T23:59:59Z")),
            Granularity::Second,
            25,
            ts("2024-06-01T00:00:00Z"),
            Duration::hours(24),
        )
    }

    #[test]
    fn round_trip() {
        let codec = codec();
        let original = cursor();
        let token = codec.encode(&original).unwrap();
        let decoded = codec.decode(&token, ts("2024-06-01T01:00:00Z")).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn round_trip_with_watermark() {
        let codec = codec();
        let wm = Watermark::new(ts("2024-03-01T00:00:00Z"), RecordId::new("rec-9").unwrap());
        let successor = cursor().derive_successor(wm.clone(), ts("2024-06-01T02:00:00Z"));
        let token = codec.encode(&successor).unwrap();
        let decoded = codec.decode(&token, ts("2024-06-01T03:00:00Z")).unwrap();
        assert_eq!(decoded.watermark(), Some(&wm));
    }

    #[test]
    fn token_is_url_safe() {
        let token = codec().encode(&cursor()).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
        );
    }

    #[test]
    fn any_single_byte_mutation_is_rejected() {
        let codec = codec();
        let token = codec.encode(&cursor()).unwrap();
        let now = ts("2024-06-01T01:00:00Z");

        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            let mut mutated = bytes.to_vec();
            mutated[i] ^= 0x01;
            let Ok(mutated) = String::from_utf8(mutated) else {
                continue;
            };
            if mutated == token {
                continue;
            }
            assert!(
                matches!(
                    codec.decode(&mutated, now),
                    Err(Error::BadResumptionToken)
                ),
                "mutation at byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let codec = codec();
        let now = ts("2024-06-01T00:00:00Z");
        for garbage in ["", "no-dot-here", "a.b.c", "!!!.???", "Zm9v."] {
            assert!(matches!(
                codec.decode(garbage, now),
                Err(Error::BadResumptionToken)
            ));
        }
    }

    #[test]
    fn expired_token_is_rejected_despite_valid_tag() {
        let codec = codec();
        let token = codec.encode(&cursor()).unwrap();
        // Just past issued_at + 24h.
        let err = codec.decode(&token, ts("2024-06-02T00:00:01Z")).unwrap_err();
        assert!(matches!(err, Error::BadResumptionToken));
    }

    #[test]
    fn previous_key_verifies_during_rotation() {
        let old = SigningKey::new(b"old key".to_vec());
        let new = SigningKey::new(b"new key".to_vec());

        let old_codec = TokenCodec::new(SigningKeys::new(old.clone()));
        let token = old_codec.encode(&cursor()).unwrap();
        let now = ts("2024-06-01T01:00:00Z");

        let rotated = TokenCodec::new(SigningKeys::with_previous(new.clone(), old));
        assert!(rotated.decode(&token, now).is_ok());

        let rotated_out = TokenCodec::new(SigningKeys::new(new));
        assert!(matches!(
            rotated_out.decode(&token, now),
            Err(Error::BadResumptionToken)
        ));
    }

    #[test]
    fn key_material_is_redacted_in_debug() {
        let key = SigningKey::new(b"super secret".to_vec());
        let debug = format!("{:?}", key);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
