//! Compact signed token codec (HS256 JWT wire format)
//!
//! A token is `header.payload.signature`, each segment URL-safe base64 without
//! padding. The signature is HMAC-SHA256 over `header.payload`. Tokens produced
//! here verify with any conformant JWT library and vice versa.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

use crate::auth::models::Claims;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    SignatureMismatch,
}

/// Shared HMAC secret. Rotating it invalidates every issued token.
#[derive(Clone)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: Option<String>,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

fn mac_for(key: &SecretKey, signing_input: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(signing_input.as_bytes());
    mac
}

/// Strip `=` padding and decode a URL-safe base64 segment
fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| TokenError::Malformed(format!("{} is not base64url: {}", what, e)))
}

/// Encode claims into a signed token
pub fn encode(claims: &Claims, key: &SecretKey) -> String {
    let header_json = serde_json::to_vec(&Header::hs256()).expect("serialize header");
    let payload_json = serde_json::to_vec(claims).expect("serialize claims");

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(payload_json)
    );
    let signature = mac_for(key, &signing_input).finalize().into_bytes();

    format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token's signature and decode its claims.
///
/// Expiry is not checked here; see [`crate::auth::gate`].
pub fn decode(token: &str, key: &SecretKey) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let &[header_b64, payload_b64, signature_b64] = segments.as_slice() else {
        return Err(TokenError::Malformed(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    };

    let signature = decode_segment(signature_b64, "signature")?;
    mac_for(key, &format!("{}.{}", header_b64, payload_b64))
        .verify_slice(&signature)
        .map_err(|_| TokenError::SignatureMismatch)?;

    let header: Header = serde_json::from_slice(&decode_segment(header_b64, "header")?)
        .map_err(|e| TokenError::Malformed(format!("header is not valid JSON: {}", e)))?;
    if header.alg != ALGORITHM {
        return Err(TokenError::Malformed(format!(
            "unsupported algorithm {}",
            header.alg
        )));
    }

    serde_json::from_slice(&decode_segment(payload_b64, "payload")?)
        .map_err(|e| TokenError::Malformed(format!("payload is not a claim set: {}", e)))
}

/// A codec bound to one secret key
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SecretKey,
}

impl TokenCodec {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    pub fn encode(&self, claims: &Claims) -> String {
        encode(claims, &self.key)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode(token, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Timestamp;
    use serde_json::Value;

    fn key() -> SecretKey {
        SecretKey::from("mysecret")
    }

    fn sample_claims() -> Claims {
        let mut claims = Claims::new("alice", "teacher", 1_700_003_600);
        claims.name = Some("Alice Smith".to_string());
        claims.group = Some("PI-21".to_string());
        claims
    }

    /// Replace the character at `idx` with a different base64url character
    fn flip_char(token: &str, idx: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_encode_and_decode() {
        let claims = sample_claims();
        let token = encode(&claims, &key());
        assert_eq!(decode(&token, &key()), Ok(claims));
    }

    #[test]
    fn test_token_has_three_unpadded_segments() {
        let token = encode(&sample_claims(), &key());
        assert_eq!(token.split('.').count(), 3);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_fixed_header() {
        let token = encode(&sample_claims(), &key());
        let header_b64 = token.split('.').next().unwrap();
        let header: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_b64).unwrap()).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_fractional_expiry_round_trips() {
        let mut claims = Claims::new("bob", "student", 0);
        claims.exp = Timestamp::Fractional(1_700_000_000.25);
        let token = encode(&claims, &key());
        assert_eq!(decode(&token, &key()), Ok(claims));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = encode(&sample_claims(), &key());
        let payload_start = token.find('.').unwrap() + 1;
        let payload_end = token.rfind('.').unwrap();
        for idx in payload_start..payload_end {
            let tampered = flip_char(&token, idx);
            assert!(decode(&tampered, &key()).is_err(), "flip at {} accepted", idx);
        }
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = encode(&sample_claims(), &key());
        let signature_start = token.rfind('.').unwrap() + 1;
        for idx in signature_start..token.len() {
            let tampered = flip_char(&token, idx);
            assert!(decode(&tampered, &key()).is_err(), "flip at {} accepted", idx);
        }
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = encode(&sample_claims(), &key());
        let result = decode(&token, &SecretKey::from("othersecret"));
        assert_eq!(result, Err(TokenError::SignatureMismatch));
    }

    #[test]
    fn test_wrong_segment_count() {
        assert!(matches!(decode("a.b", &key()), Err(TokenError::Malformed(_))));
        assert!(matches!(decode("a.b.c.d", &key()), Err(TokenError::Malformed(_))));
        assert!(matches!(decode("", &key()), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_bad_base64_in_signature() {
        assert!(matches!(
            decode("abc.def.!!!", &key()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload_b64 = URL_SAFE_NO_PAD.encode(b"not json");
        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let signature = mac_for(&key(), &signing_input).finalize().into_bytes();
        let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature));

        assert!(matches!(decode(&token, &key()), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_signed_token_with_other_algorithm_is_malformed() {
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&sample_claims()).unwrap());
        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let signature = mac_for(&key(), &signing_input).finalize().into_bytes();
        let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature));

        assert!(matches!(decode(&token, &key()), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_padding_tolerated_on_input() {
        let token = encode(&sample_claims(), &key());
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        // 32-byte digest encodes to 43 chars, one pad char short of a quad
        parts[2].push('=');
        let padded = parts.join(".");
        assert_eq!(decode(&padded, &key()), Ok(sample_claims()));
    }

    #[test]
    fn test_codec_uses_bound_key() {
        let codec = TokenCodec::new(key());
        let token = codec.encode(&sample_claims());
        assert_eq!(codec.decode(&token), Ok(sample_claims()));
        assert!(TokenCodec::new(SecretKey::from("x")).decode(&token).is_err());
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        assert_eq!(format!("{:?}", key()), "SecretKey([REDACTED])");
    }
}
