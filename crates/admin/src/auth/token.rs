//! Signed session token codec.
//!
//! The wire token is `base64(payload_json + "." + hex_hmac_signature)`,
//! where the signature is HMAC-SHA256 over the exact payload bytes with
//! the server's session secret. The payload is JSON, so it can contain
//! literal `.` characters; decoding splits on the **last** `.` to find the
//! payload/signature boundary.
//!
//! A token is trusted only after the recomputed signature matches the
//! embedded one and the expiry is in the future. Every failure mode is a
//! [`TokenError`]; callers outside this module collapse them all to
//! "no session" so probing clients cannot learn why a token was rejected.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use yourchurch_core::{AdminIdentity, Email};

use super::constant_time_compare;

/// A decoded, verified session token.
///
/// Field names follow the wire format of the original deployment
/// (camelCase JSON, epoch-millisecond expiry), so freshly issued cookies
/// stay interchangeable with ones minted before the rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub display_name: String,
    /// Whether the session has admin privileges. Always true once issued.
    pub is_admin: bool,
    /// When the session expires.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// The identity this session was issued for.
    #[must_use]
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            email: self.email.clone(),
            name: self.display_name.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Why a token failed to decode.
///
/// Internal diagnostics only: these reasons are logged at debug level for
/// operators but never surfaced to clients, which see a uniform
/// "no session".
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Not valid URL-encoding, base64, or UTF-8.
    #[error("token is not a valid encoding")]
    InvalidEncoding,
    /// No `.` separator, or an empty payload/signature part.
    #[error("token is missing a payload or signature")]
    MissingSignature,
    /// The recomputed signature does not match the embedded one.
    #[error("token signature mismatch")]
    SignatureMismatch,
    /// The payload is not the expected JSON shape.
    #[error("token payload is malformed")]
    Malformed,
    /// The token's expiry is at or before the current time.
    #[error("token is expired")]
    Expired,
}

/// Encodes and decodes wire tokens with a fixed server secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: SecretString,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec signing with the given secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Encode an identity and expiry into a wire token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] if the payload cannot be
    /// serialized, which indicates a bug rather than bad input.
    pub fn encode(
        &self,
        identity: &AdminIdentity,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let token = SessionToken {
            email: identity.email.clone(),
            display_name: identity.name.clone(),
            is_admin: identity.is_admin,
            expires_at,
        };

        let payload = serde_json::to_string(&token).map_err(|_| TokenError::Malformed)?;
        let signature = self.sign(payload.as_bytes())?;

        Ok(BASE64.encode(format!("{payload}.{signature}")))
    }

    /// Decode and verify a wire token.
    ///
    /// Accepts the raw cookie value as received, which may still be
    /// URL-encoded.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing the first check that failed.
    /// Never panics, regardless of input.
    pub fn decode(&self, wire_token: &str) -> Result<SessionToken, TokenError> {
        let unescaped =
            urlencoding::decode(wire_token).map_err(|_| TokenError::InvalidEncoding)?;

        let decoded = BASE64
            .decode(unescaped.as_bytes())
            .map_err(|_| TokenError::InvalidEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| TokenError::InvalidEncoding)?;

        // The payload is JSON and may contain dots; the signature never
        // does, so the last dot is the boundary.
        let (payload, signature) = decoded
            .rsplit_once('.')
            .ok_or(TokenError::MissingSignature)?;
        if payload.is_empty() || signature.is_empty() {
            return Err(TokenError::MissingSignature);
        }

        let expected = self.sign(payload.as_bytes())?;
        if !constant_time_compare(expected.as_bytes(), signature.as_bytes()) {
            return Err(TokenError::SignatureMismatch);
        }

        let token: SessionToken =
            serde_json::from_str(payload).map_err(|_| TokenError::Malformed)?;

        if token.expires_at <= Utc::now() {
            return Err(TokenError::Expired);
        }

        Ok(token)
    }

    /// Hex-encoded HMAC-SHA256 of the payload bytes.
    ///
    /// HMAC accepts keys of any length, so the error arm is unreachable in
    /// practice; it is mapped rather than unwrapped to keep this path
    /// panic-free.
    fn sign(&self, payload: &[u8]) -> Result<String, TokenError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(SecretString::from("kJ8#mN2$pQ5&rT9!vW3@xZ6^aB1*cD4%"))
    }

    fn identity() -> AdminIdentity {
        AdminIdentity::new(
            Email::parse("admin@yourchurch.com").unwrap(),
            "Admin".to_string(),
        )
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let expires_at = Utc::now() + Duration::days(7);
        let wire = codec.encode(&identity(), expires_at).unwrap();

        let token = codec.decode(&wire).unwrap();
        assert_eq!(token.email.as_str(), "admin@yourchurch.com");
        assert_eq!(token.display_name, "Admin");
        assert!(token.is_admin);
        // Millisecond precision on the wire
        assert_eq!(
            token.expires_at.timestamp_millis(),
            expires_at.timestamp_millis()
        );
    }

    #[test]
    fn test_decoded_token_restores_the_identity() {
        let codec = codec();
        let wire = codec
            .encode(&identity(), Utc::now() + Duration::days(7))
            .unwrap();

        let token = codec.decode(&wire).unwrap();
        assert_eq!(token.identity(), identity());
    }

    #[test]
    fn test_payload_dots_do_not_break_the_boundary() {
        // Email and display name both contain dots; only the last dot in
        // the decoded string separates payload from signature.
        let codec = codec();
        let identity = AdminIdentity::new(
            Email::parse("mary.jones@yourchurch.com").unwrap(),
            "Mary B. Jones".to_string(),
        );
        let wire = codec
            .encode(&identity, Utc::now() + Duration::days(1))
            .unwrap();

        let token = codec.decode(&wire).unwrap();
        assert_eq!(token.email.as_str(), "mary.jones@yourchurch.com");
        assert_eq!(token.display_name, "Mary B. Jones");
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec();
        let wire = codec
            .encode(&identity(), Utc::now() + Duration::days(7))
            .unwrap();

        let decoded = String::from_utf8(BASE64.decode(&wire).unwrap()).unwrap();
        // Flip the admin flag in the signed payload
        let tampered = decoded.replace("\"isAdmin\":true", "\"isAdmin\":false");
        assert_ne!(decoded, tampered);
        let tampered_wire = BASE64.encode(tampered);

        assert!(matches!(
            codec.decode(&tampered_wire),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let wire = codec()
            .encode(&identity(), Utc::now() + Duration::days(7))
            .unwrap();

        let other = TokenCodec::new(SecretString::from("qX7!wE2@rT5#yU8$iO1%pA4^sD6&fG9*"));
        assert!(matches!(
            other.decode(&wire),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_expired_token_with_valid_signature_is_rejected() {
        let codec = codec();
        let wire = codec
            .encode(&identity(), Utc::now() - Duration::seconds(1))
            .unwrap();

        assert!(matches!(codec.decode(&wire), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_input_never_panics() {
        let codec = codec();

        assert!(codec.decode("").is_err());
        assert!(codec.decode(".").is_err());
        assert!(codec.decode("not base64 at all!!!").is_err());
        assert!(codec.decode("%ZZ").is_err());
        // Valid base64 of bytes that are not UTF-8
        assert!(codec.decode(&BASE64.encode([0xff, 0xfe, 0x00])).is_err());
        // Valid base64, no separator
        assert!(codec.decode(&BASE64.encode("no separator here")).is_err());
        // Valid base64, empty payload / empty signature
        assert!(codec.decode(&BASE64.encode(".abcdef")).is_err());
        assert!(codec.decode(&BASE64.encode("payload.")).is_err());
    }

    #[test]
    fn test_valid_signature_over_invalid_json_is_malformed() {
        let codec = codec();
        let payload = "not json";
        let signature = codec.sign(payload.as_bytes()).unwrap();
        let wire = BASE64.encode(format!("{payload}.{signature}"));

        assert!(matches!(codec.decode(&wire), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_valid_json_missing_fields_is_malformed() {
        let codec = codec();
        let payload = "{\"email\":\"admin@yourchurch.com\"}";
        let signature = codec.sign(payload.as_bytes()).unwrap();
        let wire = BASE64.encode(format!("{payload}.{signature}"));

        assert!(matches!(codec.decode(&wire), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_url_encoded_cookie_value_decodes() {
        let codec = codec();
        let wire = codec
            .encode(&identity(), Utc::now() + Duration::days(7))
            .unwrap();

        // Cookie values arrive URL-encoded; base64 padding becomes %3D
        let escaped = urlencoding::encode(&wire).into_owned();
        let token = codec.decode(&escaped).unwrap();
        assert_eq!(token.email.as_str(), "admin@yourchurch.com");
    }

    #[test]
    fn test_codec_debug_redacts_secret() {
        let debug_output = format!("{:?}", codec());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kJ8#"));
    }
}
