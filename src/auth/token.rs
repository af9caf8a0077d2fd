// Bearer token issuance and verification

use crate::auth::error::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fixed token header. Serialized byte-for-byte so the signing input is
/// identical across issuance and verification.
const HEADER_JSON: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

/// Claims signed into every bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Id of the user this token authenticates.
    #[serde(rename = "subjectUserId")]
    pub subject_user_id: i64,
    pub email: String,
    /// Absolute expiry as a unix timestamp (seconds). Always issue time
    /// plus the configured lifetime.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Encodes and verifies signed bearer tokens.
///
/// Wire format: `base64url(header) . base64url(claims) . base64url(sig)`
/// where `sig = HMAC-SHA256(secret, first_two_segments)` and base64url uses
/// the URL-safe alphabet with no padding.
///
/// The signing secret and token lifetime are explicit constructor inputs;
/// there is no ambient global and the secret is never logged. Verification
/// is pure computation with no shared state, safe under any concurrency.
pub struct TokenCodec {
    secret: String,
    expiry_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: String, expiry_secs: i64) -> Self {
        Self { secret, expiry_secs }
    }

    /// Issue a signed token for a user, expiring `expiry_secs` from now.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        self.issue_at(Utc::now().timestamp(), user_id, email)
    }

    /// Verify a token end to end: structure, signature, then expiry.
    ///
    /// The signature is checked before the claims are parsed, so no field
    /// of an unauthenticated payload is ever interpreted. Signature
    /// comparison is constant-time via the HMAC verify primitive.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(Utc::now().timestamp(), token)
    }

    /// `issue` against an explicit clock, for expiry tests.
    pub(crate) fn issue_at(
        &self,
        now: i64,
        user_id: i64,
        email: &str,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            subject_user_id: user_id,
            email: email.to_string(),
            expires_at: now + self.expiry_secs,
        };
        let claims_json = serde_json::to_string(&claims)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(claims_json);
        let signing_input = format!("{}.{}", header, payload);

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// `verify` against an explicit clock.
    pub(crate) fn verify_at(&self, now: i64, token: &str) -> Result<TokenClaims, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(AuthError::MalformedToken);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| AuthError::MalformedToken)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;
        mac.update(parts[0].as_bytes());
        mac.update(b".");
        mac.update(parts[1].as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| AuthError::MalformedToken)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedToken)?;

        if claims.expires_at < now {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new("test-secret-key-for-testing".to_string(), 3600)
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let codec = test_codec();
        let token = codec.issue(42, "ada@example.com").unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.subject_user_id, 42);
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn token_has_three_nonempty_segments() {
        let codec = test_codec();
        let token = codec.issue(1, "a@b.com").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn header_segment_is_exact() {
        let codec = test_codec();
        let token = codec.issue(1, "a@b.com").unwrap();
        let header = token.split('.').next().unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(header).unwrap();
        assert_eq!(decoded, br#"{"typ":"JWT","alg":"HS256"}"#);
    }

    #[test]
    fn no_padding_or_standard_alphabet_chars() {
        let codec = test_codec();
        let token = codec.issue(i64::MAX, "padding-probe@example.com").unwrap();
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn expiry_is_issue_time_plus_configured_lifetime() {
        let codec = test_codec();
        let token = codec.issue_at(1_000_000, 7, "a@b.com").unwrap();
        let claims = codec.verify_at(1_000_000, &token).unwrap();
        assert_eq!(claims.expires_at, 1_000_000 + 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = test_codec();
        let token = codec.issue_at(1_000_000, 7, "a@b.com").unwrap();
        // Still valid one second before expiry, rejected one second after.
        assert!(codec.verify_at(1_000_000 + 3599, &token).is_ok());
        assert_eq!(
            codec.verify_at(1_000_000 + 3601, &token),
            Err(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenCodec::new("secret-one".to_string(), 3600);
        let other = TokenCodec::new("secret-two".to_string(), 3600);
        let token = issuer.issue(1, "a@b.com").unwrap();
        assert!(issuer.verify(&token).is_ok());
        assert_eq!(other.verify(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn structurally_invalid_tokens_are_malformed() {
        let codec = test_codec();
        for bad in ["", "only-one-segment", "two.segments", "a.b.c.d", "..", "a..c"] {
            assert_eq!(
                codec.verify(bad),
                Err(AuthError::MalformedToken),
                "expected MalformedToken for {:?}",
                bad
            );
        }
    }

    /// Replace one character of a segment with a different base64url
    /// character, preserving token structure.
    fn tamper(token: &str, segment: usize, pos: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut bytes = parts[segment].clone().into_bytes();
        bytes[pos] = if bytes[pos] == b'A' { b'B' } else { b'A' };
        parts[segment] = String::from_utf8(bytes).unwrap();
        parts.join(".")
    }

    #[test]
    fn tampering_any_segment_never_silently_succeeds() {
        let codec = test_codec();
        let token = codec.issue(42, "ada@example.com").unwrap();
        for segment in 0..3 {
            let tampered = tamper(&token, segment, 3);
            let result = codec.verify(&tampered);
            assert!(
                matches!(
                    result,
                    Err(AuthError::InvalidSignature) | Err(AuthError::MalformedToken)
                ),
                "segment {} tampering returned {:?}",
                segment,
                result
            );
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_identity(
            user_id in 1i64..1_000_000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let codec = test_codec();
            let token = codec.issue(user_id, &email)?;
            let claims = codec.verify(&token)?;
            prop_assert_eq!(claims.subject_user_id, user_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn prop_expiry_offset_matches_configuration(
            now in 0i64..4_000_000_000,
            expiry in 1i64..604_800,
            user_id in 1i64..1_000_000
        ) {
            let codec = TokenCodec::new("prop-secret".to_string(), expiry);
            let token = codec.issue_at(now, user_id, "prop@example.com")?;
            let claims = codec.verify_at(now, &token)?;
            prop_assert_eq!(claims.expires_at, now + expiry);
        }

        #[test]
        fn prop_random_strings_are_rejected(garbage in "[a-zA-Z0-9._-]{1,80}") {
            let codec = test_codec();
            prop_assert!(codec.verify(&garbage).is_err());
        }

        #[test]
        fn prop_tampered_claims_are_rejected(pos in 0usize..20) {
            let codec = test_codec();
            let token = codec.issue(42, "tamper-target@example.com").unwrap();
            let tampered = tamper(&token, 1, pos);
            prop_assert!(matches!(
                codec.verify(&tampered),
                Err(AuthError::InvalidSignature) | Err(AuthError::MalformedToken)
            ));
        }
    }
}
