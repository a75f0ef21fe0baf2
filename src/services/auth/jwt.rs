//! HS256 access-token codec.
//!
//! - Tokens carry `{sub, iat, exp}`; `sub` is the user name.
//! - `subject` verifies the signature but leaves expiry to `is_expired`, so the
//!   interceptor can tell "expired" apart from "invalid" in its logs.
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    // Bad signature, wrong algorithm, malformed structure, missing claims
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtCodec {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is compared in `is_expired_at` against an explicit clock (no leeway)
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn encode(&self, user_name: &str) -> Result<String, TokenError> {
        self.encode_at(user_name, Utc::now().timestamp())
    }

    /// Issue a token as if the clock read `issued_at` (UNIX seconds).
    pub fn encode_at(&self, user_name: &str, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_name.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX)),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign JWT");
            TokenError::Sign(e)
        })
    }

    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now().timestamp())
    }

    /// True when `now >= exp`, or when the token does not verify at all.
    pub fn is_expired_at(&self, token: &str, now: i64) -> bool {
        match self.decode(token) {
            Ok(claims) => now >= claims.exp,
            Err(_) => true,
        }
    }

    pub fn subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;
        Ok(data.claims)
    }
}
