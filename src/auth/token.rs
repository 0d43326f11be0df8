//! Token issuance and verification
//!
//! Signed, time-bound bearer tokens carrying the subject id and email. The
//! signing secret is process-wide state built once from [`Config`] at startup;
//! rotating it invalidates every previously issued token.
//!
//! [`Config`]: crate::config::Config

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Claims embedded in a bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: String,
    /// User email at issuance time
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp, validated on decode)
    pub exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Build a token service from the signing secret and lifetime in days
    pub fn new(secret: &str, expires_in_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(expires_in_days),
        }
    }

    /// Issue a signed token for the given user
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::internal("Failed to issue token")
        })
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// Malformed tokens, bad signatures, and expired tokens all map to the
    /// same 403 so the response does not reveal which check failed.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Token rejected");
                ApiError::forbidden("Invalid or expired token")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_verify_round_trip() {
        let service = TokenService::new(SECRET, 7);
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "a@x.com").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(SECRET, 7);
        let now = Utc::now().timestamp();

        // Expired an hour ago, well past the default decode leeway
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "a@x.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = service.verify(&token).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = TokenService::new("other-secret", 7);
        let verifier = TokenService::new(SECRET, 7);

        let token = issuer.issue(Uuid::new_v4(), "a@x.com").unwrap();
        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new(SECRET, 7);
        assert!(service.verify("not-a-valid-token").is_err());
        assert!(service.verify("").is_err());
    }
}
