//! Authentication module
//!
//! Provides the [`CurrentUser`] extractor for Axum handlers: bearer token
//! extraction, verification against the process-wide signing secret, and a
//! fresh user lookup so a token never outlives its account.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::db::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Extract the Bearer token from the Authorization header.
///
/// A missing header or a non-bearer scheme is a 401; an invalid token is the
/// verifier's 403. The split matters: clients distinguish "send credentials"
/// from "your credentials were rejected".
fn extract_bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authentication token required"))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Authentication token required"))?;

    auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authentication token required"))
}

/// Authenticated user extractor that verifies the bearer token and resolves
/// the user from the database.
///
/// The extractor:
/// 1. Reads `Authorization: Bearer <token>` (401 when absent or not bearer)
/// 2. Verifies signature and expiry (403 on failure)
/// 3. Re-fetches the user by the token's subject id (403 when the account no
///    longer exists — the token outlived its user)
///
/// Re-fetching on every request trades a store round trip for correctness
/// under account deletion, rather than trusting stale token claims.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;

        let claims = state.tokens.verify(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::forbidden("Invalid or expired token"))?;

        let users = state
            .users
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

        let user = users
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to resolve user for token subject");
                ApiError::internal("A database error occurred")
            })?
            .ok_or_else(|| ApiError::forbidden("Invalid or expired token"))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let (parts, _) = axum::http::Request::builder()
            .body(())
            .unwrap()
            .into_parts();

        let err = extract_bearer_token(&parts).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts();

        let err = extract_bearer_token(&parts).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer_token_success() {
        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Bearer my-jwt-token")
            .body(())
            .unwrap()
            .into_parts();

        let token = extract_bearer_token(&parts).unwrap();
        assert_eq!(token, "my-jwt-token");
    }
}
