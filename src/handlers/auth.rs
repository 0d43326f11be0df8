//! Signup and login handlers
//!
//! Both endpoints validate the request shape before any store access, and both
//! end by issuing a bearer token for the resolved user.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{hash_password, verify_password};
use crate::db::{self, NewUser, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{
    check_email, check_length, check_range, FieldErrors, AGE_MAX_EXCLUSIVE, AGE_MIN_EXCLUSIVE,
    NAME_MAX, PASSWORD_MAX, PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN,
};

/// Login failures are response-indistinguishable: an unknown email and a wrong
/// password must produce byte-identical bodies, so no user enumeration signal
/// leaks.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Request body for signup
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
    #[schema(example = "A")]
    pub first_name: String,
    #[schema(example = "B")]
    pub last_name: String,
    #[schema(example = 30)]
    pub age: i32,
}

/// Request body for login
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "a@x.com")]
    pub email: String,
    pub password: String,
}

/// Response for successful signup or login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

fn validate_signup(req: &SignupRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    check_length(&mut errors, "username", &req.username, USERNAME_MIN, USERNAME_MAX);
    check_email(&mut errors, "email", &req.email);
    check_length(&mut errors, "password", &req.password, PASSWORD_MIN, PASSWORD_MAX);
    check_length(&mut errors, "firstName", &req.first_name, 1, NAME_MAX);
    check_length(&mut errors, "lastName", &req.last_name, 1, NAME_MAX);
    check_range(
        &mut errors,
        "age",
        req.age,
        AGE_MIN_EXCLUSIVE + 1,
        AGE_MAX_EXCLUSIVE - 1,
    );
    errors.into_result()
}

fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", &req.email);
    if req.password.is_empty() {
        errors.push("password", "password is required");
    }
    errors.into_result()
}

/// Register a new user
///
/// Validates the input, rejects colliding email/username, hashes the password,
/// inserts the user, and returns a bearer token. The store's unique indexes
/// backstop the collision check under concurrent signups.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email or username already taken"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_signup(&request)?;

    let users = state
        .users
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let existing = users
        .find_by_email_or_username(&request.email, &request.username)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict(
            "User already exists with this email or username",
        ));
    }

    let password_hash = hash_password(&request.password)?;

    let user = users
        .create(NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            age: request.age,
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await
        .map_err(|e| {
            // A concurrent signup can slip between the check and the insert;
            // the unique index turns that race into a conflict, not a 500.
            if db::is_unique_violation(&e) {
                ApiError::conflict("User already exists with this email or username")
            } else if db::is_check_violation(&e) {
                // The store's age CHECK backstops input validation
                ApiError::bad_request("Invalid user data")
            } else {
                ApiError::from(e)
            }
        })?;

    let token = state.tokens.issue(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

/// Log in with email and password
///
/// Looks the user up by email only; username is not accepted for login.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid email or password"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate_login(&request)?;

    let users = state
        .users
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id, &user.email)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserSummary::from(&user),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_validate_signup_accepts_valid_input() {
        assert!(validate_signup(&valid_signup()).is_ok());
    }

    #[test]
    fn test_validate_signup_age_bounds() {
        let mut req = valid_signup();
        req.age = 12;
        assert!(validate_signup(&req).is_err());
        req.age = 13;
        assert!(validate_signup(&req).is_ok());
        req.age = 110;
        assert!(validate_signup(&req).is_err());
        req.age = 109;
        assert!(validate_signup(&req).is_ok());
    }

    #[test]
    fn test_validate_signup_reports_every_bad_field() {
        let req = SignupRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            first_name: "".to_string(),
            last_name: "".to_string(),
            age: 5,
        };

        match validate_signup(&req).unwrap_err() {
            ApiError::Validation(details) => assert_eq!(details.len(), 6),
            other => panic!("Expected Validation, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login(&LoginRequest {
            email: "a@x.com".to_string(),
            password: "anything".to_string(),
        })
        .is_ok());

        assert!(validate_login(&LoginRequest {
            email: "nope".to_string(),
            password: "anything".to_string(),
        })
        .is_err());

        assert!(validate_login(&LoginRequest {
            email: "a@x.com".to_string(),
            password: "".to_string(),
        })
        .is_err());
    }
}
