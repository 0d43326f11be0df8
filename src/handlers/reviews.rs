//! Review update and delete handlers
//!
//! Only the review's owner may mutate it. The check order is fixed:
//! existence (404), then ownership (403), then input shape (400).

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::{Review, ReviewPatch};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{check_length, check_range, FieldErrors};

/// Request body for a partial review update
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    /// Replacement review text
    pub text: Option<String>,
    /// Replacement rating (1 to 5)
    #[schema(example = 4)]
    pub rating: Option<i32>,
}

/// Response for review update
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateReviewResponse {
    pub message: String,
    pub review: Review,
}

/// Response for review deletion
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteReviewResponse {
    pub message: String,
}

fn validate_update_review(req: &UpdateReviewRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if req.text.is_none() && req.rating.is_none() {
        errors.push("text", "Either text or rating must be provided");
    }
    if let Some(text) = &req.text {
        check_length(&mut errors, "text", text, 1, 255);
    }
    if let Some(rating) = req.rating {
        check_range(&mut errors, "rating", rating, 1, 5);
    }
    errors.into_result()
}

/// Update the authenticated user's own review
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{review_id}",
    tag = "Reviews",
    params(
        ("review_id" = String, Path, description = "Review ID (UUID)")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = UpdateReviewResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Not the review's owner"),
        (status = 404, description = "Review not found"),
        (status = 503, description = "Database not available")
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn update_review_handler(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<UpdateReviewResponse>, ApiError> {
    let reviews = state
        .reviews
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let existing = reviews
        .find_by_id(review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if existing.user_id != user.id {
        return Err(ApiError::forbidden("You can only update your own reviews"));
    }

    validate_update_review(&request)?;

    let patch = ReviewPatch {
        rating: request.rating,
        review_text: request.text,
    };

    let review = reviews
        .update(review_id, user.id, &patch)
        .await?
        // Deleted between the ownership check and the update
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(Json(UpdateReviewResponse {
        message: "Review updated successfully".to_string(),
        review,
    }))
}

/// Delete the authenticated user's own review
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{review_id}",
    tag = "Reviews",
    params(
        ("review_id" = String, Path, description = "Review ID (UUID)")
    ),
    responses(
        (status = 200, description = "Review deleted", body = DeleteReviewResponse),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Not the review's owner"),
        (status = 404, description = "Review not found"),
        (status = 503, description = "Database not available")
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn delete_review_handler(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<DeleteReviewResponse>, ApiError> {
    let reviews = state
        .reviews
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let existing = reviews
        .find_by_id(review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    if existing.user_id != user.id {
        return Err(ApiError::forbidden("You can only delete your own reviews"));
    }

    let deleted = reviews.delete(review_id, user.id).await?;
    if !deleted {
        return Err(ApiError::not_found("Review not found"));
    }

    tracing::info!(review_id = %review_id, "Review deleted");

    Ok(Json(DeleteReviewResponse {
        message: "Review deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_requires_at_least_one_field() {
        let err = validate_update_review(&UpdateReviewRequest {
            text: None,
            rating: None,
        })
        .unwrap_err();
        match err {
            ApiError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "text");
            }
            other => panic!("Expected Validation, got: {:?}", other),
        }
    }

    #[test]
    fn test_update_accepts_single_fields() {
        assert!(validate_update_review(&UpdateReviewRequest {
            text: Some("Better on a reread.".to_string()),
            rating: None,
        })
        .is_ok());

        assert!(validate_update_review(&UpdateReviewRequest {
            text: None,
            rating: Some(3),
        })
        .is_ok());
    }

    #[test]
    fn test_update_validates_provided_fields() {
        assert!(validate_update_review(&UpdateReviewRequest {
            text: Some("".to_string()),
            rating: None,
        })
        .is_err());

        assert!(validate_update_review(&UpdateReviewRequest {
            text: None,
            rating: Some(0),
        })
        .is_err());

        assert!(validate_update_review(&UpdateReviewRequest {
            text: None,
            rating: Some(6),
        })
        .is_err());
    }
}
