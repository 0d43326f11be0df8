//! Book handlers
//!
//! Listing and detail are public; creation and reviewing require an
//! authenticated user, who becomes the owner of what they create.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::{self, Book, BookPage, NewBook, NewReview, PageParams, Review};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{check_date, check_length, check_range, validate_page_params, FieldErrors};

/// Request body for creating a book
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[schema(example = "The Name of the Wind")]
    pub title: String,
    #[schema(example = "Patrick Rothfuss")]
    pub author: String,
    #[schema(example = "Fantasy")]
    pub genre: String,
    /// Publication date (YYYY-MM-DD)
    #[schema(example = "2007-03-27")]
    pub publication_date: String,
    #[schema(example = "A hero recounts his rise and fall.")]
    pub description: String,
    #[schema(example = 662)]
    pub page_count: i32,
}

/// Response for book creation
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookResponse {
    pub message: String,
    pub book: Book,
}

/// Book detail: the book itself plus its average rating and a page of reviews
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetailResponse {
    #[serde(flatten)]
    pub book: Book,
    /// Mean of review ratings, null when the book has no reviews
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
}

/// Request body for creating a review
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Optional review text
    pub text: Option<String>,
    /// Rating from 1 to 5
    #[schema(example = 5)]
    pub rating: i32,
}

/// Response for review creation
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReviewResponse {
    pub message: String,
    pub review: Review,
}

fn validate_create_book(req: &CreateBookRequest) -> Result<chrono::NaiveDate, ApiError> {
    let mut errors = FieldErrors::new();
    check_length(&mut errors, "title", &req.title, 1, 255);
    check_length(&mut errors, "author", &req.author, 1, 100);
    check_length(&mut errors, "genre", &req.genre, 1, 100);
    check_length(&mut errors, "description", &req.description, 0, 255);
    if req.page_count <= 0 {
        errors.push("pageCount", "pageCount must be a positive integer");
    }
    let publication_date = check_date(&mut errors, "publicationDate", &req.publication_date);
    errors.into_result()?;
    // Safe: into_result returned Ok, so the date parsed
    Ok(publication_date.expect("date validated"))
}

fn validate_create_review(req: &CreateReviewRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    check_range(&mut errors, "rating", req.rating, 1, 5);
    if let Some(text) = &req.text {
        check_length(&mut errors, "text", text, 1, 255);
    }
    errors.into_result()
}

/// List books with optional author/genre filter
#[utoipa::path(
    get,
    path = "/api/v1/books",
    tag = "Books",
    params(
        ("search" = Option<String>, Query, description = "Filter on author or genre"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<BookPage>, ApiError> {
    validate_page_params(&params)?;

    let books = state
        .books
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let page = books.list(&params).await?;
    Ok(Json(page))
}

/// Get a single book with its average rating and reviews
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}",
    tag = "Books",
    params(
        ("book_id" = String, Path, description = "Book ID (UUID)"),
        ("page" = Option<i64>, Query, description = "Review page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Reviews per page (max 100)")
    ),
    responses(
        (status = 200, description = "Book detail", body = BookDetailResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Book not found"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn get_book_handler(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<BookDetailResponse>, ApiError> {
    validate_page_params(&params)?;

    let books = state
        .books
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let reviews = state
        .reviews
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let book = books
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    let limit = params.limit.min(100);
    let review_page = reviews
        .list_for_book(book.id, limit, params.offset())
        .await?;
    let average_rating = reviews.average_rating_for_book(book.id).await?;

    Ok(Json(BookDetailResponse {
        book,
        average_rating,
        reviews: review_page,
    }))
}

/// Create a book owned by the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/books",
    tag = "Books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = CreateBookResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Invalid or expired token"),
        (status = 503, description = "Database not available")
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn create_book_handler(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<CreateBookResponse>), ApiError> {
    let publication_date = validate_create_book(&request)?;

    let books = state
        .books
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let book = books
        .create(NewBook {
            title: request.title,
            author: request.author,
            genre: request.genre,
            page_count: request.page_count,
            description: request.description,
            publication_date,
            added_by: user.id,
        })
        .await?;

    tracing::info!(book_id = %book.id, added_by = %user.id, "Book created");

    Ok((
        StatusCode::CREATED,
        Json(CreateBookResponse {
            message: "Book created successfully".to_string(),
            book,
        }),
    ))
}

/// Review a book as the authenticated user
///
/// One review per user per book; the store's unique index is the authority
/// and a violation maps to 409.
#[utoipa::path(
    post,
    path = "/api/v1/books/{book_id}/reviews",
    tag = "Reviews",
    params(
        ("book_id" = String, Path, description = "Book ID (UUID)")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = CreateReviewResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already reviewed by this user"),
        (status = 503, description = "Database not available")
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn create_review_handler(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<CreateReviewResponse>), ApiError> {
    validate_create_review(&request)?;

    let books = state
        .books
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let reviews = state
        .reviews
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    books
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    let review = reviews
        .create(NewReview {
            user_id: user.id,
            book_id,
            rating: request.rating,
            review_text: request.text,
        })
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::conflict("You have already reviewed this book")
            } else if db::is_foreign_key_violation(&e) {
                // Book deleted between the existence check and the insert
                ApiError::not_found("Book not found")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!(review_id = %review.id, book_id = %book_id, "Review created");

    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            message: "Review created successfully".to_string(),
            review,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_book() -> CreateBookRequest {
        CreateBookRequest {
            title: "The Name of the Wind".to_string(),
            author: "Patrick Rothfuss".to_string(),
            genre: "Fantasy".to_string(),
            publication_date: "2007-03-27".to_string(),
            description: "A hero recounts his rise and fall.".to_string(),
            page_count: 662,
        }
    }

    #[test]
    fn test_validate_create_book_parses_date() {
        let date = validate_create_book(&valid_book()).unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2007, 3, 27).unwrap());
    }

    #[test]
    fn test_validate_create_book_rejects_bad_input() {
        let mut req = valid_book();
        req.title = "".to_string();
        assert!(validate_create_book(&req).is_err());

        let mut req = valid_book();
        req.page_count = 0;
        assert!(validate_create_book(&req).is_err());

        let mut req = valid_book();
        req.publication_date = "March 27, 2007".to_string();
        assert!(validate_create_book(&req).is_err());
    }

    #[test]
    fn test_validate_create_review_rating_bounds() {
        for rating in 1..=5 {
            assert!(validate_create_review(&CreateReviewRequest { text: None, rating }).is_ok());
        }
        assert!(validate_create_review(&CreateReviewRequest {
            text: None,
            rating: 0
        })
        .is_err());
        assert!(validate_create_review(&CreateReviewRequest {
            text: None,
            rating: 6
        })
        .is_err());
    }

    #[test]
    fn test_validate_create_review_text_bounds() {
        assert!(validate_create_review(&CreateReviewRequest {
            text: Some("Great book".to_string()),
            rating: 5
        })
        .is_ok());
        assert!(validate_create_review(&CreateReviewRequest {
            text: Some("".to_string()),
            rating: 5
        })
        .is_err());
        assert!(validate_create_review(&CreateReviewRequest {
            text: Some("x".repeat(256)),
            rating: 5
        })
        .is_err());
    }
}
