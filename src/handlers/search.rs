//! Book search handler
//!
//! Matches the search term against author or title, unlike the books listing
//! whose filter covers author or genre.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::db::{BookPage, PageParams};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_page_params;

/// Search books by author or title
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "Search",
    params(
        ("search" = Option<String>, Query, description = "Term matched against author or title"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "Page of matching books", body = BookPage),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn search_books_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<BookPage>, ApiError> {
    validate_page_params(&params)?;

    let books = state
        .books
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let page = books.search(&params).await?;
    Ok(Json(page))
}
