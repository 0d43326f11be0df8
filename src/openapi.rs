//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 specification for the Bookworm API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::db::{Book, BookPage, Pagination, Review, UserSummary};
use crate::handlers::{
    AuthResponse, BookDetailResponse, CreateBookRequest, CreateBookResponse, CreateReviewRequest,
    CreateReviewResponse, DeleteReviewResponse, HealthResponse, LoginRequest, ReadyResponse,
    SignupRequest, UpdateReviewRequest, UpdateReviewResponse,
};

/// Registers the bearer token security scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Bookworm API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookworm API",
        version = "0.1.0",
        description = r#"
## Book catalogue and review API

- **Sign up / log in** to receive a bearer token (7-day lifetime)
- **Browse and search** the catalogue without authentication
- **Add books and reviews** with `Authorization: Bearer <token>`

One review per user per book; only a review's author may edit or delete it.
"#,
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Auth", description = "Signup and login"),
        (name = "Books", description = "Catalogue listing and creation"),
        (name = "Reviews", description = "Book reviews, one per user per book"),
        (name = "Search", description = "Author/title text search"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::auth::signup_handler,
        crate::handlers::auth::login_handler,
        crate::handlers::books::list_books_handler,
        crate::handlers::books::get_book_handler,
        crate::handlers::books::create_book_handler,
        crate::handlers::books::create_review_handler,
        crate::handlers::reviews::update_review_handler,
        crate::handlers::reviews::delete_review_handler,
        crate::handlers::search::search_books_handler,
        crate::handlers::health::health,
        crate::handlers::health::ready,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            UserSummary,
            Book,
            BookPage,
            Pagination,
            BookDetailResponse,
            CreateBookRequest,
            CreateBookResponse,
            Review,
            CreateReviewRequest,
            CreateReviewResponse,
            UpdateReviewRequest,
            UpdateReviewResponse,
            DeleteReviewResponse,
            HealthResponse,
            ReadyResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
