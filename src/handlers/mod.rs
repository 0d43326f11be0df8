//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod auth;
pub mod books;
pub mod health;
pub mod reviews;
pub mod search;

pub use auth::{login_handler, signup_handler, AuthResponse, LoginRequest, SignupRequest};
pub use books::{
    create_book_handler, create_review_handler, get_book_handler, list_books_handler,
    BookDetailResponse, CreateBookRequest, CreateBookResponse, CreateReviewRequest,
    CreateReviewResponse,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use reviews::{
    delete_review_handler, update_review_handler, DeleteReviewResponse, UpdateReviewRequest,
    UpdateReviewResponse,
};
pub use search::search_books_handler;
