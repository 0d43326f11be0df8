//! Bookworm Server Library - REST API components for the book catalogue and review service
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

pub use auth::{Claims, CurrentUser, TokenService};
pub use config::Config;
pub use db::{
    Book, BookPage, BookRepository, NewBook, NewReview, NewUser, PageParams, Pagination, Review,
    ReviewPatch, ReviewRepository, User, UserRepository, UserSummary,
};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::{create_router, create_router_with_config};
pub use state::AppState;
