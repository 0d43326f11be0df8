//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::db::{BookRepository, ReviewRepository, UserRepository};

/// Application state containing shared resources.
///
/// Repositories are `None` when no database is configured; handlers answer
/// 503 in that case. This keeps the router constructible in tests that only
/// exercise the validation and authentication layers.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, kept for health checks
    pub pool: Option<PgPool>,
    /// User repository (credential store)
    pub users: Option<Arc<UserRepository>>,
    /// Book repository
    pub books: Option<Arc<BookRepository>>,
    /// Review repository
    pub reviews: Option<Arc<ReviewRepository>>,
    /// Token issuer/verifier holding the process-wide signing secret
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Build state from an optional pool and the token service
    pub fn new(pool: Option<PgPool>, tokens: TokenService) -> Self {
        Self {
            users: pool.clone().map(|p| Arc::new(UserRepository::new(p))),
            books: pool.clone().map(|p| Arc::new(BookRepository::new(p))),
            reviews: pool.clone().map(|p| Arc::new(ReviewRepository::new(p))),
            pool,
            tokens: Arc::new(tokens),
        }
    }
}
