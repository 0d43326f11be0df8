//! Database module for Bookworm Server
//!
//! Contains entities, repositories, and database utilities.

pub mod book;
pub mod review;
pub mod user;

pub use book::{Book, BookPage, BookRepository, NewBook, PageParams, Pagination};
pub use review::{NewReview, Review, ReviewPatch, ReviewRepository};
pub use user::{NewUser, User, UserRepository, UserSummary};

use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

/// Open a connection pool using the pool bounds from config
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .connect(&config.database_url)
        .await
}

/// True when the error is a store-level unique constraint violation.
///
/// Uniqueness checks in handlers are advisory; the unique index is the
/// authority under concurrent writes, and this is how its verdict surfaces.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::UniqueViolation)
    )
}

/// True when the error is a foreign key constraint violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::ForeignKeyViolation)
    )
}

/// True when the error is a CHECK constraint violation
pub fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(ErrorKind::CheckViolation)
    )
}
