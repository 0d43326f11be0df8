//! Book entity and repository
//!
//! Books are created by an authenticated user (recorded in `added_by`) and
//! listed publicly with offset/limit pagination and ILIKE text filters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// Book entity from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Book {
    /// Unique book identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub page_count: i32,
    pub description: String,
    /// Publication date (YYYY-MM-DD)
    #[schema(value_type = String, example = "2008-08-01")]
    pub publication_date: NaiveDate,
    /// User who added this book; cascades on owner delete
    #[schema(value_type = String)]
    pub added_by: Uuid,
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub page_count: i32,
    pub description: String,
    pub publication_date: NaiveDate,
    pub added_by: Uuid,
}

/// Pagination parameters shared by the listing and search queries
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page (max 100)
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Optional text filter
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl PageParams {
    /// Offset for 1-indexed pages
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0) * self.limit
    }
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// A page of books with pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookPage {
    pub data: Vec<Book>,
    pub pagination: Pagination,
}

/// Which columns an ILIKE text filter applies to
#[derive(Debug, Clone, Copy)]
enum TextFilter {
    /// Listing filter: author or genre
    AuthorOrGenre,
    /// Search endpoint: author or title
    AuthorOrTitle,
}

/// Repository for book database operations
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new book owned by `added_by`
    pub async fn create(&self, input: NewBook) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, page_count, description, publication_date, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.genre)
        .bind(input.page_count)
        .bind(&input.description)
        .bind(input.publication_date)
        .bind(input.added_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Find book by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List books, filtering on author or genre when a search term is present
    pub async fn list(&self, params: &PageParams) -> Result<BookPage, sqlx::Error> {
        self.page_with_filter(params, TextFilter::AuthorOrGenre).await
    }

    /// Search books, matching the term against author or title
    pub async fn search(&self, params: &PageParams) -> Result<BookPage, sqlx::Error> {
        self.page_with_filter(params, TextFilter::AuthorOrTitle).await
    }

    async fn page_with_filter(
        &self,
        params: &PageParams,
        filter: TextFilter,
    ) -> Result<BookPage, sqlx::Error> {
        let limit = params.limit.min(100);
        let offset = params.offset();

        let (data, total) = match &params.search {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", term);
                let filter_sql = match filter {
                    TextFilter::AuthorOrGenre => "author ILIKE $1 OR genre ILIKE $1",
                    TextFilter::AuthorOrTitle => "author ILIKE $1 OR title ILIKE $1",
                };

                let select_sql = format!(
                    r#"
                    SELECT * FROM books
                    WHERE {filter_sql}
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                );
                let data = sqlx::query_as::<_, Book>(&select_sql)
                    .bind(&pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?;

                let count_sql = format!("SELECT COUNT(*) FROM books WHERE {filter_sql}");
                let total: (i64,) = sqlx::query_as(&count_sql)
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await?;

                (data, total.0)
            }
            _ => {
                let data = sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: (i64,) = sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM books
                    "#,
                )
                .fetch_one(&self.pool)
                .await?;

                (data, total.0)
            }
        };

        Ok(BookPage {
            data,
            pagination: Pagination {
                total,
                page: params.page,
                limit,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_one_indexed() {
        let params = PageParams {
            page: 1,
            limit: 10,
            search: None,
        };
        assert_eq!(params.offset(), 0);

        let params = PageParams {
            page: 3,
            limit: 10,
            search: None,
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_offset_never_negative() {
        let params = PageParams {
            page: 0,
            limit: 10,
            search: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_params_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.search.is_none());
    }
}
