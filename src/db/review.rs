//! Review entity and repository
//!
//! At most one review per (user, book) pair, enforced by the store's
//! `unique_user_book` constraint rather than an application pre-check.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// Review entity from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Review {
    /// Unique review identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Owning user; cascades on user delete and gates mutation
    #[schema(value_type = String)]
    pub user_id: Uuid,
    /// Reviewed book; cascades on book delete
    #[schema(value_type = String)]
    pub book_id: Uuid,
    /// Rating from 1 to 5
    #[schema(example = 5)]
    pub rating: i32,
    /// Optional review text
    pub review_text: Option<String>,
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub rating: i32,
    pub review_text: Option<String>,
}

/// Partial update for a review; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub rating: Option<i32>,
    pub review_text: Option<String>,
}

/// Repository for review database operations
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new review.
    ///
    /// The `unique_user_book` index rejects a second review by the same user
    /// for the same book; the violation surfaces as a database error for the
    /// caller to map to 409. A foreign key violation on `book_id` means the
    /// book vanished between the existence check and the insert.
    pub async fn create(&self, input: NewReview) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, book_id, rating, review_text)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.book_id)
        .bind(input.rating)
        .bind(&input.review_text)
        .fetch_one(&self.pool)
        .await
    }

    /// Find review by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Apply a partial update to a review, scoped to its owning user.
    ///
    /// Returns `None` when no row matched, which the caller has already
    /// distinguished into 404 vs 403 via `find_by_id`.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &ReviewPatch,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET
                rating = COALESCE($3, rating),
                review_text = COALESCE($4, review_text),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.rating)
        .bind(&patch.review_text)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a review, scoped to its owning user
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM reviews WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List reviews for a book with offset/limit pagination
    pub async fn list_for_book(
        &self,
        book_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE book_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(book_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Average rating for a book, `None` when it has no reviews
    pub async fn average_rating_for_book(
        &self,
        book_id: Uuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        let result: (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(rating)::float8 FROM reviews WHERE book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_serialization_shape() {
        let review = Review {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            rating: 4,
            review_text: Some("Tight plotting.".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["rating"], 4);
        assert_eq!(json["review_text"], "Tight plotting.");
        assert!(json["user_id"].is_string());
    }

    #[test]
    fn test_review_text_nullable() {
        let review = Review {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            rating: 2,
            review_text: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert!(json["review_text"].is_null());
    }
}
