//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, AuthorShort, CreateAuthor, UpdateAuthor},
};

/// Escape `%` and `_` so user input stays a literal in LIKE patterns
pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// List authors ordered by last name, first name, with pagination
    pub async fn list(
        &self,
        query: &AuthorQuery,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<AuthorShort>, i64)> {
        let name_pattern = query
            .name
            .as_deref()
            .map(|n| format!("%{}%", escape_like(n)));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM authors WHERE ($1::text IS NULL OR last_name ILIKE $1)",
        )
        .bind(&name_pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, AuthorShort>(
            r#"
            SELECT a.id, a.first_name, a.last_name, a.date_of_birth, a.date_of_death,
                   COALESCE((SELECT COUNT(*) FROM books b WHERE b.author_id = a.id), 0) as nb_books
            FROM authors a
            WHERE ($1::text IS NULL OR a.last_name ILIKE $1)
            ORDER BY a.last_name, a.first_name, a.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&name_pattern)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Update an existing author; absent fields keep their value
    pub async fn update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                date_of_birth = COALESCE($4, date_of_birth),
                date_of_death = COALESCE($5, date_of_death),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(row)
    }

    /// Delete an author; their books keep existing without an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
