//! Book copies repository: per-copy loan state and loan listings

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, CreateCopy, LoanDetails},
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Create a copy for a book. The opaque token is assigned here.
    pub async fn create(&self, book_id: i32, copy: &CreateCopy) -> AppResult<BookCopy> {
        let row = sqlx::query_as::<_, BookCopy>(
            r#"
            INSERT INTO book_copies (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&copy.imprint)
        .bind(copy.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available for loan
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE status = 'a'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Active loans, earliest due first. A NULL borrower filter lists
    /// every on-loan copy. Copies without a due date sort last so the
    /// ordering is total.
    pub async fn list_loans(
        &self,
        borrower_id: Option<i32>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM book_copies c
            WHERE c.status = 'o' AND ($1::int4 IS NULL OR c.borrower_id = $1)
            "#,
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT c.id as copy_id, c.book_id, b.title, c.imprint, c.due_back, c.borrower_id,
                   CASE WHEN u.id IS NULL THEN NULL
                        ELSE TRIM(COALESCE(u.first_name, '') || ' ' || COALESCE(u.last_name, '')) END
                       as borrower_name
            FROM book_copies c
            JOIN books b ON b.id = c.book_id
            LEFT JOIN users u ON u.id = c.borrower_id
            WHERE c.status = 'o' AND ($1::int4 IS NULL OR c.borrower_id = $1)
            ORDER BY c.due_back ASC NULLS LAST, c.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(borrower_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();

        let loans = rows
            .into_iter()
            .map(|row| {
                let due_back: Option<NaiveDate> = row.get("due_back");
                LoanDetails {
                    copy_id: row.get("copy_id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    imprint: row.get("imprint"),
                    due_back,
                    borrower_id: row.get("borrower_id"),
                    borrower_name: row.get("borrower_name"),
                    is_overdue: due_back.map(|d| d < today).unwrap_or(false),
                }
            })
            .collect();

        Ok((loans, total))
    }

    /// Persist a new due date on a copy (renewal). Last write wins when
    /// two renewals race.
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE book_copies SET due_back = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Hand a copy to a borrower
    pub async fn mark_borrowed(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE book_copies
            SET status = 'o', borrower_id = $2, due_back = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(borrower_id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Put a copy back on the shelf
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE book_copies
            SET status = 'a', borrower_id = NULL, due_back = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }
        Ok(())
    }
}
