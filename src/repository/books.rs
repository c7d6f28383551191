//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookQuery, BookShort, CreateBook, UpdateBook},
        genre::Genre,
        language::Language,
    },
};

use super::authors::escape_like;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get book by ID with author, language, genres and copies loaded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(book.author_id)
            .fetch_optional(&self.pool)
            .await?;

        book.language = sqlx::query_as::<_, Language>(
            "SELECT id, name FROM languages WHERE id = $1",
        )
        .bind(book.language_id)
        .fetch_optional(&self.pool)
        .await?;

        book.genres = self.get_book_genres(id).await?;

        book.copies = sqlx::query_as(
            "SELECT * FROM book_copies WHERE book_id = $1 ORDER BY imprint, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(book)
    }

    /// Load all genres for a book via the book_genres junction table
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    /// Search books with pagination. Filters compose as AND.
    pub async fn search(
        &self,
        query: &BookQuery,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookShort>, i64)> {
        let title_pattern = query
            .title
            .as_deref()
            .map(|t| format!("%{}%", escape_like(t)));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books b
            WHERE ($1::text IS NULL OR b.title ILIKE $1)
              AND ($2::int4 IS NULL OR b.author_id = $2)
              AND ($3::int4 IS NULL OR EXISTS (
                  SELECT 1 FROM book_genres bg WHERE bg.book_id = b.id AND bg.genre_id = $3))
            "#,
        )
        .bind(&title_pattern)
        .bind(query.author_id)
        .bind(query.genre_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT b.id, b.title, b.isbn,
                   CASE WHEN a.id IS NULL THEN NULL
                        ELSE a.first_name || ' ' || a.last_name END as author_name,
                   COALESCE((SELECT COUNT(*) FROM book_copies c WHERE c.book_id = b.id), 0) as nb_copies,
                   COALESCE((SELECT COUNT(*) FROM book_copies c
                             WHERE c.book_id = b.id AND c.status = 'a'), 0) as nb_available
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE ($1::text IS NULL OR b.title ILIKE $1)
              AND ($2::int4 IS NULL OR b.author_id = $2)
              AND ($3::int4 IS NULL OR EXISTS (
                  SELECT 1 FROM book_genres bg WHERE bg.book_id = b.id AND bg.genre_id = $3))
            ORDER BY b.title, b.id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&title_pattern)
        .bind(query.author_id)
        .bind(query.genre_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// List books for an author (used on the author detail page)
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT b.id, b.title, b.isbn,
                   CASE WHEN a.id IS NULL THEN NULL
                        ELSE a.first_name || ' ' || a.last_name END as author_name,
                   COALESCE((SELECT COUNT(*) FROM book_copies c WHERE c.book_id = b.id), 0) as nb_copies,
                   COALESCE((SELECT COUNT(*) FROM book_copies c
                             WHERE c.book_id = b.id AND c.status = 'a'), 0) as nb_available
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE b.author_id = $1
            ORDER BY b.title, b.id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books whose title contains the substring, case-insensitively
    pub async fn count_title_containing(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE $1")
            .bind(format!("%{}%", escape_like(needle)))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a new book and attach its genres
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, summary, isbn, author_id, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .bind(book.language_id)
        .fetch_one(&self.pool)
        .await?;

        self.set_genres(id, &book.genre_ids).await?;

        self.get_by_id(id).await
    }

    /// Update an existing book; a present genre_ids replaces the full set
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let updated = sqlx::query(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                isbn = COALESCE($4, isbn),
                author_id = COALESCE($5, author_id),
                language_id = COALESCE($6, language_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.author_id)
        .bind(book.language_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if let Some(ref genre_ids) = book.genre_ids {
            self.set_genres(id, genre_ids).await?;
        }

        self.get_by_id(id).await
    }

    /// Replace the genre set of a book
    async fn set_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        for genre_id in genre_ids {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(book_id)
            .bind(genre_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Delete a book; copies and genre links cascade
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
