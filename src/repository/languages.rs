//! Languages repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::{CreateLanguage, Language, LanguageWithCount},
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get language by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language with id {} not found", id)))
    }

    /// List languages with the number of books written in each
    pub async fn list_with_counts(&self) -> AppResult<Vec<LanguageWithCount>> {
        let rows = sqlx::query_as::<_, LanguageWithCount>(
            r#"
            SELECT l.id, l.name,
                   COALESCE((SELECT COUNT(*) FROM books b WHERE b.language_id = l.id), 0) as nb_books
            FROM languages l
            ORDER BY l.name, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a new language
    pub async fn create(&self, language: &CreateLanguage) -> AppResult<Language> {
        let row = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&language.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a language; books keep existing without one
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Language with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
