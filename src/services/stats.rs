//! Reporting service: the aggregate counts shown on the home summary

use crate::{error::AppResult, repository::Repository};

/// Aggregate counts over the catalog
#[derive(Debug, Clone)]
pub struct CatalogCounts {
    pub books: i64,
    pub copies: i64,
    pub copies_available: i64,
    pub authors: i64,
    pub genres: i64,
    pub books_title_matching: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Cheap round trip used by the readiness probe
    pub async fn db_ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }

    /// Row counts for the home page, plus a case-insensitive title
    /// containment count for the given needle
    pub async fn catalog_counts(&self, title_contains: &str) -> AppResult<CatalogCounts> {
        let books = self.repository.books.count().await?;
        let copies = self.repository.copies.count().await?;
        let copies_available = self.repository.copies.count_available().await?;
        let authors = self.repository.authors.count().await?;
        let genres = self.repository.genres.count().await?;
        let books_title_matching = self
            .repository
            .books
            .count_title_containing(title_contains)
            .await?;

        Ok(CatalogCounts {
            books,
            copies,
            copies_available,
            authors,
            genres,
            books_title_matching,
        })
    }
}
