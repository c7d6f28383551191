//! Catalog service: CRUD over authors, books, genres and languages

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, AuthorQuery, AuthorShort, CreateAuthor, UpdateAuthor},
        book::{is_valid_isbn, Book, BookQuery, BookShort, CreateBook, UpdateBook},
        copy::{BookCopy, CreateCopy},
        genre::{CreateGenre, Genre, GenreWithCount},
        language::{CreateLanguage, Language, LanguageWithCount},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // --- Authors ---

    pub async fn list_authors(
        &self,
        query: &AuthorQuery,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<AuthorShort>, i64)> {
        self.repository.authors.list(query, page, per_page).await
    }

    /// Author detail with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, request: CreateAuthor) -> AppResult<Author> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&request).await
    }

    pub async fn update_author(&self, id: i32, request: UpdateAuthor) -> AppResult<Author> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &request).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // --- Books ---

    pub async fn search_books(
        &self,
        query: &BookQuery,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.search(query, page, per_page).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, request: CreateBook) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if !is_valid_isbn(&request.isbn) {
            return Err(AppError::Validation(format!(
                "Invalid ISBN: {}",
                request.isbn
            )));
        }
        self.check_book_references(request.author_id, request.language_id, &request.genre_ids)
            .await?;
        self.repository.books.create(&request).await
    }

    pub async fn update_book(&self, id: i32, request: UpdateBook) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(ref isbn) = request.isbn {
            if !is_valid_isbn(isbn) {
                return Err(AppError::Validation(format!("Invalid ISBN: {}", isbn)));
            }
        }
        self.check_book_references(
            request.author_id,
            request.language_id,
            request.genre_ids.as_deref().unwrap_or(&[]),
        )
        .await?;
        self.repository.books.update(id, &request).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// Referenced authors, languages and genres must exist before a book
    /// points at them; a dangling id is a caller mistake, not a 404.
    async fn check_book_references(
        &self,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        if let Some(author_id) = author_id {
            self.repository
                .authors
                .get_by_id(author_id)
                .await
                .map_err(|_| AppError::BadRequest(format!("Unknown author id {}", author_id)))?;
        }
        if let Some(language_id) = language_id {
            self.repository
                .languages
                .get_by_id(language_id)
                .await
                .map_err(|_| AppError::BadRequest(format!("Unknown language id {}", language_id)))?;
        }
        for genre_id in genre_ids {
            self.repository
                .genres
                .get_by_id(*genre_id)
                .await
                .map_err(|_| AppError::BadRequest(format!("Unknown genre id {}", genre_id)))?;
        }
        Ok(())
    }

    // --- Copies ---

    pub async fn list_copies(&self, book_id: i32) -> AppResult<Vec<BookCopy>> {
        // Listing copies of a missing book is a 404, not an empty list
        let book = self.repository.books.get_by_id(book_id).await?;
        Ok(book.copies)
    }

    pub async fn create_copy(&self, book_id: i32, request: CreateCopy) -> AppResult<BookCopy> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.get_by_id(book_id).await?;
        self.repository.copies.create(book_id, &request).await
    }

    // --- Genres & languages ---

    pub async fn list_genres(&self) -> AppResult<Vec<GenreWithCount>> {
        self.repository.genres.list_with_counts().await
    }

    pub async fn create_genre(&self, request: CreateGenre) -> AppResult<Genre> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.create(&request).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    pub async fn list_languages(&self) -> AppResult<Vec<LanguageWithCount>> {
        self.repository.languages.list_with_counts().await
    }

    pub async fn create_language(&self, request: CreateLanguage) -> AppResult<Language> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.languages.create(&request).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }
}
