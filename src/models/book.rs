//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::copy::BookCopy;
use super::genre::Genre;
use super::language::Language;

/// ISBN-13 (13 digits) or ISBN-10 (9 digits + digit or X), after
/// stripping separators.
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{13}|\d{9}[\dXx])$").expect("invalid ISBN regex"));

/// Strip hyphens and spaces from a raw ISBN string
pub fn sanitize_isbn(s: &str) -> String {
    s.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Validate the shape of an ISBN (checksum is not verified)
pub fn is_valid_isbn(raw: &str) -> bool {
    ISBN_RE.is_match(&sanitize_isbn(raw))
}

/// Full book model (DB + API). Relations are loaded separately.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub author: Option<super::author::Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub language: Option<Language>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[sqlx(skip)]
    #[serde(default)]
    pub copies: Vec<BookCopy>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author_name: Option<String>,
    pub nb_copies: i64,
    pub nb_available: i64,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: Option<String>,
    /// ISBN-10 or ISBN-13; shape is checked by the catalog service
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: Option<String>,
    /// ISBN-10 or ISBN-13; shape is checked by the catalog service
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    /// Replaces the full genre set when present
    pub genre_ids: Option<Vec<i32>>,
}

/// Book listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive containment match on title
    pub title: Option<String>,
    /// Filter by author id
    pub author_id: Option<i32>,
    /// Filter by genre id
    pub genre_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_isbn13_and_isbn10() {
        assert!(is_valid_isbn("9780132350884"));
        assert!(is_valid_isbn("978-0-13-235088-4"));
        assert!(is_valid_isbn("0132350882"));
        assert!(is_valid_isbn("080442957X"));
        assert!(is_valid_isbn("0 8044 2957 X"));
    }

    #[test]
    fn rejects_malformed_isbn() {
        assert!(!is_valid_isbn(""));
        assert!(!is_valid_isbn("12345"));
        assert!(!is_valid_isbn("97801323508"));
        assert!(!is_valid_isbn("978013235088X"));
        assert!(!is_valid_isbn("not-an-isbn"));
    }

    #[test]
    fn sanitize_strips_separators_only() {
        assert_eq!(sanitize_isbn("978-0-13-235088-4"), "9780132350884");
        assert_eq!(sanitize_isbn("0 8044 2957 X"), "080442957X");
    }
}
