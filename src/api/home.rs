//! Home summary endpoint: aggregate counts plus the session visit counter

use axum::{extract::Query, extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AppResult;

/// Cookie carrying the anonymous browsing session id
pub const SESSION_COOKIE: &str = "alexandria_session";

/// Home summary response
#[derive(Serialize, ToSchema)]
pub struct HomeSummary {
    /// Total number of books
    pub num_books: i64,
    /// Total number of copies
    pub num_copies: i64,
    /// Copies currently available for loan
    pub num_copies_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Total number of genres
    pub num_genres: i64,
    /// The substring counted in `num_books_title_matching`
    pub title_contains: String,
    /// Books whose title contains `title_contains`, case-insensitively
    pub num_books_title_matching: i64,
    /// Visits in this session before the current request
    pub num_visits: i64,
}

/// Home summary query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HomeQuery {
    /// Substring to count in book titles (default: "guide")
    pub title_contains: Option<String>,
}

/// Home page: catalog counts and the per-session visit counter
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    params(HomeQuery),
    responses(
        (status = 200, description = "Catalog summary", body = HomeSummary)
    )
)]
pub async fn summary(
    State(state): State<crate::AppState>,
    Query(query): Query<HomeQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeSummary>)> {
    let title_contains = query.title_contains.unwrap_or_else(|| "guide".to_string());
    let counts = state.services.stats.catalog_counts(&title_contains).await?;

    // A missing cookie starts a fresh session with a new opaque id
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    let jar = jar.add(cookie);

    Ok((
        jar,
        Json(HomeSummary {
            num_books: counts.books,
            num_copies: counts.copies,
            num_copies_available: counts.copies_available,
            num_authors: counts.authors,
            num_genres: counts.genres,
            title_contains,
            num_books_title_matching: counts.books_title_matching,
            num_visits,
        }),
    ))
}
