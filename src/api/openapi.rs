//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, genres, health, home, languages, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alexandria API",
        version = "0.3.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        home::summary,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::create_user,
        users::get_user,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_copies,
        books::create_copy,
        // Taxonomy
        genres::list_genres,
        genres::create_genre,
        genres::delete_genre,
        languages::list_languages,
        languages::create_language,
        languages::delete_language,
        // Loans
        loans::my_loans,
        loans::all_loans,
        loans::renewal_proposal,
        loans::renew_copy,
        loans::borrow_copy,
        loans::return_copy,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::AccountTypeSlug,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorShort,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Copies
            crate::models::copy::BookCopy,
            crate::models::copy::CopyStatus,
            crate::models::copy::CreateCopy,
            crate::models::copy::LoanDetails,
            // Taxonomy
            crate::models::genre::Genre,
            crate::models::genre::GenreWithCount,
            crate::models::genre::CreateGenre,
            crate::models::language::Language,
            crate::models::language::LanguageWithCount,
            crate::models::language::CreateLanguage,
            // Loans
            loans::RenewalProposal,
            loans::RenewalRequest,
            loans::BorrowRequest,
            // Home
            home::HomeSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "home", description = "Catalog summary"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "authors", description = "Author catalog management"),
        (name = "books", description = "Book catalog management"),
        (name = "taxonomy", description = "Genres and languages"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
