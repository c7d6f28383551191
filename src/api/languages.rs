//! Language endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::language::{CreateLanguage, Language, LanguageWithCount},
};

use super::AuthenticatedUser;

/// List languages with book counts
#[utoipa::path(
    get,
    path = "/languages",
    tag = "taxonomy",
    responses(
        (status = 200, description = "List of languages", body = Vec<LanguageWithCount>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LanguageWithCount>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Create a new language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "taxonomy",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLanguage>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_write_catalog()?;

    let created = state.services.catalog.create_language(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a language
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "taxonomy",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;

    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
