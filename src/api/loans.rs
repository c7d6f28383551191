//! Loan endpoints: listings, renewal, borrow and return

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::copy::{BookCopy, LoanDetails, LoanQuery},
};

use super::{paginate, AuthenticatedUser, PaginatedResponse};

/// Renewal form data: the copy and the proposed default due date
#[derive(Serialize, ToSchema)]
pub struct RenewalProposal {
    /// The copy being renewed
    pub copy: BookCopy,
    /// Proposed due date (three weeks from today)
    pub due_back: NaiveDate,
}

/// Renewal submission
#[derive(Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// New due date; must be between today and four weeks ahead
    pub due_back: NaiveDate,
}

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Borrowing user ID
    pub user_id: i32,
    /// Due date; defaults to three weeks from today
    pub due_back: Option<NaiveDate>,
}

/// List the current user's active loans, earliest due first
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Active loans of the caller", body = PaginatedResponse<LoanDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let (page, per_page) = paginate(query.page, query.per_page);
    let (items, total) = state
        .services
        .loans
        .loans_for_user(claims.user_id, page, per_page)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// List every active loan, earliest due first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "All active loans", body = PaginatedResponse<LoanDetails>),
        (status = 403, description = "Insufficient permissions")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    claims.require_manage_loans()?;

    let (page, per_page) = paginate(query.page, query.per_page);
    let (items, total) = state.services.loans.all_loans(page, per_page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Open the renewal form for a copy: returns the proposed default date
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Renewal proposal", body = RenewalProposal),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_proposal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(copy_id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require_manage_loans()?;

    let (copy, due_back) = state.services.loans.renewal_proposal(copy_id).await?;
    Ok(Json(RenewalProposal { copy, due_back }))
}

/// Renew a copy with a new due date
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewalRequest,
    responses(
        (status = 200, description = "Copy renewed", body = BookCopy),
        (status = 400, description = "Proposed date outside the accepted window"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(copy_id): Path<Uuid>,
    Json(request): Json<RenewalRequest>,
) -> AppResult<Json<BookCopy>> {
    claims.require_manage_loans()?;

    let copy = state.services.loans.renew(copy_id, request.due_back).await?;
    Ok(Json(copy))
}

/// Hand an available copy to a borrower
#[utoipa::path(
    post,
    path = "/copies/{id}/borrow",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Copy borrowed", body = BookCopy),
        (status = 404, description = "Copy or user not found"),
        (status = 422, description = "Copy is not available")
    )
)]
pub async fn borrow_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(copy_id): Path<Uuid>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Json<BookCopy>> {
    claims.require_manage_loans()?;

    let copy = state
        .services
        .loans
        .borrow(copy_id, request.user_id, request.due_back)
        .await?;
    Ok(Json(copy))
}

/// Mark a borrowed copy as returned
#[utoipa::path(
    post,
    path = "/copies/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy returned", body = BookCopy),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(copy_id): Path<Uuid>,
) -> AppResult<Json<BookCopy>> {
    claims.require_manage_loans()?;

    let copy = state.services.loans.mark_returned(copy_id).await?;
    Ok(Json(copy))
}
