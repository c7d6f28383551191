//! Loan workflow service: listings, renewal, borrow and return

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, CopyStatus, LoanDetails},
    repository::Repository,
};

/// Default loan period proposed when a renewal form is opened
pub const DEFAULT_LOAN_DAYS: i64 = 21;
/// Hard ceiling on a proposed due date
pub const MAX_RENEWAL_DAYS: i64 = 28;

/// Default proposed due date: three weeks out
pub fn default_due_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_LOAN_DAYS)
}

/// A proposed due date must not be in the past and must not be more
/// than four weeks in the future. Both bounds are inclusive.
pub fn validate_due_date(proposed: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if proposed < today {
        return Err(AppError::Validation(
            "Invalid date - renewal in past".to_string(),
        ));
    }
    if proposed > today + Duration::days(MAX_RENEWAL_DAYS) {
        return Err(AppError::Validation(
            "Invalid date - renewal more than 4 weeks ahead".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active loans of one borrower, earliest due first
    pub async fn loans_for_user(
        &self,
        user_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository
            .copies
            .list_loans(Some(user_id), page, per_page)
            .await
    }

    /// Every active loan, earliest due first
    pub async fn all_loans(&self, page: i64, per_page: i64) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository.copies.list_loans(None, page, per_page).await
    }

    /// The copy and the default proposed date shown on the renewal form
    pub async fn renewal_proposal(&self, copy_id: Uuid) -> AppResult<(BookCopy, NaiveDate)> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        Ok((copy, default_due_date(Utc::now().date_naive())))
    }

    /// Renew a copy: persist the proposed due date after window checks.
    /// Nothing is persisted when validation fails.
    pub async fn renew(&self, copy_id: Uuid, proposed: NaiveDate) -> AppResult<BookCopy> {
        // 404 before 400: an unknown copy must not leak a validation reply
        self.repository.copies.get_by_id(copy_id).await?;
        validate_due_date(proposed, Utc::now().date_naive())?;
        self.repository.copies.set_due_back(copy_id, proposed).await
    }

    /// Hand an available copy to a borrower
    pub async fn borrow(
        &self,
        copy_id: Uuid,
        user_id: i32,
        due_back: Option<NaiveDate>,
    ) -> AppResult<BookCopy> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        if copy.status != CopyStatus::Available {
            return Err(AppError::BusinessRule(format!(
                "Copy {} is not available for loan",
                copy_id
            )));
        }

        // Verify the borrower exists
        self.repository.users.get_by_id(user_id).await?;

        let due = due_back.unwrap_or_else(|| default_due_date(Utc::now().date_naive()));
        self.repository
            .copies
            .mark_borrowed(copy_id, user_id, due)
            .await
    }

    /// Take a copy back and put it on the shelf
    pub async fn mark_returned(&self, copy_id: Uuid) -> AppResult<BookCopy> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        if copy.status != CopyStatus::OnLoan {
            return Err(AppError::BusinessRule(format!(
                "Copy {} is not on loan",
                copy_id
            )));
        }
        self.repository.copies.mark_returned(copy_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_dates_in_the_past() {
        let today = day(2024, 6, 15);
        let err = validate_due_date(day(2024, 6, 14), today).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn accepts_today_and_the_four_week_boundary() {
        let today = day(2024, 6, 15);
        assert!(validate_due_date(today, today).is_ok());
        assert!(validate_due_date(today + Duration::days(28), today).is_ok());
    }

    #[test]
    fn rejects_more_than_four_weeks_ahead() {
        let today = day(2024, 6, 15);
        let err = validate_due_date(today + Duration::days(29), today).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn default_proposal_is_three_weeks_out() {
        let today = day(2024, 6, 15);
        assert_eq!(default_due_date(today), day(2024, 7, 6));
        // The default always sits inside the accepted window
        assert!(validate_due_date(default_due_date(today), today).is_ok());
    }
}
