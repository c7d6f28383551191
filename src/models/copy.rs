//! Book copy model: the physical, borrowable instance of a book

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Loan status of a copy. Persisted as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl CopyStatus {
    /// Return the persisted single-letter code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            CopyStatus::Maintenance => "m",
            CopyStatus::OnLoan => "o",
            CopyStatus::Available => "a",
            CopyStatus::Reserved => "r",
        }
    }
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Maintenance
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(CopyStatus::Maintenance),
            "o" => Ok(CopyStatus::OnLoan),
            "a" => Ok(CopyStatus::Available),
            "r" => Ok(CopyStatus::Reserved),
            _ => Err(format!("Invalid copy status code: {}", s)),
        }
    }
}

// SQLx conversion for CopyStatus (stored as text)
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book copy model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    /// Opaque unique token for the copy
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    /// Only meaningful while the copy is on loan
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookCopy {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == CopyStatus::OnLoan
            && self.due_back.map(|d| d < today).unwrap_or(false)
    }
}

/// Loan row for display: a copy joined with its book and borrower
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub copy_id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower_name: Option<String>,
    pub is_overdue: bool,
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Defaults to maintenance, matching a freshly catalogued copy
    pub status: Option<CopyStatus>,
}

/// Loan listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            CopyStatus::Maintenance,
            CopyStatus::OnLoan,
            CopyStatus::Available,
            CopyStatus::Reserved,
        ] {
            let parsed: CopyStatus = status.as_code().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("x".parse::<CopyStatus>().is_err());
    }

    #[test]
    fn overdue_requires_on_loan_and_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut copy = BookCopy {
            id: Uuid::nil(),
            book_id: 1,
            imprint: "First edition".to_string(),
            due_back: Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            borrower_id: Some(7),
            status: CopyStatus::OnLoan,
            created_at: None,
            updated_at: None,
        };
        assert!(copy.is_overdue(today));

        copy.status = CopyStatus::Available;
        assert!(!copy.is_overdue(today));

        copy.status = CopyStatus::OnLoan;
        copy.due_back = None;
        assert!(!copy.is_overdue(today));
    }
}
