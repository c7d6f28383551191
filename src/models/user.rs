//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Rights levels for a guarded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// Account type slug (string identifier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountTypeSlug {
    Reader,
    Librarian,
    Admin,
}

impl AccountTypeSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeSlug::Reader => "reader",
            AccountTypeSlug::Librarian => "librarian",
            AccountTypeSlug::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountTypeSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountTypeSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(AccountTypeSlug::Reader),
            "librarian" => Ok(AccountTypeSlug::Librarian),
            "admin" => Ok(AccountTypeSlug::Admin),
            _ => Err(format!("Invalid account type slug: {}", s)),
        }
    }
}

// SQLx conversion for AccountTypeSlug (stored as text)
impl sqlx::Type<Postgres> for AccountTypeSlug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AccountTypeSlug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AccountTypeSlug {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Rights a user holds on the two guarded areas: the catalog (author and
/// book CRUD) and the loan desk (all-borrowed listing, renew, borrow,
/// return).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserRights {
    pub catalog_rights: Rights,
    pub loans_rights: Rights,
}

impl UserRights {
    /// Derive rights from the account type
    pub fn for_account_type(account_type: AccountTypeSlug) -> Self {
        match account_type {
            AccountTypeSlug::Reader => Self {
                catalog_rights: Rights::Read,
                loans_rights: Rights::Read,
            },
            AccountTypeSlug::Librarian | AccountTypeSlug::Admin => Self {
                catalog_rights: Rights::Write,
                loans_rights: Rights::Write,
            },
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub account_type: AccountTypeSlug,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create user request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub account_type: Option<AccountTypeSlug>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub account_type: AccountTypeSlug,
    pub rights: UserRights,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    /// Author and book CRUD is reserved to librarians
    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        if self.rights.catalog_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to modify the catalog".to_string(),
            ))
        }
    }

    /// The all-borrowed listing, renewals, borrows and returns require
    /// the loan-management permission
    pub fn require_manage_loans(&self) -> Result<(), AppError> {
        if self.rights.loans_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to manage loans".to_string(),
            ))
        }
    }

    /// Check if user is admin (account_type = "admin")
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountTypeSlug::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(account_type: AccountTypeSlug) -> UserClaims {
        UserClaims {
            sub: "test".to_string(),
            user_id: 1,
            account_type,
            rights: UserRights::for_account_type(account_type),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn reader_cannot_manage_loans_or_catalog() {
        let claims = claims_for(AccountTypeSlug::Reader);
        assert!(matches!(
            claims.require_manage_loans(),
            Err(AppError::Authorization(_))
        ));
        assert!(matches!(
            claims.require_write_catalog(),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn librarian_holds_both_permissions_but_is_not_admin() {
        let claims = claims_for(AccountTypeSlug::Librarian);
        assert!(claims.require_manage_loans().is_ok());
        assert!(claims.require_write_catalog().is_ok());
        assert!(claims.require_admin().is_err());
    }

    #[test]
    fn account_type_slug_round_trips() {
        for slug in ["reader", "librarian", "admin"] {
            let parsed: AccountTypeSlug = slug.parse().unwrap();
            assert_eq!(parsed.as_str(), slug);
        }
        assert!("guest".parse::<AccountTypeSlug>().is_err());
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = claims_for(AccountTypeSlug::Librarian);
        let mut claims = claims;
        claims.exp = chrono::Utc::now().timestamp() + 3600;
        claims.iat = chrono::Utc::now().timestamp();
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.account_type, AccountTypeSlug::Librarian);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }
}
