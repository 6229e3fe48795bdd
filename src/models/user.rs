//! Users (borrowers and staff) and bearer token claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Access level on one area of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// Short user representation, embedded as the borrower of a copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Per-area rights carried in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub catalog_rights: Rights,
    /// Write on lending is the "mark returned" permission
    pub lending_rights: Rights,
    pub events_rights: Rights,
}

impl Default for UserRights {
    fn default() -> Self {
        Self {
            catalog_rights: Rights::Read,
            lending_rights: Rights::None,
            events_rights: Rights::Read,
        }
    }
}

/// JWT claims. Tokens are issued by the identity provider; the server
/// only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
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

    fn require(&self, have: Rights, need: Rights, what: &str) -> Result<(), AppError> {
        if have >= need {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Insufficient rights to {}", what)))
        }
    }

    // Authorization checks
    pub fn require_read_catalog(&self) -> Result<(), AppError> {
        self.require(self.rights.catalog_rights, Rights::Read, "read the catalog")
    }

    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        self.require(self.rights.catalog_rights, Rights::Write, "edit the catalog")
    }

    pub fn require_read_loans(&self) -> Result<(), AppError> {
        self.require(self.rights.lending_rights, Rights::Read, "read loans")
    }

    /// Lend, renew and mark copies as returned
    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        self.require(self.rights.lending_rights, Rights::Write, "manage loans")
    }

    pub fn require_read_events(&self) -> Result<(), AppError> {
        self.require(self.rights.events_rights, Rights::Read, "read events")
    }

    pub fn require_write_events(&self) -> Result<(), AppError> {
        self.require(self.rights.events_rights, Rights::Write, "edit events")
    }

    /// A user may always see their own loans; anyone else needs loan read rights
    pub fn require_self_or_read_loans(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            self.require_read_loans()
        }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(rights: UserRights) -> UserClaims {
        let now = Utc::now();
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 7,
            is_staff: true,
            rights,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let original = claims(UserRights::default());
        let token = original.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert!(decoded.is_staff);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_rights_ordering() {
        let reader = claims(UserRights::default());
        assert!(reader.require_read_catalog().is_ok());
        assert!(reader.require_write_catalog().is_err());
        assert!(reader.require_mark_returned().is_err());

        let librarian = claims(UserRights {
            catalog_rights: Rights::Write,
            lending_rights: Rights::Write,
            events_rights: Rights::Write,
        });
        assert!(librarian.require_read_loans().is_ok());
        assert!(librarian.require_mark_returned().is_ok());
        assert!(librarian.require_write_events().is_ok());
    }

    #[test]
    fn test_own_loans_visible_without_rights() {
        let reader = claims(UserRights::default());
        assert!(reader.require_self_or_read_loans(7).is_ok());
        assert!(reader.require_self_or_read_loans(8).is_err());
    }
}
