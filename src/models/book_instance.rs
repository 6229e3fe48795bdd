//! Book instance (physical, loanable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::lending::{is_overdue, LoanStatus};

use super::user::UserShort;

/// Book instance record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
    // Computed fields (populated when queried with JOINs, None otherwise)
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
}

impl BookInstance {
    pub fn absolute_url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        is_overdue(self.due_back, today)
    }

    pub fn view(self, today: NaiveDate, borrower: Option<UserShort>) -> BookInstanceView {
        BookInstanceView {
            display: self.to_string(),
            url: self.absolute_url(),
            is_overdue: self.is_overdue(today),
            status_label: self.status.label().to_string(),
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            status: self.status,
            borrower,
        }
    }
}

impl std::fmt::Display for BookInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.book_title.as_deref().unwrap_or(""))
    }
}

/// Book instance as returned by the API, with derived fields
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub status_label: String,
    pub borrower: Option<UserShort>,
    pub is_overdue: bool,
    pub display: String,
    pub url: String,
}

/// Create book instance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Initial status (defaults to maintenance)
    pub status: Option<LoanStatus>,
}

/// Update book instance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: Option<String>,
    /// Move the copy to another book
    pub book_id: Option<i32>,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatus {
    pub status: LoanStatus,
    /// Required when moving to on_loan, refused for any other status
    pub due_back: Option<NaiveDate>,
    /// Only accepted with on_loan
    pub borrower_id: Option<i32>,
}

/// Lend request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LendRequest {
    pub borrower_id: i32,
    /// Defaults to the suggested renewal date
    pub due_back: Option<NaiveDate>,
}

/// Renewal form submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewRequest {
    pub renewal_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(due_back: Option<NaiveDate>, status: LoanStatus) -> BookInstance {
        BookInstance {
            id: Uuid::nil(),
            book_id: 3,
            imprint: "Folio, 2001".to_string(),
            due_back,
            borrower_id: None,
            status,
            book_title: Some("Kobzar".to_string()),
        }
    }

    #[test]
    fn test_display() {
        let copy = instance(None, LoanStatus::Available);
        assert_eq!(
            copy.to_string(),
            "00000000-0000-0000-0000-000000000000 (Kobzar)"
        );
        assert_eq!(
            copy.absolute_url(),
            "/catalog/bookinstance/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_view_carries_overdue_flag() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 1, 5);
        let view = instance(due, LoanStatus::OnLoan).view(today, None);
        assert!(view.is_overdue);
        assert_eq!(view.status_label, "On loan");

        let view = instance(None, LoanStatus::Available).view(today, None);
        assert!(!view.is_overdue);
    }
}
