//! Book copy status and its allowed transitions

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use thiserror::Error;
use utoipa::ToSchema;

/// Availability of a book copy. Stored as a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot change status from {from} to {to}")]
pub struct TransitionError {
    pub from: LoanStatus,
    pub to: LoanStatus,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    pub fn code(&self) -> char {
        match self {
            LoanStatus::Maintenance => 'd',
            LoanStatus::OnLoan => 'o',
            LoanStatus::Available => 'a',
            LoanStatus::Reserved => 'r',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(LoanStatus::Maintenance),
            'o' => Some(LoanStatus::OnLoan),
            'a' => Some(LoanStatus::Available),
            'r' => Some(LoanStatus::Reserved),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }

    /// Transition table. Staying in the same state is always allowed.
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        if *self == next {
            return true;
        }
        match (self, next) {
            (Maintenance, Available) => true,
            (Maintenance, _) => false,
            (OnLoan, Available | Maintenance) => true,
            (OnLoan, _) => false,
            (Available, _) | (Reserved, _) => true,
        }
    }

    pub fn transition_to(&self, next: LoanStatus) -> Result<LoanStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError { from: *self, to: next })
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// SQLx conversion: CHAR(1) column
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim()
            .chars()
            .next()
            .and_then(LoanStatus::from_code)
            .ok_or_else(|| format!("Invalid loan status code: {:?}", s).into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s = self.code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LoanStatus::*;

    #[test]
    fn test_codes_round_trip() {
        for status in LoanStatus::ALL {
            assert_eq!(LoanStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(LoanStatus::from_code('x'), None);
    }

    #[test]
    fn test_default_is_maintenance() {
        assert_eq!(LoanStatus::default(), Maintenance);
    }

    #[test]
    fn test_self_transitions_allowed() {
        for status in LoanStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_maintenance_must_become_available_first() {
        assert!(Maintenance.can_transition_to(Available));
        assert!(!Maintenance.can_transition_to(OnLoan));
        assert!(!Maintenance.can_transition_to(Reserved));
    }

    #[test]
    fn test_on_loan_exits() {
        assert!(OnLoan.can_transition_to(Available));
        assert!(OnLoan.can_transition_to(Maintenance));
        assert_eq!(
            OnLoan.transition_to(Reserved),
            Err(TransitionError { from: OnLoan, to: Reserved })
        );
    }

    #[test]
    fn test_available_and_reserved_are_open() {
        for next in LoanStatus::ALL {
            assert!(Available.can_transition_to(next));
            assert!(Reserved.can_transition_to(next));
        }
    }

    #[test]
    fn test_transition_error_message() {
        let err = Maintenance.transition_to(OnLoan).unwrap_err();
        assert_eq!(err.to_string(), "cannot change status from Maintenance to On loan");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&OnLoan).unwrap(), "\"on_loan\"");
        let parsed: LoanStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(parsed, Reserved);
    }
}
