//! Renewal date validation
//!
//! A librarian may move a copy's due date to any day from today up to four
//! weeks ahead, both ends inclusive. The suggested date is three weeks ahead.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Why a proposed renewal date was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalError {
    #[error("date in the past")]
    PastDate,
    #[error("date too far in the future")]
    RangeExceeded,
}

/// Renewal window. The upper bound is fixed; only the suggested date varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalPolicy {
    default_weeks: u32,
}

impl Default for RenewalPolicy {
    fn default() -> Self {
        Self { default_weeks: 3 }
    }
}

/// Dates offered to the renewal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RenewalWindow {
    /// First acceptable date (today)
    pub earliest: NaiveDate,
    /// Last acceptable date
    pub latest: NaiveDate,
    /// Pre-filled proposal
    pub suggested: NaiveDate,
}

impl RenewalPolicy {
    /// Furthest a due date may be pushed, in weeks from today
    pub const MAX_WEEKS: u32 = 4;

    /// Suggest a date `default_weeks` ahead, capped at the window end
    pub fn new(default_weeks: u32) -> Self {
        Self {
            default_weeks: default_weeks.min(Self::MAX_WEEKS),
        }
    }

    pub fn default_weeks(&self) -> u32 {
        self.default_weeks
    }

    pub fn window(&self, today: NaiveDate) -> RenewalWindow {
        RenewalWindow {
            earliest: today,
            latest: today + Duration::weeks(Self::MAX_WEEKS as i64),
            suggested: today + Duration::weeks(self.default_weeks as i64),
        }
    }

    /// Accept `candidate` if it falls within `[today, today + 4 weeks]`.
    pub fn validate(&self, candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
        if candidate < today {
            return Err(RenewalError::PastDate);
        }
        if candidate > self.window(today).latest {
            return Err(RenewalError::RangeExceeded);
        }
        Ok(candidate)
    }
}

/// Validate a renewal date against the standard four-week window.
pub fn validate_renewal_date(candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, RenewalError> {
    RenewalPolicy::default().validate(candidate, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let today = date(2024, 1, 10);
        assert_eq!(validate_renewal_date(today, today), Ok(today));
        let last = today + Duration::days(28);
        assert_eq!(validate_renewal_date(last, today), Ok(last));
    }

    #[test]
    fn test_past_dates_rejected() {
        let today = date(2024, 1, 10);
        for days in [1, 2, 30, 365] {
            assert_eq!(
                validate_renewal_date(today - Duration::days(days), today),
                Err(RenewalError::PastDate)
            );
        }
    }

    #[test]
    fn test_far_dates_rejected() {
        let today = date(2024, 1, 10);
        for days in [29, 60, 400] {
            assert_eq!(
                validate_renewal_date(today + Duration::days(days), today),
                Err(RenewalError::RangeExceeded)
            );
        }
    }

    #[test]
    fn test_january_scenario() {
        let today = date(2024, 1, 10);
        assert_eq!(validate_renewal_date(date(2024, 1, 9), today), Err(RenewalError::PastDate));
        assert_eq!(validate_renewal_date(date(2024, 1, 10), today), Ok(date(2024, 1, 10)));
        assert_eq!(validate_renewal_date(date(2024, 2, 7), today), Ok(date(2024, 2, 7)));
        assert_eq!(
            validate_renewal_date(date(2024, 2, 8), today),
            Err(RenewalError::RangeExceeded)
        );
    }

    #[test]
    fn test_window_suggests_three_weeks() {
        let window = RenewalPolicy::default().window(date(2024, 1, 10));
        assert_eq!(window.earliest, date(2024, 1, 10));
        assert_eq!(window.suggested, date(2024, 1, 31));
        assert_eq!(window.latest, date(2024, 2, 7));
    }

    #[test]
    fn test_suggestion_is_configurable() {
        let today = date(2024, 1, 10);
        let policy = RenewalPolicy::new(1);
        assert_eq!(policy.window(today).suggested, date(2024, 1, 17));
        assert_eq!(policy.window(today).latest, date(2024, 2, 7));
        assert_eq!(policy.validate(date(2024, 2, 7), today), Ok(date(2024, 2, 7)));
    }

    #[test]
    fn test_suggestion_cannot_widen_window() {
        let today = date(2024, 1, 10);
        let policy = RenewalPolicy::new(6);
        assert_eq!(policy.default_weeks(), 4);
        assert_eq!(policy.window(today).suggested, date(2024, 2, 7));
        assert_eq!(policy.window(today).latest, date(2024, 2, 7));
        assert_eq!(
            policy.validate(date(2024, 2, 8), today),
            Err(RenewalError::RangeExceeded)
        );

        let policy = RenewalPolicy::new(u32::MAX);
        assert_eq!(policy.window(today).latest, date(2024, 2, 7));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(RenewalError::PastDate.to_string(), "date in the past");
        assert_eq!(RenewalError::RangeExceeded.to_string(), "date too far in the future");
    }
}
