//! Overdue derivation for book copies

use chrono::NaiveDate;

/// A copy is overdue when it has a due date and `today` is strictly after it.
pub fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    matches!(due_back, Some(due) if today > due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_due_date_is_never_overdue() {
        assert!(!is_overdue(None, date(2024, 1, 10)));
        assert!(!is_overdue(None, date(1970, 1, 1)));
        assert!(!is_overdue(None, date(2999, 12, 31)));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = date(2024, 1, 10);
        assert!(!is_overdue(Some(today), today));
    }

    #[test]
    fn test_due_yesterday_is_overdue() {
        let today = date(2024, 1, 10);
        assert!(is_overdue(Some(today - Duration::days(1)), today));
    }

    #[test]
    fn test_due_in_future_is_not_overdue() {
        let today = date(2024, 1, 10);
        assert!(!is_overdue(Some(today + Duration::days(1)), today));
    }

    #[test]
    fn test_scenario_one_day_late() {
        assert!(is_overdue(Some(date(2024, 1, 5)), date(2024, 1, 6)));
    }
}
