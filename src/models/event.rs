//! Calendar event model
//!
//! Start and end times travel as HTML5 `datetime-local` strings
//! (`YYYY-MM-DDTHH:MM`) and are stored as naive local timestamps.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Input / output format of event times
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventTimeError {
    #[error("{field}: expected YYYY-MM-DDTHH:MM, got {value:?}")]
    Malformed { field: &'static str, value: String },
    #[error("end_time must be after start_time")]
    EndBeforeStart,
}

pub fn parse_datetime_local(field: &'static str, value: &str) -> Result<NaiveDateTime, EventTimeError> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_LOCAL_FORMAT).map_err(|_| {
        EventTimeError::Malformed {
            field,
            value: value.to_string(),
        }
    })
}

pub fn check_time_order(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), EventTimeError> {
    if end > start {
        Ok(())
    } else {
        Err(EventTimeError::EndBeforeStart)
    }
}

mod datetime_local {
    use super::DATETIME_LOCAL_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_LOCAL_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_LOCAL_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(with = "datetime_local")]
    #[schema(value_type = String, example = "2024-01-10T18:30")]
    pub start_time: NaiveDateTime,
    #[serde(with = "datetime_local")]
    #[schema(value_type = String, example = "2024-01-10T20:00")]
    pub end_time: NaiveDateTime,
    /// Staff edit page
    #[sqlx(skip)]
    #[serde(default)]
    pub edit_url: String,
}

impl Event {
    pub fn with_links(mut self) -> Self {
        self.edit_url = edit_url(self.id);
        self
    }

    /// Anchor pointing at the staff edit page, for calendar cells
    pub fn html_link(&self) -> String {
        format!("<a href=\"{}\"> {} </a>", edit_url(self.id), escape_html(&self.title))
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

pub fn edit_url(id: i32) -> String {
    format!("/admin/events/{}/edit", id)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Create event request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Start (YYYY-MM-DDTHH:MM)
    pub start_time: String,
    /// End (YYYY-MM-DDTHH:MM)
    pub end_time: String,
}

/// Update event request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Parsed and checked event fields, ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl EventFields {
    pub fn from_create(data: &CreateEvent) -> Result<Self, EventTimeError> {
        let start_time = parse_datetime_local("start_time", &data.start_time)?;
        let end_time = parse_datetime_local("end_time", &data.end_time)?;
        check_time_order(start_time, end_time)?;
        Ok(Self {
            title: data.title.clone(),
            description: data.description.clone(),
            start_time,
            end_time,
        })
    }

    /// Apply a partial update on top of the stored event
    pub fn merge(current: &Event, data: &UpdateEvent) -> Result<Self, EventTimeError> {
        let start_time = match data.start_time {
            Some(ref s) => parse_datetime_local("start_time", s)?,
            None => current.start_time,
        };
        let end_time = match data.end_time {
            Some(ref s) => parse_datetime_local("end_time", s)?,
            None => current.end_time,
        };
        check_time_order(start_time, end_time)?;
        Ok(Self {
            title: data.title.clone().unwrap_or_else(|| current.title.clone()),
            description: data
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            start_time,
            end_time,
        })
    }
}

/// Query parameters for events
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Events starting on or after this date (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Events starting on or before this date (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

/// Calendar month selector; defaults to the current month
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Events of one day
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarDay {
    pub day: u32,
    pub events: Vec<Event>,
    /// Ready-made anchors to each event's edit page
    pub links: Vec<String>,
}

/// One month of events, grouped by day
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// `[first day of month 00:00, first day of next month 00:00)`
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first.and_hms_opt(0, 0, 0)?, next.and_hms_opt(0, 0, 0)?))
}

/// Group events (already ordered by start time) by the day they start on.
/// Days without events are left out.
pub fn group_by_day(events: Vec<Event>) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = Vec::new();
    for event in events {
        let day = event.start_time.day();
        let link = event.html_link();
        match days.last_mut() {
            Some(last) if last.day == day => {
                last.events.push(event);
                last.links.push(link);
            }
            _ => days.push(CalendarDay {
                day,
                events: vec![event],
                links: vec![link],
            }),
        }
    }
    days
}

/// Upper bound of a date filter, as an exclusive timestamp
pub fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.succ_opt()?.and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_datetime_local("t", s).unwrap()
    }

    fn event(id: i32, start: &str, end: &str) -> Event {
        Event {
            id,
            title: format!("Event {}", id),
            description: String::new(),
            start_time: at(start),
            end_time: at(end),
            edit_url: String::new(),
        }
    }

    #[test]
    fn test_parse_datetime_local() {
        let parsed = at("2024-01-10T18:30");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2024-01-10 18:30");
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        for bad in ["2024-01-10 18:30", "10/01/2024 18:30", "2024-01-10", "2024-13-01T00:00", ""] {
            let err = parse_datetime_local("start_time", bad).unwrap_err();
            assert!(matches!(err, EventTimeError::Malformed { field: "start_time", .. }));
        }
    }

    #[test]
    fn test_serializes_in_form_format() {
        let json = serde_json::to_value(event(1, "2024-01-10T18:30", "2024-01-10T20:00")).unwrap();
        assert_eq!(json["start_time"], "2024-01-10T18:30");
        assert_eq!(json["end_time"], "2024-01-10T20:00");
    }

    #[test]
    fn test_create_requires_end_after_start() {
        let data = CreateEvent {
            title: "Poetry night".to_string(),
            description: String::new(),
            start_time: "2024-01-10T20:00".to_string(),
            end_time: "2024-01-10T20:00".to_string(),
        };
        assert_eq!(EventFields::from_create(&data), Err(EventTimeError::EndBeforeStart));
    }

    #[test]
    fn test_merge_keeps_unchanged_fields() {
        let current = event(4, "2024-01-10T18:00", "2024-01-10T19:00");
        let update = UpdateEvent {
            title: None,
            description: Some("Moved".to_string()),
            start_time: None,
            end_time: Some("2024-01-10T21:00".to_string()),
        };
        let merged = EventFields::merge(&current, &update).unwrap();
        assert_eq!(merged.title, "Event 4");
        assert_eq!(merged.description, "Moved");
        assert_eq!(merged.start_time, at("2024-01-10T18:00"));
        assert_eq!(merged.end_time, at("2024-01-10T21:00"));

        let update = UpdateEvent {
            title: None,
            description: None,
            start_time: Some("2024-01-10T19:30".to_string()),
            end_time: None,
        };
        assert_eq!(
            EventFields::merge(&current, &update),
            Err(EventTimeError::EndBeforeStart)
        );
    }

    #[test]
    fn test_links() {
        let mut e = event(9, "2024-01-10T18:00", "2024-01-10T19:00");
        e.title = "Q&A <live>".to_string();
        assert_eq!(e.html_link(), "<a href=\"/admin/events/9/edit\"> Q&amp;A &lt;live&gt; </a>");
        assert_eq!(e.with_links().edit_url, "/admin/events/9/edit");
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start, at("2024-12-01T00:00"));
        assert_eq!(end, at("2025-01-01T00:00"));
        assert!(month_bounds(2024, 13).is_none());
    }

    #[test]
    fn test_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(end_of_day(date), Some(at("2024-03-01T00:00")));
        assert_eq!(end_of_day(NaiveDate::MAX), None);
    }

    #[test]
    fn test_group_by_day() {
        let days = group_by_day(vec![
            event(1, "2024-01-03T10:00", "2024-01-03T11:00"),
            event(2, "2024-01-03T15:00", "2024-01-03T16:00"),
            event(3, "2024-01-17T10:00", "2024-01-17T12:00"),
        ]);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, 3);
        assert_eq!(days[0].events.len(), 2);
        assert_eq!(days[1].day, 17);
        assert_eq!(days[1].events[0].id, 3);
        assert_eq!(days[1].links, vec!["<a href=\"/admin/events/3/edit\"> Event 3 </a>"]);
    }
}
