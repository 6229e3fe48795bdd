//! Events service

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::event::{
        group_by_day, month_bounds, CalendarMonth, CreateEvent, Event, EventFields, EventQuery,
        UpdateEvent,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<Event>, i64)> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if end < start {
                return Err(AppError::BadRequest("end_date must not precede start_date".to_string()));
            }
        }
        let (events, total) = self.repository.events.list(query).await?;
        Ok((events.into_iter().map(Event::with_links).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Event> {
        Ok(self.repository.events.get_by_id(id).await?.with_links())
    }

    pub async fn create(&self, data: &CreateEvent) -> AppResult<Event> {
        let fields = EventFields::from_create(data)?;
        let event = self.repository.events.create(&fields).await?;
        tracing::info!(event_id = event.id, "Event created: {}", event.title);
        Ok(event.with_links())
    }

    /// Fields left out keep their stored value
    pub async fn update(&self, id: i32, data: &UpdateEvent) -> AppResult<Event> {
        let current = self.repository.events.get_by_id(id).await?;
        let fields = EventFields::merge(&current, data)?;
        let event = self.repository.events.update(id, &fields).await?;
        tracing::info!(event_id = id, "Event updated");
        Ok(event.with_links())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.events.delete(id).await?;
        tracing::info!(event_id = id, "Event deleted");
        Ok(())
    }

    /// Events of one month grouped by day; defaults to the month of `today`
    pub async fn calendar(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        today: NaiveDate,
    ) -> AppResult<CalendarMonth> {
        let year = year.unwrap_or_else(|| today.year());
        let month = month.unwrap_or_else(|| today.month());
        let (from, until) = month_bounds(year, month)
            .ok_or_else(|| AppError::Validation(format!("Invalid month: {}-{}", year, month)))?;

        let events = self
            .repository
            .events
            .starting_between(from, until)
            .await?
            .into_iter()
            .map(Event::with_links)
            .collect();

        Ok(CalendarMonth {
            year,
            month,
            days: group_by_day(events),
        })
    }
}
