//! Events repository

use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        event::{end_of_day, Event, EventFields, EventQuery},
        Pagination,
    },
};

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with optional date filters and pagination
    pub async fn list(&self, query: &EventQuery) -> AppResult<(Vec<Event>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        let from = query.start_date.and_then(|d| d.and_hms_opt(0, 0, 0));
        let until = query.end_date.and_then(end_of_day);

        if from.is_some() {
            conditions.push(format!("start_time >= ${}", idx));
            idx += 1;
        }
        if until.is_some() {
            conditions.push(format!("start_time < ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_q = format!("SELECT COUNT(*) FROM events {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(f) = from { count_builder = count_builder.bind(f); }
        if let Some(u) = until { count_builder = count_builder.bind(u); }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows
        let select_q = format!(
            "SELECT * FROM events {} ORDER BY start_time, id LIMIT {} OFFSET {}",
            where_clause,
            page.per_page(),
            page.offset()
        );
        let mut builder = sqlx::query_as::<_, Event>(&select_q);
        if let Some(f) = from { builder = builder.bind(f); }
        if let Some(u) = until { builder = builder.bind(u); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Events starting in `[from, until)`, ordered by start time
    pub async fn starting_between(&self, from: NaiveDateTime, until: NaiveDateTime) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE start_time >= $1 AND start_time < $2 ORDER BY start_time, id",
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Create an event
    pub async fn create(&self, data: &EventFields) -> AppResult<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an event
    pub async fn update(&self, id: i32, data: &EventFields) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET title = $1, description = $2, start_time = $3, end_time = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Delete an event
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }
}
