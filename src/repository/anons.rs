//! Announcements repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        anons::{Anons, AnonsInput},
        Pagination,
    },
};

#[derive(Clone)]
pub struct AnonsRepository {
    pool: Pool<Postgres>,
}

impl AnonsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Newest first
    pub async fn list(&self, page: &Pagination) -> AppResult<(Vec<Anons>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM anons")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Anons>(
            "SELECT * FROM anons ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.per_page())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Anons> {
        sqlx::query_as::<_, Anons>("SELECT * FROM anons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement {} not found", id)))
    }

    pub async fn create(&self, data: &AnonsInput, photo: Option<String>) -> AppResult<Anons> {
        let row = sqlx::query_as::<_, Anons>(
            "INSERT INTO anons (title, content, photo) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace an announcement. A `None` photo keeps the stored one.
    pub async fn update(&self, id: i64, data: &AnonsInput, photo: Option<String>) -> AppResult<Anons> {
        sqlx::query_as::<_, Anons>(
            r#"
            UPDATE anons SET title = $1, content = $2, photo = COALESCE($3, photo), updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(photo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Announcement {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM anons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Announcement {} not found", id)));
        }
        Ok(())
    }
}
