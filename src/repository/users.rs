//! Users repository (read-only: accounts are managed by the identity provider)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::UserShort,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_short(&self, id: i32) -> AppResult<UserShort> {
        sqlx::query_as::<_, UserShort>(
            "SELECT id, username, first_name, last_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<UserShort>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, UserShort>(
            "SELECT id, username, first_name, last_name FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
