//! Announcements ("anons") shown on the front page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Anons {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Anons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Create / replace announcement request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnonsInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Uploaded file name; stored under the dated photo directory
    pub photo: Option<String>,
}
