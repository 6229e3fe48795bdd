//! Book (catalog entry, not a physical copy) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::Author;
use super::book_instance::BookInstanceView;
use super::genre::{display_genre, Genre, Language};

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    /// 13 character ISBN, unique across the catalog
    pub isbn: String,
    pub photo: Option<String>,
    pub language_id: Option<i32>,
    /// Featured in announcements
    pub is_anonsed: bool,
    pub year_of_creation: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    pub fn absolute_url(&self) -> String {
        book_url(self.id)
    }

    pub fn display_genre(&self) -> String {
        display_genre(&self.genres)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

pub fn book_url(id: i32) -> String {
    format!("/catalog/book/{}", id)
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub year_of_creation: i32,
    pub is_anonsed: bool,
    /// First three genre names, comma separated
    #[sqlx(skip)]
    #[serde(default)]
    pub genre: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub url: String,
}

/// Book with resolved relations, for the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
    pub genre: String,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub instances: Vec<BookInstanceView>,
}

/// Create / replace book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(max = 1000, message = "Summary is limited to 1000 characters"))]
    #[serde(default)]
    pub summary: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
    /// Uploaded file name; stored under the dated photo directory
    pub photo: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub is_anonsed: bool,
    pub year_of_creation: i32,
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Search in title (case insensitive)
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    /// Only books flagged for announcements
    pub anonsed: Option<bool>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}
