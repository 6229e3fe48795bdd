//! Genre and language reference tables

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book genre (e.g. Science Fiction, French Poetry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    pub fn absolute_url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Natural language a book was written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Create / replace request shared by genres and languages
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NameInput {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
}

/// Join the first three genre names for compact display.
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(3)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(id: i32, name: &str) -> Genre {
        Genre { id, name: name.to_string() }
    }

    #[test]
    fn test_display_genre_truncates_to_three() {
        let genres = vec![
            genre(1, "Fantasy"),
            genre(2, "Poetry"),
            genre(3, "History"),
            genre(4, "Satire"),
        ];
        assert_eq!(display_genre(&genres), "Fantasy, Poetry, History");
    }

    #[test]
    fn test_display_genre_short_lists() {
        assert_eq!(display_genre(&[]), "");
        assert_eq!(display_genre(&[genre(1, "Drama")]), "Drama");
    }

    #[test]
    fn test_genre_url() {
        assert_eq!(genre(7, "Drama").absolute_url(), "/catalog/genre/7");
    }
}
