//! Data models for the catalog

pub mod anons;
pub mod author;
pub mod book;
pub mod book_instance;
pub mod event;
pub mod genre;
pub mod user;

use serde::Deserialize;
use utoipa::IntoParams;

// Re-export commonly used types
pub use anons::Anons;
pub use author::Author;
pub use book::{Book, BookShort};
pub use book_instance::{BookInstance, BookInstanceView};
pub use event::Event;
pub use genre::{Genre, Language};
pub use user::{UserClaims, UserShort};

/// Page selection shared by list endpoints
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
pub struct Pagination {
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: i64 = 20;
    pub const MAX_PER_PAGE: i64 = 200;

    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamps() {
        let p = Pagination::default();
        assert_eq!((p.page(), p.per_page(), p.offset()), (1, 20, 0));

        let p = Pagination::new(Some(3), Some(50));
        assert_eq!(p.offset(), 100);

        let p = Pagination::new(Some(0), Some(10_000));
        assert_eq!((p.page(), p.per_page()), (1, 200));
    }

    #[test]
    fn test_huge_page_saturates() {
        let p = Pagination::new(Some(i64::MAX), Some(20));
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(Pagination::new(Some(i64::MAX), None).offset(), i64::MAX);
    }
}
