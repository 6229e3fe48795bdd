//! Catalog server
//!
//! REST JSON API for a small lending library: the book catalog, physical
//! copies and their loans, an events calendar and front page announcements.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lending;
pub mod media;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Source of "today" for loan dates
    pub clock: Arc<dyn lending::Clock>,
}
