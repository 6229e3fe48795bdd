//! Announcements service

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    media,
    models::{
        anons::{Anons, AnonsInput},
        Pagination,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AnonsService {
    repository: Repository,
}

impl AnonsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, page: &Pagination) -> AppResult<(Vec<Anons>, i64)> {
        self.repository.anons.list(page).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Anons> {
        self.repository.anons.get_by_id(id).await
    }

    pub async fn create(&self, data: &AnonsInput, today: NaiveDate) -> AppResult<Anons> {
        check_title(data)?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        let anons = self.repository.anons.create(data, photo).await?;
        tracing::info!(anons_id = anons.id, "Announcement created: {}", anons.title);
        Ok(anons)
    }

    pub async fn update(&self, id: i64, data: &AnonsInput, today: NaiveDate) -> AppResult<Anons> {
        check_title(data)?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        self.repository.anons.update(id, data, photo).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.anons.delete(id).await?;
        tracing::info!(anons_id = id, "Announcement deleted");
        Ok(())
    }
}

fn check_title(data: &AnonsInput) -> AppResult<()> {
    if data.title.trim().is_empty() {
        return Err(AppError::Validation("Title cannot be blank".to_string()));
    }
    Ok(())
}
