//! Announcement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        anons::{Anons, AnonsInput},
        Pagination,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated announcements response
#[derive(Serialize, ToSchema)]
pub struct AnonsListResponse {
    pub anons: Vec<Anons>,
    pub total: i64,
}

/// List announcements, newest first
#[utoipa::path(
    get,
    path = "/anons",
    tag = "anons",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses(
        (status = 200, description = "Announcements", body = AnonsListResponse)
    )
)]
pub async fn list_anons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<AnonsListResponse>> {
    claims.require_read_catalog()?;
    let (anons, total) = state.services.anons.list(&page).await?;
    Ok(Json(AnonsListResponse { anons, total }))
}

#[utoipa::path(
    get,
    path = "/anons/{id}",
    tag = "anons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement", body = Anons),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn get_anons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Anons>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.anons.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/anons",
    tag = "anons",
    security(("bearer_auth" = [])),
    request_body = AnonsInput,
    responses(
        (status = 201, description = "Announcement created", body = Anons)
    )
)]
pub async fn create_anons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<AnonsInput>,
) -> AppResult<(StatusCode, Json<Anons>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let anons = state.services.anons.create(&data, state.clock.today()).await?;
    Ok((StatusCode::CREATED, Json(anons)))
}

#[utoipa::path(
    put,
    path = "/anons/{id}",
    tag = "anons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Announcement ID")),
    request_body = AnonsInput,
    responses(
        (status = 200, description = "Announcement updated", body = Anons)
    )
)]
pub async fn update_anons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<AnonsInput>,
) -> AppResult<Json<Anons>> {
    claims.require_write_catalog()?;
    data.validate()?;
    let anons = state
        .services
        .anons
        .update(id, &data, state.clock.today())
        .await?;
    Ok(Json(anons))
}

#[utoipa::path(
    delete,
    path = "/anons/{id}",
    tag = "anons",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Announcement ID")),
    responses(
        (status = 204, description = "Announcement deleted")
    )
)]
pub async fn delete_anons(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.anons.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
