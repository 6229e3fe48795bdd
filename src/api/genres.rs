//! Genre endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::genre::{Genre, NameInput},
    AppState,
};

use super::AuthenticatedUser;

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Genres ordered by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Genre>>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.catalog.list_genres().await?))
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Genre>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.catalog.get_genre(id).await?))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 409, description = "Genre already exists")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<NameInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let genre = state.services.catalog.create_genre(&data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Rename a genre
#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Genre updated", body = Genre)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<NameInput>,
) -> AppResult<Json<Genre>> {
    claims.require_write_catalog()?;
    data.validate()?;
    Ok(Json(state.services.catalog.update_genre(id, &data).await?))
}

/// Delete a genre (removed from every book)
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.catalog.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
