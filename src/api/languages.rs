//! Language endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::genre::{Language, NameInput},
    AppState,
};

use super::AuthenticatedUser;

/// List all languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Languages ordered by name", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Language>>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.catalog.list_languages().await?))
}

/// Get language by ID
#[utoipa::path(
    get,
    path = "/languages/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.catalog.get_language(id).await?))
}

/// Create a language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = NameInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 409, description = "Language already exists")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<NameInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let language = state.services.catalog.create_language(&data).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Rename a language
#[utoipa::path(
    put,
    path = "/languages/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = NameInput,
    responses(
        (status = 200, description = "Language updated", body = Language)
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<NameInput>,
) -> AppResult<Json<Language>> {
    claims.require_write_catalog()?;
    data.validate()?;
    Ok(Json(state.services.catalog.update_language(id, &data).await?))
}

/// Delete a language (books keep no language)
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
