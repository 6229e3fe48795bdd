//! Author endpoints

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
        author::{Author, AuthorDetails, AuthorInput},
        Pagination,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated authors response
#[derive(Serialize, ToSchema)]
pub struct AuthorsListResponse {
    pub authors: Vec<Author>,
    pub total: i64,
}

/// List authors ordered by last name, first name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses(
        (status = 200, description = "Authors list", body = AuthorsListResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<AuthorsListResponse>> {
    claims.require_read_catalog()?;
    let (authors, total) = state.services.catalog.list_authors(&page).await?;
    Ok(Json(AuthorsListResponse { authors, total }))
}

/// Get author with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.catalog.get_author(id).await?))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let author = state
        .services
        .catalog
        .create_author(&data, state.clock.today())
        .await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AuthorInput>,
) -> AppResult<Json<Author>> {
    claims.require_write_catalog()?;
    data.validate()?;
    let author = state
        .services
        .catalog
        .update_author(id, &data, state.clock.today())
        .await?;
    Ok(Json(author))
}

/// Delete an author (their books are kept without author)
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
