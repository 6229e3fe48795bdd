//! Book instance (copy) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::book_instance::{BookInstanceView, ChangeStatus, CreateBookInstance, UpdateBookInstance},
    AppState,
};

use super::AuthenticatedUser;

/// List the copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies ordered by due date", body = Vec<BookInstanceView>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_instances(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<BookInstanceView>>> {
    claims.require_read_catalog()?;
    let copies = state
        .services
        .lending
        .list_for_book(book_id, state.clock.today())
        .await?;
    Ok(Json(copies))
}

/// Add a copy to a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstanceView)
    )
)]
pub async fn create_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(data): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstanceView>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let copy = state
        .services
        .lending
        .create(book_id, &data, state.clock.today())
        .await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Get a copy
#[utoipa::path(
    get,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy", body = BookInstanceView),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_read_catalog()?;
    Ok(Json(state.services.lending.get(id, state.clock.today()).await?))
}

/// Update imprint or owning book of a copy
#[utoipa::path(
    put,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Copy updated", body = BookInstanceView)
    )
)]
pub async fn update_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateBookInstance>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_write_catalog()?;
    data.validate()?;
    let copy = state
        .services
        .lending
        .update(id, &data, state.clock.today())
        .await?;
    Ok(Json(copy))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted")
    )
)]
pub async fn delete_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.lending.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the status of a copy
#[utoipa::path(
    put,
    path = "/instances/{id}/status",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = ChangeStatus,
    responses(
        (status = 200, description = "Status changed", body = BookInstanceView),
        (status = 400, description = "Due date outside the renewal window, or loan fields on another status"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn change_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<ChangeStatus>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_mark_returned()?;
    let copy = state
        .services
        .lending
        .change_status(id, &data, state.clock.today())
        .await?;
    Ok(Json(copy))
}
