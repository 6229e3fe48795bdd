//! Book (catalog entry) endpoints

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
    models::book::{Book, BookDetails, BookInput, BookQuery, BookShort},
    AppState,
};

use super::AuthenticatedUser;

/// Paginated books response
#[derive(Serialize, ToSchema)]
pub struct BooksListResponse {
    pub books: Vec<BookShort>,
    pub total: i64,
}

/// Search books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books ordered by title then author", body = BooksListResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BooksListResponse>> {
    claims.require_read_catalog()?;
    let (books, total) = state.services.catalog.search_books(&query).await?;
    Ok(Json(BooksListResponse { books, total }))
}

/// Get book with author, language, genres and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    claims.require_read_catalog()?;
    let book = state.services.catalog.get_book(id, state.clock.today()).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or unknown reference"),
        (status = 409, description = "ISBN already used")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_write_catalog()?;
    data.validate()?;
    let book = state
        .services
        .catalog
        .create_book(&data, state.clock.today())
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book and its genres
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 409, description = "ISBN already used")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInput>,
) -> AppResult<Json<Book>> {
    claims.require_write_catalog()?;
    data.validate()?;
    let book = state
        .services
        .catalog
        .update_book(id, &data, state.clock.today())
        .await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 409, description = "Book still has copies")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
