//! Loan endpoints: lending, renewal, returns and borrowed lists

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    lending::RenewalWindow,
    models::{
        book_instance::{BookInstanceView, LendRequest, RenewRequest},
        Pagination,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Paginated borrowed copies response
#[derive(Serialize, ToSchema)]
pub struct LoansListResponse {
    pub loans: Vec<BookInstanceView>,
    pub total: i64,
}

/// Copies on loan to a user, soonest due first
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        Pagination
    ),
    responses(
        (status = 200, description = "User's borrowed copies", body = LoansListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn borrowed_by_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<LoansListResponse>> {
    claims.require_self_or_read_loans(user_id)?;
    let (loans, total) = state
        .services
        .lending
        .borrowed_by_user(user_id, &page, state.clock.today())
        .await?;
    Ok(Json(LoansListResponse { loans, total }))
}

/// Every copy on loan, soonest due first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses(
        (status = 200, description = "All borrowed copies", body = LoansListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<LoansListResponse>> {
    claims.require_staff()?;
    claims.require_read_loans()?;
    let (loans, total) = state
        .services
        .lending
        .all_borrowed(&page, state.clock.today())
        .await?;
    Ok(Json(LoansListResponse { loans, total }))
}

/// Lend a copy to a borrower
#[utoipa::path(
    post,
    path = "/instances/{id}/lend",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = LendRequest,
    responses(
        (status = 200, description = "Copy lent", body = BookInstanceView),
        (status = 400, description = "Due date outside the allowed window"),
        (status = 422, description = "Copy cannot be lent in its current status")
    )
)]
pub async fn lend(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<LendRequest>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_mark_returned()?;
    let copy = state
        .services
        .lending
        .lend(id, &data, state.clock.today())
        .await?;
    Ok(Json(copy))
}

/// Dates accepted by the renewal form
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Renewal window for today", body = RenewalWindow)
    )
)]
pub async fn renewal_window(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(_id): Path<Uuid>,
) -> AppResult<Json<RenewalWindow>> {
    claims.require_mark_returned()?;
    Ok(Json(state.services.lending.renewal_window(state.clock.today())))
}

/// Renew a loan with a new due date
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Loan renewed", body = BookInstanceView),
        (status = 400, description = "Date in the past or too far in the future"),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn renew(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<RenewRequest>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_mark_returned()?;
    let copy = state
        .services
        .lending
        .renew(id, data.renewal_date, state.clock.today())
        .await?;
    Ok(Json(copy))
}

/// Mark a borrowed copy as returned
#[utoipa::path(
    post,
    path = "/instances/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy returned and available", body = BookInstanceView),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn mark_returned(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceView>> {
    claims.require_mark_returned()?;
    let copy = state
        .services
        .lending
        .mark_returned(id, state.clock.today())
        .await?;
    Ok(Json(copy))
}
