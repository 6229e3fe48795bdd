//! Events API endpoints (library calendar)

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
    models::event::{CalendarMonth, CalendarQuery, CreateEvent, Event, EventQuery, UpdateEvent},
    AppState,
};

use super::AuthenticatedUser;

/// Paginated events response
#[derive(Serialize, ToSchema)]
pub struct EventsListResponse {
    pub events: Vec<Event>,
    pub total: i64,
}

/// List events with filters and pagination
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    params(EventQuery),
    responses(
        (status = 200, description = "Events list", body = EventsListResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<EventsListResponse>> {
    claims.require_read_events()?;
    let (events, total) = state.services.events.list(&query).await?;
    Ok(Json(EventsListResponse { events, total }))
}

/// Events of one month, grouped by day
#[utoipa::path(
    get,
    path = "/events/calendar",
    tag = "events",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month calendar", body = CalendarMonth),
        (status = 400, description = "Invalid month")
    )
)]
pub async fn calendar(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarMonth>> {
    claims.require_read_events()?;
    let month = state
        .services
        .events
        .calendar(query.year, query.month, state.clock.today())
        .await?;
    Ok(Json(month))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Event>> {
    claims.require_read_events()?;
    let event = state.services.events.get_by_id(id).await?;
    Ok(Json(event))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    security(("bearer_auth" = [])),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Malformed time or end before start")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    claims.require_write_events()?;
    data.validate()?;
    let event = state.services.events.create(&data).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = Event)
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    claims.require_write_events()?;
    data.validate()?;
    let event = state.services.events.update(id, &data).await?;
    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted")
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_events()?;
    state.services.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
