//! API handlers for the catalog REST endpoints

pub mod anons;
pub mod authors;
pub mod books;
pub mod events;
pub mod genres;
pub mod health;
pub mod instances;
pub mod languages;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Genres
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/genres/:id",
            get(genres::get_genre).put(genres::update_genre).delete(genres::delete_genre),
        )
        // Languages
        .route("/languages", get(languages::list_languages).post(languages::create_language))
        .route(
            "/languages/:id",
            get(languages::get_language)
                .put(languages::update_language)
                .delete(languages::delete_language),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author).put(authors::update_author).delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route(
            "/books/:id/instances",
            get(instances::list_instances).post(instances::create_instance),
        )
        // Copies
        .route(
            "/instances/:id",
            get(instances::get_instance)
                .put(instances::update_instance)
                .delete(instances::delete_instance),
        )
        .route("/instances/:id/status", put(instances::change_status))
        .route("/instances/:id/lend", post(loans::lend))
        .route("/instances/:id/renew", get(loans::renewal_window).post(loans::renew))
        .route("/instances/:id/return", post(loans::mark_returned))
        // Loans
        .route("/loans", get(loans::all_borrowed))
        .route("/users/:id/loans", get(loans::borrowed_by_user))
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/calendar", get(events::calendar))
        .route(
            "/events/:id",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        // Announcements
        .route("/anons", get(anons::list_anons).post(anons::create_anons))
        .route(
            "/anons/:id",
            get(anons::get_anons).put(anons::update_anons).delete(anons::delete_anons),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
