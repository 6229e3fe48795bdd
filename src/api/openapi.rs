//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{anons, authors, books, events, genres, health, instances, languages, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.3.0",
        description = "Local library catalog: books, copies, loans, events and announcements",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Copies
        instances::list_instances,
        instances::create_instance,
        instances::get_instance,
        instances::update_instance,
        instances::delete_instance,
        instances::change_status,
        // Loans
        loans::borrowed_by_user,
        loans::all_borrowed,
        loans::lend,
        loans::renewal_window,
        loans::renew,
        loans::mark_returned,
        // Events
        events::list_events,
        events::calendar,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        // Announcements
        anons::list_anons,
        anons::get_anons,
        anons::create_anons,
        anons::update_anons,
        anons::delete_anons,
    ),
    components(
        schemas(
            // Catalog
            crate::models::genre::Genre,
            crate::models::genre::Language,
            crate::models::genre::NameInput,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::AuthorInput,
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::BookInput,
            crate::models::user::UserShort,
            authors::AuthorsListResponse,
            books::BooksListResponse,
            // Copies and loans
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceView,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::UpdateBookInstance,
            crate::models::book_instance::ChangeStatus,
            crate::models::book_instance::LendRequest,
            crate::models::book_instance::RenewRequest,
            crate::lending::LoanStatus,
            crate::lending::RenewalWindow,
            loans::LoansListResponse,
            // Events
            crate::models::event::Event,
            crate::models::event::CreateEvent,
            crate::models::event::UpdateEvent,
            crate::models::event::CalendarDay,
            crate::models::event::CalendarMonth,
            events::EventsListResponse,
            // Announcements
            crate::models::anons::Anons,
            crate::models::anons::AnonsInput,
            anons::AnonsListResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Genres, languages, authors and books"),
        (name = "instances", description = "Physical copies of books"),
        (name = "loans", description = "Lending, renewal and returns"),
        (name = "events", description = "Library events calendar"),
        (name = "anons", description = "Front page announcements")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
