//! HTTP handlers and routes for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{error::AppError, AppState};

/// Document identifier taken from the `:id` path segment.
///
/// An identifier that does not parse cannot name a document, so it is
/// rejected as not found.
pub struct EntityId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Uuid::parse_str(&raw)
            .map(EntityId)
            .map_err(|_| AppError::NotFound(format!("No document with id {}", raw)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route(
            "/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        .route(
            "/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/book/:id", get(books::get_book))
        .route(
            "/book/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        .route(
            "/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route(
            "/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        .route(
            "/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form)
                .post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form)
                .post(book_instances::delete_book_instance),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form)
                .post(book_instances::update_book_instance),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
