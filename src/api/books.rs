//! Book pages

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;

use super::EntityId;
use crate::{error::AppResult, models::BookForm, AppState};

/// List all books
pub async fn list_books(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.books.list().await?)
}

/// Book detail page
pub async fn get_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.books.detail(id).await?)
}

pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.books.create_form().await?)
}

pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    state.respond(state.services.books.create(&form).await?)
}

pub async fn delete_book_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.books.delete_form(id).await?)
}

/// Refused while copies of the book remain
pub async fn delete_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.books.delete(id).await?)
}

pub async fn update_book_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.books.update_form(id).await?)
}

pub async fn update_book(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    state.respond(state.services.books.update(id, &form).await?)
}
