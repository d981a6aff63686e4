//! Author pages

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;

use super::EntityId;
use crate::{error::AppResult, models::AuthorForm, AppState};

/// List all authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.authors.list().await?)
}

/// Author detail page
pub async fn get_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.authors.detail(id).await?)
}

pub async fn create_author_form(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.authors.create_form()?)
}

pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    state.respond(state.services.authors.create(&form).await?)
}

pub async fn delete_author_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.authors.delete_form(id).await?)
}

/// Refused while books still reference the author
pub async fn delete_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.authors.delete(id).await?)
}

pub async fn update_author_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.authors.update_form(id).await?)
}

pub async fn update_author(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    state.respond(state.services.authors.update(id, &form).await?)
}
