//! Book instance pages

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;

use super::EntityId;
use crate::{error::AppResult, models::BookInstanceForm, AppState};

/// List all book instances
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.book_instances.list().await?)
}

/// Book instance detail page
pub async fn get_book_instance(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.detail(id).await?)
}

pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.book_instances.create_form().await?)
}

pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.create(&form).await?)
}

pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.delete_form(id).await?)
}

pub async fn delete_book_instance(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.delete(id).await?)
}

pub async fn update_book_instance_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.update_form(id).await?)
}

pub async fn update_book_instance(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    state.respond(state.services.book_instances.update(id, &form).await?)
}
