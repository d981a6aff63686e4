//! Genre pages

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;

use super::EntityId;
use crate::{error::AppResult, models::GenreForm, AppState};

/// List all genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.genres.list().await?)
}

/// Genre detail page
pub async fn get_genre(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.genres.detail(id).await?)
}

pub async fn create_genre_form(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.genres.create_form()?)
}

/// Redirects to an existing genre of the same name instead of duplicating it
pub async fn create_genre(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    state.respond(state.services.genres.create(&form).await?)
}

pub async fn delete_genre_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.genres.delete_form(id).await?)
}

/// Refused while books are still tagged with the genre
pub async fn delete_genre(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.genres.delete(id).await?)
}

pub async fn update_genre_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Response> {
    state.respond(state.services.genres.update_form(id).await?)
}

pub async fn update_genre(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    state.respond(state.services.genres.update(id, &form).await?)
}
