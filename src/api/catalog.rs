//! Catalog home page

use axum::{extract::State, response::Response};

use crate::{error::AppResult, AppState};

/// Home page with collection counts
pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    state.respond(state.services.catalog.index().await?)
}
