//! Local library catalog
//!
//! Authors, books, genres and book copies, served as HTML-style form
//! pages: list, detail, create, update and guarded delete for each.

use std::sync::Arc;

use axum::response::Response;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use views::{JsonRenderer, Reply, ViewRenderer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl AppState {
    /// State over the given store, rendering views as JSON
    pub fn new(repository: Repository) -> Self {
        Self::with_renderer(repository, Arc::new(JsonRenderer))
    }

    pub fn with_renderer(
        repository: Repository,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self {
            services: Arc::new(Services::new(repository)),
            renderer,
        }
    }

    /// Turn a controller reply into a response
    pub fn respond(&self, reply: Reply) -> AppResult<Response> {
        views::respond(self.renderer.as_ref(), reply)
    }
}
