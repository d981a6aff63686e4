//! Controller replies and the view renderer seam

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{error::{AppError, AppResult}, validation::FieldErrors};

/// A template name and the context it is rendered with
#[derive(Debug, Clone)]
pub struct View {
    pub template: &'static str,
    pub context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str, title: &str) -> Self {
        let mut context = Map::new();
        context.insert("title".to_string(), Value::String(title.to_string()));
        Self { template, context }
    }

    /// Add a context entry
    pub fn with(mut self, key: &str, value: impl Serialize) -> AppResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("Cannot serialize view context: {}", e)))?;
        self.context.insert(key.to_string(), value);
        Ok(self)
    }

    /// Attach validation errors, if any
    pub fn with_errors(self, errors: &FieldErrors) -> AppResult<Self> {
        if errors.is_empty() {
            return Ok(self);
        }
        self.with("errors", errors)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

/// Outcome of a controller operation
#[derive(Debug, Clone)]
pub enum Reply {
    Render(View),
    Redirect(String),
}

impl Reply {
    pub fn redirect(url: impl Into<String>) -> Self {
        Reply::Redirect(url.into())
    }

    /// The rendered view, if this reply renders one
    pub fn view(&self) -> Option<&View> {
        match self {
            Reply::Render(view) => Some(view),
            Reply::Redirect(_) => None,
        }
    }

    /// The redirect target, if this reply redirects
    pub fn location(&self) -> Option<&str> {
        match self {
            Reply::Render(_) => None,
            Reply::Redirect(url) => Some(url),
        }
    }
}

impl From<View> for Reply {
    fn from(view: View) -> Self {
        Reply::Render(view)
    }
}

/// Turns a view into a response body
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &View) -> AppResult<Response>;
}

/// Renders views as `{"template": ..., "context": ...}` JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct RenderedView<'a> {
    template: &'a str,
    context: &'a Map<String, Value>,
}

impl ViewRenderer for JsonRenderer {
    fn render(&self, view: &View) -> AppResult<Response> {
        let body = RenderedView {
            template: view.template,
            context: &view.context,
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }
}

/// Answer a reply: render its view, or redirect
pub fn respond(renderer: &dyn ViewRenderer, reply: Reply) -> AppResult<Response> {
    match reply {
        Reply::Render(view) => renderer.render(&view),
        Reply::Redirect(url) => Ok(Redirect::to(&url).into_response()),
    }
}
