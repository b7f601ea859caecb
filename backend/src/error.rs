//! Error type shared by the whole rendering pipeline.
//!
//! Every failure of a render request ends up as a [`RenderError`]. The HTTP
//! layer turns it into `{ "success": false, "error": "<message>" }`; callers
//! only ever see the message string.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The front-cover art could not be inlined for a production render.
    #[error("Template image could not be loaded for production render: {0}")]
    TemplateImageUnavailable(String),

    #[error("Required {kind} image could not be loaded: {path} ({reason})")]
    AssetUnavailable {
        kind: &'static str,
        path: String,
        reason: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-2xx answer from the HTML-to-PDF service.
    #[error("Render service returned {status}: {body}")]
    RenderService { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order {0} was regenerated concurrently, combined PDF not recorded")]
    ConcurrentRegeneration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

impl ResponseError for RenderError {
    fn status_code(&self) -> StatusCode {
        match self {
            RenderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RenderError::ConcurrentRegeneration(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: self.to_string(),
        })
    }
}
