//! # HTTP Services
//!
//! - `cards`: the card rendering endpoints.
//!
//! Every response carries permissive CORS headers (see [`cors_headers`]), and
//! `OPTIONS` requests are answered with an empty `200 OK`.

pub mod cards;

use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse};
use common::responses::ErrorResponse;

pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add((
            "Access-Control-Allow-Headers",
            "authorization, x-client-info, apikey, content-type",
        ))
}

/// Empty `200 OK`; the CORS headers come from [`cors_headers`].
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Answers stray CORS preflights; everything else unmatched is a 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return preflight().await;
    }
    HttpResponse::NotFound().json(ErrorResponse {
        success: false,
        error: format!("No route for {} {}", req.method(), req.path()),
    })
}

/// JSON extractor settings: body size limit and JSON-shaped parse errors.
pub fn json_config(limit: usize) -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(ErrorResponse {
                success: false,
                error: format!("Invalid request: {}", err),
            });
            actix_web::error::InternalError::from_response(err, response).into()
        })
}
