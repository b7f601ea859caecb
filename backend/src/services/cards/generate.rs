use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::RenderRequest;

use crate::pipeline::{CardRenderer, RenderOutput};

/// Actix web handler for `POST /generate-card-gotenberg`.
///
/// # Returns
/// - `200 OK` with a `RenderResponse` JSON body, or `text/html` in debug mode.
/// - The error's status (500 for pipeline failures) with
///   `{ "success": false, "error": "..." }` otherwise.
pub async fn process(
    renderer: web::Data<CardRenderer>,
    payload: web::Json<RenderRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    match renderer.render(&request).await {
        Ok(RenderOutput::Stored(response)) => HttpResponse::Ok().json(response),
        Ok(RenderOutput::Html(html)) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("Render of order {} failed: {}", request.order_id, e);
            e.error_response()
        }
    }
}
