use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::BatchRenderRequest;

use crate::pipeline::CardRenderer;

/// Actix web handler for `POST /generate-card-pdfs`.
pub async fn process(
    renderer: web::Data<CardRenderer>,
    payload: web::Json<BatchRenderRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    match renderer.render_separately(&request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("Separate render of order {} failed: {}", request.order_id, e);
            e.error_response()
        }
    }
}
