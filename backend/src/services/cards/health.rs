use actix_web::{HttpResponse, Responder};

pub async fn process() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
