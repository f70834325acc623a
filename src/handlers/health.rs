use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
