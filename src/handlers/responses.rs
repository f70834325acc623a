use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::games::AdapterError;

/// Uniform error body: `{error, message?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    message: Option<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        error: error.into(),
        message,
    })
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, message, None)
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, message, None)
}

pub fn forbidden() -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, "Forbidden", None)
}

pub fn internal_error(error: impl Into<String>, message: impl ToString) -> HttpResponse {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        error,
        Some(message.to_string()),
    )
}

pub fn method_not_allowed(allowed: &[&str]) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header(("Allow", allowed.join(", ")))
        .json(ErrorBody {
            error: "Method not allowed".into(),
            message: None,
        })
}

pub fn rate_limited(retry_after: i64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(json!({
            "error": "Rate limit exceeded",
            "retryAfter": retry_after,
        }))
}

pub fn coming_soon(game: &str) -> HttpResponse {
    HttpResponse::NotImplemented().json(ErrorBody {
        error: "Coming soon".into(),
        message: Some(format!(
            "{} support is not yet implemented. Currently only Pokemon TCG is available.",
            game
        )),
    })
}

/// 200 response with the cache-status header the clients key off.
pub fn json_with_cache<T: Serialize>(body: &T, cache_status: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("X-Cache", cache_status))
        .json(body)
}

/// Map an adapter failure to its response: stubs report not-implemented,
/// anything else is an internal error.
pub fn adapter_error(game: &str, err: &AdapterError) -> HttpResponse {
    match err {
        AdapterError::NotImplemented { .. } => coming_soon(game),
        other => internal_error("Internal server error", other),
    }
}
