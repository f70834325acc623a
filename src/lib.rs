use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

pub mod auth;
pub mod config;
pub mod games;
mod handlers;
mod middleware;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;

use crate::auth::TokenVerifier;
use crate::config::settings::RateLimitSettings;
use crate::games::AdapterRegistry;
use crate::handlers::responses;
use crate::middleware::{RateLimit, RateLimiter};
use crate::routes::init_routes;
use crate::services::kv::SystemClock;
use crate::services::{CacheService, FirestoreClient, KeyValueStore};

pub fn run(
    listener: TcpListener,
    store: Arc<dyn KeyValueStore>,
    firestore: FirestoreClient,
    verifier: Arc<dyn TokenVerifier>,
    registry: AdapterRegistry,
    rate_limit: &RateLimitSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let cache = web::Data::new(CacheService::new(store.clone()));
    let registry = web::Data::new(registry);
    let firestore = web::Data::new(firestore);
    let verifier: web::Data<dyn TokenVerifier> = web::Data::from(verifier);
    let limiter = Arc::new(RateLimiter::new(
        store,
        Arc::new(SystemClock),
        rate_limit,
    ));

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .max_age(86400);

        let rate_limit = RateLimit::new(limiter.clone());

        // Malformed query strings and JSON bodies get the same error body
        // shape as every other failure.
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            let response = responses::bad_request(err.to_string());
            actix_web::error::InternalError::from_response(err, response).into()
        });
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let response = responses::bad_request(err.to_string());
            actix_web::error::InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(cache.clone())
            .app_data(registry.clone())
            .app_data(firestore.clone())
            .app_data(verifier.clone())
            .app_data(query_config)
            .app_data(json_config)
            .configure(|cfg| init_routes(cfg, rate_limit))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
