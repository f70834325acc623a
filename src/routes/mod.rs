use actix_web::{web, HttpResponse};

use crate::handlers::{health, meta, responses, tournaments, user_matches, user_tournaments};
use crate::middleware::RateLimit;

async fn endpoint_not_found() -> HttpResponse {
    responses::not_found("Endpoint not found")
}

pub fn init_routes(cfg: &mut web::ServiceConfig, rate_limit: RateLimit) {
    cfg.route("/health", web::get().to(health::health_check));

    cfg.service(
        web::scope("/v1")
            .wrap(rate_limit)
            // User-owned records. Registered before the templated {game}
            // routes so "user" never resolves as a game id.
            .service(
                web::scope("/user")
                    .service(
                        web::resource("/tournaments")
                            .route(web::post().to(user_tournaments::create_tournament))
                            .route(web::get().to(user_tournaments::list_tournaments))
                            .route(web::route().to(|| async {
                                responses::method_not_allowed(&["GET", "POST"])
                            })),
                    )
                    .service(
                        web::resource("/tournaments/{id}")
                            .route(web::put().to(user_tournaments::update_tournament))
                            .route(web::delete().to(user_tournaments::delete_tournament))
                            .route(web::route().to(|| async {
                                responses::method_not_allowed(&["PUT", "DELETE"])
                            })),
                    )
                    .service(
                        web::resource("/matches")
                            .route(web::post().to(user_matches::create_match))
                            .route(web::get().to(user_matches::list_matches))
                            .route(web::route().to(|| async {
                                responses::method_not_allowed(&["GET", "POST"])
                            })),
                    )
                    .service(
                        web::resource("/matches/{id}")
                            .route(web::put().to(user_matches::update_match))
                            .route(web::delete().to(user_matches::delete_match))
                            .route(web::route().to(|| async {
                                responses::method_not_allowed(&["PUT", "DELETE"])
                            })),
                    ),
            )
            // Legacy routes, kept for clients that predate multi-game support.
            .route("/meta/top", web::get().to(meta::legacy_meta_top))
            .route("/meta/deck/{name}", web::get().to(meta::legacy_deck_details))
            .route("/tournaments/recent", web::get().to(tournaments::legacy_recent))
            // Multi-game routes.
            .route("/{game}/meta/top", web::get().to(meta::meta_top))
            .route("/{game}/meta/deck/{name}", web::get().to(meta::deck_details))
            .route("/{game}/tournaments/recent", web::get().to(tournaments::recent)),
    );

    cfg.default_service(web::route().to(endpoint_not_found));
}
