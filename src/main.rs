use std::net::TcpListener;
use std::sync::Arc;

use secrecy::ExposeSecret;

use tcg_companion_backend::auth::{FirebaseTokenVerifier, TokenVerifier};
use tcg_companion_backend::config::settings::get_config;
use tcg_companion_backend::games::magic::MagicAdapter;
use tcg_companion_backend::games::pokemon::{LimitlessClient, PokemonAdapter};
use tcg_companion_backend::games::AdapterRegistry;
use tcg_companion_backend::run;
use tcg_companion_backend::services::{FirestoreClient, KeyValueStore, RedisStore};
use tcg_companion_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "tcg-companion-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let redis_client = match redis::Client::open(
        config.redis.connection_url().expose_secret(),
    ) {
        Ok(client) => {
            tracing::info!("Redis client created successfully");
            client
        }
        Err(e) => {
            tracing::error!("Failed to create Redis client: {}", e);
            eprintln!("Failed to create Redis client: {}", e);
            eprintln!("Redis backs the cache and rate limiter. Please ensure it is running.");
            std::process::exit(1);
        }
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::new(Arc::new(redis_client)));

    let firestore = FirestoreClient::new(
        &config.firebase.project_id,
        config.firebase.api_key.clone(),
    );
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(FirebaseTokenVerifier::new(&config.firebase));

    let limitless = Arc::new(LimitlessClient::new(&config.limitless));
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(PokemonAdapter::new(limitless)));
    registry.register(Arc::new(MagicAdapter::new()));

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        store,
        firestore,
        verifier,
        registry,
        &config.rate_limit,
    )?
    .await
}
