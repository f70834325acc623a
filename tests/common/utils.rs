use std::net::TcpListener;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use secrecy::SecretString;
use serde_json::{json, Value};

use tcg_companion_backend::auth::{AuthError, AuthUser, TokenVerifier};
use tcg_companion_backend::config::settings::{LimitlessSettings, RateLimitSettings};
use tcg_companion_backend::games::magic::MagicAdapter;
use tcg_companion_backend::games::pokemon::{LimitlessClient, PokemonAdapter};
use tcg_companion_backend::games::AdapterRegistry;
use tcg_companion_backend::run;
use tcg_companion_backend::services::{FirestoreClient, KeyValueStore, MemoryStore};
use tcg_companion_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ALICE: &str = "user-alice";
pub const BOB: &str = "user-bob";

/// Maps two fixed test tokens to two fixed identities. The real verifier is
/// exercised against the identity provider, not in these tests.
pub struct StaticTokenVerifier;

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        match token {
            ALICE_TOKEN => Ok(AuthUser {
                user_id: ALICE.to_string(),
                email: Some("alice@example.com".to_string()),
            }),
            BOB_TOKEN => Ok(AuthUser {
                user_id: BOB.to_string(),
                email: None,
            }),
            _ => Err(AuthError::InvalidToken("unknown test token".to_string())),
        }
    }
}

pub struct TestAppOptions {
    pub limitless_base_url: String,
    pub firestore_base_url: String,
    pub rate_limit: RateLimitSettings,
    pub store: Arc<dyn KeyValueStore>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            // Unroutable defaults; tests that talk upstream inject a mock URL.
            limitless_base_url: "http://127.0.0.1:9".to_string(),
            firestore_base_url: "http://127.0.0.1:9/documents".to_string(),
            rate_limit: RateLimitSettings {
                max_requests: 1000,
                window_secs: 3600,
            },
            store: Arc::new(MemoryStore::new()),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, body: &Value, token: &str) -> reqwest::Response {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestAppOptions::default()).await
}

pub async fn spawn_app_with(options: TestAppOptions) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let firestore = FirestoreClient::with_base_url(
        options.firestore_base_url,
        SecretString::new("test-key".into()),
    );
    let limitless = Arc::new(LimitlessClient::new(&LimitlessSettings {
        base_url: options.limitless_base_url,
    }));
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(PokemonAdapter::new(limitless)));
    registry.register(Arc::new(MagicAdapter::new()));

    let server = run(
        listener,
        options.store,
        firestore,
        Arc::new(StaticTokenVerifier),
        registry,
        &options.rate_limit,
    )
    .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        api_client: reqwest::Client::new(),
    }
}

/// Upstream tournament payload entry, dated `days_ago` days back.
pub fn upstream_tournament(id: &str, name: &str, days_ago: i64) -> Value {
    let date = chrono::Utc::now() - chrono::Duration::days(days_ago);
    json!({
        "id": id,
        "name": name,
        "date": date.to_rfc3339(),
        "format": "STANDARD",
        "players": 64,
    })
}

/// Upstream standing payload entry with a decklist around one headline card.
pub fn upstream_standing(player: &str, deck_name: &str, placing: u32) -> Value {
    json!({
        "name": player,
        "placing": placing,
        "record": { "wins": 5, "losses": 1, "ties": 0 },
        "deck": {
            "id": deck_name.to_lowercase().replace(' ', "-"),
            "name": deck_name,
            "icons": ["charizard"],
        },
        "decklist": {
            "pokemon": [
                { "name": format!("{} ex", deck_name), "set": "OBF", "number": "125", "count": 3 },
            ],
            "trainer": [
                { "name": "Rare Candy", "set": "SVI", "number": "191", "count": 4 },
            ],
            "energy": [
                { "name": "Basic Fire Energy", "count": 10 },
            ],
        },
    })
}
