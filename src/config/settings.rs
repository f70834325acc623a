use std::env;

use config::{Config, ConfigError, File};
use dotenv::dotenv;
use secrecy::SecretString;
use serde::Deserialize;

use crate::config::firebase::FirebaseSettings;
use crate::config::redis::RedisSettings;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub redis: RedisSettings,
    pub firebase: FirebaseSettings,
    pub limitless: LimitlessSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitlessSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_secs: i64,
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");

    let env_filename = format!("{}.yml", environment.as_str());
    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yml")))
        .add_source(File::from(configuration_directory.join(env_filename)))
        .add_source(
            config::Environment::default()
                .prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut settings = config.try_deserialize::<Settings>()?;

    // Deploy platforms expose these directly as env vars
    if let Ok(redis_url) = env::var("REDIS_URL") {
        settings.redis.url = Some(SecretString::new(redis_url.into_boxed_str()));
    }
    if let Ok(project_id) = env::var("FIREBASE_PROJECT_ID") {
        settings.firebase.project_id = project_id;
    }
    if let Ok(api_key) = env::var("FIREBASE_API_KEY") {
        settings.firebase.api_key = SecretString::new(api_key.into_boxed_str());
    }

    Ok(settings)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}
