use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub url: Option<SecretString>,
}

impl RedisSettings {
    pub fn connection_url(&self) -> SecretString {
        match &self.url {
            Some(url) => url.clone(),
            None => {
                let url = match &self.password {
                    Some(password) if !password.expose_secret().is_empty() => {
                        format!(
                            "redis://:{}@{}:{}",
                            password.expose_secret(),
                            self.host,
                            self.port
                        )
                    }
                    _ => format!("redis://{}:{}", self.host, self.port),
                };
                SecretString::new(url.into_boxed_str())
            }
        }
    }
}
