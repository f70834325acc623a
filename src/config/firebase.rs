use secrecy::SecretString;
use serde::Deserialize;

/// Google's public key endpoint for Firebase ID token signatures.
pub const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Deserialize)]
pub struct FirebaseSettings {
    pub project_id: String,
    pub api_key: SecretString,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
}

fn default_jwks_url() -> String {
    SECURETOKEN_JWKS_URL.to_string()
}
