use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::auth::{AuthError, AuthUser, TokenVerifier};
use crate::config::firebase::FirebaseSettings;

const DEFAULT_KEY_TTL_SECS: i64 = 3_600;

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Default)]
struct CachedKeys {
    keys: HashMap<String, Jwk>,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(false, |at| Utc::now() < at)
    }
}

/// Verifies Firebase ID tokens: RS256 signature against Google's rotating
/// public keys, audience = project id, issuer = the securetoken endpoint.
/// Keys are cached in-process until the upstream Cache-Control expiry.
pub struct FirebaseTokenVerifier {
    project_id: String,
    issuer: String,
    jwks_url: String,
    http: reqwest::Client,
    cached: RwLock<CachedKeys>,
}

impl FirebaseTokenVerifier {
    pub fn new(settings: &FirebaseSettings) -> Self {
        Self {
            project_id: settings.project_id.clone(),
            issuer: format!("https://securetoken.google.com/{}", settings.project_id),
            jwks_url: settings.jwks_url.clone(),
            http: reqwest::Client::new(),
            cached: RwLock::new(CachedKeys::default()),
        }
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let cached = self.cached.read().await;
            if cached.is_fresh() {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        // Stale cache or unknown kid (key rotation): refresh.
        let mut cached = self.cached.write().await;
        if !cached.is_fresh() || !cached.keys.contains_key(kid) {
            let response = self
                .http
                .get(&self.jwks_url)
                .send()
                .await
                .map_err(|err| AuthError::VerificationUnavailable(err.to_string()))?;

            let max_age = response
                .headers()
                .get("Cache-Control")
                .and_then(|value| value.to_str().ok())
                .and_then(parse_max_age)
                .unwrap_or(DEFAULT_KEY_TTL_SECS);

            let jwks: JwkSet = response
                .json()
                .await
                .map_err(|err| AuthError::VerificationUnavailable(err.to_string()))?;

            cached.keys = jwks
                .keys
                .into_iter()
                .map(|key| (key.kid.clone(), key))
                .collect();
            cached.expires_at = Some(Utc::now() + Duration::seconds(max_age));
            tracing::debug!(
                "Refreshed {} signing keys, valid for {}s",
                cached.keys.len(),
                max_age
            );
        }

        cached
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id {}", kid)))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let header =
            decode_header(token).map_err(|err| AuthError::InvalidToken(err.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token without key id".into()))?;

        let jwk = self.signing_key(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        Ok(AuthUser {
            user_id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}

fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_age_parses_from_cache_control() {
        assert_eq!(parse_max_age("public, max-age=19302, must-revalidate"), Some(19302));
        assert_eq!(parse_max_age("max-age=60"), Some(60));
        assert_eq!(parse_max_age("no-store"), None);
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let verifier = FirebaseTokenVerifier::new(&FirebaseSettings {
            project_id: "demo".into(),
            api_key: secrecy::SecretString::new("k".into()),
            jwks_url: "http://127.0.0.1:0/jwks".into(),
        });
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
