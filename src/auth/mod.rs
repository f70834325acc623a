use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use async_trait::async_trait;

use crate::handlers::responses::ErrorBody;

pub mod firebase;

pub use firebase::FirebaseTokenVerifier;

/// Identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingHeader,
    #[error("Invalid token")]
    InvalidToken(String),
    #[error("Authentication failed")]
    VerificationUnavailable(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::InvalidToken(reason) => {
                tracing::warn!("Token rejected: {}", reason)
            }
            AuthError::VerificationUnavailable(reason) => {
                tracing::error!("Token verification unavailable: {}", reason)
            }
            AuthError::MissingHeader => {}
        }
        HttpResponse::Unauthorized().json(ErrorBody {
            error: self.to_string(),
            message: None,
        })
    }
}

/// Verifies a bearer token against the identity provider and yields the
/// caller's identity. Behind a trait so tests can substitute a static
/// verifier instead of exercising RS256.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Extractor for handlers behind the authentication gate.
pub struct AuthenticatedUser {
    pub user: AuthUser,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let verifier = req.app_data::<web::Data<dyn TokenVerifier>>().cloned();
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let verifier = verifier.ok_or_else(|| {
                AuthError::VerificationUnavailable("no token verifier configured".into())
            })?;
            let auth_header = auth_header.ok_or(AuthError::MissingHeader)?;
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(AuthError::MissingHeader)?
                .trim();
            if token.is_empty() {
                return Err(AuthError::MissingHeader);
            }
            let user = verifier.verify(token).await?;
            Ok(AuthenticatedUser { user })
        })
    }
}
