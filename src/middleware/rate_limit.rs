use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::config::settings::RateLimitSettings;
use crate::handlers::responses;
use crate::services::kv::{Clock, KeyValueStore};

/// Fixed-window request counter, one bucket per client IP per window. The
/// counter lives in the shared key-value store with a TTL equal to the
/// window, so buckets clean themselves up.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    max_requests: u32,
    window_secs: i64,
}

pub enum Decision {
    Allowed,
    Limited { retry_after: i64 },
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: &RateLimitSettings,
    ) -> Self {
        Self {
            store,
            clock,
            max_requests: settings.max_requests,
            window_secs: settings.window_secs,
        }
    }

    /// Count this request against the client's current window. Store errors
    /// fail open: a broken counter must not take the API down with it.
    pub async fn check(&self, client_ip: &str) -> Decision {
        let now = self.clock.now();
        let bucket = now / self.window_secs;
        let key = format!("ratelimit:{}:{}", client_ip, bucket);

        let count: u32 = match self.store.get(&key).await {
            Ok(value) => value.and_then(|raw| raw.parse().ok()).unwrap_or(0),
            Err(err) => {
                tracing::warn!("Rate limit store read failed, allowing request: {}", err);
                return Decision::Allowed;
            }
        };

        if count >= self.max_requests {
            return Decision::Limited {
                retry_after: self.window_secs - (now % self.window_secs),
            };
        }

        if let Err(err) = self
            .store
            .put(&key, &(count + 1).to_string(), self.window_secs as u64)
            .await
        {
            tracing::warn!("Rate limit store write failed, allowing request: {}", err);
        }
        Decision::Allowed
    }
}

/// Client identity for the window key: the forwarded address when a proxy
/// set one, else the peer IP with the ephemeral port stripped.
fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    info.realip_remote_addr()
        .map(|addr| match addr.parse::<std::net::SocketAddr>() {
            Ok(socket) => socket.ip().to_string(),
            Err(_) => addr.to_string(),
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, thiserror::Error)]
#[error("Rate limit exceeded")]
struct RateLimitExceeded {
    retry_after: i64,
}

impl ResponseError for RateLimitExceeded {
    fn status_code(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    fn error_response(&self) -> HttpResponse {
        responses::rate_limited(self.retry_after)
    }
}

// Middleware factory wrapping the limiter, applied to the /v1 scope.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let limiter = self.limiter.clone();
        let client_ip = client_ip(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            match limiter.check(&client_ip).await {
                Decision::Allowed => fut.await,
                Decision::Limited { retry_after } => {
                    tracing::warn!("Rate limit exceeded for {}", client_ip);
                    Err(RateLimitExceeded { retry_after }.into())
                }
            }
        })
    }
}
