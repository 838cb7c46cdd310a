use async_trait::async_trait;
use axum::http::{ HeaderMap, header::AUTHORIZATION };
use log::{ debug, info, warn };

/// Decides whether a request may use the authenticated chat route.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn is_authenticated(&self, headers: &HeaderMap) -> bool;
}

/// Accepts a single shared token, sent either as `Authorization: Bearer <token>`
/// or as `X-API-Key: <token>`. With no token configured every caller is rejected.
pub struct StaticTokenAuthenticator {
    token: Option<String>,
}

impl StaticTokenAuthenticator {
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|k| !k.trim().is_empty());
        if token.is_some() {
            info!("Authenticated chat route configured with API key authentication.");
        } else {
            warn!("SERVER_API_KEY is not set; the authenticated chat route will reject every caller.");
        }
        Self { token }
    }
}

fn provided_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    bearer.or_else(|| headers.get("X-API-Key").and_then(|v| v.to_str().ok()))
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        let Some(required) = self.token.as_deref() else {
            return false;
        };
        let provided = provided_token(headers);
        debug!("Client provided token: {}", provided.is_some());
        provided == Some(required)
    }
}
