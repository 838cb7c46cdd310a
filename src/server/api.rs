use crate::models::chat::{ ErrorBody, RelayRequest };
use crate::relay::{ ChatRelay, RelayError };
use crate::server::auth::Authenticator;

use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::{ HeaderMap, StatusCode },
};
use governor::{ DefaultDirectRateLimiter, Quota, RateLimiter };
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    relay: Arc<ChatRelay>,
    auth: Arc<dyn Authenticator>,
    public_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// `public_rate_limit` is requests per second on the public route; 0 disables the limit.
    pub fn new(relay: ChatRelay, auth: Arc<dyn Authenticator>, public_rate_limit: u32) -> Self {
        let public_limiter = NonZeroU32::new(public_rate_limit).map(|per_second| {
            Arc::new(RateLimiter::direct(Quota::per_second(per_second)))
        });
        match public_limiter {
            Some(_) => info!("Public chat route limited to {} requests/second", public_rate_limit),
            None => warn!("Public chat route has no rate limit"),
        }
        Self {
            relay: Arc::new(relay),
            auth,
            public_limiter,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::Validation => StatusCode::BAD_REQUEST,
            | RelayError::Configuration
            | RelayError::ProviderAuth
            | RelayError::Provider(_)
            | RelayError::Network => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat = Router::new()
        .route("/message", post(send_message_handler))
        .route("/message/public", post(send_public_message_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/chat", chat.clone())
        .nest("/api/chat", chat)
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn send_message_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
    if !state.auth.is_authenticated(&headers).await {
        warn!("Rejected unauthenticated request to the chat route");
        return error_response(StatusCode::UNAUTHORIZED, "Access token required");
    }
    relay_payload(&state, payload, true).await
}

async fn send_public_message_handler(
    State(state): State<AppState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
    if let Some(limiter) = &state.public_limiter {
        if limiter.check().is_err() {
            warn!("Public chat rate limit exceeded. Dropping request.");
            return error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please try again later."
            );
        }
    }
    relay_payload(&state, payload, false).await
}

async fn relay_payload(
    state: &AppState,
    payload: Result<Json<RelayRequest>, JsonRejection>,
    caller_authenticated: bool,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!("Malformed chat request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match state.relay.relay(&req.message, &req.conversation_history, caller_authenticated).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}
