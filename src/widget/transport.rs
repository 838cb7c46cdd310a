use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use thiserror::Error;

use crate::models::chat::{ ErrorBody, HistoryTurn, RelayRequest, RelayResponse };

pub const DEFAULT_ERROR: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay answered with an error body.
    #[error("relay rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("relay returned status {0} without an error body")]
    Status(u16),

    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    /// Text suitable for showing in the conversation.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => DEFAULT_ERROR.to_string(),
        }
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(
        &self,
        message: &str,
        history: &[HistoryTurn]
    ) -> Result<RelayResponse, TransportError>;
}

/// Talks to the relay over HTTP. Uses the authenticated route while a token
/// is held and the public route otherwise.
pub struct HttpRelayClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn route(&self) -> String {
        if self.is_authenticated() {
            format!("{}/chat/message", self.base_url)
        } else {
            format!("{}/chat/message/public", self.base_url)
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(
        &self,
        message: &str,
        history: &[HistoryTurn]
    ) -> Result<RelayResponse, TransportError> {
        let url = self.route();
        let body = RelayRequest {
            message: message.to_string(),
            conversation_history: history.to_vec(),
        };

        debug!("Sending chat message to {}", url);
        let mut req = self.http.post(&url).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<RelayResponse>().await?);
        }

        match resp.json::<ErrorBody>().await {
            Ok(err) =>
                Err(TransportError::Rejected {
                    status: status.as_u16(),
                    message: err.message,
                }),
            Err(_) => Err(TransportError::Status(status.as_u16())),
        }
    }
}
