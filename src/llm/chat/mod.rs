pub mod openrouter;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use super::PromptMessage;
use crate::config::ProviderConfig;
use self::openrouter::OpenRouterChatClient;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the credential (HTTP 401).
    #[error("provider rejected credential: {detail}")]
    Unauthorized { detail: String },

    /// Non-success status. `message` holds `error.message` from the body when present.
    #[error("provider returned {status}: {detail}")]
    Api {
        status: u16,
        message: Option<String>,
        detail: String,
    },

    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("provider response contained no choices")]
    EmptyResponse,
}

/// Failures while building a client, before any request is made.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[PromptMessage]
    ) -> Result<CompletionResponse, ProviderError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>, ClientInitError> {
    let client = OpenRouterChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
