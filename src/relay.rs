use crate::config::ProviderConfig;
use crate::llm::PromptMessage;
use crate::llm::chat::{ ChatClient, ClientInitError, ProviderError, new_client as new_chat_client };
use crate::models::chat::{ HistoryTurn, RelayResponse, Role };

use log::{ debug, error, info, warn };
use std::sync::Arc;
use thiserror::Error;

/// Number of prior turns forwarded with each message. Older turns are dropped.
pub const HISTORY_WINDOW: usize = 10;

pub const GENERIC_FAILURE: &str = "Failed to get response from chatbot. Please try again.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Message is required")]
    Validation,

    #[error("Chatbot is not configured properly. Missing OpenRouter API Key.")]
    Configuration,

    #[error("Invalid API key. Please check your OpenRouter configuration.")]
    ProviderAuth,

    /// Provider-reported failure; the text is shown to the user as-is.
    #[error("{0}")]
    Provider(String),

    /// The provider could not be reached; details are logged, not returned.
    #[error("{}", GENERIC_FAILURE)]
    Network,
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthorized { .. } => RelayError::ProviderAuth,
            ProviderError::Api { message: Some(message), .. } => RelayError::Provider(message),
            ProviderError::Transport(_) => RelayError::Network,
            | ProviderError::Api { message: None, .. }
            | ProviderError::Decode(_)
            | ProviderError::EmptyResponse => RelayError::Provider(GENERIC_FAILURE.to_string()),
        }
    }
}

/// Assembles the outbound prompt: system instruction, the trailing
/// `HISTORY_WINDOW` turns in order, then the new message.
pub fn build_prompt(system_prompt: &str, history: &[HistoryTurn], message: &str) -> Vec<PromptMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let recent = &history[start..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(PromptMessage::system(system_prompt));
    messages.extend(
        recent.iter().map(|turn| PromptMessage::new(Role::normalize(&turn.role), turn.content.clone()))
    );
    messages.push(PromptMessage::user(message));
    messages
}

#[derive(Clone)]
pub struct ChatRelay {
    config: Arc<ProviderConfig>,
    chat_client: Arc<dyn ChatClient>,
}

impl ChatRelay {
    /// A credential that cannot be sent as a header is dropped and treated as
    /// missing, so requests fail with `Configuration` instead of the server
    /// refusing to start.
    pub fn new(mut config: ProviderConfig) -> Result<Self, ClientInitError> {
        let chat_client = match new_chat_client(&config) {
            Err(ClientInitError::InvalidHeader { name: "Authorization", reason }) => {
                error!("OPENROUTER_API_KEY is not a valid header value ({}); ignoring it.", reason);
                config.api_key = None;
                new_chat_client(&config)?
            }
            other => other?,
        };
        info!(
            "Chat client configured: Model={}, Endpoint={}",
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );
        if config.credential().is_none() {
            warn!("OPENROUTER_API_KEY is not set; chat requests will fail until it is configured.");
        }
        Ok(Self::with_client(config, chat_client))
    }

    pub fn with_client(config: ProviderConfig, chat_client: Arc<dyn ChatClient>) -> Self {
        Self {
            config: Arc::new(config),
            chat_client,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub async fn relay(
        &self,
        message: &str,
        conversation_history: &[HistoryTurn],
        caller_authenticated: bool
    ) -> Result<RelayResponse, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::Validation);
        }
        if self.config.credential().is_none() {
            return Err(RelayError::Configuration);
        }

        let messages = build_prompt(&self.config.system_prompt, conversation_history, message);
        debug!(
            "Relaying message with {} prompt entries ({} history turns received, authenticated: {})",
            messages.len(),
            conversation_history.len(),
            caller_authenticated
        );

        match self.chat_client.complete(&messages).await {
            Ok(completion) => Ok(RelayResponse::reply(completion.response)),
            Err(e) => {
                error!("Chatbot error (OpenRouter): {}", e);
                Err(e.into())
            }
        }
    }
}
