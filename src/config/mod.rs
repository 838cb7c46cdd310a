pub mod prompt;

use crate::cli::Args;
use std::time::Duration;

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-exp:free";

/// Everything the relay needs to reach the completion provider. Built once
/// at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_prompt: String,
    pub referer: String,
    pub title: String,
    pub timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: OPENROUTER_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: prompt::SYSTEM_CONTEXT.to_string(),
            referer: "http://localhost:3000".to_string(),
            title: "Rately Store Rating System".to_string(),
            timeout: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            api_key: args.openrouter_api_key.clone(),
            model: args.ai_model.clone(),
            referer: args.app_referer.clone(),
            title: args.app_title.clone(),
            timeout: args.provider_timeout_secs.map(Duration::from_secs),
            ..Self::default()
        }
    }

    /// The credential, ignoring a blank value the same as a missing one.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Credential with everything past the first few characters hidden, for startup logs.
    pub fn masked_credential(&self) -> String {
        match self.credential() {
            Some(key) => {
                let visible: String = key.chars().take(6).collect();
                format!("{}***", visible)
            }
            None => "<missing>".to_string(),
        }
    }
}
