use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, StatusCode, header::{ HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, ClientInitError, CompletionResponse, ProviderError };
use crate::config::ProviderConfig;
use crate::llm::PromptMessage;

pub struct OpenRouterChatClient {
    http: HttpClient,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
}

#[derive(Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    choices: Vec<OpenRouterChoice>,
    #[serde(default)]
    error: Option<OpenRouterErrorDetail>,
}

#[derive(Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}

#[derive(Deserialize)]
struct OpenRouterMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenRouterErrorEnvelope {
    error: Option<OpenRouterErrorDetail>,
}

#[derive(Deserialize)]
struct OpenRouterErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ClientInitError> {
    HeaderValue::from_str(value).map_err(|e| ClientInitError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}

/// Pulls `error.message` out of a provider error body, if it has one.
fn structured_error_message(body: &str) -> Option<String> {
    serde_json
        ::from_str::<OpenRouterErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .filter(|m| !m.trim().is_empty())
}

impl OpenRouterChatClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ClientInitError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = config.credential() {
            headers.insert(AUTHORIZATION, header_value("Authorization", &format!("Bearer {}", api_key))?);
        }
        headers.insert(HeaderName::from_static("http-referer"), header_value("HTTP-Referer", &config.referer)?);
        headers.insert(HeaderName::from_static("x-title"), header_value("X-Title", &config.title)?);

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ClientInitError> {
        Self::new(config)
    }
}

#[async_trait]
impl ChatClient for OpenRouterChatClient {
    async fn complete(
        &self,
        messages: &[PromptMessage]
    ) -> Result<CompletionResponse, ProviderError> {
        let req = OpenRouterRequest {
            model: &self.model,
            messages,
        };

        debug!("POST {} with {} messages", self.endpoint, messages.len());
        let resp = self.http.post(&self.endpoint).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized { detail: body });
        }
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: structured_error_message(&body),
                detail: body,
            });
        }

        let parsed: OpenRouterResponse = serde_json
            ::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("{}: {}", e, body)))?;

        match parsed.choices.into_iter().next() {
            Some(choice) =>
                Ok(CompletionResponse {
                    response: choice.message.content.unwrap_or_default(),
                }),
            None => {
                // OpenRouter can answer 200 with an error object instead of choices.
                match parsed.error.and_then(|detail| detail.message) {
                    Some(message) =>
                        Err(ProviderError::Api {
                            status: status.as_u16(),
                            message: Some(message),
                            detail: body,
                        }),
                    None => Err(ProviderError::EmptyResponse),
                }
            }
        }
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.endpoint.clone())
    }
}
