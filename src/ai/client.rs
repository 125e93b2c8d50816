use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::parser::parse_quote;
use super::prompt::{user_prompt, ModelConfig, SYSTEM_PROMPT};
use crate::error::ClientError;
use crate::models::{Artifact, Mode};
use crate::services::CredentialStore;

const CHAT_COMPLETIONS_PATH: [&str; 3] = ["v1", "chat", "completions"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Anything that can write today's quote.
#[async_trait]
pub trait QuoteGenerator: Send + Sync {
    async fn generate(
        &self,
        day_key: &str,
        user_guidance: &str,
        mode: Mode,
    ) -> Result<Artifact, ClientError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat-completions client that turns one request into one [`Artifact`].
pub struct QuoteClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
    timeout: Duration,
}

impl QuoteClient {
    pub fn new(base_url: Url, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            credentials,
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // Appended to any path the base URL already has, e.g. a proxy prefix
    fn endpoint(&self) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Transport(format!("unusable base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(CHAT_COMPLETIONS_PATH);
        Ok(url)
    }

    fn api_key(&self) -> Result<String, ClientError> {
        let key = self
            .credentials
            .load_credential()
            .map_err(|e| ClientError::Credential(e.to_string()))?;

        key.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ClientError::MissingCredential)
    }
}

#[async_trait]
impl QuoteGenerator for QuoteClient {
    async fn generate(
        &self,
        day_key: &str,
        user_guidance: &str,
        mode: Mode,
    ) -> Result<Artifact, ClientError> {
        let api_key = self.api_key()?;
        let config = ModelConfig::for_mode(mode);

        let request = ChatRequest {
            model: config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt(day_key, mode, user_guidance),
                },
            ],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let url = self.endpoint()?;

        tracing::debug!(day_key, mode = %mode, model = config.model, "requesting quote");

        let response = self
            .client
            .post(url)
            .bearer_auth(&api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "quote request failed");
            if let Ok(api_error) = serde_json::from_slice::<ErrorResponse>(&body) {
                return Err(ClientError::RemoteError(api_error.error.message));
            }
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let decoded: ChatResponse =
            serde_json::from_slice(&body).map_err(|_| ClientError::DecodingFailed)?;

        let content = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ClientError::InvalidResponse)?;

        let parsed = parse_quote(&content)?;

        Ok(Artifact {
            day_key: day_key.to_string(),
            mode,
            quote: parsed.quote,
            context: parsed.context,
            created_at: Utc::now(),
        })
    }
}
