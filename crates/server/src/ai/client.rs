//! Client for the OpenAI Chat Completions API

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::middleware::record_provider_call;
use crate::retry::RetryPolicy;

const PROVIDER: &str = "llm";

/// Client for an OpenAI-compatible `/chat/completions` endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling limits for a completion
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Request body for the Chat Completions API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

/// Response from the Chat Completions API
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error detail from the Chat Completions API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiErrorDetail {
    fn is_quota(&self) -> bool {
        [self.kind.as_deref(), self.code.as_deref()].contains(&Some("insufficient_quota"))
    }
}

/// Map a non-success response to a provider error.
///
/// A 429 caused by an exhausted quota is permanent; other 429s are throttling.
fn error_from_response(status: u16, body: String) -> ProviderError {
    match serde_json::from_str::<ApiError>(&body) {
        Ok(ApiError { error }) if error.is_quota() => ProviderError::QuotaExhausted {
            provider: PROVIDER,
            message: error.message,
        },
        Ok(ApiError { error }) => ProviderError::Status {
            provider: PROVIDER,
            status,
            body: error.message,
        },
        Err(_) => ProviderError::Status {
            provider: PROVIDER,
            status,
            body,
        },
    }
}

impl OpenAiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a system + user prompt pair, return the reply text
    pub async fn complete(
        &self,
        system: &str,
        user_message: &str,
        options: CompletionOptions,
    ) -> Result<String, ProviderError> {
        let messages = [Message::system(system), Message::user(user_message)];
        let messages = messages.as_slice();

        let response = self
            .retry
            .run("chat_completion", || self.send(messages, options))
            .await?;
        extract_text(&response)
    }

    /// Issue one request to `/chat/completions`
    pub async fn send(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<ApiResponse, ProviderError> {
        let result = self.send_once(messages, options).await;
        record_provider_call(PROVIDER, &result);
        result
    }

    async fn send_once(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<ApiResponse, ProviderError> {
        let request = ApiRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, body));
        }

        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| ProviderError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })
    }
}

/// Extract the first non-empty reply from an API response
pub fn extract_text(response: &ApiResponse) -> Result<String, ProviderError> {
    response
        .choices
        .iter()
        .filter_map(|c| c.message.content.as_deref())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Decode {
            provider: PROVIDER,
            message: "No text content in response".to_string(),
        })
}
