use reqwest::Client;
use std::env;
use thiserror::Error;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, OpenRouterAvailableModel, Provider,
    OPENROUTER_CHAT_URL, OPENROUTER_MODELS,
};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },

    #[error("API returned no usable reply: {0}")]
    EmptyResponse(String),
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            base_url: OPENROUTER_CHAT_URL.to_string(),
            available_models: OPENROUTER_MODELS.to_vec(),
        }
    }

    /// Points the provider at another OpenAI-compatible chat endpoint.
    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        match self {
            Provider::OpenRouter {
                api_key,
                available_models,
                ..
            } => Provider::OpenRouter {
                api_key,
                base_url: url.into(),
                available_models,
            },
        }
    }

    pub fn get_available_models(&self) -> Vec<OpenRouterAvailableModel> {
        match self {
            Provider::OpenRouter {
                available_models, ..
            } => available_models.clone(),
        }
    }

    /// True when the key's environment variable is set and non-empty.
    pub fn is_configured(&self) -> bool {
        match self {
            Provider::OpenRouter { api_key, .. } => {
                env::var(api_key).map(|key| !key.trim().is_empty()).unwrap_or(false)
            }
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        ApiConnectionError::MissingApiKey(api_key_env_var_name.clone())
                    })?;

                let site_url =
                    env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:5001".to_string());
                let app_name = env::var("APP_NAME").unwrap_or_else(|_| "MenuPlanner".to_string());

                tracing::debug!(
                    model = %request.model,
                    messages = request.messages.len(),
                    "calling chat completion"
                );
                let response = Client::new()
                    .post(base_url)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let chat_response = response.json::<ChatCompletionResponse>().await?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    tracing::warn!(%status, "chat completion failed");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
