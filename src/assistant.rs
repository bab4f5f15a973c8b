use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::api_connection::endpoints::ChatCompletionRequest;
use crate::api_connection::{ApiConnectionError, ChatMessage, ChatRole, Provider};
use crate::config::PlannerConfig;

const SYSTEM_PROMPT: &str = "You are a helpful meal planning assistant that recommends recipes from BBC Good Food (bbcgoodfood.com).

Have a natural conversation about the user's meal preferences. Ask short clarifying questions about cooking time (quick meals under 30 minutes or longer recipes), main ingredients, cuisine, dietary needs and how many people they cook for.

Rules:
- Only recommend recipes you are highly confident currently exist on BBC Good Food; prefer popular, evergreen recipes with simple names.
- Always include the full URL, formatted like: I recommend [Recipe Name] - https://www.bbcgoodfood.com/recipes/[recipe-slug]
- Suggest at most 2-3 recipes at a time.
- Be concise and friendly.";

fn recipe_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)https?://(?:www\.)?bbcgoodfood\.com/recipes/[a-z0-9-]+").expect("recipe url regex is valid")
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub reply: String,
    pub recipe_urls: Vec<String>,
}

/// Conversational recipe suggestions. Purely advisory: nothing it says reaches the
/// planner unless the caller imports the suggested URLs.
#[derive(Debug, Clone)]
pub struct ChatAssistant {
    provider: Provider,
    model: String,
}

impl ChatAssistant {
    /// Fails with `MissingApiKey` when no key is configured, which callers treat as
    /// the assistant being unavailable.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, ApiConnectionError> {
        let provider = Provider::openrouter(&config.api_key_env_var);
        if !provider.is_configured() {
            return Err(ApiConnectionError::MissingApiKey(config.api_key_env_var.clone()));
        }
        Ok(Self::new(provider, config.assistant_model.clone()))
    }

    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<AssistantReply, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(message, history),
            temperature: Some(0.7),
            max_tokens: Some(1024),
        };

        let response = self.provider.call_chat_completion(request).await?;
        let reply = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ApiConnectionError::EmptyResponse("no response choices received".to_string())
            })?;

        Ok(AssistantReply {
            recipe_urls: extract_recipe_urls(&reply),
            reply,
        })
    }
}

// System prompt first, then prior turns (system turns in the history are dropped),
// then the new user message.
fn build_messages(message: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend(history.iter().filter(|m| m.role != ChatRole::System).cloned());
    messages.push(ChatMessage::user(message));
    messages
}

/// Unique recipe URLs in order of first appearance. Case and `www.` are ignored
/// when comparing.
pub fn extract_recipe_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    recipe_url_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|url| seen.insert(url.to_lowercase().replace("www.", "")))
        .collect()
}
