mod open_ai;
mod prompt;

pub use open_ai::OpenAIProvider;
pub use prompt::{
    meal_details_prompt, meal_options_prompt, plan_prompt, shopping_list_prompt,
    NUTRITIONIST_SYSTEM_PROMPT,
};

use crate::error::PlannerError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat completion call
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// Overrides the provider's configured limit
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// A single user message, no system prompt
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: None,
        }
    }

    /// Nutritionist system prompt followed by the user prompt
    pub fn nutritionist(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: vec![
                ChatMessage::system(NUTRITIONIST_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            max_tokens: Some(max_tokens),
        }
    }
}

/// Unified trait for generative-text providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Run a completion and return the text of the first choice
    async fn complete(&self, request: &CompletionRequest) -> Result<String, PlannerError>;
}
