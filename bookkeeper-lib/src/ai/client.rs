//! Client for an OpenAI-compatible chat-completions API. One-shot requests
//! only; there is deliberately no retry or validation loop around the model.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AiConfig;

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
pub const DEFAULT_TEXT_MODEL: &str = "glm-4-flash";
pub const DEFAULT_VISION_MODEL: &str = "glm-4v-flash";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned status {status}")]
    Api { status: u16, body: String },
    #[error("AI service returned no content")]
    EmptyResponse,
    #[error("Unable to parse AI output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Serialize, Clone, Debug)]
pub struct ChatMessage {
    pub role: String,
    pub content: ChatContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: "system".to_owned(),
            content: ChatContent::Text(content.into()),
        }
    }

    pub fn user(content: ChatContent) -> ChatMessage {
        ChatMessage {
            role: "user".to_owned(),
            content,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Clone, Debug)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    pub text_model: String,
    pub vision_model: String,
}

impl ChatClient {
    pub fn new(config: AiConfig) -> ChatClient {
        ChatClient {
            http_client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key,
            text_model: config.text_model,
            vision_model: config.vision_model,
        }
    }

    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, AiError> {
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, %body, "Chat completion request rejected");
            return Err(AiError::Api { status, body });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

/// The models wrap replies in markdown fences despite being asked not to.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```markdown", "")
        .replace("```", "")
        .trim()
        .to_owned()
}
