//! Chat-completion client for the recommendation request
//!
//! One synchronous (from the interaction's point of view) POST per button
//! press; the first choice's content comes back verbatim and is displayed
//! as-is. No retry, no response validation.

use crate::http::completion_client;
use crate::prompt::Prompt;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Chat completions endpoint
const COMPLETIONS_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Request payload for the chat completions API
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request carrying the composed system/user instruction pair
    ///
    /// Sampling temperature and token limit are left to the service's
    /// defaults; the optional fields stay off the wire entirely.
    pub fn from_prompt(model: impl Into<String>, prompt: &Prompt) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(&prompt.system), Message::user(&prompt.user)],
            temperature: None,
            max_tokens: None,
        }
    }
}

/// A message in the chat conversation
#[derive(Debug, Serialize, Deserialize, Clone)]
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

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Get the content of the first choice, if available
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Get the content of the first choice, or an error if not available
    pub fn content_or_err(&self) -> Result<&str> {
        self.content()
            .context("No response content from API (empty choices)")
    }
}

/// A single response choice
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The message content in a response choice
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Send a composed prompt to the completion service
///
/// Returns the first reply's text unmodified. Authentication failures,
/// transport errors and malformed responses all surface as errors for the
/// caller to show; none of them are retried.
pub async fn recommend(prompt: &Prompt, api_key: &str, model: &str) -> Result<String> {
    let request = ChatRequest::from_prompt(model, prompt);
    let start = Instant::now();

    let response = completion_client()
        .post(COMPLETIONS_API_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .context("Failed to send request to the completion service")?;

    let duration_ms = start.elapsed().as_millis();

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(
            status = %status,
            duration_ms = %duration_ms,
            "Completion service error"
        );
        anyhow::bail!("Completion service error {}: {}", status, text);
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .context("Failed to parse the completion service response")?;

    let content = parsed.content_or_err()?;

    info!(
        model = %model,
        duration_ms = %duration_ms,
        reply_chars = content.len(),
        "Completion call finished"
    );

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prompt() -> Prompt {
        Prompt {
            system: "You are a consultant".to_string(),
            user: "Pick one".to_string(),
        }
    }

    #[test]
    fn test_request_carries_roles_in_order() {
        let request = ChatRequest::from_prompt("gpt-3.5-turbo", &sample_prompt());
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "You are a consultant");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "Pick one");
    }

    #[test]
    fn test_request_sends_only_model_and_messages() {
        // Sampling knobs are left to the service defaults and must not
        // appear on the wire.
        let request = ChatRequest::from_prompt("gpt-3.5-turbo", &sample_prompt());
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("max_tokens"));
        assert!(json.contains("\"model\""));
        assert!(json.contains("\"messages\""));
    }

    #[test]
    fn test_response_first_choice_content() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Rose Garden, because..."}, "index": 0},
                {"message": {"content": "second"}, "index": 1}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), Some("Rose Garden, because..."));
    }

    #[test]
    fn test_empty_choices_is_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.content_or_err().is_err());
    }
}
