use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::LlmConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm api key not configured")]
    Disabled,
    #[error("llm request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("llm returned status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
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

/// One completion round trip. `Ok(None)` means the provider answered but
/// produced no content; callers substitute their own fallback text for both
/// that case and `Err`.
pub async fn completar(
    http: &reqwest::Client,
    config: &LlmConfig,
    messages: &[ChatMessage],
) -> Result<Option<String>, LlmError> {
    if !config.enabled() {
        return Err(LlmError::Disabled);
    }

    let url = format!("{}/chat/completions", config.api_url.trim_end_matches('/'));
    let response = http
        .post(&url)
        .bearer_auth(&config.api_key)
        .json(&CompletionRequest {
            model: &config.model,
            messages,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(LlmError::Status(response.status().as_u16()));
    }

    let completion: CompletionResponse = response.json().await?;
    Ok(completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_parses_missing_content() {
        let parsed: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert!(content.is_none());
    }

    #[test]
    fn completion_response_parses_content() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"La carta del Sol ilumina tu camino."}}]}"#,
        )
        .unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("La carta del Sol ilumina tu camino."));
    }

    #[actix_web::test]
    async fn completar_without_key_is_disabled() {
        let config = LlmConfig {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
        };
        let result = completar(&reqwest::Client::new(), &config, &[]).await;
        assert!(matches!(result, Err(LlmError::Disabled)));
    }
}
