//! Chat-completions gateway (Perplexity / OpenAI-compatible).
//!
//! Sends non-streaming `POST {api_url}/chat/completions` requests and
//! reads the first choice. Perplexity's top-level `citations` array is
//! honoured when present.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resource_parse::{ResourceParse, parse_resource_array};
use super::{GatewayError, Summary, SummarizationGateway};
use crate::config::GatewayConfig;

const SUMMARY_SYSTEM_PROMPT: &str = "You are a security-aware technical writer. Summaries must remove ads, \
menus, and scripts, and highlight risks if the content looks suspicious.";

const RESEARCH_SYSTEM_PROMPT: &str = "You output valid JSON arrays only.";

/// Longest error-body excerpt carried into a [`GatewayError::Remote`].
const ERROR_DETAIL_CHARS: usize = 200;

/// A single chat message in the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    citations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the JSON request body for a chat-completions call.
pub fn build_request(
    model: &str,
    temperature: f32,
    messages: &[ChatMessage],
    return_citations: bool,
) -> Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
    });
    if return_citations {
        body["return_citations"] = Value::Bool(true);
    }
    body
}

/// Prompt asking for a bullet summary of extracted page text.
pub fn summary_prompt(title: &str, body_text: &str) -> String {
    format!(
        "Below is the body text extracted from a web page titled '{title}'.\n\
         Summarise the key concepts, notable warnings and actionable insights \
         as at most 8 bullet points.\n\
         Body:\n{body_text}"
    )
}

/// Prompt asking for a JSON array of resources.
pub fn research_prompt(topic: &str) -> String {
    format!(
        "You are a metasearch analyst. Return JSON with 3-5 helpful resources.\n\
         JSON schema: [{{\"title\": str, \"summary\": str, \"url\": str}}]. \
         Only include trustworthy official sources when possible.\n\
         Focus topic: {topic}"
    )
}

/// Extract a readable detail from an error response body.
///
/// Prefers the JSON `error` field (a string, or an object's `message`),
/// then a top-level `message`, then the start of the raw body.
pub fn describe_error_body(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let message = match json.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => json.get("message").and_then(Value::as_str).map(str::to_owned),
        };
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let excerpt: String = body.trim().chars().take(ERROR_DETAIL_CHARS).collect();
    if excerpt.is_empty() {
        "empty response body".to_owned()
    } else {
        excerpt
    }
}

fn citation_strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// Gateway backed by a chat-completions HTTP API.
#[derive(Debug, Clone)]
pub struct ChatCompletionsGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatCompletionsGateway {
    /// Create a gateway for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Send one completion request and return the first choice's text with
    /// any citations.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        return_citations: bool,
    ) -> Result<Summary, GatewayError> {
        let body = build_request(&self.model, self.temperature, messages, return_citations);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                detail: describe_error_body(&text),
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("invalid completion JSON: {e}")))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(GatewayError::Malformed("response has no choices".into()));
        };
        let text = choice.message.content.unwrap_or_default().trim().to_owned();
        if text.is_empty() {
            return Err(GatewayError::Malformed("completion content is empty".into()));
        }

        let citations = if choice.citations.is_empty() {
            citation_strings(&parsed.citations)
        } else {
            citation_strings(&choice.citations)
        };

        Ok(Summary { text, citations })
    }
}

#[async_trait]
impl SummarizationGateway for ChatCompletionsGateway {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn summarize(&self, title: &str, body_text: &str) -> Result<Summary, GatewayError> {
        tracing::debug!(model = %self.model, chars = body_text.chars().count(), "requesting page summary");
        let messages = [
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(summary_prompt(title, body_text)),
        ];
        self.complete(&messages, true).await
    }

    async fn research_resources(&self, topic: &str) -> Result<ResourceParse, GatewayError> {
        tracing::trace!(topic, "requesting resource list");
        let messages = [
            ChatMessage::system(RESEARCH_SYSTEM_PROMPT),
            ChatMessage::user(research_prompt(topic)),
        ];
        let completion = self.complete(&messages, false).await?;
        Ok(parse_resource_array(&completion.text))
    }
}
