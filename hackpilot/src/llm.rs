//! LLM API client.
//!
//! Every text-producing module talks to the model through the [`Completion`]
//! trait: one system prompt plus one user prompt in, plain text out.
//! [`LlmClient`] implements it for the Anthropic Messages API and for
//! OpenAI-compatible chat completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, LlmProvider};
use crate::error::{AssistantError, Result};

/// Single-turn text completion.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: text.to_string(),
        }
    }

    pub fn system(text: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Response from the Anthropic Messages API.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

/// Response from an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// HTTP client for the configured LLM provider.
pub struct LlmClient {
    provider: LlmProvider,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    http: reqwest::Client,
}

impl LlmClient {
    /// Build a client from config. Fails on a missing credential before any
    /// request is made.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = config.llm_provider();
        let api_key = config.credential(provider.credential_name())?.to_string();
        let http = reqwest::Client::builder()
            .timeout(config.llm_timeout())
            .build()
            .map_err(|e| AssistantError::config(format!("can't build HTTP client: {e}")))?;
        Ok(Self {
            provider,
            api_key,
            model: config.llm_model(),
            base_url: config.llm_base_url(),
            max_tokens: config.llm_max_tokens(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn service(&self) -> &'static str {
        match self.provider {
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::OpenAi => "openai",
        }
    }

    async fn post(
        &self,
        url: &str,
        req: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        tracing::debug!(%url, model = %self.model, "Calling LLM");
        let resp = req
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AssistantError::remote(self.service(), format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::remote(
                self.service(),
                format!("API error {status}: {}", excerpt(&body, 500)),
            ));
        }
        Ok(resp)
    }

    async fn complete_anthropic(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = serde_json::json!({
            "model": &self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [Message::user(prompt)],
        });
        let req = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01");
        let resp = self.post(&url, req, &body).await?;

        let parsed = resp.json::<AnthropicResponse>().await.map_err(|e| {
            AssistantError::remote(self.service(), format!("failed to parse response: {e}"))
        })?;
        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?parsed.stop_reason,
                "LLM usage"
            );
        }
        Ok(parsed
            .content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn complete_openai(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": &self.model,
            "max_tokens": self.max_tokens,
            "messages": [Message::system(system), Message::user(prompt)],
        });
        let req = self.http.post(&url).bearer_auth(&self.api_key);
        let resp = self.post(&url, req, &body).await?;

        let parsed = resp.json::<ChatResponse>().await.map_err(|e| {
            AssistantError::remote(self.service(), format!("failed to parse response: {e}"))
        })?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::remote(self.service(), "response had no choices"))?;
        tracing::debug!(finish_reason = ?choice.finish_reason, "LLM finished");
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let text = match self.provider {
            LlmProvider::Anthropic => self.complete_anthropic(system, prompt).await?,
            LlmProvider::OpenAi => self.complete_openai(system, prompt).await?,
        };
        if text.trim().is_empty() {
            return Err(AssistantError::remote(self.service(), "empty completion"));
        }
        Ok(text)
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
pub(crate) fn excerpt(s: &str, max: usize) -> String {
    let s = s.trim();
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// JSON values of the given kind (`[` or `{`) embedded in model output, in
/// order of appearance. Each opening bracket is tried as a start, so prose,
/// code fences and stray brackets around the payload are skipped.
pub(crate) fn json_values(text: &str, open: char) -> impl Iterator<Item = serde_json::Value> + '_ {
    text.match_indices(open).filter_map(move |(i, _)| {
        serde_json::Deserializer::from_str(&text[i..])
            .into_iter::<serde_json::Value>()
            .next()?
            .ok()
            .filter(|v| if open == '[' { v.is_array() } else { v.is_object() })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        let s = "héllo wörld";
        let e = excerpt(s, 2);
        assert!(e.starts_with('h'));
        assert!(e.ends_with("..."));
        assert_eq!(excerpt("short", 10), "short");
    }

    #[test]
    fn json_values_skip_fences_and_prose() {
        let text = "Sure! Here you go:\n```json\n[{\"a\": 1}]\n```\nGood luck.";
        let first = json_values(text, '[').next().unwrap();
        assert_eq!(first, serde_json::json!([{"a": 1}]));
        assert_eq!(json_values("no json here", '[').count(), 0);
        let obj = json_values("{\"x\": {\"y\": 2}}", '{').next().unwrap();
        assert_eq!(obj, serde_json::json!({"x": {"y": 2}}));
    }

    #[test]
    fn json_values_survive_brackets_in_prose() {
        let text = "Here are [3] ideas (see [docs]):\n[{\"title\": \"A\"}]\nThat's all [end].";
        let arrays: Vec<_> = json_values(text, '[').collect();
        assert_eq!(arrays[0], serde_json::json!([3]));
        assert!(arrays.contains(&serde_json::json!([{"title": "A"}])));
        let obj = json_values("Note {draft}: {\"title\": \"B\"}", '{').next().unwrap();
        assert_eq!(obj["title"], "B");
    }

    #[test]
    fn anthropic_response_ignores_non_text_blocks() {
        let raw = r#"{"content":[{"type":"text","text":"hi "},{"type":"thinking","thinking":"..."},{"type":"text","text":"there"}],"stop_reason":"end_turn","usage":{"input_tokens":3,"output_tokens":2}}"#;
        let parsed: AnthropicResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();
        assert_eq!(text, "hi there");
    }

    #[test]
    fn client_from_config_requires_credential() {
        let cfg = Config::default();
        let err = LlmClient::from_config(&cfg).err().unwrap();
        assert!(matches!(err, AssistantError::Configuration(_)));
    }

    #[test]
    fn client_from_config_uses_settings() {
        let mut cfg = Config::default();
        cfg.credentials.insert("openai".into(), "sk".into());
        cfg.llm.provider = Some(LlmProvider::OpenAi);
        cfg.llm.base_url = Some("http://127.0.0.1:9/".into());
        let client = LlmClient::from_config(&cfg).unwrap();
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.base_url, "http://127.0.0.1:9");
    }
}
