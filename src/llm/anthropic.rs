//! Anthropic messages API

use super::{http_client, post_json, require_api_key, GenerationRequest, GenerationResponse, TextGenerator};
use crate::config::LlmConfig;
use crate::errors::ProviderError;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    endpoint: String,
    http: HttpClient,
}

impl AnthropicProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, ProviderError> {
        let api_key = require_api_key(config, "anthropic")?;

        // The shared default model is an OpenAI one
        let model = config.model.trim();
        let model = if model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else if model.starts_with("gpt-") {
            warn!(
                "⚠️  Model '{}' is not an Anthropic model, using {}",
                model, DEFAULT_MODEL
            );
            DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            api_key,
            model,
            endpoint: format!("{}/messages", base_url),
            http: http_client(config, "anthropic")?,
        })
    }

    fn request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

impl TextGenerator for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let builder = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);
        let reply: MessagesReply = post_json("anthropic", builder, &self.request_body(request))?;
        reply.into_response()
    }
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl MessagesReply {
    fn into_response(self) -> Result<GenerationResponse, ProviderError> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse {
                provider: "anthropic".to_string(),
                message: "response contained no text blocks".to_string(),
            });
        }

        Ok(GenerationResponse {
            text,
            tokens_used: self
                .usage
                .map(|u| u.input_tokens + u.output_tokens)
                .unwrap_or(0),
            truncated: self.stop_reason.as_deref() == Some("max_tokens"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> LlmConfig {
        LlmConfig {
            provider: "anthropic".to_string(),
            model: model.to_string(),
            api_key: Some("key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn openai_model_names_fall_back_to_default() {
        let provider = AnthropicProvider::new(&config("gpt-4o")).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);

        let provider = AnthropicProvider::new(&config("claude-3-5-sonnet-latest")).unwrap();
        assert_eq!(provider.model, "claude-3-5-sonnet-latest");
        assert_eq!(provider.endpoint, "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn decodes_text_blocks_and_usage() {
        let reply: MessagesReply = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Метод 1: "},{"type":"text","text":"готово"}],
                "stop_reason":"max_tokens","usage":{"input_tokens":10,"output_tokens":5}}"#,
        )
        .unwrap();
        let response = reply.into_response().unwrap();
        assert_eq!(response.text, "Метод 1: готово");
        assert_eq!(response.tokens_used, 15);
        assert!(response.truncated);
    }

    #[test]
    fn empty_content_is_invalid() {
        let reply: MessagesReply =
            serde_json::from_str(r#"{"content":[],"stop_reason":"end_turn"}"#).unwrap();
        assert!(reply.into_response().is_err());
    }
}
