//! OpenAI-compatible chat completions

use super::{http_client, post_json, require_api_key, GenerationRequest, GenerationResponse, TextGenerator};
use crate::config::LlmConfig;
use crate::errors::ProviderError;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    http: HttpClient,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, ProviderError> {
        let api_key = require_api_key(config, "openai")?;
        let model = if config.model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url),
            http: http_client(config, "openai")?,
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

impl TextGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let builder = self.http.post(&self.endpoint).bearer_auth(&self.api_key);
        let reply: ChatCompletion = post_json("openai", builder, &self.request_body(request))?;
        reply.into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

impl ChatCompletion {
    fn into_response(self) -> Result<GenerationResponse, ProviderError> {
        let tokens_used = self.usage.map(|u| u.total_tokens).unwrap_or(0);
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "openai".to_string(),
                message: "response contained no choices".to_string(),
            })?;

        Ok(GenerationResponse {
            text: choice.message.content.unwrap_or_default(),
            tokens_used,
            truncated: choice.finish_reason.as_deref() == Some("length"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: Option<&str>) -> OpenAiProvider {
        OpenAiProvider::new(&LlmConfig {
            api_key: Some("sk-test".to_string()),
            base_url: base_url.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_respects_base_url() {
        assert_eq!(
            provider(None).endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            provider(Some("http://localhost:8080/v1/")).endpoint,
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_shape() {
        let request = GenerationRequest {
            prompt: "describe".to_string(),
            max_tokens: 100,
            temperature: 0.5,
            ..Default::default()
        };
        let body = provider(None).request_body(&request);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "describe");
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn decodes_completion() {
        let reply: ChatCompletion = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Метод 1: ok"},"finish_reason":"length"}],"usage":{"total_tokens":17}}"#,
        )
        .unwrap();
        let response = reply.into_response().unwrap();
        assert_eq!(response.text, "Метод 1: ok");
        assert_eq!(response.tokens_used, 17);
        assert!(response.truncated);
    }

    #[test]
    fn empty_choices_is_invalid() {
        let reply: ChatCompletion = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            reply.into_response(),
            Err(ProviderError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn missing_key_is_reported() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        // Only meaningful when the environment does not provide a key
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(matches!(
                OpenAiProvider::new(&config),
                Err(ProviderError::MissingApiKey { .. })
            ));
        }
    }
}
