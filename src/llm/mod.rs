//! Text generation providers
//!
//! Providers are synchronous: one request in flight at a time. Failures are
//! reported per request; there is no retry or backoff.

mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use crate::config::LlmConfig;
use crate::errors::ProviderError;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// One provider-neutral generation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub metadata: HashMap<String, String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, config: &LlmConfig) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub tokens_used: u32,
    /// The provider stopped because the token limit was reached
    pub truncated: bool,
}

pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError>;

    /// Index-aligned responses; stops at the first failure
    fn generate_batch(
        &self,
        requests: &[GenerationRequest],
    ) -> Result<Vec<GenerationResponse>, ProviderError> {
        requests.iter().map(|r| self.generate(r)).collect()
    }
}

/// Build the provider named by `config.provider`; `none` yields `Ok(None)`
pub fn create_provider(config: &LlmConfig) -> Result<Option<Box<dyn TextGenerator>>, ProviderError> {
    let provider: Box<dyn TextGenerator> = match config.provider.as_str() {
        "none" => {
            debug!("Text generation disabled");
            return Ok(None);
        }
        "openai" => Box::new(OpenAiProvider::new(config)?),
        "anthropic" => Box::new(AnthropicProvider::new(config)?),
        other => {
            return Err(ProviderError::UnknownProvider {
                name: other.to_string(),
            })
        }
    };
    debug!("Using text generation provider {}", provider.name());
    Ok(Some(provider))
}

/// Key from config or environment, else `MissingApiKey`
fn require_api_key(config: &LlmConfig, provider: &str) -> Result<String, ProviderError> {
    config
        .resolved_api_key()
        .ok_or_else(|| ProviderError::MissingApiKey {
            provider: provider.to_string(),
            env_var: config.api_key_env_var().unwrap_or("API_KEY").to_string(),
        })
}

fn http_client(
    config: &LlmConfig,
    provider: &str,
) -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
        .build()
        .map_err(|source| ProviderError::Request {
            provider: provider.to_string(),
            source,
        })
}

/// Send a JSON POST and decode the JSON body, mapping failures to `ProviderError`
fn post_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    request: reqwest::blocking::RequestBuilder,
    body: &serde_json::Value,
) -> Result<T, ProviderError> {
    let response = request
        .json(body)
        .send()
        .map_err(|source| ProviderError::Request {
            provider: provider.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().map_err(|e| ProviderError::InvalidResponse {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}
