//! OpenAI-compatible chat completions provider (OpenAI, Groq).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{AlchemistError, Result};

use super::provider::{CompletionRequest, LlmConfig, LlmProvider};

/// OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Groq's OpenAI-compatible base URL.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used for Groq when none is configured.
pub const GROQ_DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Provider for any service speaking the OpenAI chat completions protocol.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    name: String,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a provider for the OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a provider for the OpenAI API with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AlchemistError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            name: "openai".to_string(),
            config,
        })
    }

    /// Create a provider for Groq.
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        let config = LlmConfig::default().with_model(GROQ_DEFAULT_MODEL);
        Ok(Self::with_config(api_key, config)?
            .with_base_url(GROQ_BASE_URL)
            .with_name("groq"))
    }

    /// Create an OpenAI provider from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(env_key("OPENAI_API_KEY")?)
    }

    /// Create a Groq provider from `GROQ_API_KEY`.
    pub fn groq_from_env() -> Result<Self> {
        Self::groq(env_key("GROQ_API_KEY")?)
    }

    /// Point the provider at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the provider name reported in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| AlchemistError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

fn env_key(var: &str) -> Result<String> {
    std::env::var(var)
        .map_err(|_| AlchemistError::Config(format!("{} environment variable not set", var)))
}

impl LlmProvider for OpenAIProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": request.temperature.unwrap_or(self.config.temperature),
            "messages": [
                {
                    "role": "user",
                    "content": request.prompt
                }
            ]
        });

        debug!(
            provider = %self.name,
            model = %self.config.model,
            prompt_chars = request.prompt.chars().count(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| AlchemistError::SuggestionService(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(AlchemistError::SuggestionService(format!(
                "{} API error ({}): {}",
                self.name, status, error_text
            )));
        }

        let api_response: ChatResponse = response.json().map_err(|e| {
            AlchemistError::SuggestionService(format!("Failed to parse API response: {}", e))
        })?;

        // A choice with null content counts as an empty answer.
        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                AlchemistError::SuggestionService(format!("No response from {}", self.name))
            })
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Chat completions response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_defaults() {
        let provider = OpenAIProvider::groq("key").unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.config().model, GROQ_DEFAULT_MODEL);
        assert_eq!(
            provider.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = OpenAIProvider::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_response_with_null_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(parsed.choices[0].message.content, None);
    }

    #[test]
    fn test_invalid_api_key_header() {
        let provider = OpenAIProvider::new("bad\nkey").unwrap();
        assert!(matches!(
            provider.build_headers(),
            Err(AlchemistError::Config(_))
        ));
    }
}
