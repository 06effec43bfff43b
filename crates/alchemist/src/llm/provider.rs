//! LLM provider trait and types.

use crate::error::Result;

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "llama3-70b-8192").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Default temperature when a request does not set one (0.0-1.0).
    pub temperature: f64,

    /// Prompts longer than this many characters are truncated.
    pub prompt_char_limit: usize,

    /// HTTP timeout for a single completion call.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            prompt_char_limit: 8000,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the prompt character cap.
    pub fn with_prompt_char_limit(mut self, limit: usize) -> Self {
        self.prompt_char_limit = limit;
        self
    }
}

/// A single prompt sent to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The user prompt, already truncated to the configured cap.
    pub prompt: String,

    /// Overrides [`LlmConfig::temperature`] when set.
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Trait for LLM providers.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can be
/// shared by every session. A call is a single request with no retry; the
/// returned text is untrusted and only the `assist` parsers interpret it.
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw response text.
    ///
    /// Transport and service failures are reported as
    /// [`AlchemistError::SuggestionService`](crate::AlchemistError::SuggestionService).
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.prompt_char_limit, 8000);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_request_temperature_override() {
        let request = CompletionRequest::new("hi").with_temperature(0.2);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(CompletionRequest::new("hi").temperature, None);
    }
}
