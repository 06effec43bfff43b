//! Mock LLM provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{AlchemistError, Result};

use super::provider::{CompletionRequest, LlmConfig, LlmProvider};

/// Mock LLM provider that replays scripted responses.
///
/// Each call pops the next scripted outcome. Every request is recorded so
/// tests can inspect the prompts that were sent.
pub struct MockProvider {
    config: LlmConfig,
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty script.
    pub fn new() -> Self {
        Self::with_config(LlmConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue a service failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, outcome: std::result::Result<String, String>) {
        match self.script.lock() {
            Ok(mut script) => script.push_back(outcome),
            Err(poisoned) => poisoned.into_inner().push_back(outcome),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests
            .lock()
            .map_err(|_| AlchemistError::SuggestionService("mock state poisoned".to_string()))?
            .push(request.clone());

        let next = self
            .script
            .lock()
            .map_err(|_| AlchemistError::SuggestionService("mock state poisoned".to_string()))?
            .pop_front();

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(AlchemistError::SuggestionService(message)),
            None => Err(AlchemistError::SuggestionService(
                "mock provider has no scripted response".to_string(),
            )),
        }
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
