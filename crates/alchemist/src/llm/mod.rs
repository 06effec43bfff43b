//! Text-generation providers used by the assist adapters.
//!
//! The providers only move text: they send a bounded prompt and return the
//! raw response. Interpreting that response is the job of [`crate::assist`].
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Groq** - OpenAI-compatible endpoint (requires `GROQ_API_KEY`)
//! - **Mock** - scripted responses for tests
//!
//! # Example
//!
//! ```no_run
//! use alchemist::{Alchemist, OpenAIProvider};
//!
//! let alchemist = Alchemist::new()
//!     .with_llm(OpenAIProvider::groq_from_env().unwrap());
//! ```

mod mock;
mod openai;
pub mod prompts;
mod provider;

pub use mock::MockProvider;
pub use openai::{GROQ_BASE_URL, GROQ_DEFAULT_MODEL, OPENAI_BASE_URL, OpenAIProvider};
pub use provider::{CompletionRequest, LlmConfig, LlmProvider};
