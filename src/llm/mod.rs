//! LLM module - Language Model integrations
//!
//! Provides the completion contract used by the action interpreter, with
//! Ollama as the default backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaClient;
pub use traits::CompletionProvider;
