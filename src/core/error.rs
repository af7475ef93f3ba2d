//! Custom error types for Muster
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Muster operations
#[derive(Error, Debug)]
pub enum MusterError {
    /// Browser session could not be created or torn down
    #[error("Session init error: {0}")]
    SessionInit(String),

    /// A single action failed during task execution
    #[error("Action execution error: {0}")]
    ActionExecution(String),

    /// Natural-language command could not be interpreted
    #[error("Interpretation error: {0}")]
    Interpretation(String),

    /// LLM endpoint connection or API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Muster operations
pub type Result<T> = std::result::Result<T, MusterError>;

impl MusterError {
    /// Create a session init error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::SessionInit(msg.into())
    }

    /// Create an action execution error
    pub fn action(msg: impl Into<String>) -> Self {
        Self::ActionExecution(msg.into())
    }

    /// Create an interpretation error
    pub fn interpretation(msg: impl Into<String>) -> Self {
        Self::Interpretation(msg.into())
    }

    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
