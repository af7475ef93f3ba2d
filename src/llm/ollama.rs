//! Ollama client implementation
//!
//! Async HTTP client for the Ollama chat API. Non-streaming: the
//! interpreter issues exactly one request per command and reads the full
//! response body.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, MusterError, Result};
use crate::llm::traits::CompletionProvider;

/// Ollama API client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

/// Ollama message format
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

/// Message in a chat response
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.llm_url(),
            model: config.llm.model.clone(),
        }
    }

    /// Create a client with custom base URL and model
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
            // Constrain the model to emit a JSON object.
            format: Some("json"),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| MusterError::llm(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MusterError::llm(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| MusterError::llm(format!("Invalid response body: {}", e)))?;

        Ok(chat.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
