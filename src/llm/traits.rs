//! Completion provider trait for abstracting LLM backends
//!
//! The dispatcher only ever needs one narrow operation: send a system
//! instruction plus a user command, get raw text back. Keeping the contract
//! this small lets tests substitute a canned provider.

use async_trait::async_trait;

use crate::core::Result;

/// Trait for LLM completion backends
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue one completion request and return the raw response text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
