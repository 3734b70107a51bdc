use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Text-generation endpoint the generation core calls (Gemini, OpenAI-compatible, ...)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a single prompt and return its raw text
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
