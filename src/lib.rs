//! Interview Prep AI
//!
//! Generates interview question sets and concept explanations with an LLM:
//! - Prompt construction for both request kinds
//! - Model invocation with exponential backoff on transient failures
//! - Sanitizing and parsing model output into typed results
//! - Classifying failures into client-facing error categories

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;

use crate::config::AiConfig;
use crate::domain::{DomainError, GenerationService, ModelInvoker};
use crate::infrastructure::llm::LlmProviderFactory;

/// Build the generation service for the configured provider
pub fn create_generation_service(config: &AiConfig) -> Result<GenerationService, DomainError> {
    let provider = LlmProviderFactory::from_config(config)?;
    let invoker = ModelInvoker::new(provider, config.model.clone(), config.retry_policy());

    Ok(GenerationService::new(invoker))
}
