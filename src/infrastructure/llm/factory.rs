use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::http_client::HttpClient;
use super::{GeminiProvider, OpenAiProvider};
use crate::config::{AiConfig, AiProviderKind};
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the configured provider, resolving its API key
    pub fn from_config(config: &AiConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = config.resolve_api_key()?;
        let http_client = match config.request_timeout_secs {
            Some(secs) => HttpClient::with_timeout(Duration::from_secs(secs))?,
            None => HttpClient::new(),
        };

        info!(
            provider = ?config.provider,
            model = %config.model,
            custom_base_url = config.base_url.is_some(),
            "Creating LLM provider"
        );

        Ok(Self::create(
            config.provider,
            http_client,
            api_key,
            config.base_url.as_deref(),
        ))
    }

    /// Create a provider of the given kind over an existing HTTP client
    pub fn create(
        kind: AiProviderKind,
        http_client: HttpClient,
        api_key: impl Into<String>,
        base_url: Option<&str>,
    ) -> Arc<dyn LlmProvider> {
        match (kind, base_url) {
            (AiProviderKind::Gemini, Some(url)) => {
                Arc::new(GeminiProvider::with_base_url(http_client, api_key, url))
            }
            (AiProviderKind::Gemini, None) => Arc::new(GeminiProvider::new(http_client, api_key)),
            (AiProviderKind::OpenAi, Some(url)) => {
                Arc::new(OpenAiProvider::with_base_url(http_client, api_key, url))
            }
            (AiProviderKind::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
        }
    }
}
