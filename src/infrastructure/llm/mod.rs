//! LLM provider implementations

mod factory;
mod gemini;
mod http_client;
mod openai;

pub use factory::LlmProviderFactory;
pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;
