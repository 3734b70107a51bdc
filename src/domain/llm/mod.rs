//! LLM provider domain trait

mod provider;

pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::MockLlmProvider;
