//! Domain layer - generation core and provider abstraction

pub mod error;
pub mod generation;
pub mod llm;

pub use error::DomainError;
pub use generation::{
    ClassifiedError, ConceptExplanation, ExplanationRequest, FailureKind, GenerationService,
    ModelInvoker, QuestionAnswer, QuestionAnswerList, QuestionSetRequest, RetryPolicy,
};
pub use llm::LlmProvider;
