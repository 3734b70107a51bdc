//! AI generation core: prompts, retrying model invocation, output parsing
//! and failure classification

pub mod classifier;
pub mod invoker;
pub mod parser;
pub mod prompt;
pub mod request;
pub mod result;
pub mod service;

pub use classifier::{classify, ClassifiedError, FailureKind};
pub use invoker::{ModelInvoker, RetryPolicy};
pub use parser::{parse, parse_explanation, parse_question_set};
pub use prompt::{build_explanation_prompt, build_question_set_prompt};
pub use request::{ExplanationRequest, GenerationRequest, GenerationRequestError, QuestionSetRequest};
pub use result::{ConceptExplanation, ExpectedShape, ParsedResult, QuestionAnswer, QuestionAnswerList};
pub use service::GenerationService;
