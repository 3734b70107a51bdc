//! API request and response types

pub mod error;
pub mod generation;
pub mod json;

pub use error::{ApiError, ApiErrorBody};
pub use generation::{GenerateExplanationRequest, GenerateQuestionsRequest, NumberOrString};
pub use json::Json;
