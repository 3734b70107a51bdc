//! Validated generation requests

use thiserror::Error;

use crate::domain::DomainError;

/// Request invariant violations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationRequestError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid experience {value}: must be a non-negative number of years")]
    InvalidExperience { value: f64 },

    #[error("Invalid number of questions {value}: must be greater than 0")]
    InvalidCount { value: i64 },

    #[error("Invalid number of questions {value}: must be no larger than {max}")]
    CountTooLarge { value: i64, max: u32 },
}

impl From<GenerationRequestError> for DomainError {
    fn from(err: GenerationRequestError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Request for a set of interview questions with answers
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSetRequest {
    role: String,
    experience_years: f64,
    topics: String,
    count: u32,
}

impl QuestionSetRequest {
    pub fn new(
        role: impl Into<String>,
        experience_years: f64,
        topics: impl Into<String>,
        count: i64,
    ) -> Result<Self, GenerationRequestError> {
        let role = non_empty("role", role.into())?;
        let topics = non_empty("topicsToFocus", topics.into())?;

        if !experience_years.is_finite() || experience_years < 0.0 {
            return Err(GenerationRequestError::InvalidExperience {
                value: experience_years,
            });
        }

        if count <= 0 {
            return Err(GenerationRequestError::InvalidCount { value: count });
        }

        let count = u32::try_from(count).map_err(|_| GenerationRequestError::CountTooLarge {
            value: count,
            max: u32::MAX,
        })?;

        Ok(Self {
            role,
            experience_years,
            topics,
            count,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn experience_years(&self) -> f64 {
        self.experience_years
    }

    pub fn topics(&self) -> &str {
        &self.topics
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Request for an in-depth explanation of one interview question
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationRequest {
    question: String,
}

impl ExplanationRequest {
    pub fn new(question: impl Into<String>) -> Result<Self, GenerationRequestError> {
        Ok(Self {
            question: non_empty("question", question.into())?,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Either kind of generation request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    QuestionSet(QuestionSetRequest),
    Explanation(ExplanationRequest),
}

impl From<QuestionSetRequest> for GenerationRequest {
    fn from(request: QuestionSetRequest) -> Self {
        Self::QuestionSet(request)
    }
}

impl From<ExplanationRequest> for GenerationRequest {
    fn from(request: ExplanationRequest) -> Self {
        Self::Explanation(request)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, GenerationRequestError> {
    if value.trim().is_empty() {
        return Err(GenerationRequestError::EmptyField { field });
    }

    Ok(value)
}
