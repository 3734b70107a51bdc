//! Request bodies for the generation endpoints

use serde::Deserialize;

use super::error::ApiError;
use crate::domain::{ExplanationRequest, QuestionSetRequest};

/// JSON number, or a string holding one
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whole numbers only; `5.0` and `"5.0"` are accepted, `5.5` is not
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
        }
    }
}

fn whole(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

/// POST /api/ai/generate-questions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub role: Option<String>,
    pub experience: Option<NumberOrString>,
    pub topics_to_focus: Option<String>,
    pub number_of_questions: Option<NumberOrString>,
}

impl GenerateQuestionsRequest {
    pub fn into_domain(self) -> Result<QuestionSetRequest, ApiError> {
        let (Some(role), Some(experience), Some(topics), Some(count)) = (
            self.role,
            self.experience,
            self.topics_to_focus,
            self.number_of_questions,
        ) else {
            return Err(ApiError::bad_request("Missing required fields"));
        };

        let experience = experience
            .as_f64()
            .ok_or_else(|| ApiError::bad_request("experience must be a number"))?;
        let count = count
            .as_i64()
            .ok_or_else(|| ApiError::bad_request("numberOfQuestions must be a whole number"))?;

        QuestionSetRequest::new(role, experience, topics, count)
            .map_err(|e| ApiError::bad_request(e.to_string()))
    }
}

/// POST /api/ai/generate-explanation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateExplanationRequest {
    pub question: Option<String>,
}

impl GenerateExplanationRequest {
    pub fn into_domain(self) -> Result<ExplanationRequest, ApiError> {
        let question = self
            .question
            .ok_or_else(|| ApiError::bad_request("Missing required field: question"))?;

        ExplanationRequest::new(question).map_err(|e| ApiError::bad_request(e.to_string()))
    }
}
