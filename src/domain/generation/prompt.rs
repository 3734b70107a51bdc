//! Instruction templates sent to the model
//!
//! Both templates pin the output to bare JSON so the parser can reject
//! anything else. Inputs are embedded verbatim.

use super::request::{ExplanationRequest, GenerationRequest, QuestionSetRequest};
use super::result::ExpectedShape;

/// Build the question-set prompt
pub fn build_question_set_prompt(
    role: &str,
    experience_years: f64,
    topics: &str,
    count: u32,
) -> String {
    format!(
        r#"
You are an expert technical interviewer. Generate exactly {count} interview questions for a {role} position requiring {experience_years} years of experience.

Focus on these specific topics: {topics}.

IMPORTANT:
- Return ONLY valid JSON array, no other text
- Each object must have "question" and "answer" fields
- Answers should be detailed but beginner-friendly
- Include code examples where appropriate
- Ensure the JSON is properly formatted

Format:
[
  {{
    "question": "Question text here?",
    "answer": "Detailed answer here with code examples if needed."
  }}
]
"#
    )
}

/// Build the concept-explanation prompt
pub fn build_explanation_prompt(question: &str) -> String {
    format!(
        r#"
Explain the following interview question in depth for a beginner developer: "{question}"

IMPORTANT:
- Return ONLY valid JSON object, no other text
- The object must have "title" and "explanation" fields
- Title should be concise (max 10 words)
- Explanation should be comprehensive but easy to understand
- Include code examples if relevant
- Ensure the JSON is properly formatted

Format:
{{
  "title": "Concise title here",
  "explanation": "Detailed explanation here"
}}
"#
    )
}

impl QuestionSetRequest {
    pub fn to_prompt(&self) -> String {
        build_question_set_prompt(
            self.role(),
            self.experience_years(),
            self.topics(),
            self.count(),
        )
    }
}

impl ExplanationRequest {
    pub fn to_prompt(&self) -> String {
        build_explanation_prompt(self.question())
    }
}

impl GenerationRequest {
    pub fn to_prompt(&self) -> String {
        match self {
            Self::QuestionSet(request) => request.to_prompt(),
            Self::Explanation(request) => request.to_prompt(),
        }
    }

    /// Shape the prompt asks the model to produce
    pub fn expected_shape(&self) -> ExpectedShape {
        match self {
            Self::QuestionSet(_) => ExpectedShape::QuestionAnswerList,
            Self::Explanation(_) => ExpectedShape::ConceptExplanation,
        }
    }
}
