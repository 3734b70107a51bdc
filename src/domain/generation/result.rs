//! Structured values parsed out of model output

use serde::{Deserialize, Serialize};

/// One generated interview question with its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Ordered, non-empty list of question/answer pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionAnswerList(Vec<QuestionAnswer>);

impl QuestionAnswerList {
    /// Returns `None` for an empty list
    pub fn new(items: Vec<QuestionAnswer>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    pub fn items(&self) -> &[QuestionAnswer] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// In-depth explanation of a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptExplanation {
    pub title: String,
    pub explanation: String,
}

/// Shape the caller expects the model to have produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    QuestionAnswerList,
    ConceptExplanation,
}

impl std::fmt::Display for ExpectedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuestionAnswerList => write!(f, "question_answer_list"),
            Self::ConceptExplanation => write!(f, "concept_explanation"),
        }
    }
}

/// Parsed model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResult {
    QuestionAnswers(QuestionAnswerList),
    Explanation(ConceptExplanation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        assert!(QuestionAnswerList::new(Vec::new()).is_none());
    }

    #[test]
    fn test_list_serializes_as_plain_array() {
        let list = QuestionAnswerList::new(vec![QuestionAnswer {
            question: "What is ownership?".to_string(),
            answer: "Each value has a single owner.".to_string(),
        }])
        .unwrap();

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "question": "What is ownership?",
                "answer": "Each value has a single owner."
            }])
        );
        assert_eq!(list.len(), 1);
    }
}
