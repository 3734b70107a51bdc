//! Model output sanitizing and parsing
//!
//! Raw completions are trimmed, stripped of a surrounding ```json fence,
//! pre-checked for a leading `[` or `{`, parsed with serde_json and then
//! validated against the shape the caller asked for. Every failure is a
//! [`DomainError::MalformedOutput`]; parsing never retries.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::result::{
    ConceptExplanation, ExpectedShape, ParsedResult, QuestionAnswer, QuestionAnswerList,
};
use crate::domain::DomainError;

/// Leading fence opener, e.g. "```json\n" or "```JSON "
static FENCE_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^```json\s*").unwrap());

const FENCE: &str = "```";

/// Characters of rejected output kept in log lines
const LOG_PREVIEW_CHARS: usize = 100;

/// Parse raw model output into the expected shape
pub fn parse(raw: &str, shape: ExpectedShape) -> Result<ParsedResult, DomainError> {
    match shape {
        ExpectedShape::QuestionAnswerList => {
            parse_shaped(raw, question_answers_from_value).map(ParsedResult::QuestionAnswers)
        }
        ExpectedShape::ConceptExplanation => {
            parse_shaped(raw, explanation_from_value).map(ParsedResult::Explanation)
        }
    }
}

/// Parse raw model output as a non-empty question/answer list
pub fn parse_question_set(raw: &str) -> Result<QuestionAnswerList, DomainError> {
    parse_shaped(raw, question_answers_from_value)
}

/// Parse raw model output as a concept explanation
pub fn parse_explanation(raw: &str) -> Result<ConceptExplanation, DomainError> {
    parse_shaped(raw, explanation_from_value)
}

/// Strip formatting artifacts; the result is what gets parsed
pub fn sanitize(raw: &str) -> &str {
    let text = raw.trim();

    let text = match FENCE_OPENER.find(text) {
        Some(opener) => &text[opener.end()..],
        None => text,
    };

    let text = text.strip_suffix(FENCE).unwrap_or(text);

    text.trim()
}

/// Sanitize, pre-check and parse into an untyped JSON value
pub fn parse_json(raw: &str) -> Result<Value, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::malformed_output("Empty response from model"));
    }

    let cleaned = sanitize(raw);

    if !cleaned.starts_with('[') && !cleaned.starts_with('{') {
        warn!(
            preview = %preview(cleaned),
            "Model response does not appear to be JSON"
        );
        return Err(DomainError::malformed_output(
            "Response is not a JSON array or object",
        ));
    }

    serde_json::from_str(cleaned).map_err(|e| {
        warn!(error = %e, preview = %preview(cleaned), "JSON parsing of model response failed");
        DomainError::malformed_output(format!("Failed to parse JSON: {}", e))
    })
}

/// Parse, then validate the shape; shape rejections are logged with a preview
fn parse_shaped<T>(
    raw: &str,
    validate: impl FnOnce(Value) -> Result<T, DomainError>,
) -> Result<T, DomainError> {
    let value = parse_json(raw)?;

    validate(value).inspect_err(|e| {
        warn!(
            error = %e,
            preview = %preview(sanitize(raw)),
            "Model response has unexpected shape"
        );
    })
}

fn question_answers_from_value(value: Value) -> Result<QuestionAnswerList, DomainError> {
    let Value::Array(elements) = value else {
        return Err(DomainError::malformed_output(
            "Expected a JSON array of question/answer objects",
        ));
    };

    let items = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| question_answer_from_value(index, element))
        .collect::<Result<Vec<_>, _>>()?;

    QuestionAnswerList::new(items)
        .ok_or_else(|| DomainError::malformed_output("Model returned an empty question list"))
}

fn question_answer_from_value(index: usize, value: Value) -> Result<QuestionAnswer, DomainError> {
    let item: QuestionAnswer = serde_json::from_value(value).map_err(|e| {
        DomainError::malformed_output(format!("Invalid question at index {}: {}", index, e))
    })?;

    if item.question.trim().is_empty() {
        return Err(DomainError::malformed_output(format!(
            "Question at index {} has an empty \"question\" field",
            index
        )));
    }

    if item.answer.trim().is_empty() {
        return Err(DomainError::malformed_output(format!(
            "Question at index {} has an empty \"answer\" field",
            index
        )));
    }

    Ok(item)
}

fn explanation_from_value(value: Value) -> Result<ConceptExplanation, DomainError> {
    #[derive(Deserialize)]
    struct RawExplanation {
        title: String,
        explanation: String,
    }

    if !value.is_object() {
        return Err(DomainError::malformed_output(
            "Expected a JSON object with \"title\" and \"explanation\"",
        ));
    }

    let raw: RawExplanation = serde_json::from_value(value)
        .map_err(|e| DomainError::malformed_output(format!("Invalid explanation: {}", e)))?;

    Ok(ConceptExplanation {
        title: raw.title,
        explanation: raw.explanation,
    })
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
