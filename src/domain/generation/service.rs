//! Question-set and explanation generation

use tracing::{error, info, instrument};

use super::classifier::{classify, ClassifiedError};
use super::invoker::ModelInvoker;
use super::parser::{parse, parse_explanation, parse_question_set};
use super::request::{ExplanationRequest, GenerationRequest, QuestionSetRequest};
use super::result::{ConceptExplanation, ParsedResult, QuestionAnswerList};
use crate::domain::DomainError;

/// Prompt -> invoke with retry -> parse -> classify
#[derive(Debug)]
pub struct GenerationService {
    invoker: ModelInvoker,
}

impl GenerationService {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    /// Generate interview questions with answers
    #[instrument(
        skip_all,
        fields(model = %self.invoker.model(), role = %request.role(), count = request.count())
    )]
    pub async fn generate_question_set(
        &self,
        request: &QuestionSetRequest,
    ) -> Result<QuestionAnswerList, ClassifiedError> {
        info!("Generating interview questions");

        let result = async {
            let raw = self.invoker.invoke(&request.to_prompt()).await?;
            info!(chars = raw.len(), "Received raw question set");
            parse_question_set(&raw)
        }
        .await;

        match result {
            Ok(list) => {
                info!(questions = list.len(), "Parsed question set");
                Ok(list)
            }
            Err(e) => Err(log_classified("question_set", e)),
        }
    }

    /// Generate an in-depth explanation for one question
    #[instrument(skip_all, fields(model = %self.invoker.model()))]
    pub async fn generate_explanation(
        &self,
        request: &ExplanationRequest,
    ) -> Result<ConceptExplanation, ClassifiedError> {
        info!("Generating concept explanation");

        let result = async {
            let raw = self.invoker.invoke(&request.to_prompt()).await?;
            info!(chars = raw.len(), "Received raw explanation");
            parse_explanation(&raw)
        }
        .await;

        match result {
            Ok(explanation) => {
                info!(title = %explanation.title, "Parsed explanation");
                Ok(explanation)
            }
            Err(e) => Err(log_classified("explanation", e)),
        }
    }

    /// Generate whichever result the request asks for
    #[instrument(
        skip_all,
        fields(model = %self.invoker.model(), shape = %request.expected_shape())
    )]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ParsedResult, ClassifiedError> {
        info!("Generating result");

        let result = async {
            let raw = self.invoker.invoke(&request.to_prompt()).await?;
            info!(chars = raw.len(), "Received raw model output");
            parse(&raw, request.expected_shape())
        }
        .await;

        match result {
            Ok(parsed) => {
                info!("Parsed result");
                Ok(parsed)
            }
            Err(e) => Err(log_classified("generate", e)),
        }
    }
}

fn log_classified(operation: &'static str, err: DomainError) -> ClassifiedError {
    let classified = classify(&err);

    error!(
        operation = operation,
        kind = %classified.kind,
        retryable = classified.retryable,
        error = %err,
        "Generation failed"
    );

    classified
}
