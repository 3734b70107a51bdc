//! Question and explanation generation endpoints

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, GenerateExplanationRequest, GenerateQuestionsRequest, Json};
use crate::domain::{ConceptExplanation, QuestionAnswerList};

/// POST /api/ai/generate-questions
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(body): Json<GenerateQuestionsRequest>,
) -> Result<Json<QuestionAnswerList>, ApiError> {
    let request = body.into_domain()?;

    info!(
        role = %request.role(),
        count = request.count(),
        "Processing question generation request"
    );

    state
        .generation_service
        .generate_question_set(&request)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::from_classified(
                &e,
                "Failed to generate questions",
                state.expose_error_details(),
            )
        })
}

/// POST /api/ai/generate-explanation
pub async fn generate_explanation(
    State(state): State<AppState>,
    Json(body): Json<GenerateExplanationRequest>,
) -> Result<Json<ConceptExplanation>, ApiError> {
    let request = body.into_domain()?;

    info!("Processing explanation request");

    state
        .generation_service
        .generate_explanation(&request)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::from_classified(
                &e,
                "Failed to generate explanation",
                state.expose_error_details(),
            )
        })
}
