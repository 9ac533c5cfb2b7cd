//! Axum route handlers for the gateway API.

use axum::{extract::State, Json};
use tracing::debug;

use crate::errors::AppError;
use crate::gateway::matching::match_cv_offre;
use crate::gateway::models::{
    GenerateTestRequest, GenerateTestResponse, ImageQuestionRequest, ImageQuestionResponse,
    MatchRequest, MatchResult, PersonalityRequest, PersonalityResponse,
};
use crate::gateway::portrait::{analyze_personality, generate_image_question};
use crate::gateway::quiz::generate_test;
use crate::state::AppState;

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// POST /generate-image-question
///
/// Generates an illustration of a work situation from the CV and offer text.
pub async fn handle_generate_image_question(
    State(state): State<AppState>,
    Json(request): Json<ImageQuestionRequest>,
) -> Result<Json<ImageQuestionResponse>, AppError> {
    require_text("cv", &request.cv)?;

    let response =
        generate_image_question(state.provider.as_ref(), &request.cv, &request.offre).await?;

    Ok(Json(response))
}

/// POST /analyze-personality
///
/// Reads the candidate's description of the generated image against the
/// intent the image was generated with.
pub async fn handle_analyze_personality(
    State(state): State<AppState>,
    Json(request): Json<PersonalityRequest>,
) -> Result<Json<PersonalityResponse>, AppError> {
    require_text("description", &request.description)?;
    debug!("Analysing description for image {}", request.image_url);

    let response = analyze_personality(
        state.provider.as_ref(),
        &request.image_prompt,
        &request.description,
    )
    .await?;

    Ok(Json(response))
}

/// POST /generate-test
///
/// Generates a Big Five quiz tailored to the offer, with the per-trait
/// question counts given in `poids`.
pub async fn handle_generate_test(
    State(state): State<AppState>,
    Json(request): Json<GenerateTestRequest>,
) -> Result<Json<GenerateTestResponse>, AppError> {
    let questions = generate_test(
        state.provider.as_ref(),
        state.settings,
        &request.offre,
        &request.poids,
    )
    .await?;

    Ok(Json(GenerateTestResponse { questions }))
}

/// POST /match-cv-offre
///
/// Returns the matching verdict object directly, without a wrapper key.
pub async fn handle_match_cv_offre(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    require_text("cv", &request.cv)?;

    let result = match_cv_offre(
        state.provider.as_ref(),
        state.settings.variant,
        &request.cv,
        &request.offre,
    )
    .await?;

    Ok(Json(result))
}
