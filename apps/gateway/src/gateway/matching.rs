//! CV ↔ job offer matching.
//!
//! The "unrelated domains score 0" rule lives only in the prompt. The score is
//! passed through as the model produced it.

use tracing::info;

use crate::config::PromptVariant;
use crate::errors::AppError;
use crate::gateway::cleanup::{decode_json, strip_code_fence, validate_match_result};
use crate::gateway::models::{JobOffer, MatchResult};
use crate::gateway::prompts::render_match_prompt;
use crate::llm_client::{CompletionRequest, GenerativeProvider};

const MATCH_MAX_TOKENS: u32 = 500;

pub async fn match_cv_offre(
    provider: &dyn GenerativeProvider,
    variant: PromptVariant,
    cv: &str,
    offre: &JobOffer,
) -> Result<MatchResult, AppError> {
    let prompt = render_match_prompt(variant, cv, offre);
    let raw = provider
        .complete(CompletionRequest::new(prompt, MATCH_MAX_TOKENS))
        .await?;

    let cleaned = strip_code_fence(&raw);
    let value = decode_json(&cleaned)?;
    let result = validate_match_result(value, &cleaned)?;

    info!("Match score {} for offer", result.score);

    Ok(result)
}
