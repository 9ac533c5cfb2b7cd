//! Image-based personality flow: an illustration is generated from the CV and
//! offer, the candidate describes it, and the description is analysed.

use crate::errors::AppError;
use crate::gateway::models::{ImageQuestionResponse, PersonalityResponse};
use crate::gateway::prompts::{render_image_question_prompt, render_personality_prompt};
use crate::llm_client::{CompletionRequest, GenerativeProvider};

const ANALYSIS_MAX_TOKENS: u32 = 150;

/// Returns the image URL together with the prompt that produced it, so the
/// caller can send that prompt back to `analyze_personality`.
pub async fn generate_image_question(
    provider: &dyn GenerativeProvider,
    cv: &str,
    offre: &str,
) -> Result<ImageQuestionResponse, AppError> {
    let prompt = render_image_question_prompt(cv, offre);
    let image_url = provider.generate_image(&prompt).await?;

    Ok(ImageQuestionResponse {
        image_url,
        description_auto: prompt,
    })
}

pub async fn analyze_personality(
    provider: &dyn GenerativeProvider,
    image_prompt: &str,
    description: &str,
) -> Result<PersonalityResponse, AppError> {
    let prompt = render_personality_prompt(image_prompt, description);
    let text = provider
        .complete(CompletionRequest::new(prompt, ANALYSIS_MAX_TOKENS))
        .await?;

    Ok(PersonalityResponse {
        personality_analysis: text.trim().to_string(),
    })
}
