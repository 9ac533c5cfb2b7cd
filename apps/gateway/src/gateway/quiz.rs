//! Big Five quiz generation.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::gateway::cleanup::{decode_json, strip_code_fence, validate_questions};
use crate::gateway::models::{JobOffer, PersonalityQuestion, TraitWeights};
use crate::gateway::prompts::render_quiz_prompt;
use crate::llm_client::{CompletionRequest, GenerativeProvider};
use crate::state::GatewaySettings;

const QUIZ_MAX_TOKENS: u32 = 3000;
const QUIZ_TEMPERATURE: f32 = 0.7;
/// How much of the raw answer goes to the debug log.
const RAW_LOG_CHARS: usize = 500;

/// Renders the quiz prompt, calls the model once and returns the validated
/// questions, with options shuffled when the deployment asks for it.
pub async fn generate_test(
    provider: &dyn GenerativeProvider,
    settings: GatewaySettings,
    offre: &JobOffer,
    poids: &TraitWeights,
) -> Result<Vec<PersonalityQuestion>, AppError> {
    poids.validate()?;

    let prompt = render_quiz_prompt(settings.variant, offre, poids);
    let request =
        CompletionRequest::new(prompt, QUIZ_MAX_TOKENS).with_temperature(QUIZ_TEMPERATURE);

    let raw = provider.complete(request).await?;
    debug!(
        "Raw quiz answer: {}",
        raw.chars().take(RAW_LOG_CHARS).collect::<String>()
    );

    let cleaned = strip_code_fence(&raw);
    let value = decode_json(&cleaned)?;
    let mut questions = validate_questions(value, &cleaned)?;

    if settings.shuffle_options {
        shuffle_options(&mut questions, &mut rand::thread_rng());
    }

    info!(
        "Generated {} quiz questions ({} requested)",
        questions.len(),
        poids.total()
    );

    Ok(questions)
}

/// Shuffles the options of every question in place. Question order is kept.
pub fn shuffle_options<R: Rng + ?Sized>(questions: &mut [PersonalityQuestion], rng: &mut R) {
    for question in questions.iter_mut() {
        question.options.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn question(scores: &[i64]) -> PersonalityQuestion {
        PersonalityQuestion {
            trait_label: json!("conscience"),
            question: json!("q"),
            options: scores
                .iter()
                .map(|s| json!({"text": format!("option {s}"), "score": s}))
                .collect(),
            extra: Default::default(),
        }
    }

    fn sorted_scores(q: &PersonalityQuestion) -> Vec<i64> {
        let mut scores: Vec<i64> = q.options.iter().filter_map(|o| o["score"].as_i64()).collect();
        scores.sort_unstable();
        scores
    }

    #[test]
    fn test_shuffle_keeps_every_option() {
        let mut questions = vec![question(&[1, 2, 4, 5]), question(&[1, 2, 3, 4, 5])];
        let mut rng = StdRng::seed_from_u64(7);

        shuffle_options(&mut questions, &mut rng);

        assert_eq!(sorted_scores(&questions[0]), vec![1, 2, 4, 5]);
        assert_eq!(sorted_scores(&questions[1]), vec![1, 2, 3, 4, 5]);
        // Option text stays attached to its score.
        for q in &questions {
            for o in &q.options {
                assert_eq!(o["text"], format!("option {}", o["score"]));
            }
        }
    }

    #[test]
    fn test_shuffle_eventually_reorders() {
        let original = question(&[1, 2, 3, 4, 5]);
        let mut rng = StdRng::seed_from_u64(42);

        let reordered = (0..20).any(|_| {
            let mut questions = vec![original.clone()];
            shuffle_options(&mut questions, &mut rng);
            questions[0] != original
        });

        assert!(reordered);
    }

    #[test]
    fn test_shuffle_handles_string_options() {
        let labels = ["Pas du tout d'accord", "Plutôt d'accord", "Tout à fait d'accord"];
        let mut questions = vec![PersonalityQuestion {
            trait_label: json!("stabilite"),
            question: json!("q"),
            options: labels.iter().map(|l| json!(l)).collect(),
            extra: Default::default(),
        }];

        shuffle_options(&mut questions, &mut StdRng::seed_from_u64(3));

        let mut kept: Vec<&str> = questions[0].options.iter().filter_map(|o| o.as_str()).collect();
        kept.sort_unstable();
        let mut expected = labels.to_vec();
        expected.sort_unstable();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_shuffle_handles_empty_options() {
        let mut questions = vec![question(&[])];
        shuffle_options(&mut questions, &mut StdRng::seed_from_u64(1));
        assert!(questions[0].options.is_empty());
    }
}
