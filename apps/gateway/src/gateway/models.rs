//! Request, response and model-output types for the gateway endpoints.
//!
//! JSON keys follow the French camelCase names the front-end already sends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Upper bound on the number of quiz questions a single test may ask for.
pub const MAX_QUESTIONS: u32 = 15;

// ────────────────────────────────────────────────────────────────────────────
// Job offer
// ────────────────────────────────────────────────────────────────────────────

/// Canonical job offer. Deployments disagree on which fields they send, so
/// everything beyond the four core fields is optional and simply left out of
/// the rendered prompt when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub description: String,
    pub niveau_experience: String,
    pub responsabilite: String,
    pub experience: String,
    /// Job title.
    pub poste: Option<String>,
    /// Work type (remote, on-site, ...).
    pub type_travail: Option<String>,
    pub niveau_etude: Option<String>,
    pub pays: Option<String>,
    pub ville: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Big Five
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BigFiveTrait {
    Ouverture,
    Conscience,
    Extraversion,
    Agreabilite,
    Stabilite,
}

impl BigFiveTrait {
    /// Label the model is asked to put in each question's `trait` field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ouverture => "ouverture",
            Self::Conscience => "conscience",
            Self::Extraversion => "extraversion",
            Self::Agreabilite => "agreabilite",
            Self::Stabilite => "stabilite",
        }
    }

    /// Phrase used inside prompt sentences ("3 questions sur l’ouverture").
    pub fn phrase(self) -> &'static str {
        match self {
            Self::Ouverture => "l’ouverture",
            Self::Conscience => "la conscience",
            Self::Extraversion => "l’extraversion",
            Self::Agreabilite => "l’agréabilité",
            Self::Stabilite => "la stabilité émotionnelle",
        }
    }
}

/// Number of questions to generate per trait.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TraitWeights {
    pub ouverture: u32,
    pub conscience: u32,
    pub extraversion: u32,
    pub agreabilite: u32,
    pub stabilite: u32,
}

impl TraitWeights {
    pub fn counts(&self) -> [(BigFiveTrait, u32); 5] {
        [
            (BigFiveTrait::Ouverture, self.ouverture),
            (BigFiveTrait::Conscience, self.conscience),
            (BigFiveTrait::Extraversion, self.extraversion),
            (BigFiveTrait::Agreabilite, self.agreabilite),
            (BigFiveTrait::Stabilite, self.stabilite),
        ]
    }

    /// Summed as `u64` so five maximal counts cannot wrap around.
    pub fn total(&self) -> u64 {
        self.counts().iter().map(|(_, n)| u64::from(*n)).sum()
    }

    /// All-zero weights are accepted; only the upper bound is enforced.
    pub fn validate(&self) -> Result<(), AppError> {
        let total = self.total();
        if total > u64::from(MAX_QUESTIONS) {
            return Err(AppError::Validation(format!(
                "poids asks for {total} questions, at most {MAX_QUESTIONS} are allowed"
            )));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Difficulty
// ────────────────────────────────────────────────────────────────────────────

/// Quiz difficulty, inferred from the offer's required experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Facile,
    Moyenne,
    Difficile,
}

impl Difficulty {
    /// "aucune", "débutant" and 0–1 years → facile; 2–4 years → moyenne;
    /// 5+ years, "senior", "expert" or "plus" → difficile; anything else → moyenne.
    /// The first number in the text wins, so "10 ans" is difficile.
    pub fn from_experience_level(level: &str) -> Self {
        let level = level.trim().to_lowercase();

        if level.contains("aucune") || level.contains("débutant") {
            return Self::Facile;
        }

        let years: String = level
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if let Ok(years) = years.parse::<u32>() {
            return match years {
                0..=1 => Self::Facile,
                2..=4 => Self::Moyenne,
                _ => Self::Difficile,
            };
        }

        if ["senior", "expert", "plus"].iter().any(|w| level.contains(w)) {
            Self::Difficile
        } else {
            Self::Moyenne
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model outputs
// ────────────────────────────────────────────────────────────────────────────

/// One generated quiz question. Only the three keys are required; their
/// values and any extra keys pass through untouched. Options are usually
/// `{"text", "score"}` objects but are not held to that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityQuestion {
    #[serde(rename = "trait")]
    pub trait_label: Value,
    pub question: Value,
    pub options: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// CV/offer matching verdict, returned as the model wrote it. `score` is
/// not recomputed or range-checked here, and `points_forts`, `ecarts` or any
/// other key the model adds travel in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: Value,
    pub evaluation: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Requests / responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImageQuestionRequest {
    pub cv: String,
    pub offre: String,
}

#[derive(Debug, Serialize)]
pub struct ImageQuestionResponse {
    pub image_url: String,
    pub description_auto: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonalityRequest {
    pub image_url: String,
    pub image_prompt: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PersonalityResponse {
    pub personality_analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTestRequest {
    pub offre: JobOffer,
    pub poids: TraitWeights,
}

#[derive(Debug, Serialize)]
pub struct GenerateTestResponse {
    pub questions: Vec<PersonalityQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub cv: String,
    pub offre: JobOffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_offer_accepts_quiz_shape() {
        let json = r#"{
            "poste": "Développeur backend",
            "description": "API Rust",
            "typeTravail": "Hybride",
            "niveauExperience": "3 ans",
            "responsabilite": "Concevoir des services",
            "experience": "Microservices"
        }"#;
        let offer: JobOffer = serde_json::from_str(json).unwrap();
        assert_eq!(offer.poste.as_deref(), Some("Développeur backend"));
        assert_eq!(offer.type_travail.as_deref(), Some("Hybride"));
        assert!(offer.niveau_etude.is_none());
        assert!(offer.ville.is_none());
    }

    #[test]
    fn test_job_offer_accepts_matching_shape_without_title() {
        let json = r#"{
            "description": "Comptabilité fournisseurs",
            "niveauExperience": "2 ans",
            "niveauEtude": "Bac+3",
            "responsabilite": "Rapprochements bancaires",
            "experience": "Cabinet comptable",
            "pays": "France",
            "ville": "Lyon"
        }"#;
        let offer: JobOffer = serde_json::from_str(json).unwrap();
        assert!(offer.poste.is_none());
        assert_eq!(offer.niveau_etude.as_deref(), Some("Bac+3"));
        assert_eq!(offer.pays.as_deref(), Some("France"));
    }

    #[test]
    fn test_job_offer_requires_description() {
        let json = r#"{"niveauExperience": "2 ans", "responsabilite": "x", "experience": "y"}"#;
        assert!(serde_json::from_str::<JobOffer>(json).is_err());
    }

    #[test]
    fn test_trait_weights_total_and_bounds() {
        let weights = TraitWeights {
            ouverture: 3,
            conscience: 3,
            extraversion: 3,
            agreabilite: 3,
            stabilite: 3,
        };
        assert_eq!(weights.total(), 15);
        assert!(weights.validate().is_ok());

        let too_many = TraitWeights {
            stabilite: 4,
            ..weights
        };
        assert!(matches!(too_many.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_huge_weights_do_not_wrap_under_the_bound() {
        let weights = TraitWeights {
            ouverture: u32::MAX,
            conscience: 2,
            ..TraitWeights::default()
        };
        assert_eq!(weights.total(), u64::from(u32::MAX) + 2);
        assert!(matches!(weights.validate(), Err(AppError::Validation(_))));

        let all_max = TraitWeights {
            ouverture: u32::MAX,
            conscience: u32::MAX,
            extraversion: u32::MAX,
            agreabilite: u32::MAX,
            stabilite: u32::MAX,
        };
        assert!(all_max.validate().is_err());
    }

    #[test]
    fn test_all_zero_weights_are_accepted() {
        let weights = TraitWeights::default();
        assert_eq!(weights.total(), 0);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_negative_weights_are_rejected_at_decode() {
        let json = r#"{"ouverture": -1, "conscience": 0, "extraversion": 0, "agreabilite": 0, "stabilite": 0}"#;
        assert!(serde_json::from_str::<TraitWeights>(json).is_err());
    }

    #[test]
    fn test_difficulty_from_experience_level() {
        assert_eq!(Difficulty::from_experience_level("Aucune"), Difficulty::Facile);
        assert_eq!(Difficulty::from_experience_level("0-1 an"), Difficulty::Facile);
        assert_eq!(Difficulty::from_experience_level("3 ans"), Difficulty::Moyenne);
        assert_eq!(Difficulty::from_experience_level("10 ans"), Difficulty::Difficile);
        assert_eq!(Difficulty::from_experience_level("5 ans ou plus"), Difficulty::Difficile);
        assert_eq!(Difficulty::from_experience_level("Senior"), Difficulty::Difficile);
        assert_eq!(Difficulty::from_experience_level("Confirmé"), Difficulty::Moyenne);
    }

    #[test]
    fn test_question_keeps_unknown_keys() {
        let json = r#"{
            "trait": "conscience",
            "question": "q",
            "options": [{"text": "a", "score": 1, "id": "a1"}],
            "contexte": "réunion"
        }"#;
        let question: PersonalityQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.trait_label, "conscience");
        assert_eq!(question.options[0]["id"], "a1");

        let back = serde_json::to_value(&question).unwrap();
        assert_eq!(back["contexte"], "réunion");
        assert_eq!(back["trait"], "conscience");
    }

    #[test]
    fn test_question_accepts_plain_string_options() {
        let json = r#"{
            "trait": "stabilite",
            "question": "q",
            "options": ["Pas du tout d'accord", "Tout à fait d'accord"]
        }"#;
        let question: PersonalityQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.options[1], "Tout à fait d'accord");
    }

    #[test]
    fn test_match_result_is_passed_through() {
        let json = r#"{"score": 87.5, "evaluation": "ok", "recommandation": "entretien"}"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 87.5);

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["recommandation"], "entretien");
        assert!(back.get("points_forts").is_none());
    }
}
