// Prompt templates for the gateway operations, and the functions that fill them.
// Templates use `{placeholder}` markers replaced with `str::replace`.
// Prompts are in French: the candidates, offers and front-end all are.

use crate::config::PromptVariant;
use crate::gateway::models::{Difficulty, JobOffer, TraitWeights, MAX_QUESTIONS};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Illustration prompt. Replace: {cv}, {offre}
pub const IMAGE_QUESTION_TEMPLATE: &str = r#"Génère une illustration simple représentant une situation professionnelle reflétant la personnalité d’un candidat.
Pas de texte. Style clair, épuré.

CV : {cv}
Offre : {offre}

Exemples :
- Personne échangeant calmement en salle de réunion
- Personne aidant un collègue à résoudre un problème
- Personne concentrée seule dans un bureau"#;

/// Personality analysis prompt. Replace: {image_prompt}, {description}
pub const PERSONALITY_TEMPLATE: &str = r#"Voici une image représentant une scène professionnelle : elle a été générée selon cette intention :
"{image_prompt}"

Le candidat a ensuite rédigé la description suivante :
"{description}"

Analyse de manière concise la personnalité du candidat, en te concentrant sur :
- Les traits de personnalité principaux (ex : leader, analytique, orienté équipe, etc.)
- Son approche du travail et de la collaboration.
- Sa réaction probable face à une situation similaire à celle décrite.

Réponds de manière brève et directe, en résumant les éléments clés de la personnalité du candidat."#;

/// Big Five quiz prompt.
/// Replace: {offer_lines}, {max_questions}, {trait_lines}, {difficulty},
///          {option_rules}, {format_example}, {json_only}
pub const QUIZ_TEMPLATE: &str = r#"Tu es un psychologue expert en recrutement et un rédacteur de tests professionnels. Crée un test de personnalité basé sur le modèle des Big Five (ouverture, conscience, extraversion, agréabilité, stabilité émotionnelle), conçu pour évaluer la compatibilité d’un candidat avec l’offre suivante :

### Informations sur l’offre :
{offer_lines}

### Instructions spécifiques :
- Le test contiendra **au maximum {max_questions} questions**, réparties comme suit :
{trait_lines}
- {difficulty}
- Chaque question doit :
  - Être **contextualisée dans des situations de travail réelles ou techniques** liées à l’offre.
  - Avoir une **formulation unique**, avec un **contexte professionnel distinct pour chaque question**.
  - Employer un **langage technique ou professionnel adapté au domaine du poste**.
{option_rules}
- Ne répète pas les contextes d’une question à l’autre.
- Ne sors pas du format JSON suivant, sans balises ni explications :
{format_example}

{json_only}"#;

const BEHAVIORAL_OPTION_RULES: &str = "  - Être rédigée sous forme de **QCM à 4 réponses** (avec scores de 1 à 5), où chaque option est formulée comme une **réponse comportementale concrète et nuancée**.
  - Chaque option doit représenter un **comportement ou une attitude spécifique** face à la situation décrite.
  - Les options doivent rester **cohérentes avec l’intention du trait de personnalité évalué**, tout en étant **distinctes et plausibles**.";

const LIKERT_OPTION_RULES: &str =
    "  - Être rédigée sous forme de **QCM à 4 réponses** (avec scores de 1 à 5).";

const BEHAVIORAL_FORMAT_EXAMPLE: &str = r#"[
    {
        "trait": "conscience",
        "question": "Lorsque je travaille sur plusieurs projets à échéance courte, je suis capable de hiérarchiser mes tâches efficacement.",
        "options": [
            {"text": "Je préfère attendre les instructions claires de mon supérieur avant de commencer.", "score": 1},
            {"text": "Je commence le travail mais demande des clarifications au fur et à mesure.", "score": 2},
            {"text": "Je prends l’initiative en me basant sur mes expériences précédentes.", "score": 4},
            {"text": "Je planifie et lance le projet de manière autonome en anticipant les obstacles.", "score": 5}
        ]
    },
    ...
]"#;

const LIKERT_FORMAT_EXAMPLE: &str = r#"[
    {
        "trait": "conscience",
        "question": "Lorsque je travaille sur plusieurs projets à échéance courte, je suis capable de hiérarchiser mes tâches efficacement.",
        "options": [
            {"text": "Pas du tout d’accord", "score": 1},
            {"text": "Plutôt pas d’accord", "score": 2},
            {"text": "Plutôt d’accord", "score": 4},
            {"text": "Tout à fait d’accord", "score": 5}
        ]
    },
    ...
]"#;

/// CV/offer matching prompt. Replace: {cv}, {offer_lines}, {instructions}, {json_only}
pub const MATCH_TEMPLATE: &str = r#"Tu es un assistant RH expert en recrutement. Ta tâche est d'analyser le niveau de correspondance entre un CV et une offre d'emploi.

CV :
{cv}

Offre d'emploi :
{offer_lines}

{instructions}

Réponds uniquement au format JSON suivant :
{
    "score": 87,
    "evaluation": "Le profil est globalement adapté au poste, avec une bonne expérience en gestion de projet.",
    "points_forts": ["Expérience similaire", "Bonne communication"],
    "ecarts": ["Manque de certification demandée"]
}

{json_only}"#;

const DOMAIN_GATED_MATCH_INSTRUCTIONS: &str = "Instructions obligatoires :
1. Analyse si le poste du candidat correspond globalement au poste recherché, même si les mots sont différents.
   - Si les domaines sont totalement différents (exemple : comptable vs développeur), arrête l'analyse immédiatement.
   - Dans ce cas, donne un score de 0 et une explication rapide sans analyser les autres critères.
2. Si le poste est similaire ou dans le même domaine, continue l'analyse :
   - Compare les expériences du candidat et les responsabilités demandées
   - Compare le niveau d’étude et d’expérience
   - Analyse les compétences techniques et comportementales";

const PLAIN_MATCH_INSTRUCTIONS: &str = "Analyse les similarités entre :
- Les expériences du candidat et les responsabilités demandées
- Le niveau d’étude et d’expérience
- Les compétences techniques et comportementales

Donne :
- Un score de matching entre 0 et 100
- Une évaluation brève de l'adéquation du profil
- Les points forts et les écarts";

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render_image_question_prompt(cv: &str, offre: &str) -> String {
    IMAGE_QUESTION_TEMPLATE
        .replace("{cv}", cv.trim())
        .replace("{offre}", offre.trim())
}

pub fn render_personality_prompt(image_prompt: &str, description: &str) -> String {
    PERSONALITY_TEMPLATE
        .replace("{image_prompt}", image_prompt.trim())
        .replace("{description}", description.trim())
}

pub fn render_quiz_prompt(variant: PromptVariant, offre: &JobOffer, poids: &TraitWeights) -> String {
    let offer_lines = bullet_lines(&[
        ("Poste", offre.poste.as_deref()),
        ("Description", Some(offre.description.as_str())),
        ("Type de travail", offre.type_travail.as_deref()),
        ("Niveau d’expérience requis", Some(offre.niveau_experience.as_str())),
        ("Responsabilités principales", Some(offre.responsabilite.as_str())),
        ("Expérience professionnelle attendue", Some(offre.experience.as_str())),
    ]);

    let trait_lines = poids
        .counts()
        .iter()
        .map(|(t, n)| {
            format!("  - {n} questions sur {} (trait \"{}\")", t.phrase(), t.label())
        })
        .collect::<Vec<_>>()
        .join("\n");

    let (option_rules, format_example) = match variant {
        PromptVariant::Behavioral => (BEHAVIORAL_OPTION_RULES, BEHAVIORAL_FORMAT_EXAMPLE),
        PromptVariant::Likert => (LIKERT_OPTION_RULES, LIKERT_FORMAT_EXAMPLE),
    };

    let difficulty = Difficulty::from_experience_level(&offre.niveau_experience);

    // Caller text goes in last so it is never scanned for markers.
    QUIZ_TEMPLATE
        .replace("{max_questions}", &MAX_QUESTIONS.to_string())
        .replace("{trait_lines}", &trait_lines)
        .replace("{difficulty}", difficulty_instruction(difficulty))
        .replace("{option_rules}", option_rules)
        .replace("{format_example}", format_example)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{offer_lines}", &offer_lines)
}

pub fn render_match_prompt(variant: PromptVariant, cv: &str, offre: &JobOffer) -> String {
    // The domain check compares job titles, so only that flavour sends the title.
    let (title, instructions) = match variant {
        PromptVariant::Behavioral => (offre.poste.as_deref(), DOMAIN_GATED_MATCH_INSTRUCTIONS),
        PromptVariant::Likert => (None, PLAIN_MATCH_INSTRUCTIONS),
    };

    let offer_lines = labelled_lines(&[
        ("Poste recherché", title),
        ("Description", Some(offre.description.as_str())),
        ("Niveau d'expérience", Some(offre.niveau_experience.as_str())),
        ("Niveau d’étude", offre.niveau_etude.as_deref()),
        ("Responsabilités", Some(offre.responsabilite.as_str())),
        ("Expérience demandée", Some(offre.experience.as_str())),
        ("Pays", offre.pays.as_deref()),
        ("Ville", offre.ville.as_deref()),
    ]);

    MATCH_TEMPLATE
        .replace("{instructions}", instructions)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{offer_lines}", &offer_lines)
        .replace("{cv}", cv.trim())
}

fn difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Facile => "Les questions doivent être simples et accessibles.",
        Difficulty::Moyenne => {
            "Les questions doivent avoir une difficulté modérée, avec des situations classiques du poste."
        }
        Difficulty::Difficile => {
            "Les questions doivent être complexes, incluant des dilemmes, des cas concrets ou des analyses comportementales poussées."
        }
    }
}

/// "- Label : value" per present field.
fn bullet_lines(fields: &[(&str, Option<&str>)]) -> String {
    present(fields)
        .map(|(label, value)| format!("- {label} : {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "Label: value" per present field.
fn labelled_lines(fields: &[(&str, Option<&str>)]) -> String {
    present(fields)
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn present<'a>(
    fields: &'a [(&'a str, Option<&'a str>)],
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    fields.iter().filter_map(|(label, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (*label, v))
    })
}
