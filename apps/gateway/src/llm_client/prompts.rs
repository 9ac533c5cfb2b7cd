// Shared prompt fragments.
// Each gateway operation keeps its own templates in gateway/prompts.rs.
// This file contains instructions common to every structured-output prompt.

/// Closing instruction for prompts whose answer is parsed as JSON.
/// The model still wraps its answer in a code fence now and then;
/// `gateway::cleanup` deals with that.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Ne réponds qu'au format JSON, sans explication, sans balises Markdown.";
