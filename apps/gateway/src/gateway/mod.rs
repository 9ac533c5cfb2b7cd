// Prompt Gateway: renders a prompt per endpoint, makes one model call,
// then cleans, decodes and shape-checks the answer.
// All model calls go through llm_client::GenerativeProvider.

pub mod cleanup;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod portrait;
pub mod prompts;
pub mod quiz;
