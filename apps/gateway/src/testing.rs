//! Test doubles shared by the handler and route tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{CompletionRequest, GenerativeProvider, LlmError};

/// Provider that replays one canned answer and records what it was asked.
pub struct ScriptedProvider {
    answer: Result<String, String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn reply(&self) -> Result<String, LlmError> {
        self.answer.clone().map_err(|message| LlmError::Api {
            status: 503,
            message,
        })
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request);
        self.reply()
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push(CompletionRequest::new(prompt, 0));
        self.reply()
    }
}
