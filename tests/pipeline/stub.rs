//! Deterministic generation client stub with a call counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use guidegen::prompt::AssembledPrompt;
use guidegen::providers::{GeneratedScript, GenerationClient, GenerationError, UsageStats};

/// Stub client that records every prompt it receives and returns a fixed
/// Markdown body. The call counter verifies that validation failures never
/// reach the network boundary.
pub struct StubClient {
    calls: AtomicUsize,
    last_prompt: Mutex<Option<AssembledPrompt>>,
    response: String,
}

impl StubClient {
    /// Build a stub returning `markdown` on every call.
    pub fn returning(markdown: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            response: markdown.to_string(),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt from the most recent `generate` call.
    pub fn last_prompt(&self) -> Option<AssembledPrompt> {
        self.last_prompt.lock().expect("stub lock").clone()
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    async fn generate(&self, prompt: &AssembledPrompt) -> Result<GeneratedScript, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().expect("stub lock") = Some(prompt.clone());
        Ok(GeneratedScript {
            markdown: self.response.clone(),
            model: "stub-model".to_string(),
            usage: UsageStats::default(),
        })
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}
