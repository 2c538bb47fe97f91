//! Scripted AI capability for router tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use askgate_core::{AskError, AskPort, AskRequest, FragmentStream, ModelDescriptor};
use async_trait::async_trait;

/// Replays a fixed fragment list and records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedAsk {
    fragments: Vec<Result<String, AskError>>,
    models: Vec<ModelDescriptor>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AskRequest>>,
}

impl ScriptedAsk {
    /// Answers with `fragments` in order.
    pub fn answering(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Ok((*f).to_string())).collect(),
            ..Self::default()
        }
    }

    /// Emits `before`, then fails with `message`.
    pub fn failing_after(before: &[&str], message: &str) -> Self {
        let mut fragments: Vec<_> = before.iter().map(|f| Ok((*f).to_string())).collect();
        fragments.push(Err(AskError::Failed(message.to_string())));
        Self {
            fragments,
            ..Self::default()
        }
    }

    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AskRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AskPort for ScriptedAsk {
    async fn ask_stream(&self, request: &AskRequest) -> Result<FragmentStream, AskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(Box::pin(futures_util::stream::iter(self.fragments.clone())))
    }

    fn models(&self) -> Vec<ModelDescriptor> {
        self.models.clone()
    }
}
