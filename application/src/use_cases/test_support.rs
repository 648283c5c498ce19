//! Scripted gateway shared by the use case tests

use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::ProgressNotifier;
use async_trait::async_trait;
use council_domain::{
    ChatMessage, FallbackMarker, PromptTemplate, ProviderModelRef, SamplingParams, Stage,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the gateway does for one (stage, model) pair
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Delayed(Duration, String),
    /// Behave like a client that exhausted its retries
    Fail,
    Panic,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub stage: Stage,
    pub model: ProviderModelRef,
    pub messages: Vec<ChatMessage>,
    pub params: SamplingParams,
}

#[derive(Default)]
pub struct ScriptedGateway {
    script: HashMap<(Stage, String), Reply>,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub closes: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, stage: Stage, model: &str, reply: Reply) -> Self {
        self.script.insert((stage, model.to_string()), reply);
        self
    }

    pub fn calls_for(&self, stage: Stage) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.stage == stage)
            .cloned()
            .collect()
    }

    fn stage_of(messages: &[ChatMessage]) -> Stage {
        match messages.first().map(|m| m.content.as_str()) {
            Some(s) if s == PromptTemplate::review_system() => Stage::Review,
            Some(s) if s == PromptTemplate::chairman_system() => Stage::Synthesis,
            _ => Stage::Opinions,
        }
    }

    fn default_reply(stage: Stage, model: &ProviderModelRef) -> String {
        match stage {
            Stage::Opinions => format!("Answer from {}", model.model()),
            Stage::Review => r#"{"rankings":[],"detailed_scores":[]}"#.to_string(),
            Stage::Synthesis => "## Consensus Verdict\nAgreed.".to_string(),
        }
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn dispatch(
        &self,
        model: &ProviderModelRef,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> String {
        let stage = Self::stage_of(messages);
        self.calls.lock().unwrap().push(RecordedCall {
            stage,
            model: model.clone(),
            messages: messages.to_vec(),
            params,
        });

        match self.script.get(&(stage, model.model().to_string())) {
            None => Self::default_reply(stage, model),
            Some(Reply::Text(text)) => text.clone(),
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(*delay).await;
                text.clone()
            }
            Some(Reply::Fail) => FallbackMarker::retries_exhausted(model.model(), 1),
            Some(Reply::Panic) => panic!("scripted panic for {}", model),
        }
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Progress notifier that records every event as a string
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_stage_start(&self, stage: Stage, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {} {}", stage.as_str(), total));
    }

    fn on_member_complete(&self, stage: Stage, model: &ProviderModelRef, succeeded: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("member {} {} {}", stage.as_str(), model.model(), succeeded));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.events.lock().unwrap().push(format!("complete {}", stage.as_str()));
    }

    fn on_stage_skipped(&self, stage: Stage, _reason: &str) {
        self.events.lock().unwrap().push(format!("skipped {}", stage.as_str()));
    }
}

pub fn model(id: &str) -> ProviderModelRef {
    ProviderModelRef::openrouter(id).unwrap()
}
