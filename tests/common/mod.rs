//! Shared test doubles: scripted chat and recording image backends.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use imagineer::backends::{BackendError, ChatBackend, GenerationParams, ImageBackend};
use imagineer::event_bus::WorkflowEvent;
use imagineer::message::Message;
use imagineer::step::StepContext;

/// Chat backend that pops scripted replies in order and counts calls.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_owned).map_err(str::to_owned))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn complete(&self, _messages: &[Message]) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(BackendError::Provider {
                provider: "scripted-chat",
                message,
            }),
            None => Err(BackendError::Provider {
                provider: "scripted-chat",
                message: "script exhausted".into(),
            }),
        }
    }
}

/// Image backend that returns one fixed response and counts calls.
pub struct StaticImages {
    response: Result<Value, String>,
    calls: AtomicUsize,
}

impl StaticImages {
    pub fn with_urls(count: usize) -> Self {
        let data: Vec<Value> = (0..count)
            .map(|i| json!({"url": format!("https://img.example/{i}.png")}))
            .collect();
        Self::returning(json!({"data": data}))
    }

    pub fn returning(response: Value) -> Self {
        Self {
            response: Ok(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_owned()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageBackend for StaticImages {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(BackendError::Provider {
                provider: "static-images",
                message: message.clone(),
            }),
        }
    }
}

/// A step context wired to a throwaway channel, plus its receiver for
/// asserting on emitted events.
pub fn test_ctx(step_id: &str) -> (StepContext, flume::Receiver<WorkflowEvent>) {
    let (tx, rx) = flume::unbounded();
    let ctx = StepContext {
        run_id: "test-run".to_string(),
        step_id: step_id.to_string(),
        seq: 0,
        events: tx,
    };
    (ctx, rx)
}
