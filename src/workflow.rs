//! Router and graph assembly: the fixed five-node workflow topology.
//!
//! ```text
//! start → classify → { chat | refine }
//! refine → { generate | handle_error }
//! generate → { handle_error | end }
//! chat → { handle_error | end }
//! handle_error → end
//! ```
//!
//! Execution is single-threaded and cooperative: one step runs to
//! completion, its update is merged, and only then is the routing predicate
//! evaluated against the merged state. The router exclusively owns the
//! [`WorkflowState`] for the duration of one invocation; concurrent
//! invocations each construct their own.

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::backends::{ChatBackend, GenerationParams, ImageBackend};
use crate::event_bus::{EventBus, EventSink};
use crate::state::{MessageCategory, WorkflowState};
use crate::step::{Step, StepContext, StepError};
use crate::steps::{ChatStep, ClassifyStep, GenerateStep, HandleErrorStep, RefineStep};

/// The nodes of the workflow graph, plus the virtual terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Classify,
    Chat,
    Refine,
    Generate,
    HandleError,
    /// Virtual terminal node; never executed.
    End,
}

impl StepKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Classify => "classify",
            StepKind::Chat => "chat",
            StepKind::Refine => "refine",
            StepKind::Generate => "generate",
            StepKind::HandleError => "handle_error",
            StepKind::End => "end",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing predicate, evaluated AFTER the step's update has been merged.
fn route_after(kind: StepKind, state: &WorkflowState) -> StepKind {
    match kind {
        StepKind::Classify => match state.category {
            Some(MessageCategory::Image) => StepKind::Refine,
            // Missing category fails open toward the simpler branch.
            Some(MessageCategory::Chat) | None => StepKind::Chat,
        },
        StepKind::Refine => {
            if state.error.is_some() {
                StepKind::HandleError
            } else {
                StepKind::Generate
            }
        }
        StepKind::Chat | StepKind::Generate => {
            if state.error.is_some() {
                StepKind::HandleError
            } else {
                StepKind::End
            }
        }
        StepKind::HandleError | StepKind::End => StepKind::End,
    }
}

/// Fatal workflow failures.
///
/// Captured errors never take this form; they terminate through the
/// error-handling step with an `Ok` state instead.
#[derive(Debug, Error, Diagnostic)]
pub enum WorkflowError {
    #[error("step {step} failed: {source}")]
    #[diagnostic(
        code(imagineer::workflow::step),
        help("Check the backend configuration; classification has no recovery branch.")
    )]
    Step {
        step: &'static str,
        #[source]
        source: StepError,
    },
}

/// The compiled workflow: five steps wired to the fixed topology.
///
/// Build one with [`Workflow::builder`], then call [`run`](Workflow::run)
/// once per user message. The workflow itself is reusable across runs; all
/// per-run state lives in the [`WorkflowState`] it returns.
///
/// # Examples
///
/// ```no_run
/// use imagineer::workflow::Workflow;
/// # use imagineer::backends::{BackendError, ChatBackend, GenerationParams, ImageBackend};
/// # use imagineer::message::Message;
/// # struct Chat;
/// # #[async_trait::async_trait]
/// # impl ChatBackend for Chat {
/// #     async fn complete(&self, _: &[Message]) -> Result<String, BackendError> {
/// #         Ok("chat".into())
/// #     }
/// # }
/// # struct Images;
/// # #[async_trait::async_trait]
/// # impl ImageBackend for Images {
/// #     async fn generate(&self, _: &str, _: &GenerationParams) -> Result<serde_json::Value, BackendError> {
/// #         Ok(serde_json::json!({"data": []}))
/// #     }
/// # }
///
/// # async fn example() -> miette::Result<()> {
/// let workflow = Workflow::builder()
///     .chat_backend(Chat)
///     .image_backend(Images)
///     .build();
///
/// let state = workflow.run("draw a cat in space").await?;
/// println!("{:?}", state.image_urls);
/// # Ok(())
/// # }
/// ```
pub struct Workflow {
    classify: Arc<dyn Step>,
    chat: Arc<dyn Step>,
    refine: Arc<dyn Step>,
    generate: Arc<dyn Step>,
    handle_error: Arc<dyn Step>,
    events: EventBus,
}

impl Workflow {
    /// Creates a builder for wiring backends into the fixed topology.
    #[must_use]
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::default()
    }

    /// Access the event bus, e.g. to flush events with
    /// [`EventBus::stop_listener`] after a run.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    fn step_for(&self, kind: StepKind) -> Option<&Arc<dyn Step>> {
        match kind {
            StepKind::Classify => Some(&self.classify),
            StepKind::Chat => Some(&self.chat),
            StepKind::Refine => Some(&self.refine),
            StepKind::Generate => Some(&self.generate),
            StepKind::HandleError => Some(&self.handle_error),
            StepKind::End => None,
        }
    }

    /// Execute one invocation from a single initial user message.
    ///
    /// Walks the graph until the terminal node, merging each step's update
    /// before routing. Exactly one of the chat / refine→generate branches
    /// executes per run. Returns the terminal state; the externally
    /// meaningful fields are `messages`, `refined_prompt`, and `image_urls`.
    pub async fn run(&self, initial_user_message: &str) -> Result<WorkflowState, WorkflowError> {
        self.events.listen_for_events();
        let sender = self.events.get_sender();

        let run_id = Uuid::new_v4().to_string();
        let mut state = WorkflowState::new_with_user_message(initial_user_message);
        let mut current = StepKind::Classify;
        let mut seq: u64 = 0;

        tracing::info!(%run_id, "workflow run started");

        while let Some(step) = self.step_for(current) {
            tracing::debug!(%run_id, step = %current, seq, "executing step");
            let ctx = StepContext {
                run_id: run_id.clone(),
                step_id: current.as_str().to_string(),
                seq,
                events: sender.clone(),
            };

            let update = step
                .run(&state, ctx)
                .await
                .map_err(|source| WorkflowError::Step {
                    step: current.as_str(),
                    source,
                })?;

            state = state.merge(update);
            current = route_after(current, &state);
            seq += 1;
        }

        tracing::info!(%run_id, status = ?state.status, "workflow run finished");
        Ok(state)
    }
}

/// Builder wiring injected backends into a [`Workflow`].
#[derive(Default)]
pub struct WorkflowBuilder {
    chat: Option<Arc<dyn ChatBackend>>,
    image: Option<Arc<dyn ImageBackend>>,
    params: GenerationParams,
    sinks: Vec<Box<dyn EventSink>>,
}

impl WorkflowBuilder {
    /// Set the chat-completion backend (classify, chat, and refine steps).
    #[must_use]
    pub fn chat_backend(mut self, backend: impl ChatBackend + 'static) -> Self {
        self.chat = Some(Arc::new(backend));
        self
    }

    /// Set the chat backend from an existing `Arc`, e.g. to share it or keep
    /// a handle for inspection in tests.
    #[must_use]
    pub fn chat_backend_arc(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.chat = Some(backend);
        self
    }

    /// Set the image-generation backend (generate step).
    #[must_use]
    pub fn image_backend(mut self, backend: impl ImageBackend + 'static) -> Self {
        self.image = Some(Arc::new(backend));
        self
    }

    /// Set the image backend from an existing `Arc`.
    #[must_use]
    pub fn image_backend_arc(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.image = Some(backend);
        self
    }

    /// Override the fixed generation parameters.
    #[must_use]
    pub fn generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Add an event sink; when none are added, events go to stdout.
    #[must_use]
    pub fn add_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Build the workflow.
    ///
    /// # Panics
    ///
    /// Panics if either backend was not provided; use
    /// [`try_build`](Self::try_build) for a fallible variant.
    #[must_use]
    pub fn build(self) -> Workflow {
        self.try_build()
            .expect("WorkflowBuilder requires both a chat and an image backend")
    }

    /// Build the workflow, returning `None` if a backend is missing.
    pub fn try_build(self) -> Option<Workflow> {
        let chat = self.chat?;
        let image = self.image?;
        let events = if self.sinks.is_empty() {
            EventBus::default()
        } else {
            EventBus::with_sinks(self.sinks)
        };
        Some(Workflow {
            classify: Arc::new(ClassifyStep::new(chat.clone())),
            chat: Arc::new(ChatStep::new(chat.clone())),
            refine: Arc::new(RefineStep::new(chat)),
            generate: Arc::new(GenerateStep::new(image, self.params)),
            handle_error: Arc::new(HandleErrorStep),
            events,
        })
    }
}
