//! # Imagineer: chat-or-imagine routing workflow
//!
//! Imagineer is a small conversational workflow: it classifies an incoming
//! user message as either a general chat request or an image-generation
//! request, then dispatches to a direct chat completion or to a two-stage
//! "refine prompt, then generate images" pipeline. Centralized error
//! handling terminates every run gracefully.
//!
//! ## Core Concepts
//!
//! - **State**: one [`state::WorkflowState`] per invocation, advanced only
//!   through pure merges of partial [`state::StateUpdate`]s
//! - **Steps**: async units of work implementing [`step::Step`]; failures
//!   are captured into the state rather than raised, so the error branch
//!   always gets a chance to report them
//! - **Router**: the fixed five-node topology in [`workflow::Workflow`],
//!   with routing predicates evaluated after each merge
//! - **Backends**: injected [`backends::ChatBackend`] and
//!   [`backends::ImageBackend`] collaborators; enable the `http` feature for
//!   OpenAI-compatible clients
//!
//! ## Quick Start
//!
//! ```no_run
//! use imagineer::backends::{BackendError, ChatBackend, GenerationParams, ImageBackend};
//! use imagineer::message::Message;
//! use imagineer::workflow::Workflow;
//!
//! struct MyChat;
//!
//! #[async_trait::async_trait]
//! impl ChatBackend for MyChat {
//!     async fn complete(&self, _messages: &[Message]) -> Result<String, BackendError> {
//!         Ok("{\"category\": \"chat\"}".into())
//!     }
//! }
//!
//! struct MyImages;
//!
//! #[async_trait::async_trait]
//! impl ImageBackend for MyImages {
//!     async fn generate(
//!         &self,
//!         _prompt: &str,
//!         _params: &GenerationParams,
//!     ) -> Result<serde_json::Value, BackendError> {
//!         Ok(serde_json::json!({"data": [{"url": "https://img.example/a.png"}]}))
//!     }
//! }
//!
//! # async fn example() -> miette::Result<()> {
//! let workflow = Workflow::builder()
//!     .chat_backend(MyChat)
//!     .image_backend(MyImages)
//!     .build();
//!
//! let state = workflow.run("what is the capital of France").await?;
//! for message in &state.messages {
//!     println!("{}: {}", message.role, message.content);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`message`] - Chat turn types
//! - [`state`] - Workflow state and merge semantics
//! - [`step`] - The step trait and execution context
//! - [`steps`] - The five concrete steps
//! - [`workflow`] - Router, graph assembly, and the run loop
//! - [`backends`] - Injected backend traits (and HTTP clients, feature `http`)
//! - [`event_bus`] - Progress events and sinks
//! - [`telemetry`] - Tracing setup

pub mod backends;
pub mod event_bus;
pub mod message;
pub mod prompts;
pub mod state;
pub mod step;
pub mod steps;
pub mod telemetry;
pub mod workflow;
