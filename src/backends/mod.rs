//! External backend collaborators consumed by the workflow steps.
//!
//! The core never constructs a backend itself: clients are built once at
//! process start and injected into the [`Workflow`](crate::workflow::Workflow)
//! builder as trait objects. Both traits treat the client as a stateless,
//! reusable collaborator with no per-invocation lifecycle.
//!
//! The `http` feature provides OpenAI-compatible implementations over
//! `reqwest`; everything else in the crate is backend-agnostic.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::message::Message;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{DEFAULT_BASE_URL, HttpChatBackend, HttpImageBackend};

/// Chat-completion capability used by the classify, chat, and refine steps.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Produce one assistant reply for the given conversation.
    async fn complete(&self, messages: &[Message]) -> Result<String, BackendError>;
}

/// Image-generation capability used by the generate step.
///
/// The response is returned as opaque JSON: provider response shapes drift,
/// so the generate step owns the tolerant URL extraction rather than forcing
/// a strict schema at the transport boundary.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Request images for the given prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<serde_json::Value, BackendError>;
}

/// Fixed generation parameters passed with every image request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationParams {
    /// Provider model identifier.
    pub model: String,
    /// Diffusion step count.
    pub steps: u32,
    /// Number of images to request.
    pub count: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "black-forest-labs/FLUX.1-schnell-Free".to_string(),
            steps: 4,
            count: 4,
        }
    }
}

/// Errors surfaced by backend implementations.
#[derive(Debug, Error, Diagnostic)]
pub enum BackendError {
    /// The provider returned an unusable reply or rejected the call.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(imagineer::backend::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    #[diagnostic(
        code(imagineer::backend::missing_env),
        help("Set the variable in the environment or a .env file.")
    )]
    MissingEnv(&'static str),

    /// HTTP transport failure.
    #[cfg(feature = "http")]
    #[error("http transport error")]
    #[diagnostic(code(imagineer::backend::http))]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    #[diagnostic(code(imagineer::backend::serde_json))]
    Serde(#[from] serde_json::Error),
}
