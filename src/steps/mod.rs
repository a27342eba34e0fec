//! The five steps of the routing workflow.
//!
//! Classify assigns a [`MessageCategory`](crate::state::MessageCategory) to
//! the latest user message; chat answers it directly; refine and generate
//! form the two-stage image pipeline; handle_error converts any captured
//! failure into a friendly assistant message before the run terminates.

mod chat;
mod classify;
mod generate;
mod handle_error;
mod refine;

pub use chat::ChatStep;
pub use classify::ClassifyStep;
pub use generate::GenerateStep;
pub use handle_error::HandleErrorStep;
pub use refine::RefineStep;
