//! Progress events emitted while a workflow run advances.
//!
//! Steps and the router send [`WorkflowEvent`]s over a `flume` channel; a
//! background listener broadcasts them to every registered [`EventSink`].
//! The default sink prints to stdout, which is how a run narrates itself
//! ("refining prompt for image generation", "generated 4 image(s)") without
//! the steps knowing anything about terminals.

mod bus;
mod event;
mod sink;

pub use bus::EventBus;
pub use event::WorkflowEvent;
pub use sink::{EventSink, MemorySink, StdOutSink};
