use std::io::{self, Result as IoResult, Stdout, Write};
use std::sync::{Arc, Mutex};

use super::event::WorkflowEvent;
use crate::telemetry::{FormatterMode, LINE_COLOR, RESET_COLOR};

/// Abstraction over an output target that consumes workflow events.
pub trait EventSink: Send + Sync {
    /// Handle a structured event. The sink decides how to render it.
    fn handle(&mut self, event: &WorkflowEvent) -> IoResult<()>;
}

/// Stdout sink with optional ANSI color.
pub struct StdOutSink {
    handle: Stdout,
    mode: FormatterMode,
}

impl Default for StdOutSink {
    fn default() -> Self {
        Self::with_mode(FormatterMode::Auto)
    }
}

impl StdOutSink {
    pub fn with_mode(mode: FormatterMode) -> Self {
        Self {
            handle: io::stdout(),
            mode,
        }
    }
}

impl EventSink for StdOutSink {
    fn handle(&mut self, event: &WorkflowEvent) -> IoResult<()> {
        let line = if self.mode.is_colored() {
            format!("{LINE_COLOR}{event}{RESET_COLOR}\n")
        } else {
            format!("{event}\n")
        };
        self.handle.write_all(line.as_bytes())?;
        self.handle.flush()
    }
}

/// In-memory sink for tests and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<WorkflowEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all captured events.
    pub fn snapshot(&self) -> Vec<WorkflowEvent> {
        self.entries.lock().unwrap().clone()
    }
}

impl EventSink for MemorySink {
    fn handle(&mut self, event: &WorkflowEvent) -> IoResult<()> {
        self.entries.lock().unwrap().push(event.clone());
        Ok(())
    }
}
