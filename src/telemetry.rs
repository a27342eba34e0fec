//! Tracing setup and terminal formatting helpers.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

pub const LINE_COLOR: &str = "\x1b[35m"; // magenta
pub const RESET_COLOR: &str = "\x1b[0m";

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` when unset. Safe to call more
/// than once (subsequent calls are no-ops).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// Color mode for event output.
///
/// - [`FormatterMode::Auto`]: detect TTY capability via `stderr.is_terminal()`
/// - [`FormatterMode::Colored`]: always include ANSI color codes
/// - [`FormatterMode::Plain`]: never include color codes (logs, files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterMode {
    #[default]
    Auto,
    Colored,
    Plain,
}

impl FormatterMode {
    /// Returns true if this mode should use colored output.
    ///
    /// For `Auto` mode, performs TTY detection on each call.
    pub fn is_colored(&self) -> bool {
        match self {
            FormatterMode::Auto => std::io::stderr().is_terminal(),
            FormatterMode::Colored => true,
            FormatterMode::Plain => false,
        }
    }
}
