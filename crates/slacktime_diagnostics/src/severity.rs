//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message.
///
/// Ordered from least severe (`Help`) to most severe (`Error`), matching the
/// derived `PartialOrd`/`Ord` implementation based on declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// A helpful suggestion that doesn't indicate a problem.
    Help,
    /// An informational note providing additional context.
    Note,
    /// A potential issue that should be reviewed but doesn't prevent compilation.
    Warning,
    /// A definite problem that prevents successful compilation.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Returns the ANSI foreground color escape code used to highlight this
    /// severity's header line in [`TerminalRenderer`](crate::TerminalRenderer)
    /// output when color is enabled.
    pub fn ansi_color(self) -> &'static str {
        match self {
            Severity::Help => "\x1b[36m",
            Severity::Note => "\x1b[34m",
            Severity::Warning => "\x1b[33m",
            Severity::Error => "\x1b[31m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Help => write!(f, "help"),
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
