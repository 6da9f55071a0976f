//! Structured diagnostic messages with severity, codes, and labels.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use slacktime_source::Span;

/// A structured diagnostic message with source locations and labels.
///
/// Diagnostics are the primary mechanism for reporting fatal errors and
/// non-fatal warnings from an STA invocation. Each diagnostic includes:
/// - A severity level and unique error code
/// - A primary message and source span
/// - Optional secondary labels and explanatory notes/help text
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique error code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The primary source span where the issue was detected.
    pub primary_span: Span,
    /// Additional annotated source spans providing context.
    pub labels: Vec<Label>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code, message, and span.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given code, message, and span.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}
