//! Structured findings produced while parsing a seizure list.
//!
//! Parsers never log on their own: every skipped line, skipped block,
//! clamped onset or discarded event is returned as a [`Diagnostic`] so the
//! caller decides how to surface it. [`Diagnostic::emit`] forwards one to
//! `tracing` at its [`Severity`].

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// A delimited data line whose start/end could not be parsed
    #[error("line {line_number}: cannot parse seizure time '{line}': {reason}")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// A delimited data line that appeared before any recording section
    #[error("line {line_number}: seizure time '{line}' is outside any recording section")]
    OrphanLine { line_number: usize, line: String },

    /// A recording section declared more than once; earlier pairs are dropped
    #[error("line {line_number}: section '{file_name}' declared again, previous times discarded")]
    SectionRestarted { line_number: usize, file_name: String },

    /// A delimited interval with negative onset or non-positive duration
    #[error("line {line_number}: suspicious interval in '{file_name}' (onset {onset}, duration {duration})")]
    SuspiciousInterval {
        line_number: usize,
        file_name: String,
        onset: f64,
        duration: f64,
    },

    /// A labeled block missing a required field or holding a bad clock time
    #[error("seizure block {seizure_number}: {reason}")]
    MalformedBlock { seizure_number: u32, reason: String },

    /// A labeled block whose seizure ends at or before it starts
    #[error("seizure block {seizure_number} in '{file_name}': non-positive duration {duration}s, event dropped")]
    InvalidDuration {
        seizure_number: u32,
        file_name: String,
        duration: f64,
    },

    /// A labeled block whose seizure starts before registration; onset set to 0
    #[error("seizure block {seizure_number} in '{file_name}': negative onset {onset}s clamped to 0")]
    NegativeOnset {
        seizure_number: u32,
        file_name: String,
        onset: f64,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::OrphanLine { .. } => Severity::Debug,
            Diagnostic::MalformedLine { .. } | Diagnostic::MalformedBlock { .. } => Severity::Error,
            Diagnostic::SectionRestarted { .. }
            | Diagnostic::SuspiciousInterval { .. }
            | Diagnostic::InvalidDuration { .. }
            | Diagnostic::NegativeOnset { .. } => Severity::Warning,
        }
    }

    /// Logs the diagnostic through `tracing`, tagged with its source list
    pub fn emit(&self, source: &str) {
        match self.severity() {
            Severity::Debug => tracing::debug!(source, "{}", self),
            Severity::Warning => tracing::warn!(source, "{}", self),
            Severity::Error => tracing::error!(source, "{}", self),
        }
    }
}
