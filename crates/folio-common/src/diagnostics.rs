//! Pipeline diagnostics with pluggable sinks.
//!
//! Every recoverable problem the pipeline runs into (an unsupported CSS
//! property, a stylesheet that fails to parse, an image that could not be
//! acquired) becomes a [`Diagnostic`] handed to a [`DiagnosticSink`]. Nothing
//! is printed implicitly; the caller decides where events go.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A declaration named a property outside the supported vocabulary and
    /// was dropped.
    UnsupportedProperty,
    /// A stylesheet or style attribute could not be parsed; its whole
    /// contribution was discarded.
    ParseFailure {
        /// Parser message describing the failure.
        reason: String,
    },
    /// An image reference could not be turned into bytes; the image renders
    /// as an empty placeholder.
    ImageUnavailable {
        /// Acquisition error message.
        reason: String,
    },
}

impl DiagnosticKind {
    /// Short label used as log target and terminal prefix.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UnsupportedProperty => "css",
            Self::ParseFailure { .. } => "css-parse",
            Self::ImageUnavailable { .. } => "image",
        }
    }
}

/// A structured diagnostic event: `{ source, property, value }` plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The kind of problem.
    pub kind: DiagnosticKind,
    /// Where it happened: a selector list, a tag name, or an image reference.
    pub source: String,
    /// The offending property, when one is involved.
    pub property: Option<String>,
    /// The offending value or source text.
    pub value: String,
}

impl Diagnostic {
    /// An unsupported property found in `source`.
    #[must_use]
    pub fn unsupported_property(
        source: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedProperty,
            source: source.into(),
            property: Some(property.into()),
            value: value.into(),
        }
    }

    /// CSS text from `source` that failed to parse.
    #[must_use]
    pub fn parse_failure(
        source: impl Into<String>,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::ParseFailure {
                reason: reason.into(),
            },
            source: source.into(),
            property: None,
            value: text.into(),
        }
    }

    /// An image reference that could not be acquired.
    #[must_use]
    pub fn image_unavailable(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ImageUnavailable {
                reason: reason.into(),
            },
            source: "img".to_string(),
            property: None,
            value: reference.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnsupportedProperty => write!(
                f,
                "{}: found unsupported style \"{}\" with value \"{}\"",
                self.source,
                self.property.as_deref().unwrap_or_default(),
                self.value
            ),
            DiagnosticKind::ParseFailure { reason } => {
                write!(f, "{}: failed to parse \"{}\": {reason}", self.source, self.value)
            }
            DiagnosticKind::ImageUnavailable { reason } => {
                write!(f, "could not load image '{}': {reason}", self.value)
            }
        }
    }
}

/// Receiver for pipeline diagnostics.
///
/// Sinks are shared by reference across the whole render call, so they take
/// `&self` and must be usable from several threads.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn emit(&self, diagnostic: Diagnostic);
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps every diagnostic in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Prints each distinct diagnostic once, in yellow, to stderr.
///
/// # Example
/// ```ignore
/// let sink = TerminalSink::new();
/// sink.emit(Diagnostic::unsupported_property("p", "unknownProp", "5px"));
/// ```
#[derive(Debug, Default)]
pub struct TerminalSink {
    /// Messages we've already printed (to deduplicate).
    warned: Mutex<HashSet<String>>,
}

impl TerminalSink {
    /// Create a sink that has printed nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget printed messages (call when starting a new document).
    pub fn clear(&self) {
        self.warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DiagnosticSink for TerminalSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let key = format!("[{}] {diagnostic}", diagnostic.kind.label());
        let should_print = self
            .warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        if should_print {
            eprintln!("{}", format!("[Folio] ⚠ {key}").yellow());
        }
    }
}

/// Forwards diagnostics to the [`log`] facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        log::warn!(target: diagnostic.kind.label(), "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.emit(Diagnostic::unsupported_property("p", "unknownProp", "5px"));
        sink.emit(Diagnostic::parse_failure("style", "p {", "missing '}'"));

        let events = sink.diagnostics();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].property.as_deref(), Some("unknownProp"));
        assert!(matches!(events[1].kind, DiagnosticKind::ParseFailure { .. }));
    }

    #[test]
    fn display_names_source_property_and_value() {
        let diagnostic = Diagnostic::unsupported_property("div", "unknownProp", "5px");
        assert_eq!(
            diagnostic.to_string(),
            "div: found unsupported style \"unknownProp\" with value \"5px\""
        );
    }

    #[test]
    fn terminal_sink_deduplicates() {
        let sink = TerminalSink::new();
        sink.emit(Diagnostic::unsupported_property("p", "x", "1"));
        sink.emit(Diagnostic::unsupported_property("p", "x", "1"));
        let warned = sink.warned.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(warned.len(), 1);
    }
}
