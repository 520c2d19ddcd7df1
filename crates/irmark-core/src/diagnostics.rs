//! Diagnostic sink seam.
//!
//! The registry and extractor report problems as `(span, message)` pairs
//! through a [`DiagnosticSink`]. Two sinks are provided:
//! - [`CollectingSink`]: keeps every diagnostic in memory (tests, JSON output)
//! - [`TracingSink`]: forwards diagnostics to `tracing` at error level

use serde::{Deserialize, Serialize};

use crate::types::SourceSpan;

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    /// Report a message attached to a source span.
    fn report(&mut self, span: &SourceSpan, message: &str);
}

/// A single reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: SourceSpan,
    pub message: String,
}

/// A sink that stores every diagnostic it receives.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink::default()
    }

    /// Diagnostics in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, span: &SourceSpan, message: &str) {
        self.diagnostics.push(Diagnostic {
            span: span.clone(),
            message: message.to_string(),
        });
    }
}

/// A sink that logs diagnostics through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, span: &SourceSpan, message: &str) {
        tracing::error!(
            uri = %span.uri,
            start = span.start,
            end = span.end,
            "{}",
            message
        );
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, span: &SourceSpan, message: &str) {
        (**self).report(span, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.report(&SourceSpan::point("a.dart", 1), "first");
        sink.report(&SourceSpan::point("a.dart", 2), "second");

        let messages: Vec<_> = sink.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn report_through(mut sink: impl DiagnosticSink) {
            sink.report(&SourceSpan::point("b.dart", 0), "via ref");
        }

        let mut sink = CollectingSink::new();
        report_through(&mut sink);
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
