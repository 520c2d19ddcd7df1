//! Common types shared between the registry, diagnostics, and output modules.
//!
//! This module contains types that are used by several modules,
//! avoiding circular dependencies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SourceSpan
// ============================================================================

/// A byte range within one source file.
///
/// - `uri`: Library or file URI the offsets refer to
/// - `start`: Byte offset from file start (inclusive)
/// - `end`: Byte offset end (exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// File URI.
    pub uri: String,
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl SourceSpan {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(uri: impl Into<String>, start: u32, end: u32) -> Self {
        assert!(
            start <= end,
            "SourceSpan start ({}) must be <= end ({})",
            start,
            end
        );
        SourceSpan {
            uri: uri.into(),
            start,
            end,
        }
    }

    /// A one-byte span at `offset`, used for facts attached to syntax nodes.
    pub fn point(uri: impl Into<String>, offset: u32) -> Self {
        SourceSpan::new(uri, offset, offset.saturating_add(1))
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.uri, self.start, self.end)
    }
}
