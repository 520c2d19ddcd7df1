//! Fact registry: one recorded fact per identifier.
//!
//! A [`DataRegistry`] is created once per analysis run, filled during a single
//! traversal, and then handed to a read-only consumer (a comparator or a
//! report generator). It only grows: there is no update or delete.
//!
//! # Duplicate Detection
//!
//! Registering a second fact under an id that already has one is fatal for
//! the traversal. Both bindings are reported through the [`DiagnosticSink`]
//! and [`RegistryError::DuplicateId`] is returned; the stored fact is left
//! untouched. A duplicate means either the same construct was visited twice
//! or two constructs share an offset and kind.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::DiagnosticSink;
use crate::id::Id;
use crate::types::SourceSpan;

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two facts were bound to the same identifier.
    #[error("duplicate id {id} at {span} (first bound at {existing_span})")]
    DuplicateId {
        id: Id,
        span: SourceSpan,
        existing_span: SourceSpan,
    },
}

// ============================================================================
// ActualData
// ============================================================================

/// A fact recorded for one identifier.
///
/// `object` describes the IR construct the fact came from. It is kept for
/// diagnostics and does not take part in equality.
#[derive(Debug, Clone, Serialize)]
pub struct ActualData<T> {
    pub id: Id,
    pub value: T,
    pub span: SourceSpan,
    pub object: String,
}

impl<T> ActualData<T> {
    pub fn new(id: Id, value: T, span: SourceSpan, object: impl Into<String>) -> Self {
        ActualData {
            id,
            value,
            span,
            object: object.into(),
        }
    }

    /// Source offset of the fact.
    ///
    /// Node ids carry their own offset; element and class ids use the
    /// start of the span they were recorded with.
    pub fn offset(&self) -> u32 {
        self.id.offset().unwrap_or(self.span.start)
    }
}

impl<T: PartialEq> PartialEq for ActualData<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value == other.value && self.span == other.span
    }
}

impl<T: Eq> Eq for ActualData<T> {}

// ============================================================================
// DataRegistry
// ============================================================================

/// Mapping from identifier to recorded fact.
#[derive(Debug, Clone)]
pub struct DataRegistry<T> {
    actual: HashMap<Id, ActualData<T>>,
}

impl<T> Default for DataRegistry<T> {
    fn default() -> Self {
        DataRegistry {
            actual: HashMap::new(),
        }
    }
}

impl<T: fmt::Debug> DataRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        DataRegistry::default()
    }

    /// Record `value` for `id`.
    ///
    /// `None` is a no-op. A second binding for an existing id reports both
    /// bindings to `sink` and returns [`RegistryError::DuplicateId`].
    pub fn register_value(
        &mut self,
        sink: &mut dyn DiagnosticSink,
        span: SourceSpan,
        id: Id,
        value: Option<T>,
        object: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let Some(value) = value else {
            return Ok(());
        };
        let object = object.into();

        if let Some(existing) = self.actual.get(&id) {
            sink.report(
                &span,
                &format!("Duplicate id {}, value={:?}, object={}", id, value, object),
            );
            sink.report(
                &existing.span,
                &format!(
                    "Duplicate id {}, value={:?}, object={}",
                    id, existing.value, existing.object
                ),
            );
            return Err(RegistryError::DuplicateId {
                id,
                span,
                existing_span: existing.span.clone(),
            });
        }

        tracing::trace!(id = %id, object = %object, "registered fact");
        self.actual
            .insert(id.clone(), ActualData::new(id, value, span, object));
        Ok(())
    }
}

impl<T> DataRegistry<T> {
    /// Look up the fact recorded for `id`.
    pub fn get(&self, id: &Id) -> Option<&ActualData<T>> {
        self.actual.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.actual.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }

    /// Iterate in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ActualData<T>> {
        self.actual.values()
    }

    /// All facts ordered by offset, then id.
    pub fn sorted(&self) -> Vec<&ActualData<T>> {
        let mut facts: Vec<_> = self.actual.values().collect();
        facts.sort_by(|a, b| (a.offset(), &a.id).cmp(&(b.offset(), &b.id)));
        facts
    }

    /// Hand the underlying map to the consumer.
    pub fn into_map(self) -> HashMap<Id, ActualData<T>> {
        self.actual
    }
}
