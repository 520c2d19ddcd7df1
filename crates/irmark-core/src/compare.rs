//! Comparison of expected facts against computed facts.
//!
//! Expectations come from fixture annotations (see the `annotation` module);
//! actual facts come from a [`DataRegistry`] filled by a traversal. Actual
//! values are rendered with `Display` and normalized the same way expected
//! values are, so a wrapped expectation matches a single-line actual value.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::decode::normalize_value;
use crate::id::{Id, IdValue};
use crate::registry::DataRegistry;

/// Options controlling what counts as a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    /// Report facts that were computed but not expected.
    pub report_unexpected: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            report_unexpected: true,
        }
    }
}

/// Category of a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Expected, but nothing was computed.
    Missing,
    /// Computed, but not expected.
    Unexpected,
    /// Both present with different values.
    ValueMismatch,
}

/// One disagreement between expectation and computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub kind: MismatchKind,
    #[serde(serialize_with = "serialize_display")]
    pub id: Id,
    /// Source offset, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Description of the IR construct the actual fact came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MismatchKind::Missing => write!(
                f,
                "{}: expected '{}', found nothing",
                self.id.descriptor(),
                self.expected.as_deref().unwrap_or_default()
            ),
            MismatchKind::Unexpected => write!(
                f,
                "{}: unexpected '{}'",
                self.id.descriptor(),
                self.actual.as_deref().unwrap_or_default()
            ),
            MismatchKind::ValueMismatch => write!(
                f,
                "{}: expected '{}', found '{}'",
                self.id.descriptor(),
                self.expected.as_deref().unwrap_or_default(),
                self.actual.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Result of comparing one fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareReport {
    pub expected_count: usize,
    pub actual_count: usize,
    pub matched: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CompareReport {
    /// True when nothing disagreed.
    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare `expected` against the facts in `actual`.
pub fn compare_data<T: fmt::Display>(
    expected: &HashMap<Id, IdValue>,
    actual: &DataRegistry<T>,
    options: CompareOptions,
) -> CompareReport {
    let mut report = CompareReport {
        expected_count: expected.len(),
        actual_count: actual.len(),
        ..CompareReport::default()
    };

    for (id, expectation) in expected {
        match actual.get(id) {
            None => report.mismatches.push(Mismatch {
                kind: MismatchKind::Missing,
                id: id.clone(),
                offset: id.offset(),
                expected: Some(expectation.value.clone()),
                actual: None,
                object: None,
            }),
            Some(fact) => {
                let actual_value = normalize_value(&fact.value.to_string());
                if actual_value == expectation.value {
                    report.matched += 1;
                } else {
                    report.mismatches.push(Mismatch {
                        kind: MismatchKind::ValueMismatch,
                        id: id.clone(),
                        offset: Some(fact.offset()),
                        expected: Some(expectation.value.clone()),
                        actual: Some(actual_value),
                        object: Some(fact.object.clone()),
                    });
                }
            }
        }
    }

    if options.report_unexpected {
        for fact in actual.iter().filter(|fact| !expected.contains_key(&fact.id)) {
            report.mismatches.push(Mismatch {
                kind: MismatchKind::Unexpected,
                id: fact.id.clone(),
                offset: Some(fact.offset()),
                expected: None,
                actual: Some(normalize_value(&fact.value.to_string())),
                object: Some(fact.object.clone()),
            });
        }
    }

    report
        .mismatches
        .sort_by(|a, b| (a.offset, &a.id).cmp(&(b.offset, &b.id)));
    report
}

fn serialize_display<S: Serializer, V: fmt::Display>(value: &V, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
