//! JSON output types for CLI responses.
//!
//! Every response carries `status` and `schema_version`. Collections are
//! emitted in a deterministic order (by offset, then id).

use std::io::{self, Write};

use serde::Serialize;

use crate::annotation::Annotation;
use crate::compare::CompareReport;
use crate::error::{IrmarkError, OutputErrorCode};
use crate::id::{IdKind, IdValue};
use crate::registry::{ActualData, DataRegistry};
use crate::types::SourceSpan;

/// Output schema version.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Shared pieces
// ============================================================================

/// An identifier with its expected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectationInfo {
    /// `Display` form of the id, e.g. `invoke:42`.
    pub id: String,
    pub kind: IdKind,
    pub descriptor: String,
    pub is_global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    pub value: String,
    /// Canonical annotation text.
    pub encoded: String,
}

impl From<&IdValue> for ExpectationInfo {
    fn from(value: &IdValue) -> Self {
        ExpectationInfo {
            id: value.id.to_string(),
            kind: value.id.kind(),
            descriptor: value.id.descriptor(),
            is_global: value.id.is_global(),
            offset: value.id.offset(),
            value: value.value.clone(),
            encoded: value.encode(),
        }
    }
}

/// One computed fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactInfo {
    pub id: String,
    pub kind: IdKind,
    pub offset: u32,
    pub value: String,
    pub object: String,
    pub span: SourceSpan,
}

impl<T: ToString> From<&ActualData<T>> for FactInfo {
    fn from(fact: &ActualData<T>) -> Self {
        FactInfo {
            id: fact.id.to_string(),
            kind: fact.id.kind(),
            offset: fact.offset(),
            value: fact.value.to_string(),
            object: fact.object.clone(),
            span: fact.span.clone(),
        }
    }
}

/// Facts of a registry in deterministic order.
pub fn fact_infos<T: ToString>(registry: &DataRegistry<T>) -> Vec<FactInfo> {
    registry.sorted().into_iter().map(FactInfo::from).collect()
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `decode`.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResponse {
    pub status: String,
    pub schema_version: String,
    #[serde(flatten)]
    pub expectation: ExpectationInfo,
}

impl DecodeResponse {
    pub fn new(value: &IdValue) -> Self {
        DecodeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            expectation: ExpectationInfo::from(value),
        }
    }
}

/// Response for `annotations`.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationsResponse {
    pub status: String,
    pub schema_version: String,
    pub fixture: String,
    pub annotations: Vec<Annotation>,
    pub expectations: Vec<ExpectationInfo>,
}

impl AnnotationsResponse {
    pub fn new(
        fixture: impl Into<String>,
        annotations: Vec<Annotation>,
        mut expectations: Vec<ExpectationInfo>,
    ) -> Self {
        expectations.sort_by(|a, b| (a.offset, &a.id).cmp(&(b.offset, &b.id)));
        AnnotationsResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            fixture: fixture.into(),
            annotations,
            expectations,
        }
    }
}

/// Response for `extract`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub status: String,
    pub schema_version: String,
    pub ir: String,
    pub facts: Vec<FactInfo>,
}

impl ExtractResponse {
    pub fn new(ir: impl Into<String>, facts: Vec<FactInfo>) -> Self {
        ExtractResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            ir: ir.into(),
            facts,
        }
    }
}

/// Comparison result for one fixture.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureReport {
    pub ir: String,
    pub fixture: String,
    pub passed: bool,
    #[serde(flatten)]
    pub report: CompareReport,
}

impl FixtureReport {
    pub fn new(ir: impl Into<String>, fixture: impl Into<String>, report: CompareReport) -> Self {
        FixtureReport {
            ir: ir.into(),
            fixture: fixture.into(),
            passed: report.is_success(),
            report,
        }
    }
}

/// Response for `check` and `check-dir`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// "ok" when every fixture passed, "failed" otherwise.
    pub status: String,
    pub schema_version: String,
    pub passed: usize,
    pub failed: usize,
    pub fixtures: Vec<FixtureReport>,
}

impl CheckResponse {
    pub fn new(fixtures: Vec<FixtureReport>) -> Self {
        let passed = fixtures.iter().filter(|f| f.passed).count();
        let failed = fixtures.len() - passed;
        CheckResponse {
            status: if failed == 0 { "ok" } else { "failed" }.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            passed,
            failed,
            fixtures,
        }
    }

    /// Total mismatches over all fixtures.
    pub fn mismatch_count(&self) -> usize {
        self.fixtures.iter().map(|f| f.report.mismatches.len()).sum()
    }
}

/// Error details.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Create from an IrmarkError.
    pub fn from_error(err: &IrmarkError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error,
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
