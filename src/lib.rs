//! irmark - stable identifiers for IR nodes and annotation-driven fact checks.
//!
//! This crate provides the CLI binary for irmark and re-exports the library
//! crates it is built on.
//!
//! ## Modules
//!
//! - `cli` - CLI command implementations
//!
//! ## Crates
//!
//! - [`irmark_core`] - identifiers, decoder, registry, annotations, comparison
//! - [`irmark_ir`] - IR model, extractor, shape computer

pub mod cli;

pub use irmark_core;
pub use irmark_ir;

// Re-export core types for convenience
pub use irmark_core::annotation::{compute_expected_map, AnnotatedCode, Annotation};
pub use irmark_core::compare::{compare_data, CompareOptions, CompareReport, Mismatch, MismatchKind};
pub use irmark_core::config::Config;
pub use irmark_core::decode::decode;
pub use irmark_core::diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
pub use irmark_core::error::{IrmarkError, OutputErrorCode};
pub use irmark_core::id::{ClassId, ElementId, Id, IdKind, IdValue, NodeId, NodeKind};
pub use irmark_core::output::{ErrorInfo, ErrorResponse, SCHEMA_VERSION};
pub use irmark_core::registry::{ActualData, DataRegistry, RegistryError};
pub use irmark_core::types::SourceSpan;
pub use irmark_ir::{extract_component, ComputerFns, DataComputer, DataExtractor, ShapeComputer};
