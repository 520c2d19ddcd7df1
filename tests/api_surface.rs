//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// id module - identifier model
use irmark::irmark_core::id::{
    ClassId, ElementId, Id, IdKind, IdValue, NodeId, NodeKind, CLASS_PREFIX, CURRENT_PREFIX,
    ELEMENT_PREFIX, GLOBAL_PREFIX, INVOKE_PREFIX, ITERATOR_PREFIX, MOVE_NEXT_PREFIX,
    UPDATE_PREFIX,
};

// decode module - textual expectations
use irmark::irmark_core::decode::{decode, normalize_value, DecodeError};

// registry module - fact accumulation
use irmark::irmark_core::registry::{ActualData, DataRegistry, RegistryError};

// diagnostics module - sinks
use irmark::irmark_core::diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};

// annotation module - fixtures
use irmark::irmark_core::annotation::{
    compute_expected_map, AnnotatedCode, Annotation, AnnotationError, DEFAULT_COMMENT_END,
    DEFAULT_COMMENT_START,
};

// compare module - expected vs. actual
use irmark::irmark_core::compare::{
    compare_data, CompareOptions, CompareReport, Mismatch, MismatchKind,
};

// config module
use irmark::irmark_core::config::{
    AnnotationConfig, CheckConfig, Config, ConfigError, CONFIG_DIR, CONFIG_FILE,
};

// error module - error types and codes
use irmark::irmark_core::error::{IrmarkError, OutputErrorCode};

// output module - JSON output types
use irmark::irmark_core::output::{
    emit_response, fact_infos, AnnotationsResponse, CheckResponse, DecodeResponse, ErrorInfo,
    ErrorResponse, ExpectationInfo, ExtractResponse, FactInfo, FixtureReport, SCHEMA_VERSION,
};

// types module
use irmark::irmark_core::types::SourceSpan;

// ============================================================================
// IR and Extraction
// ============================================================================

use irmark::irmark_ir::extract::{
    compute_class_id, compute_entity_id, create_node_id, extract_component, ComputerFns,
    DataComputer, DataExtractor, Root,
};
use irmark::irmark_ir::nodes::{
    Arguments, Block, BreakStatement, Class, Component, ConditionalExpression,
    ContinueSwitchStatement, DoStatement, EmptyStatement, Expression, ExpressionStatement,
    ForInStatement, ForStatement, FunctionDeclaration, FunctionExpression, FunctionNode,
    IfStatement, Initializer, InvalidRange, IrNode, LabeledStatement, Let, Library, Literal,
    LoadLibrary, Member, MemberKind, MethodInvocation, NamedExpression, PropertyGet,
    PropertySet, ReturnStatement, Statement, StaticInvocation, SwitchCase, SwitchStatement,
    TextRange, ThisExpression, VariableDeclaration, VariableGet, VariableRef, VariableSet,
    VariableSite, WhileStatement,
};
use irmark::irmark_ir::shape::ShapeComputer;

// ============================================================================
// CLI helpers and crate-root re-exports
// ============================================================================

use irmark::cli::{
    extract_facts, fixture_for, load_component, load_fixture, run_annotations, run_check,
    run_check_dir, run_decode, run_extract, IR_SUFFIX,
};
use irmark::{
    compare_data as _, decode as _, extract_component as _, Config as _, DataRegistry as _,
    IrmarkError as _, ShapeComputer as _,
};

#[test]
fn api_surface_compiles() {
    // This test passes if the file compiles.
}
