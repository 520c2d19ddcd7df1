//! CLI command implementations.
//!
//! Each `run_*` function performs one subcommand and returns its response
//! value; `main.rs` serializes it. Inputs are:
//! - IR files: a JSON-serialized [`Component`]
//! - fixtures: source text with annotation comments
//!
//! ## Pairing
//!
//! `check-dir` pairs every `<name>.ir.json` with the fixture at `<name>`,
//! e.g. `loops.dart.ir.json` with `loops.dart`.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, IrmarkError>`. Duplicate ids found during
//! extraction are logged through [`TracingSink`] before the error returns.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use irmark_core::annotation::{compute_expected_map, AnnotatedCode};
use irmark_core::compare::compare_data;
use irmark_core::config::Config;
use irmark_core::decode::decode;
use irmark_core::diagnostics::TracingSink;
use irmark_core::error::IrmarkError;
use irmark_core::output::{
    fact_infos, AnnotationsResponse, CheckResponse, DecodeResponse, ExpectationInfo,
    ExtractResponse, FixtureReport,
};
use irmark_core::registry::DataRegistry;
use irmark_ir::nodes::Component;
use irmark_ir::{extract_component, ShapeComputer};

/// Suffix that marks an IR file in a fixture directory.
pub const IR_SUFFIX: &str = ".ir.json";

// ============================================================================
// Loading
// ============================================================================

/// Read a JSON-serialized component and check its declaration ranges.
pub fn load_component(path: &Path) -> Result<Component, IrmarkError> {
    let content = fs::read_to_string(path).map_err(|e| IrmarkError::io(path.display(), e))?;
    let invalid_ir = |message: String| IrmarkError::InvalidIr {
        path: path.display().to_string(),
        message,
    };
    let component: Component =
        serde_json::from_str(&content).map_err(|e| invalid_ir(e.to_string()))?;
    component.validate().map_err(|e| invalid_ir(e.to_string()))?;
    Ok(component)
}

/// Read a fixture and split off its annotations.
pub fn load_fixture(path: &Path, config: &Config) -> Result<AnnotatedCode, IrmarkError> {
    let text = fs::read_to_string(path).map_err(|e| IrmarkError::io(path.display(), e))?;
    AnnotatedCode::from_text(
        &text,
        &config.annotations.comment_start,
        &config.annotations.comment_end,
    )
    .map_err(|source| IrmarkError::Annotation {
        path: path.display().to_string(),
        source,
    })
}

/// Shape facts for every construct in the IR file at `path`.
pub fn extract_facts(path: &Path) -> Result<DataRegistry<String>, IrmarkError> {
    let component = load_component(path)?;
    let registry = extract_component(&ShapeComputer, &component, &mut TracingSink)?;
    tracing::debug!("Extracted {} facts from {}", registry.len(), path.display());
    Ok(registry)
}

/// Fixture path paired with an IR file, if the name carries [`IR_SUFFIX`].
pub fn fixture_for(ir: &Path) -> Option<PathBuf> {
    let name = ir.file_name()?.to_str()?;
    let stem = name.strip_suffix(IR_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(ir.with_file_name(stem))
}

// ============================================================================
// Commands
// ============================================================================

/// Decode one annotation text.
pub fn run_decode(offset: u32, text: &str) -> Result<DecodeResponse, IrmarkError> {
    let value = decode(offset, text)?;
    Ok(DecodeResponse::new(&value))
}

/// List the annotations of a fixture and what they decode to.
pub fn run_annotations(fixture: &Path, config: &Config) -> Result<AnnotationsResponse, IrmarkError> {
    let code = load_fixture(fixture, config)?;
    let expected = compute_expected_map(&code).map_err(|source| IrmarkError::Annotation {
        path: fixture.display().to_string(),
        source,
    })?;
    let expectations = expected.values().map(ExpectationInfo::from).collect();
    Ok(AnnotationsResponse::new(
        fixture.display().to_string(),
        code.annotations,
        expectations,
    ))
}

/// Extract and list every fact of an IR file.
pub fn run_extract(ir: &Path) -> Result<ExtractResponse, IrmarkError> {
    let registry = extract_facts(ir)?;
    Ok(ExtractResponse::new(
        ir.display().to_string(),
        fact_infos(&registry),
    ))
}

/// Compare an IR file's facts against a fixture's expectations.
pub fn run_check(ir: &Path, fixture: &Path, config: &Config) -> Result<FixtureReport, IrmarkError> {
    let registry = extract_facts(ir)?;
    let code = load_fixture(fixture, config)?;
    let expected = compute_expected_map(&code).map_err(|source| IrmarkError::Annotation {
        path: fixture.display().to_string(),
        source,
    })?;

    let report = compare_data(&expected, &registry, config.compare_options());
    if !report.is_success() {
        tracing::info!(
            "{}: {} mismatch(es) against {}",
            fixture.display(),
            report.mismatches.len(),
            ir.display()
        );
    }
    Ok(FixtureReport::new(
        ir.display().to_string(),
        fixture.display().to_string(),
        report,
    ))
}

/// Check every IR file under `dir` against its paired fixture.
pub fn run_check_dir(dir: &Path, config: &Config) -> Result<CheckResponse, IrmarkError> {
    if !dir.is_dir() {
        return Err(IrmarkError::invalid_args(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| IrmarkError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(fixture) = fixture_for(entry.path()) else {
            continue;
        };
        tracing::debug!("Checking {}", entry.path().display());
        fixtures.push(run_check(entry.path(), &fixture, config)?);
    }

    Ok(CheckResponse::new(fixtures))
}
