//! Binary entry point for the irmark CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Decode one annotation as found at offset 42
//! irmark decode --offset 42 'invoke: int'
//!
//! # Show the expectations written in a fixture
//! irmark annotations tests/fixtures/loops.dart
//!
//! # Compute shape facts for an IR file
//! irmark extract tests/fixtures/loops.dart.ir.json
//!
//! # Compare one IR file against its fixture (exit 5 on mismatch)
//! irmark check tests/fixtures/loops.dart.ir.json tests/fixtures/loops.dart
//!
//! # Check every `*.ir.json` under a directory
//! irmark check-dir tests/fixtures
//! ```
//!
//! All output is JSON on stdout. Logs go to stderr, as text or, with
//! `--log-format json`, one JSON object per line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use irmark::cli::{run_annotations, run_check, run_check_dir, run_decode, run_extract};
use irmark_core::config::Config;
use irmark_core::error::{IrmarkError, OutputErrorCode};
use irmark_core::output::{emit_response, CheckResponse, ErrorInfo, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Stable identifiers for IR nodes and annotation-driven fact checks.
#[derive(Parser, Debug)]
#[command(name = "irmark", version, about = "Annotation-driven checks of IR facts")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Format of log lines on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Config file (default: .irmark/config.toml in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Format of log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one annotation text into an identifier and value.
    Decode {
        /// Offset the annotation was found at.
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Annotation text, e.g. `element: Foo.bar:int`.
        text: String,
    },
    /// List the annotations of a fixture.
    Annotations {
        /// Annotated fixture file.
        fixture: PathBuf,
    },
    /// Compute shape facts for an IR file.
    Extract {
        /// JSON-serialized IR component.
        ir: PathBuf,
    },
    /// Compare an IR file's facts with a fixture's annotations.
    Check {
        /// JSON-serialized IR component.
        ir: PathBuf,
        /// Annotated fixture file.
        fixture: PathBuf,
    },
    /// Check every `*.ir.json` file under a directory against its fixture.
    CheckDir {
        /// Directory to search.
        dir: PathBuf,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::new(ErrorInfo::from_error(&err));

            // Errors go to stdout as JSON like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<ExitCode, IrmarkError> {
    match cli.command {
        Command::Decode { offset, text } => emit(&run_decode(offset, &text)?),
        Command::Annotations { fixture } => {
            let config = load_config(&cli.global)?;
            emit(&run_annotations(&fixture, &config)?)
        }
        Command::Extract { ir } => emit(&run_extract(&ir)?),
        Command::Check { ir, fixture } => {
            let config = load_config(&cli.global)?;
            let report = run_check(&ir, &fixture, &config)?;
            emit_check(CheckResponse::new(vec![report]))
        }
        Command::CheckDir { dir } => {
            let config = load_config(&cli.global)?;
            emit_check(run_check_dir(&dir, &config)?)
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Load the explicit config file, or the project config if there is one.
fn load_config(global: &GlobalArgs) -> Result<Config, IrmarkError> {
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().map_err(|e| IrmarkError::io(".", e))?;
            Config::load_from_project(&cwd)?
        }
    };
    Ok(config)
}

fn emit<T: Serialize>(response: &T) -> Result<ExitCode, IrmarkError> {
    emit_response(response, &mut io::stdout())
        .map_err(|e| IrmarkError::internal(format!("failed to write output: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

/// Emit a check report; mismatches exit with the check-failed code.
fn emit_check(response: CheckResponse) -> Result<ExitCode, IrmarkError> {
    emit(&response)?;
    if response.failed == 0 {
        return Ok(ExitCode::SUCCESS);
    }
    let failure = IrmarkError::CheckFailed {
        mismatches: response.mismatch_count(),
    };
    tracing::warn!("{}", failure);
    Ok(ExitCode::from(OutputErrorCode::from(&failure).code()))
}
