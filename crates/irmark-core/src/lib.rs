//! Core infrastructure for irmark.
//!
//! This crate provides the IR-independent half of the system:
//! - Identifier model for members, classes, and syntax nodes
//! - Fact registry with duplicate-identifier detection
//! - Decoder for textual fact expectations
//! - Fixture annotation extraction and expected/actual comparison
//! - Diagnostic sinks
//! - Configuration, error types, and JSON output types

pub mod annotation;
pub mod compare;
pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod id;
pub mod output;
pub mod registry;
pub mod types;
