// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! IR model and fact extraction for irmark.
//!
//! This crate provides:
//! - [`nodes`]: a serde-serializable IR of libraries, classes, members,
//!   statements, and expressions
//! - [`extract`]: the [`DataExtractor`] traversal that assigns canonical ids
//!   and records facts
//! - [`shape`]: the built-in [`ShapeComputer`]
//!
//! # Example
//!
//! ```ignore
//! use irmark_core::diagnostics::CollectingSink;
//! use irmark_ir::{extract_component, Component, ShapeComputer};
//!
//! let component: Component = serde_json::from_str(&json)?;
//! let mut sink = CollectingSink::new();
//! let registry = extract_component(&ShapeComputer, &component, &mut sink)?;
//! ```

pub mod extract;
pub mod nodes;
pub mod shape;

pub use extract::{
    compute_class_id, compute_entity_id, create_node_id, extract_component, ComputerFns,
    DataComputer, DataExtractor, Root,
};
pub use nodes::{
    Class, Component, Expression, InvalidRange, IrNode, Library, Member, MemberKind, Statement,
};
pub use shape::ShapeComputer;
