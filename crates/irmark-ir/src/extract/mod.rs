// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fact extraction over the IR.
//!
//! This module provides the [`DataExtractor`], which walks an IR subtree
//! once, derives the canonical [`Id`] of every construct that can carry a
//! fact, asks a [`DataComputer`] for the fact, and records it in a
//! [`DataRegistry`].
//!
//! # Traversal Order
//!
//! The walk is depth-first and pre-order: a construct's own ids are
//! registered before its children are visited. Children are always
//! visited, including below constructs whose own id is suppressed.
//!
//! # Identifier Policy
//!
//! Members get an [`ElementId`] from their enclosing class name and simple
//! name (setters get a trailing `=`). Classes get a [`ClassId`]. Syntax nodes
//! get a [`NodeId`] whose kind depends on the construct:
//!
//! | Construct | Kind |
//! |-----------|------|
//! | method invocation | `invoke` (`node` for `[]`, `update` for `[]=`) |
//! | local function call | `invoke` at the receiver's offset |
//! | deferred library load | `invoke` |
//! | property get / set | `node` / `update` |
//! | variable get / set | `node` / `update` |
//! | variable and local function declaration | `node` |
//! | function expression | `node` |
//! | do / for / while loop | `node` |
//! | for-in loop | `node`, `iterator`, `current`, `moveNext` |
//! | labeled statement | `node` at the body's offset |
//! | break / switch / continue-switch | `node` |
//! | switch case | `node` at the first case expression |
//!
//! Synthesized variables (those without a name) never get an id, and the
//! `#t == null` test of a desugared null-aware access is skipped with its
//! operands.
//!
//! # Usage
//!
//! ```ignore
//! use irmark_core::diagnostics::TracingSink;
//! use irmark_ir::extract::extract_component;
//! use irmark_ir::shape::ShapeComputer;
//!
//! let registry = extract_component(&ShapeComputer, &component, &mut TracingSink)?;
//! for fact in registry.sorted() {
//!     println!("{} = {}", fact.id, fact.value);
//! }
//! ```

mod walker;

pub use walker::{DataExtractor, Root};

use std::fmt;

use irmark_core::diagnostics::DiagnosticSink;
use irmark_core::id::{ClassId, ElementId, Id, NodeId, NodeKind};
use irmark_core::registry::{DataRegistry, RegistryError};

use crate::nodes::{Class, Component, IrNode, Member, MemberKind};

// ============================================================================
// DataComputer
// ============================================================================

/// Computes the fact recorded for each addressed construct.
///
/// Returning `None` records nothing for that id.
pub trait DataComputer<T> {
    /// Fact for a member, addressed by its [`ElementId`].
    fn compute_member_value(&self, id: &Id, member: &Member) -> Option<T>;

    /// Fact for a syntax node, addressed by a [`NodeId`].
    fn compute_node_value(&self, id: &Id, node: IrNode<'_>) -> Option<T>;

    /// Fact for a class, addressed by its [`ClassId`].
    fn compute_class_value(&self, id: &Id, class: &Class) -> Option<T> {
        let _ = (id, class);
        None
    }
}

/// A [`DataComputer`] built from two closures.
///
/// ```ignore
/// let computer = ComputerFns::new(
///     |_, member| Some(member.name.clone()),
///     |id, _| Some(id.kind().to_string()),
/// );
/// ```
pub struct ComputerFns<M, N> {
    member: M,
    node: N,
}

impl<M, N> ComputerFns<M, N> {
    pub fn new(member: M, node: N) -> Self {
        ComputerFns { member, node }
    }
}

impl<T, M, N> DataComputer<T> for ComputerFns<M, N>
where
    M: Fn(&Id, &Member) -> Option<T>,
    N: Fn(&Id, IrNode<'_>) -> Option<T>,
{
    fn compute_member_value(&self, id: &Id, member: &Member) -> Option<T> {
        (self.member)(id, member)
    }

    fn compute_node_value(&self, id: &Id, node: IrNode<'_>) -> Option<T> {
        (self.node)(id, node)
    }
}

// ============================================================================
// Id derivation
// ============================================================================

/// Element id of a member declared in `class_name` (or at top level).
///
/// Setters are named `name=` so they do not collide with a getter or field
/// of the same name.
pub fn compute_entity_id(class_name: Option<&str>, member: &Member) -> ElementId {
    let member_name = if member.kind == MemberKind::Setter {
        format!("{}=", member.name)
    } else {
        member.name.clone()
    };
    ElementId::new(class_name.map(str::to_string), member_name, false)
}

/// Class id of a class declaration.
pub fn compute_class_id(class: &Class) -> ClassId {
    ClassId::new(class.name.clone(), false)
}

/// Node id of `kind` at `node`'s offset.
///
/// # Panics
///
/// Panics if `node` has no source offset.
pub fn create_node_id(node: IrNode<'_>, kind: NodeKind) -> NodeId {
    NodeId::new(required_offset(node.offset(), node), kind)
}

/// The offset of a construct that must have one.
pub(crate) fn required_offset(offset: Option<u32>, construct: impl fmt::Display) -> u32 {
    match offset {
        Some(offset) => offset,
        None => panic!("no source offset on {}", construct),
    }
}

// ============================================================================
// Convenience
// ============================================================================

/// Extract every fact in `component` into a fresh registry.
pub fn extract_component<T, C>(
    computer: &C,
    component: &Component,
    sink: &mut dyn DiagnosticSink,
) -> Result<DataRegistry<T>, RegistryError>
where
    T: fmt::Debug,
    C: DataComputer<T> + ?Sized,
{
    let mut registry = DataRegistry::new();
    DataExtractor::new(computer, &mut registry, sink).run(component)?;
    Ok(registry)
}
