// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Built-in fact computer that labels constructs by syntactic shape.
//!
//! Values are what a fixture author can predict from the source alone:
//!
//! - members: the member kind, with parameter names for callables,
//!   e.g. `method(a, b)`, `getter`, `field`
//! - classes: `class` or `mixin`
//! - nodes: the node type and name, e.g. `PropertyGet(length)`
//! - for-in protocol ids: the protocol member, `iterator`, `current`, or
//!   `moveNext`

use irmark_core::id::{Id, NodeKind};

use crate::extract::DataComputer;
use crate::nodes::{Class, IrNode, Member, MemberKind};

/// Labels every construct with its syntactic shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeComputer;

impl DataComputer<String> for ShapeComputer {
    fn compute_member_value(&self, _id: &Id, member: &Member) -> Option<String> {
        Some(member_shape(member))
    }

    fn compute_node_value(&self, id: &Id, node: IrNode<'_>) -> Option<String> {
        match id {
            Id::Node(node_id) => match node_id.kind {
                NodeKind::Iterator | NodeKind::Current | NodeKind::MoveNext => {
                    Some(node_id.kind.as_str().to_string())
                }
                NodeKind::Node | NodeKind::Invoke | NodeKind::Update => Some(node.label()),
            },
            Id::Element(_) | Id::Class(_) => None,
        }
    }

    fn compute_class_value(&self, _id: &Id, class: &Class) -> Option<String> {
        Some(if class.is_mixin { "mixin" } else { "class" }.to_string())
    }
}

fn member_shape(member: &Member) -> String {
    match (member.kind, &member.function) {
        (
            MemberKind::Method
            | MemberKind::Operator
            | MemberKind::Constructor
            | MemberKind::Factory,
            Some(function),
        ) => {
            let parameters: Vec<&str> = function
                .parameters
                .iter()
                .map(|p| p.name.as_deref().unwrap_or("_"))
                .collect();
            format!("{}({})", member.kind.as_str(), parameters.join(", "))
        }
        (kind, _) => kind.as_str().to_string(),
    }
}
