//! Identifier model: canonical keys for attaching facts to IR constructs.
//!
//! An [`Id`] addresses one of three things:
//! - [`ElementId`]: a member (method, field, getter, setter, constructor)
//! - [`ClassId`]: a class or mixin declaration
//! - [`NodeId`]: a syntactic construct, by source offset plus a [`NodeKind`]
//!
//! # Identity
//!
//! Element and class ids are identified by name alone. The `is_global` flag
//! records where an expectation was written and does not take part in
//! equality, hashing, or ordering:
//!
//! | Variant | Identity | Metadata |
//! |---------|----------|----------|
//! | `ElementId` | `(class_name, member_name)` | `is_global` |
//! | `ClassId` | `class_name` | `is_global` |
//! | `NodeId` | `(offset, kind)` | - |
//!
//! Several facts may live at the same source offset (a for-each loop and
//! its `iterator`, `current`, and `moveNext` calls), so the node kind is part
//! of a node id's identity.
//!
//! # Text Encoding
//!
//! [`IdValue`] renders an identifier together with an expected value in the
//! fixture annotation format. The `decode` module parses it back.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ============================================================================
// Encoding Prefixes
// ============================================================================

/// Prefix for element (member) annotations.
pub const ELEMENT_PREFIX: &str = "element: ";
/// Prefix for class annotations.
pub const CLASS_PREFIX: &str = "class: ";
/// Prefix for invocation annotations.
pub const INVOKE_PREFIX: &str = "invoke: ";
/// Prefix for update (write) annotations.
pub const UPDATE_PREFIX: &str = "update: ";
/// Prefix for the implicit `iterator` access of a for-each loop.
pub const ITERATOR_PREFIX: &str = "iterator: ";
/// Prefix for the implicit `current` access of a for-each loop.
pub const CURRENT_PREFIX: &str = "current: ";
/// Prefix for the implicit `moveNext` call of a for-each loop.
pub const MOVE_NEXT_PREFIX: &str = "moveNext: ";
/// Marker placed before an element or class name to flag a global id.
pub const GLOBAL_PREFIX: &str = "global#";

// ============================================================================
// Kinds
// ============================================================================

/// Disambiguating tag for node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// The construct itself.
    Node,
    /// An invocation.
    Invoke,
    /// A write (property set, variable set, index set).
    Update,
    /// The implicit `iterator` access of a for-each loop.
    Iterator,
    /// The implicit `current` access of a for-each loop.
    Current,
    /// The implicit `moveNext` call of a for-each loop.
    MoveNext,
}

impl NodeKind {
    /// All node kinds, in declaration order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Node,
        NodeKind::Invoke,
        NodeKind::Update,
        NodeKind::Iterator,
        NodeKind::Current,
        NodeKind::MoveNext,
    ];

    /// Stable name used in `Display` and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Node => "node",
            NodeKind::Invoke => "invoke",
            NodeKind::Update => "update",
            NodeKind::Iterator => "iterator",
            NodeKind::Current => "current",
            NodeKind::MoveNext => "moveNext",
        }
    }

    /// Annotation prefix for this kind. Plain nodes have none.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Node => "",
            NodeKind::Invoke => INVOKE_PREFIX,
            NodeKind::Update => UPDATE_PREFIX,
            NodeKind::Iterator => ITERATOR_PREFIX,
            NodeKind::Current => CURRENT_PREFIX,
            NodeKind::MoveNext => MOVE_NEXT_PREFIX,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant over every identifier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdKind {
    Element,
    Class,
    Node,
    Invoke,
    Update,
    Iterator,
    Current,
    MoveNext,
}

impl IdKind {
    /// Stable name used in `Display` and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            IdKind::Element => "element",
            IdKind::Class => "class",
            IdKind::Node => "node",
            IdKind::Invoke => "invoke",
            IdKind::Update => "update",
            IdKind::Iterator => "iterator",
            IdKind::Current => "current",
            IdKind::MoveNext => "moveNext",
        }
    }
}

impl From<NodeKind> for IdKind {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Node => IdKind::Node,
            NodeKind::Invoke => IdKind::Invoke,
            NodeKind::Update => IdKind::Update,
            NodeKind::Iterator => IdKind::Iterator,
            NodeKind::Current => IdKind::Current,
            NodeKind::MoveNext => IdKind::MoveNext,
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ElementId
// ============================================================================

/// Identifier for a member, optionally scoped to a class.
///
/// Setter names carry a trailing `=` so a setter never collides with the
/// getter or field of the same base name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementId {
    /// Enclosing class name, `None` for top-level members.
    pub class_name: Option<String>,
    /// Member name.
    pub member_name: String,
    /// Whether the expectation was written as `global#`.
    #[serde(default)]
    pub is_global: bool,
}

impl ElementId {
    /// Create a new element ID.
    pub fn new(class_name: Option<String>, member_name: impl Into<String>, is_global: bool) -> Self {
        ElementId {
            class_name,
            member_name: member_name.into(),
            is_global,
        }
    }

    /// Element ID for a top-level member.
    pub fn top_level(member_name: impl Into<String>) -> Self {
        ElementId::new(None, member_name, false)
    }

    /// Element ID for a class member.
    pub fn member(class_name: impl Into<String>, member_name: impl Into<String>) -> Self {
        ElementId::new(Some(class_name.into()), member_name, false)
    }

    /// Dotted name, `Class.member` or `member`.
    pub fn name(&self) -> String {
        match &self.class_name {
            Some(class_name) => format!("{}.{}", class_name, self.member_name),
            None => self.member_name.clone(),
        }
    }

    /// Human-readable label.
    pub fn descriptor(&self) -> String {
        format!("member '{}'", self.name())
    }

    fn identity(&self) -> (Option<&str>, &str) {
        (self.class_name.as_deref(), self.member_name.as_str())
    }
}

impl PartialEq for ElementId {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ElementId {}

impl Hash for ElementId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for ElementId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

// ============================================================================
// ClassId
// ============================================================================

/// Identifier for a class or mixin declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassId {
    /// Class name.
    pub class_name: String,
    /// Whether the expectation was written as `global#`.
    #[serde(default)]
    pub is_global: bool,
}

impl ClassId {
    /// Create a new class ID.
    pub fn new(class_name: impl Into<String>, is_global: bool) -> Self {
        ClassId {
            class_name: class_name.into(),
            is_global,
        }
    }

    /// Human-readable label.
    pub fn descriptor(&self) -> String {
        format!("class '{}'", self.class_name)
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_name.hash(state);
    }
}

impl PartialOrd for ClassId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class_name.cmp(&other.class_name)
    }
}

// ============================================================================
// NodeId
// ============================================================================

/// Identifier for a syntactic construct at a source offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Source byte offset of the construct.
    pub offset: u32,
    /// Disambiguating kind.
    pub kind: NodeKind,
}

impl NodeId {
    /// Create a new node ID.
    pub fn new(offset: u32, kind: NodeKind) -> Self {
        NodeId { offset, kind }
    }

    /// Human-readable label.
    pub fn descriptor(&self) -> String {
        format!("offset {} ({})", self.offset, self.kind)
    }
}

// ============================================================================
// Id
// ============================================================================

/// A canonical identifier for fact attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Id {
    Element(ElementId),
    Class(ClassId),
    Node(NodeId),
}

impl Id {
    /// Shorthand for a node ID.
    pub fn node(offset: u32, kind: NodeKind) -> Self {
        Id::Node(NodeId::new(offset, kind))
    }

    /// The kind discriminant.
    pub fn kind(&self) -> IdKind {
        match self {
            Id::Element(_) => IdKind::Element,
            Id::Class(_) => IdKind::Class,
            Id::Node(node) => node.kind.into(),
        }
    }

    /// Human-readable label.
    pub fn descriptor(&self) -> String {
        match self {
            Id::Element(id) => id.descriptor(),
            Id::Class(id) => id.descriptor(),
            Id::Node(id) => id.descriptor(),
        }
    }

    /// Whether this id was marked `global#`. Always false for node ids.
    pub fn is_global(&self) -> bool {
        match self {
            Id::Element(id) => id.is_global,
            Id::Class(id) => id.is_global,
            Id::Node(_) => false,
        }
    }

    /// The source offset for node ids.
    pub fn offset(&self) -> Option<u32> {
        match self {
            Id::Node(id) => Some(id.offset),
            _ => None,
        }
    }
}

impl From<ElementId> for Id {
    fn from(id: ElementId) -> Self {
        Id::Element(id)
    }
}

impl From<ClassId> for Id {
    fn from(id: ClassId) -> Self {
        Id::Class(id)
    }
}

impl From<NodeId> for Id {
    fn from(id: NodeId) -> Self {
        Id::Node(id)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Element(id) => write!(f, "{}:{}", IdKind::Element, id.name()),
            Id::Class(id) => write!(f, "{}:{}", IdKind::Class, id.class_name),
            Id::Node(id) => write!(f, "{}:{}", id.kind, id.offset),
        }
    }
}

// ============================================================================
// IdValue
// ============================================================================

/// An identifier paired with an expected value, as written in a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdValue {
    pub id: Id,
    pub value: String,
}

impl IdValue {
    /// Create a new id/value pair.
    pub fn new(id: impl Into<Id>, value: impl Into<String>) -> Self {
        IdValue {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Canonical annotation text for this pair.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let global = |is_global: bool| if is_global { GLOBAL_PREFIX } else { "" };
        match &self.id {
            Id::Element(id) => write!(
                f,
                "{}{}{}:{}",
                ELEMENT_PREFIX,
                global(id.is_global),
                id.name(),
                self.value
            ),
            Id::Class(id) => write!(
                f,
                "{}{}{}:{}",
                CLASS_PREFIX,
                global(id.is_global),
                id.class_name,
                self.value
            ),
            Id::Node(id) => write!(f, "{}{}", id.kind.prefix(), self.value),
        }
    }
}
