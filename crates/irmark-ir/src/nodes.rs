// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! IR node types.
//!
//! The IR is a closed tree: a [`Component`] holds libraries, libraries hold
//! classes and members, and member bodies are [`Statement`] and
//! [`Expression`] trees. Every node that can carry a fact has a source
//! `offset`; `None` stands for "no offset" and is only legal on nodes the
//! extractor never addresses.
//!
//! # Serialization
//!
//! All types are serde-serializable. Statement and expression enums are
//! internally tagged with a `"type"` field:
//!
//! ```json
//! { "type": "PropertyGet", "offset": 14, "name": "length",
//!   "receiver": { "type": "VariableGet", "offset": 12,
//!                 "variable": { "name": "list" } } }
//! ```
//!
//! # Variable References
//!
//! A read or write of a variable carries a [`VariableRef`] describing the
//! declaration it refers to: its name (`None` for compiler-synthesized
//! temporaries) and the [`VariableSite`] that introduced it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Ranges
// ============================================================================

/// Byte range of a declaration in its library source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> Self {
        TextRange { start, end }
    }

    /// True if `start` does not come after `end`.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

/// A declaration whose range ends before it starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{uri}: {declaration} has inverted range {}..{}", .range.start, .range.end)]
pub struct InvalidRange {
    pub uri: String,
    pub declaration: String,
    pub range: TextRange,
}

// ============================================================================
// Declarations
// ============================================================================

/// A compilation unit: every library of one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub libraries: Vec<Library>,
}

impl Component {
    /// Check every class and member range.
    ///
    /// Returns the first declaration whose range is inverted. Extraction
    /// assumes ordered ranges.
    pub fn validate(&self) -> Result<(), InvalidRange> {
        for library in &self.libraries {
            let check = |range: TextRange, declaration: &dyn fmt::Display| {
                if range.is_ordered() {
                    Ok(())
                } else {
                    Err(InvalidRange {
                        uri: library.uri.clone(),
                        declaration: declaration.to_string(),
                        range,
                    })
                }
            };
            for class in &library.classes {
                check(class.range, class)?;
                for member in &class.members {
                    check(member.range, member)?;
                }
            }
            for member in &library.members {
                check(member.range, member)?;
            }
        }
        Ok(())
    }
}

/// One library (source file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// URI used for every source span in this library.
    pub uri: String,
    #[serde(default)]
    pub classes: Vec<Class>,
    /// Top-level members.
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A class or mixin declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub offset: Option<u32>,
    pub range: TextRange,
    #[serde(default)]
    pub is_mixin: bool,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Kind of a member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Operator,
    Field,
    Constructor,
    Factory,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Getter => "getter",
            MemberKind::Setter => "setter",
            MemberKind::Operator => "operator",
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Factory => "factory",
        }
    }
}

/// A member: procedure, field, or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Simple name, without any setter `=`.
    pub name: String,
    pub kind: MemberKind,
    pub offset: Option<u32>,
    /// Full source range of the declaration.
    pub range: TextRange,
    /// Parameters and body, for procedures and constructors.
    #[serde(default)]
    pub function: Option<FunctionNode>,
    /// Field initializer.
    #[serde(default)]
    pub initializer: Option<Expression>,
    /// Constructor initializer list.
    #[serde(default)]
    pub initializers: Vec<Initializer>,
}

/// A constructor initializer, `field = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initializer {
    pub offset: Option<u32>,
    pub field: String,
    pub value: Expression,
}

/// Parameters and body shared by members, local functions, and closures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub offset: Option<u32>,
    #[serde(default)]
    pub parameters: Vec<VariableDeclaration>,
    #[serde(default)]
    pub body: Option<Box<Statement>>,
}

/// A variable declaration: local, parameter, or synthesized temporary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub offset: Option<u32>,
    /// `None` for compiler-synthesized variables.
    pub name: Option<String>,
    #[serde(default)]
    pub initializer: Option<Box<Expression>>,
}

/// Where a referenced variable was declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSite {
    /// A local variable or synthesized temporary.
    #[default]
    Local,
    /// An ordinary parameter.
    Parameter,
    /// A constructor `this.x` parameter.
    FieldFormal,
    /// The implicit variable of a local function declaration.
    LocalFunction,
}

/// A reference to a declared variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: Option<String>,
    #[serde(default)]
    pub site: VariableSite,
}

impl VariableRef {
    pub fn is_synthetic(&self) -> bool {
        self.name.is_none()
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    Expression(ExpressionStatement),
    Block(Block),
    Empty(EmptyStatement),
    Return(ReturnStatement),
    If(IfStatement),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    Do(DoStatement),
    For(ForStatement),
    While(WhileStatement),
    ForIn(ForInStatement),
    Labeled(LabeledStatement),
    Break(BreakStatement),
    Switch(SwitchStatement),
    ContinueSwitch(ContinueSwitchStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub offset: Option<u32>,
    pub expression: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub offset: Option<u32>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyStatement {
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub offset: Option<u32>,
    #[serde(default)]
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub offset: Option<u32>,
    pub condition: Expression,
    pub then: Box<Statement>,
    #[serde(default)]
    pub otherwise: Option<Box<Statement>>,
}

/// A named local function, `int f(x) => ...;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub offset: Option<u32>,
    /// The variable the function is bound to.
    pub variable: VariableDeclaration,
    pub function: FunctionNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoStatement {
    pub offset: Option<u32>,
    pub body: Box<Statement>,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub offset: Option<u32>,
    #[serde(default)]
    pub variables: Vec<VariableDeclaration>,
    #[serde(default)]
    pub condition: Option<Expression>,
    #[serde(default)]
    pub updates: Vec<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub offset: Option<u32>,
    pub condition: Expression,
    pub body: Box<Statement>,
}

/// `for (var x in iterable) body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInStatement {
    pub offset: Option<u32>,
    pub variable: VariableDeclaration,
    pub iterable: Expression,
    pub body: Box<Statement>,
}

/// A statement that `break` (or a desugared `continue`) can target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub offset: Option<u32>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakStatement {
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub offset: Option<u32>,
    pub expression: Expression,
    #[serde(default)]
    pub cases: Vec<SwitchCase>,
}

/// One `case a: case b: body` group. A default-only case has no expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub offset: Option<u32>,
    #[serde(default)]
    pub expressions: Vec<Expression>,
    pub body: Box<Statement>,
}

/// `continue label;` targeting a switch case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinueSwitchStatement {
    pub offset: Option<u32>,
}

impl Statement {
    /// Source offset of the statement.
    pub fn offset(&self) -> Option<u32> {
        match self {
            Statement::Expression(s) => s.offset,
            Statement::Block(s) => s.offset,
            Statement::Empty(s) => s.offset,
            Statement::Return(s) => s.offset,
            Statement::If(s) => s.offset,
            Statement::VariableDeclaration(s) => s.offset,
            Statement::FunctionDeclaration(s) => s.offset,
            Statement::Do(s) => s.offset,
            Statement::For(s) => s.offset,
            Statement::While(s) => s.offset,
            Statement::ForIn(s) => s.offset,
            Statement::Labeled(s) => s.offset,
            Statement::Break(s) => s.offset,
            Statement::Switch(s) => s.offset,
            Statement::ContinueSwitch(s) => s.offset,
        }
    }

    /// Node type name, as used in the serialized `"type"` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Statement::Expression(_) => "ExpressionStatement",
            Statement::Block(_) => "Block",
            Statement::Empty(_) => "EmptyStatement",
            Statement::Return(_) => "ReturnStatement",
            Statement::If(_) => "IfStatement",
            Statement::VariableDeclaration(_) => "VariableDeclaration",
            Statement::FunctionDeclaration(_) => "FunctionDeclaration",
            Statement::Do(_) => "DoStatement",
            Statement::For(_) => "ForStatement",
            Statement::While(_) => "WhileStatement",
            Statement::ForIn(_) => "ForInStatement",
            Statement::Labeled(_) => "LabeledStatement",
            Statement::Break(_) => "BreakStatement",
            Statement::Switch(_) => "SwitchStatement",
            Statement::ContinueSwitch(_) => "ContinueSwitchStatement",
        }
    }

    /// Loops that `continue` can target.
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            Statement::Do(_) | Statement::For(_) | Statement::While(_) | Statement::ForIn(_)
        )
    }

    /// Statements that an unlabeled `break` can target.
    pub fn can_be_break_target(&self) -> bool {
        self.is_loop() || matches!(self, Statement::Switch(_))
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    MethodInvocation(MethodInvocation),
    StaticInvocation(StaticInvocation),
    LoadLibrary(LoadLibrary),
    PropertyGet(PropertyGet),
    PropertySet(PropertySet),
    VariableGet(VariableGet),
    VariableSet(VariableSet),
    FunctionExpression(FunctionExpression),
    Let(Let),
    Conditional(ConditionalExpression),
    Literal(Literal),
    This(ThisExpression),
}

/// Call arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub positional: Vec<Expression>,
    #[serde(default)]
    pub named: Vec<NamedExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExpression {
    pub name: String,
    pub value: Expression,
}

/// An instance method or operator call, `receiver.name(arguments)`.
///
/// Operators use their operator name: `==`, `+`, `[]`, `[]=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInvocation {
    pub offset: Option<u32>,
    pub receiver: Box<Expression>,
    pub name: String,
    #[serde(default)]
    pub arguments: Arguments,
}

/// A call to a top-level or static member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticInvocation {
    pub offset: Option<u32>,
    pub target: String,
    #[serde(default)]
    pub arguments: Arguments,
}

/// `prefix.loadLibrary()` on a deferred import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadLibrary {
    pub offset: Option<u32>,
    pub import: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyGet {
    pub offset: Option<u32>,
    pub receiver: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub offset: Option<u32>,
    pub receiver: Box<Expression>,
    pub name: String,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableGet {
    pub offset: Option<u32>,
    pub variable: VariableRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSet {
    pub offset: Option<u32>,
    pub variable: VariableRef,
    pub value: Box<Expression>,
}

/// An anonymous function literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub offset: Option<u32>,
    pub function: FunctionNode,
}

/// `let variable = initializer in body`, produced by desugaring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Let {
    pub offset: Option<u32>,
    pub variable: VariableDeclaration,
    pub body: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpression {
    pub offset: Option<u32>,
    pub condition: Box<Expression>,
    pub then: Box<Expression>,
    pub otherwise: Box<Expression>,
}

/// A literal, kept as its source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub offset: Option<u32>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThisExpression {
    pub offset: Option<u32>,
}

impl Expression {
    /// Source offset of the expression.
    pub fn offset(&self) -> Option<u32> {
        match self {
            Expression::MethodInvocation(e) => e.offset,
            Expression::StaticInvocation(e) => e.offset,
            Expression::LoadLibrary(e) => e.offset,
            Expression::PropertyGet(e) => e.offset,
            Expression::PropertySet(e) => e.offset,
            Expression::VariableGet(e) => e.offset,
            Expression::VariableSet(e) => e.offset,
            Expression::FunctionExpression(e) => e.offset,
            Expression::Let(e) => e.offset,
            Expression::Conditional(e) => e.offset,
            Expression::Literal(e) => e.offset,
            Expression::This(e) => e.offset,
        }
    }

    /// Node type name, as used in the serialized `"type"` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expression::MethodInvocation(_) => "MethodInvocation",
            Expression::StaticInvocation(_) => "StaticInvocation",
            Expression::LoadLibrary(_) => "LoadLibrary",
            Expression::PropertyGet(_) => "PropertyGet",
            Expression::PropertySet(_) => "PropertySet",
            Expression::VariableGet(_) => "VariableGet",
            Expression::VariableSet(_) => "VariableSet",
            Expression::FunctionExpression(_) => "FunctionExpression",
            Expression::Let(_) => "Let",
            Expression::Conditional(_) => "Conditional",
            Expression::Literal(_) => "Literal",
            Expression::This(_) => "This",
        }
    }

    /// The name the expression refers to, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Expression::MethodInvocation(e) => Some(&e.name),
            Expression::StaticInvocation(e) => Some(&e.target),
            Expression::LoadLibrary(e) => Some(&e.import),
            Expression::PropertyGet(e) => Some(&e.name),
            Expression::PropertySet(e) => Some(&e.name),
            Expression::VariableGet(e) => e.variable.name.as_deref(),
            Expression::VariableSet(e) => e.variable.name.as_deref(),
            Expression::Literal(e) => Some(&e.value),
            Expression::FunctionExpression(_)
            | Expression::Let(_)
            | Expression::Conditional(_)
            | Expression::This(_) => None,
        }
    }
}

// ============================================================================
// Node references
// ============================================================================

/// A borrowed reference to any node a fact can be attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IrNode<'a> {
    Statement(&'a Statement),
    Expression(&'a Expression),
    Variable(&'a VariableDeclaration),
    SwitchCase(&'a SwitchCase),
}

impl<'a> IrNode<'a> {
    pub fn offset(&self) -> Option<u32> {
        match self {
            IrNode::Statement(s) => s.offset(),
            IrNode::Expression(e) => e.offset(),
            IrNode::Variable(v) => v.offset,
            IrNode::SwitchCase(c) => c.offset,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            IrNode::Statement(s) => s.type_name(),
            IrNode::Expression(e) => e.type_name(),
            IrNode::Variable(_) => "VariableDeclaration",
            IrNode::SwitchCase(_) => "SwitchCase",
        }
    }

    /// Name carried by the node, if any.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            IrNode::Statement(Statement::VariableDeclaration(v)) | IrNode::Variable(v) => {
                v.name.as_deref()
            }
            IrNode::Statement(Statement::FunctionDeclaration(f)) => f.variable.name.as_deref(),
            IrNode::Statement(_) | IrNode::SwitchCase(_) => None,
            IrNode::Expression(e) => e.name(),
        }
    }

    /// Type name with the node's name, e.g. `PropertyGet(length)`.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => format!("{}({})", self.type_name(), name),
            None => self.type_name().to_string(),
        }
    }
}

impl fmt::Display for IrNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())?;
        if let Some(offset) = self.offset() {
            write!(f, "@{}", offset)?;
        }
        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.name)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_mixin { "mixin" } else { "class" };
        write!(f, "{} {}", keyword, self.name)
    }
}
