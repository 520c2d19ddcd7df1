// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The extraction traversal.

use std::fmt;

use irmark_core::diagnostics::DiagnosticSink;
use irmark_core::id::{Id, NodeId, NodeKind};
use irmark_core::registry::{DataRegistry, RegistryError};
use irmark_core::types::SourceSpan;

use super::{
    compute_class_id, compute_entity_id, create_node_id, required_offset, DataComputer,
};
use crate::nodes::{
    Arguments, Class, Component, Expression, FunctionNode, IrNode, Library, Member,
    MethodInvocation, Statement, SwitchCase, VariableDeclaration, VariableSite,
};

/// Where a traversal starts.
#[derive(Debug, Clone, Copy)]
pub enum Root<'r> {
    Component(&'r Component),
    Library(&'r Library),
    /// A class of the library at `uri`.
    Class { uri: &'r str, class: &'r Class },
    /// A member of the library at `uri`, declared in `class_name` if any.
    Member {
        uri: &'r str,
        class_name: Option<&'r str>,
        member: &'r Member,
    },
}

impl<'r> From<&'r Component> for Root<'r> {
    fn from(component: &'r Component) -> Self {
        Root::Component(component)
    }
}

impl<'r> From<&'r Library> for Root<'r> {
    fn from(library: &'r Library) -> Self {
        Root::Library(library)
    }
}

/// Walks IR and records one fact per addressed construct.
///
/// The extractor stops at the first duplicate id and returns the error;
/// everything registered before that point stays in the registry.
///
/// # Panics
///
/// Panics on an addressed node without an offset, and on a class or member
/// whose range is inverted (see [`Component::validate`]).
pub struct DataExtractor<'a, T, C: ?Sized> {
    /// Fact computation
    computer: &'a C,
    /// Destination of recorded facts
    registry: &'a mut DataRegistry<T>,
    /// Receives duplicate-id reports
    sink: &'a mut dyn DiagnosticSink,
    /// URI of the library being walked
    uri: String,
    /// Enclosing class of the member being walked
    class_name: Option<String>,
}

impl<'a, T, C> DataExtractor<'a, T, C>
where
    T: fmt::Debug,
    C: DataComputer<T> + ?Sized,
{
    pub fn new(
        computer: &'a C,
        registry: &'a mut DataRegistry<T>,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        DataExtractor {
            computer,
            registry,
            sink,
            uri: String::new(),
            class_name: None,
        }
    }

    /// Walk `root` and all of its descendants.
    pub fn run<'r>(&mut self, root: impl Into<Root<'r>>) -> Result<(), RegistryError> {
        match root.into() {
            Root::Component(component) => component
                .libraries
                .iter()
                .try_for_each(|library| self.visit_library(library)),
            Root::Library(library) => self.visit_library(library),
            Root::Class { uri, class } => {
                self.uri = uri.to_string();
                self.visit_class(class)
            }
            Root::Member {
                uri,
                class_name,
                member,
            } => {
                self.uri = uri.to_string();
                self.class_name = class_name.map(str::to_string);
                let result = self.visit_member(member);
                self.class_name = None;
                result
            }
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    fn register(
        &mut self,
        span: SourceSpan,
        id: Id,
        value: Option<T>,
        object: String,
    ) -> Result<(), RegistryError> {
        self.registry
            .register_value(&mut *self.sink, span, id, value, object)
    }

    fn compute_for_node(&mut self, node: IrNode<'_>, id: NodeId) -> Result<(), RegistryError> {
        let span = SourceSpan::point(self.uri.as_str(), id.offset);
        let id = Id::from(id);
        let value = self.computer.compute_node_value(&id, node);
        self.register(span, id, value, node.to_string())
    }

    fn compute_default(&mut self, node: IrNode<'_>, kind: NodeKind) -> Result<(), RegistryError> {
        self.compute_for_node(node, create_node_id(node, kind))
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    fn visit_library(&mut self, library: &Library) -> Result<(), RegistryError> {
        tracing::debug!("Extracting facts from {}", library.uri);
        self.uri = library.uri.clone();
        for class in &library.classes {
            self.visit_class(class)?;
        }
        for member in &library.members {
            self.visit_member(member)?;
        }
        Ok(())
    }

    fn visit_class(&mut self, class: &Class) -> Result<(), RegistryError> {
        let id = Id::from(compute_class_id(class));
        let value = self.computer.compute_class_value(&id, class);
        let span = SourceSpan::new(self.uri.as_str(), class.range.start, class.range.end);
        self.register(span, id, value, class.to_string())?;

        let previous = self.class_name.replace(class.name.clone());
        let result = class
            .members
            .iter()
            .try_for_each(|member| self.visit_member(member));
        self.class_name = previous;
        result
    }

    fn visit_member(&mut self, member: &Member) -> Result<(), RegistryError> {
        let id = Id::from(compute_entity_id(self.class_name.as_deref(), member));
        let value = self.computer.compute_member_value(&id, member);
        let span = SourceSpan::new(self.uri.as_str(), member.range.start, member.range.end);
        self.register(span, id, value, member.to_string())?;

        if let Some(initializer) = &member.initializer {
            self.visit_expression(initializer)?;
        }
        for initializer in &member.initializers {
            self.visit_expression(&initializer.value)?;
        }
        if let Some(function) = &member.function {
            self.visit_function_node(function)?;
        }
        Ok(())
    }

    fn visit_function_node(&mut self, function: &FunctionNode) -> Result<(), RegistryError> {
        for parameter in &function.parameters {
            self.visit_variable_declaration(parameter)?;
        }
        match &function.body {
            Some(body) => self.visit_statement(body, false),
            None => Ok(()),
        }
    }

    /// Locals and parameters. Synthesized variables are walked but not
    /// addressed.
    fn visit_variable_declaration(
        &mut self,
        variable: &VariableDeclaration,
    ) -> Result<(), RegistryError> {
        if variable.name.is_some() {
            self.compute_default(IrNode::Variable(variable), NodeKind::Node)?;
        }
        match &variable.initializer {
            Some(initializer) => self.visit_expression(initializer),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    /// `loop_body` is set when `statement` is the direct body of a loop.
    fn visit_statement(
        &mut self,
        statement: &Statement,
        loop_body: bool,
    ) -> Result<(), RegistryError> {
        let node = IrNode::Statement(statement);
        match statement {
            Statement::Expression(s) => self.visit_expression(&s.expression),
            Statement::Block(block) => block
                .statements
                .iter()
                .try_for_each(|s| self.visit_statement(s, false)),
            Statement::Empty(_) => Ok(()),
            Statement::Return(s) => match &s.expression {
                Some(expression) => self.visit_expression(expression),
                None => Ok(()),
            },
            Statement::If(s) => {
                self.visit_expression(&s.condition)?;
                self.visit_statement(&s.then, false)?;
                match &s.otherwise {
                    Some(otherwise) => self.visit_statement(otherwise, false),
                    None => Ok(()),
                }
            }
            Statement::VariableDeclaration(variable) => self.visit_variable_declaration(variable),
            Statement::FunctionDeclaration(s) => {
                // The bound variable is part of the declaration, not a local.
                self.compute_default(node, NodeKind::Node)?;
                self.visit_function_node(&s.function)
            }
            Statement::Do(s) => {
                self.compute_default(node, NodeKind::Node)?;
                self.visit_statement(&s.body, true)?;
                self.visit_expression(&s.condition)
            }
            Statement::For(s) => {
                self.compute_default(node, NodeKind::Node)?;
                for variable in &s.variables {
                    self.visit_variable_declaration(variable)?;
                }
                if let Some(condition) = &s.condition {
                    self.visit_expression(condition)?;
                }
                for update in &s.updates {
                    self.visit_expression(update)?;
                }
                self.visit_statement(&s.body, true)
            }
            Statement::While(s) => {
                self.compute_default(node, NodeKind::Node)?;
                self.visit_expression(&s.condition)?;
                self.visit_statement(&s.body, true)
            }
            Statement::ForIn(s) => {
                for kind in [
                    NodeKind::Node,
                    NodeKind::Iterator,
                    NodeKind::Current,
                    NodeKind::MoveNext,
                ] {
                    self.compute_default(node, kind)?;
                }
                self.visit_variable_declaration(&s.variable)?;
                self.visit_expression(&s.iterable)?;
                self.visit_statement(&s.body, true)
            }
            Statement::Labeled(s) => {
                if !s.body.can_be_break_target() && !loop_body {
                    let body = IrNode::Statement(&s.body);
                    let offset = required_offset(body.offset(), body);
                    self.compute_for_node(node, NodeId::new(offset, NodeKind::Node))?;
                }
                self.visit_statement(&s.body, false)
            }
            Statement::Break(_) | Statement::ContinueSwitch(_) => {
                self.compute_default(node, NodeKind::Node)
            }
            Statement::Switch(s) => {
                self.compute_default(node, NodeKind::Node)?;
                self.visit_expression(&s.expression)?;
                s.cases
                    .iter()
                    .try_for_each(|case| self.visit_switch_case(case))
            }
        }
    }

    fn visit_switch_case(&mut self, case: &SwitchCase) -> Result<(), RegistryError> {
        // Default-only cases have no position of their own.
        if let Some(first) = case.expressions.first() {
            let offset = required_offset(first.offset(), IrNode::Expression(first));
            self.compute_for_node(
                IrNode::SwitchCase(case),
                NodeId::new(offset, NodeKind::Node),
            )?;
        }
        for expression in &case.expressions {
            self.visit_expression(expression)?;
        }
        self.visit_statement(&case.body, false)
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn visit_expression(&mut self, expression: &Expression) -> Result<(), RegistryError> {
        let node = IrNode::Expression(expression);
        match expression {
            Expression::MethodInvocation(call) => self.visit_method_invocation(expression, call),
            Expression::StaticInvocation(call) => self.visit_arguments(&call.arguments),
            Expression::LoadLibrary(_) => self.compute_default(node, NodeKind::Invoke),
            Expression::PropertyGet(get) => {
                self.compute_default(node, NodeKind::Node)?;
                self.visit_expression(&get.receiver)
            }
            Expression::PropertySet(set) => {
                self.compute_default(node, NodeKind::Update)?;
                self.visit_expression(&set.receiver)?;
                self.visit_expression(&set.value)
            }
            Expression::VariableGet(get) => {
                if get.variable.is_synthetic() || get.variable.site == VariableSite::FieldFormal {
                    return Ok(());
                }
                self.compute_default(node, NodeKind::Node)
            }
            Expression::VariableSet(set) => {
                if !set.variable.is_synthetic() {
                    self.compute_default(node, NodeKind::Update)?;
                }
                self.visit_expression(&set.value)
            }
            Expression::FunctionExpression(function) => {
                self.compute_default(node, NodeKind::Node)?;
                self.visit_function_node(&function.function)
            }
            Expression::Let(let_) => {
                self.visit_variable_declaration(&let_.variable)?;
                self.visit_expression(&let_.body)
            }
            Expression::Conditional(conditional) => {
                self.visit_expression(&conditional.condition)?;
                self.visit_expression(&conditional.then)?;
                self.visit_expression(&conditional.otherwise)
            }
            Expression::Literal(_) | Expression::This(_) => Ok(()),
        }
    }

    fn visit_method_invocation(
        &mut self,
        expression: &Expression,
        call: &MethodInvocation,
    ) -> Result<(), RegistryError> {
        let node = IrNode::Expression(expression);
        if let Expression::VariableGet(receiver) = call.receiver.as_ref() {
            if receiver.variable.site == VariableSite::LocalFunction {
                // Calling a local function: the receiver read is the call.
                let id = create_node_id(IrNode::Expression(&call.receiver), NodeKind::Invoke);
                self.compute_for_node(node, id)?;
                return self.visit_arguments(&call.arguments);
            }
            if call.name == "==" && receiver.variable.is_synthetic() {
                // `#t == null` from a desugared `?.`.
                return Ok(());
            }
        }

        let kind = match call.name.as_str() {
            "[]" => NodeKind::Node,
            "[]=" => NodeKind::Update,
            _ => NodeKind::Invoke,
        };
        self.compute_default(node, kind)?;
        self.visit_expression(&call.receiver)?;
        self.visit_arguments(&call.arguments)
    }

    fn visit_arguments(&mut self, arguments: &Arguments) -> Result<(), RegistryError> {
        for argument in &arguments.positional {
            self.visit_expression(argument)?;
        }
        for named in &arguments.named {
            self.visit_expression(&named.value)?;
        }
        Ok(())
    }
}
