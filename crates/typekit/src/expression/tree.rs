// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Expression tree nodes, generic over how types are referenced.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ExpressionError;
use super::value::Value;
use crate::types::{TypeDescriptor, TypeHandle};

/// A type reference usable inside an expression tree.
pub trait TypeReference: Clone + fmt::Debug {
    /// Short, human-readable name used when rendering expressions.
    fn type_name(&self) -> String;
}

impl TypeReference for TypeHandle {
    fn type_name(&self) -> String {
        self.readable_name()
    }
}

impl TypeReference for TypeDescriptor {
    fn type_name(&self) -> String {
        self.display_name()
    }
}

// ---- operators ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    AndAlso,
    OrElse,
    Coalesce,
    ArrayIndex,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::AndAlso => "&&",
            BinaryOperator::OrElse => "||",
            BinaryOperator::Coalesce => "??",
            BinaryOperator::ArrayIndex => "[]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Negate,
    Not,
    Convert,
    ArrayLength,
}

/// Form of a `NewArray` node: explicit elements or dimension bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewArrayKind {
    Init,
    Bounds,
}

// ---- members ----

/// Field or property of a declaring type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRef<T> {
    pub declaring_type: T,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRef<T> {
    pub declaring_type: T,
    pub name: String,
    pub parameter_types: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorRef<T> {
    pub declaring_type: T,
    pub parameter_types: Vec<T>,
}

/// One `Add(...)` call of a collection initializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInit<T> {
    pub add_method: MethodRef<T>,
    pub arguments: Vec<ExpressionTree<T>>,
}

/// Member initialization inside a `MemberInit` node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "binding", rename_all = "snake_case")]
pub enum MemberBinding<T> {
    /// `Member = expression`
    Assignment {
        member: MemberRef<T>,
        expression: ExpressionTree<T>,
    },
    /// `Member = { nested bindings }`
    MemberMember {
        member: MemberRef<T>,
        bindings: Vec<MemberBinding<T>>,
    },
    /// `Member = { element initializers }`
    List {
        member: MemberRef<T>,
        initializers: Vec<ElementInit<T>>,
    },
}

impl<T> MemberBinding<T> {
    pub fn member(&self) -> &MemberRef<T> {
        match self {
            MemberBinding::Assignment { member, .. }
            | MemberBinding::MemberMember { member, .. }
            | MemberBinding::List { member, .. } => member,
        }
    }
}

// ---- nodes ----

/// Node kind, independent of the type representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Binary,
    Conditional,
    Constant,
    Invocation,
    Lambda,
    ListInit,
    Member,
    MemberInit,
    MethodCall,
    NewArray,
    New,
    Parameter,
    TypeBinary,
    Unary,
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Expression tree.
///
/// `ExpressionTree<TypeHandle>` is the in-process form ([`Expression`]);
/// `ExpressionTree<TypeDescriptor>` is the serializable form
/// ([`ExpressionDescription`]).
///
/// [`Expression`]: super::Expression
/// [`ExpressionDescription`]: super::ExpressionDescription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ExpressionTree<T> {
    Binary {
        operator: BinaryOperator,
        left: Box<ExpressionTree<T>>,
        right: Box<ExpressionTree<T>>,
    },
    Conditional {
        test: Box<ExpressionTree<T>>,
        if_true: Box<ExpressionTree<T>>,
        if_false: Box<ExpressionTree<T>>,
        result_type: T,
    },
    Constant {
        value: Value,
        value_type: T,
    },
    Invocation {
        target: Box<ExpressionTree<T>>,
        arguments: Vec<ExpressionTree<T>>,
    },
    /// Parameters are `Parameter` nodes with distinct names.
    Lambda {
        parameters: Vec<ExpressionTree<T>>,
        body: Box<ExpressionTree<T>>,
    },
    ListInit {
        new_expression: Box<ExpressionTree<T>>,
        initializers: Vec<ElementInit<T>>,
    },
    /// `target` is `None` for static members.
    Member {
        target: Option<Box<ExpressionTree<T>>>,
        member: MemberRef<T>,
    },
    MemberInit {
        new_expression: Box<ExpressionTree<T>>,
        bindings: Vec<MemberBinding<T>>,
    },
    MethodCall {
        target: Option<Box<ExpressionTree<T>>>,
        method: MethodRef<T>,
        arguments: Vec<ExpressionTree<T>>,
    },
    NewArray {
        kind: NewArrayKind,
        element_type: T,
        expressions: Vec<ExpressionTree<T>>,
    },
    New {
        constructor: ConstructorRef<T>,
        arguments: Vec<ExpressionTree<T>>,
    },
    Parameter {
        name: String,
        parameter_type: T,
    },
    /// `operand is type_operand`
    TypeBinary {
        operand: Box<ExpressionTree<T>>,
        type_operand: T,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<ExpressionTree<T>>,
        result_type: T,
    },
}

impl<T> ExpressionTree<T> {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            ExpressionTree::Binary { .. } => ExpressionKind::Binary,
            ExpressionTree::Conditional { .. } => ExpressionKind::Conditional,
            ExpressionTree::Constant { .. } => ExpressionKind::Constant,
            ExpressionTree::Invocation { .. } => ExpressionKind::Invocation,
            ExpressionTree::Lambda { .. } => ExpressionKind::Lambda,
            ExpressionTree::ListInit { .. } => ExpressionKind::ListInit,
            ExpressionTree::Member { .. } => ExpressionKind::Member,
            ExpressionTree::MemberInit { .. } => ExpressionKind::MemberInit,
            ExpressionTree::MethodCall { .. } => ExpressionKind::MethodCall,
            ExpressionTree::NewArray { .. } => ExpressionKind::NewArray,
            ExpressionTree::New { .. } => ExpressionKind::New,
            ExpressionTree::Parameter { .. } => ExpressionKind::Parameter,
            ExpressionTree::TypeBinary { .. } => ExpressionKind::TypeBinary,
            ExpressionTree::Unary { .. } => ExpressionKind::Unary,
        }
    }

    pub fn constant(value: impl Into<Value>, value_type: T) -> Self {
        ExpressionTree::Constant {
            value: value.into(),
            value_type,
        }
    }

    pub fn parameter(name: impl Into<String>, parameter_type: T) -> Self {
        ExpressionTree::Parameter {
            name: name.into(),
            parameter_type,
        }
    }

    pub fn binary(operator: BinaryOperator, left: Self, right: Self) -> Self {
        ExpressionTree::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(operator: UnaryOperator, operand: Self, result_type: T) -> Self {
        ExpressionTree::Unary {
            operator,
            operand: Box::new(operand),
            result_type,
        }
    }

    pub fn conditional(test: Self, if_true: Self, if_false: Self, result_type: T) -> Self {
        ExpressionTree::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            result_type,
        }
    }

    pub fn invoke(target: Self, arguments: Vec<Self>) -> Self {
        ExpressionTree::Invocation {
            target: Box::new(target),
            arguments,
        }
    }

    pub fn type_is(operand: Self, type_operand: T) -> Self {
        ExpressionTree::TypeBinary {
            operand: Box::new(operand),
            type_operand,
        }
    }

    pub fn new_array(element_type: T, expressions: Vec<Self>) -> Self {
        ExpressionTree::NewArray {
            kind: NewArrayKind::Init,
            element_type,
            expressions,
        }
    }

    /// Lambda over `Parameter` nodes with distinct names.
    pub fn lambda(parameters: Vec<Self>, body: Self) -> Result<Self, ExpressionError> {
        let mut seen = HashSet::new();
        for parameter in &parameters {
            match parameter {
                ExpressionTree::Parameter { name, .. } => {
                    if !seen.insert(name.as_str()) {
                        return Err(ExpressionError::Invalid(format!(
                            "lambda parameter '{}' is declared twice",
                            name
                        )));
                    }
                }
                other => {
                    return Err(ExpressionError::Invalid(format!(
                        "lambda parameters must be Parameter nodes, found {}",
                        other.kind()
                    )))
                }
            }
        }
        Ok(ExpressionTree::Lambda {
            parameters,
            body: Box::new(body),
        })
    }

    /// Names of a lambda's parameters; empty for other nodes.
    pub fn parameter_names(&self) -> Vec<&str> {
        match self {
            ExpressionTree::Lambda { parameters, .. } => parameters
                .iter()
                .filter_map(|p| match p {
                    ExpressionTree::Parameter { name, .. } => Some(name.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Rebuild the tree with every type reference converted by `f`.
    pub fn try_map_types<U, E, F>(&self, f: &mut F) -> Result<ExpressionTree<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(match self {
            ExpressionTree::Binary {
                operator,
                left,
                right,
            } => ExpressionTree::Binary {
                operator: *operator,
                left: Box::new(left.try_map_types(f)?),
                right: Box::new(right.try_map_types(f)?),
            },
            ExpressionTree::Conditional {
                test,
                if_true,
                if_false,
                result_type,
            } => ExpressionTree::Conditional {
                test: Box::new(test.try_map_types(f)?),
                if_true: Box::new(if_true.try_map_types(f)?),
                if_false: Box::new(if_false.try_map_types(f)?),
                result_type: f(result_type)?,
            },
            ExpressionTree::Constant { value, value_type } => ExpressionTree::Constant {
                value: value.clone(),
                value_type: f(value_type)?,
            },
            ExpressionTree::Invocation { target, arguments } => ExpressionTree::Invocation {
                target: Box::new(target.try_map_types(f)?),
                arguments: map_nodes(arguments, f)?,
            },
            ExpressionTree::Lambda { parameters, body } => ExpressionTree::Lambda {
                parameters: map_nodes(parameters, f)?,
                body: Box::new(body.try_map_types(f)?),
            },
            ExpressionTree::ListInit {
                new_expression,
                initializers,
            } => ExpressionTree::ListInit {
                new_expression: Box::new(new_expression.try_map_types(f)?),
                initializers: initializers
                    .iter()
                    .map(|init| init.try_map_types(f))
                    .collect::<Result<_, _>>()?,
            },
            ExpressionTree::Member { target, member } => ExpressionTree::Member {
                target: map_target(target, f)?,
                member: member.try_map_types(f)?,
            },
            ExpressionTree::MemberInit {
                new_expression,
                bindings,
            } => ExpressionTree::MemberInit {
                new_expression: Box::new(new_expression.try_map_types(f)?),
                bindings: bindings
                    .iter()
                    .map(|binding| binding.try_map_types(f))
                    .collect::<Result<_, _>>()?,
            },
            ExpressionTree::MethodCall {
                target,
                method,
                arguments,
            } => ExpressionTree::MethodCall {
                target: map_target(target, f)?,
                method: method.try_map_types(f)?,
                arguments: map_nodes(arguments, f)?,
            },
            ExpressionTree::NewArray {
                kind,
                element_type,
                expressions,
            } => ExpressionTree::NewArray {
                kind: *kind,
                element_type: f(element_type)?,
                expressions: map_nodes(expressions, f)?,
            },
            ExpressionTree::New {
                constructor,
                arguments,
            } => ExpressionTree::New {
                constructor: ConstructorRef {
                    declaring_type: f(&constructor.declaring_type)?,
                    parameter_types: constructor
                        .parameter_types
                        .iter()
                        .map(|t| f(t))
                        .collect::<Result<_, _>>()?,
                },
                arguments: map_nodes(arguments, f)?,
            },
            ExpressionTree::Parameter {
                name,
                parameter_type,
            } => ExpressionTree::Parameter {
                name: name.clone(),
                parameter_type: f(parameter_type)?,
            },
            ExpressionTree::TypeBinary {
                operand,
                type_operand,
            } => ExpressionTree::TypeBinary {
                operand: Box::new(operand.try_map_types(f)?),
                type_operand: f(type_operand)?,
            },
            ExpressionTree::Unary {
                operator,
                operand,
                result_type,
            } => ExpressionTree::Unary {
                operator: *operator,
                operand: Box::new(operand.try_map_types(f)?),
                result_type: f(result_type)?,
            },
        })
    }

    /// Infallible form of [`try_map_types`](Self::try_map_types).
    pub fn map_types<U>(&self, mut f: impl FnMut(&T) -> U) -> ExpressionTree<U> {
        let mapped: Result<_, Infallible> = self.try_map_types(&mut |t| Ok(f(t)));
        match mapped {
            Ok(tree) => tree,
            Err(never) => match never {},
        }
    }
}

impl<T> ExpressionTree<T> {
    /// Visit every type reference in place, in the order
    /// [`try_map_types`](Self::try_map_types) converts them.
    pub fn for_each_type<F: FnMut(&T)>(&self, f: &mut F) {
        match self {
            ExpressionTree::Binary { left, right, .. } => {
                left.for_each_type(f);
                right.for_each_type(f);
            }
            ExpressionTree::Conditional {
                test,
                if_true,
                if_false,
                result_type,
            } => {
                test.for_each_type(f);
                if_true.for_each_type(f);
                if_false.for_each_type(f);
                f(result_type);
            }
            ExpressionTree::Constant { value_type, .. } => f(value_type),
            ExpressionTree::Invocation { target, arguments } => {
                target.for_each_type(f);
                each_node(arguments, f);
            }
            ExpressionTree::Lambda { parameters, body } => {
                each_node(parameters, f);
                body.for_each_type(f);
            }
            ExpressionTree::ListInit {
                new_expression,
                initializers,
            } => {
                new_expression.for_each_type(f);
                for init in initializers {
                    init.for_each_type(f);
                }
            }
            ExpressionTree::Member { target, member } => {
                if let Some(target) = target {
                    target.for_each_type(f);
                }
                f(&member.declaring_type);
            }
            ExpressionTree::MemberInit {
                new_expression,
                bindings,
            } => {
                new_expression.for_each_type(f);
                for binding in bindings {
                    binding.for_each_type(f);
                }
            }
            ExpressionTree::MethodCall {
                target,
                method,
                arguments,
            } => {
                if let Some(target) = target {
                    target.for_each_type(f);
                }
                method.for_each_type(f);
                each_node(arguments, f);
            }
            ExpressionTree::NewArray {
                element_type,
                expressions,
                ..
            } => {
                f(element_type);
                each_node(expressions, f);
            }
            ExpressionTree::New {
                constructor,
                arguments,
            } => {
                f(&constructor.declaring_type);
                constructor.parameter_types.iter().for_each(|t| f(t));
                each_node(arguments, f);
            }
            ExpressionTree::Parameter { parameter_type, .. } => f(parameter_type),
            ExpressionTree::TypeBinary {
                operand,
                type_operand,
            } => {
                operand.for_each_type(f);
                f(type_operand);
            }
            ExpressionTree::Unary {
                operand,
                result_type,
                ..
            } => {
                operand.for_each_type(f);
                f(result_type);
            }
        }
    }
}

fn each_node<T, F: FnMut(&T)>(nodes: &[ExpressionTree<T>], f: &mut F) {
    for node in nodes {
        node.for_each_type(f);
    }
}

fn map_nodes<T, U, E, F>(
    nodes: &[ExpressionTree<T>],
    f: &mut F,
) -> Result<Vec<ExpressionTree<U>>, E>
where
    F: FnMut(&T) -> Result<U, E>,
{
    nodes.iter().map(|node| node.try_map_types(f)).collect()
}

fn map_target<T, U, E, F>(
    target: &Option<Box<ExpressionTree<T>>>,
    f: &mut F,
) -> Result<Option<Box<ExpressionTree<U>>>, E>
where
    F: FnMut(&T) -> Result<U, E>,
{
    match target {
        Some(target) => Ok(Some(Box::new(target.try_map_types(f)?))),
        None => Ok(None),
    }
}

impl<T> MemberRef<T> {
    fn try_map_types<U, E, F>(&self, f: &mut F) -> Result<MemberRef<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(MemberRef {
            declaring_type: f(&self.declaring_type)?,
            name: self.name.clone(),
        })
    }
}

impl<T> MethodRef<T> {
    fn try_map_types<U, E, F>(&self, f: &mut F) -> Result<MethodRef<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(MethodRef {
            declaring_type: f(&self.declaring_type)?,
            name: self.name.clone(),
            parameter_types: self
                .parameter_types
                .iter()
                .map(|t| f(t))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl<T> MethodRef<T> {
    fn for_each_type<F: FnMut(&T)>(&self, f: &mut F) {
        f(&self.declaring_type);
        self.parameter_types.iter().for_each(|t| f(t));
    }
}

impl<T> ElementInit<T> {
    fn for_each_type<F: FnMut(&T)>(&self, f: &mut F) {
        self.add_method.for_each_type(f);
        each_node(&self.arguments, f);
    }

    fn try_map_types<U, E, F>(&self, f: &mut F) -> Result<ElementInit<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(ElementInit {
            add_method: self.add_method.try_map_types(f)?,
            arguments: map_nodes(&self.arguments, f)?,
        })
    }
}

impl<T> MemberBinding<T> {
    fn for_each_type<F: FnMut(&T)>(&self, f: &mut F) {
        f(&self.member().declaring_type);
        match self {
            MemberBinding::Assignment { expression, .. } => expression.for_each_type(f),
            MemberBinding::MemberMember { bindings, .. } => {
                for binding in bindings {
                    binding.for_each_type(f);
                }
            }
            MemberBinding::List { initializers, .. } => {
                for init in initializers {
                    init.for_each_type(f);
                }
            }
        }
    }

    fn try_map_types<U, E, F>(&self, f: &mut F) -> Result<MemberBinding<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(match self {
            MemberBinding::Assignment { member, expression } => MemberBinding::Assignment {
                member: member.try_map_types(f)?,
                expression: expression.try_map_types(f)?,
            },
            MemberBinding::MemberMember { member, bindings } => MemberBinding::MemberMember {
                member: member.try_map_types(f)?,
                bindings: bindings
                    .iter()
                    .map(|binding| binding.try_map_types(f))
                    .collect::<Result<_, _>>()?,
            },
            MemberBinding::List {
                member,
                initializers,
            } => MemberBinding::List {
                member: member.try_map_types(f)?,
                initializers: initializers
                    .iter()
                    .map(|init| init.try_map_types(f))
                    .collect::<Result<_, _>>()?,
            },
        })
    }
}

// ---- rendering ----

struct CommaSeparated<'a, I>(&'a [I]);

impl<I: fmt::Display> fmt::Display for CommaSeparated<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl<T: TypeReference> fmt::Display for ElementInit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.len() == 1 {
            write!(f, "{}", self.arguments[0])
        } else {
            write!(f, "{{{}}}", CommaSeparated(&self.arguments))
        }
    }
}

impl<T: TypeReference> fmt::Display for MemberBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberBinding::Assignment { member, expression } => {
                write!(f, "{} = {}", member.name, expression)
            }
            MemberBinding::MemberMember { member, bindings } => {
                write!(f, "{} = {{{}}}", member.name, CommaSeparated(bindings))
            }
            MemberBinding::List {
                member,
                initializers,
            } => write!(f, "{} = {{{}}}", member.name, CommaSeparated(initializers)),
        }
    }
}

impl<T: TypeReference> fmt::Display for ExpressionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionTree::Binary {
                operator: BinaryOperator::ArrayIndex,
                left,
                right,
            } => write!(f, "{}[{}]", left, right),
            ExpressionTree::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator.symbol(), right),
            ExpressionTree::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => write!(f, "IIF({}, {}, {})", test, if_true, if_false),
            ExpressionTree::Constant { value, .. } => write!(f, "{}", value),
            ExpressionTree::Invocation { target, arguments } => {
                write!(f, "Invoke({}", target)?;
                for argument in arguments {
                    write!(f, ", {}", argument)?;
                }
                f.write_str(")")
            }
            ExpressionTree::Lambda { parameters, body } => {
                if parameters.len() == 1 {
                    write!(f, "{} => {}", parameters[0], body)
                } else {
                    write!(f, "({}) => {}", CommaSeparated(parameters), body)
                }
            }
            ExpressionTree::ListInit {
                new_expression,
                initializers,
            } => write!(f, "{} {{{}}}", new_expression, CommaSeparated(initializers)),
            ExpressionTree::Member { target, member } => match target {
                Some(target) => write!(f, "{}.{}", target, member.name),
                None => write!(f, "{}.{}", member.declaring_type.type_name(), member.name),
            },
            ExpressionTree::MemberInit {
                new_expression,
                bindings,
            } => write!(f, "{} {{{}}}", new_expression, CommaSeparated(bindings)),
            ExpressionTree::MethodCall {
                target,
                method,
                arguments,
            } => {
                match target {
                    Some(target) => write!(f, "{}", target)?,
                    None => f.write_str(&method.declaring_type.type_name())?,
                }
                write!(f, ".{}({})", method.name, CommaSeparated(arguments))
            }
            ExpressionTree::NewArray {
                kind: NewArrayKind::Init,
                element_type,
                expressions,
            } => write!(
                f,
                "new {}[] {{{}}}",
                element_type.type_name(),
                CommaSeparated(expressions)
            ),
            ExpressionTree::NewArray {
                kind: NewArrayKind::Bounds,
                element_type,
                expressions,
            } => write!(
                f,
                "new {}[{}]",
                element_type.type_name(),
                CommaSeparated(expressions)
            ),
            ExpressionTree::New {
                constructor,
                arguments,
            } => write!(
                f,
                "new {}({})",
                constructor.declaring_type.type_name(),
                CommaSeparated(arguments)
            ),
            ExpressionTree::Parameter { name, .. } => f.write_str(name),
            ExpressionTree::TypeBinary {
                operand,
                type_operand,
            } => write!(f, "({} is {})", operand, type_operand.type_name()),
            ExpressionTree::Unary {
                operator,
                operand,
                result_type,
            } => match operator {
                UnaryOperator::Negate => write!(f, "-{}", operand),
                UnaryOperator::Not => write!(f, "Not({})", operand),
                UnaryOperator::Convert => {
                    write!(f, "Convert({}, {})", operand, result_type.type_name())
                }
                UnaryOperator::ArrayLength => write!(f, "ArrayLength({})", operand),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Tree = ExpressionTree<&'static str>;

    fn member(name: &str) -> MemberRef<&'static str> {
        MemberRef {
            declaring_type: "Acme.Order",
            name: name.to_string(),
        }
    }

    /// `new Order() { Total = (1 + 2), Lines = { Add("a") } }`
    fn order_initializer() -> Tree {
        Tree::MemberInit {
            new_expression: Box::new(Tree::New {
                constructor: ConstructorRef {
                    declaring_type: "Acme.Order",
                    parameter_types: vec!["System.Int32"],
                },
                arguments: vec![Tree::constant(7, "System.Int32")],
            }),
            bindings: vec![
                MemberBinding::Assignment {
                    member: member("Total"),
                    expression: Tree::binary(
                        BinaryOperator::Add,
                        Tree::constant(1, "System.Int64"),
                        Tree::constant(2, "System.Int64"),
                    ),
                },
                MemberBinding::List {
                    member: member("Lines"),
                    initializers: vec![ElementInit {
                        add_method: MethodRef {
                            declaring_type: "Acme.Lines",
                            name: "Add".into(),
                            parameter_types: vec!["System.String"],
                        },
                        arguments: vec![Tree::constant("a", "System.String")],
                    }],
                },
            ],
        }
    }

    #[test]
    fn for_each_type_follows_mapping_order() {
        let tree = order_initializer();

        let mut visited = Vec::new();
        tree.for_each_type(&mut |t: &&'static str| visited.push(*t));

        let mut mapped = Vec::new();
        let _ = tree.map_types(|t| mapped.push(*t));

        assert_eq!(visited, mapped);
        assert_eq!(
            visited,
            vec![
                "Acme.Order",
                "System.Int32",
                "System.Int32",
                "Acme.Order",
                "System.Int64",
                "System.Int64",
                "Acme.Order",
                "Acme.Lines",
                "System.String",
                "System.String",
            ]
        );
    }
}
