// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion between in-process expressions and their descriptions.

use super::error::ExpressionError;
use super::tree::{ExpressionTree, MemberBinding};
use super::visitor::visit_all_nodes;
use crate::model::{ModelObject, SelfValidating, SelfValidationFailure};
use crate::types::{TypeDescriptor, TypeHandle, TypeResolver};

/// Expression over resolved in-process types.
pub type Expression = ExpressionTree<TypeHandle>;

/// Serializable expression whose types are [`TypeDescriptor`]s.
pub type ExpressionDescription = ExpressionTree<TypeDescriptor>;

impl ExpressionTree<TypeHandle> {
    /// Describe every type reference, yielding a serializable tree.
    pub fn describe(&self) -> ExpressionDescription {
        self.map_types(TypeHandle::describe)
    }
}

impl ExpressionTree<TypeDescriptor> {
    pub fn from_expression(expression: &Expression) -> Self {
        expression.describe()
    }

    /// Resolve every descriptor with the resolver's default strategies.
    pub fn to_expression(&self, resolver: &TypeResolver) -> Result<Expression, ExpressionError> {
        let mut resolve = |descriptor: &TypeDescriptor| -> Result<TypeHandle, ExpressionError> {
            resolver
                .resolve_default(descriptor)?
                .ok_or_else(|| ExpressionError::UnresolvedType {
                    descriptor: descriptor.to_string(),
                })
        };
        self.try_map_types(&mut resolve)
    }
}

impl SelfValidating for ExpressionTree<TypeDescriptor> {
    fn validate(&self) -> Vec<SelfValidationFailure> {
        let mut failures = Vec::new();

        let mut index = 0usize;
        self.for_each_type(&mut |descriptor: &TypeDescriptor| {
            for failure in descriptor.validate() {
                failures.push(SelfValidationFailure::new(
                    format!("types[{}].{}", index, failure.property_name),
                    failure.message,
                ));
            }
            index += 1;
        });

        for node in visit_all_nodes(self) {
            match node {
                ExpressionTree::Parameter { name, .. } => {
                    check_name("parameter", name, &mut failures);
                }
                ExpressionTree::Member { member, .. } => {
                    check_name("member", &member.name, &mut failures);
                }
                ExpressionTree::MethodCall { method, .. } => {
                    check_name("method", &method.name, &mut failures);
                }
                ExpressionTree::MemberInit { bindings, .. } => {
                    for binding in bindings {
                        check_binding(binding, &mut failures);
                    }
                }
                ExpressionTree::ListInit { initializers, .. } => {
                    for init in initializers {
                        check_name("method", &init.add_method.name, &mut failures);
                    }
                }
                _ => {}
            }
        }

        failures
    }
}

impl ModelObject for ExpressionTree<TypeDescriptor> {}

fn check_name(property: &str, name: &str, failures: &mut Vec<SelfValidationFailure>) {
    if name.trim().is_empty() {
        failures.push(SelfValidationFailure::new(property, "name must not be blank"));
    }
}

fn check_binding(
    binding: &MemberBinding<TypeDescriptor>,
    failures: &mut Vec<SelfValidationFailure>,
) {
    check_name("member", &binding.member().name, failures);
    match binding {
        MemberBinding::Assignment { .. } => {}
        MemberBinding::MemberMember { bindings, .. } => {
            for nested in bindings {
                check_binding(nested, failures);
            }
        }
        MemberBinding::List { initializers, .. } => {
            for init in initializers {
                check_name("method", &init.add_method.name, failures);
            }
        }
    }
}
