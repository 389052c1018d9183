// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural traversal of expression trees.
//!
//! Child enumeration is an exhaustive `match`, so a new node kind cannot be
//! added without deciding which of its fields are children.

use super::tree::{ExpressionTree, MemberBinding};

/// A node with ordered child nodes of the same type.
pub trait ExpressionNode: Sized {
    /// Direct children, left to right.
    fn connected_nodes(&self) -> Vec<&Self>;
}

/// Direct children of `node`, in field order.
pub fn visit_all_connected_nodes<N: ExpressionNode>(node: &N) -> Vec<&N> {
    node.connected_nodes()
}

/// Every node reachable from `node`, children before parents, `node` last.
pub fn visit_all_nodes<N: ExpressionNode>(node: &N) -> Vec<&N> {
    let mut visited = Vec::new();
    let mut stack = vec![(node, false)];

    while let Some((current, expanded)) = stack.pop() {
        if expanded {
            visited.push(current);
            continue;
        }
        stack.push((current, true));
        for child in current.connected_nodes().into_iter().rev() {
            stack.push((child, false));
        }
    }

    visited
}

impl<T> ExpressionNode for ExpressionTree<T> {
    fn connected_nodes(&self) -> Vec<&Self> {
        let mut nodes = Vec::new();
        match self {
            ExpressionTree::Binary { left, right, .. } => {
                nodes.push(&**left);
                nodes.push(&**right);
            }
            ExpressionTree::Conditional {
                test,
                if_true,
                if_false,
                ..
            } => {
                nodes.push(&**test);
                nodes.push(&**if_true);
                nodes.push(&**if_false);
            }
            ExpressionTree::Constant { .. } | ExpressionTree::Parameter { .. } => {}
            ExpressionTree::Invocation { target, arguments } => {
                nodes.push(&**target);
                nodes.extend(arguments);
            }
            ExpressionTree::Lambda { parameters, body } => {
                nodes.extend(parameters);
                nodes.push(&**body);
            }
            ExpressionTree::ListInit {
                new_expression,
                initializers,
            } => {
                nodes.push(&**new_expression);
                for init in initializers {
                    nodes.extend(&init.arguments);
                }
            }
            ExpressionTree::Member { target, .. } => {
                nodes.extend(target.as_deref());
            }
            ExpressionTree::MemberInit {
                new_expression,
                bindings,
            } => {
                nodes.push(&**new_expression);
                for binding in bindings {
                    push_binding(binding, &mut nodes);
                }
            }
            ExpressionTree::MethodCall {
                target, arguments, ..
            } => {
                nodes.extend(target.as_deref());
                nodes.extend(arguments);
            }
            ExpressionTree::NewArray { expressions, .. } => {
                nodes.extend(expressions);
            }
            ExpressionTree::New { arguments, .. } => {
                nodes.extend(arguments);
            }
            ExpressionTree::TypeBinary { operand, .. } | ExpressionTree::Unary { operand, .. } => {
                nodes.push(&**operand);
            }
        }
        nodes
    }
}

fn push_binding<'a, T>(binding: &'a MemberBinding<T>, nodes: &mut Vec<&'a ExpressionTree<T>>) {
    match binding {
        MemberBinding::Assignment { expression, .. } => nodes.push(expression),
        MemberBinding::MemberMember { bindings, .. } => {
            for nested in bindings {
                push_binding(nested, nodes);
            }
        }
        MemberBinding::List { initializers, .. } => {
            for init in initializers {
                nodes.extend(&init.arguments);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{
        BinaryOperator, ConstructorRef, ElementInit, ExpressionKind, MemberRef, MethodRef,
    };

    type Tree = ExpressionTree<&'static str>;

    fn member(name: &str) -> MemberRef<&'static str> {
        MemberRef {
            declaring_type: "Acme.Order",
            name: name.to_string(),
        }
    }

    fn new_order() -> Tree {
        Tree::New {
            constructor: ConstructorRef {
                declaring_type: "Acme.Order",
                parameter_types: Vec::new(),
            },
            arguments: Vec::new(),
        }
    }

    fn position(nodes: &[&Tree], node: &Tree) -> usize {
        nodes
            .iter()
            .position(|candidate| std::ptr::eq(*candidate, node))
            .expect("node visited")
    }

    #[test]
    fn leaves_have_no_children() {
        let constant = Tree::constant(1, "Int64");
        assert!(visit_all_connected_nodes(&constant).is_empty());
        assert_eq!(visit_all_nodes(&constant).len(), 1);
    }

    #[test]
    fn post_order_over_lambda() {
        // x => ((x + 1) * 2)
        let body = Tree::binary(
            BinaryOperator::Multiply,
            Tree::binary(
                BinaryOperator::Add,
                Tree::parameter("x", "Int64"),
                Tree::constant(1, "Int64"),
            ),
            Tree::constant(2, "Int64"),
        );
        let lambda = Tree::lambda(vec![Tree::parameter("x", "Int64")], body).expect("lambda");

        let all = visit_all_nodes(&lambda);
        assert_eq!(all.len(), 7);
        let kinds: Vec<_> = all.iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ExpressionKind::Parameter,
                ExpressionKind::Parameter,
                ExpressionKind::Constant,
                ExpressionKind::Binary,
                ExpressionKind::Constant,
                ExpressionKind::Binary,
                ExpressionKind::Lambda,
            ]
        );
        for node in &all {
            let parent = position(&all, node);
            for child in node.connected_nodes() {
                assert!(position(&all, child) < parent);
            }
        }

        // Restartable: a second walk yields the same sequence.
        let again = visit_all_nodes(&lambda);
        assert!(all.iter().zip(&again).all(|(a, b)| std::ptr::eq(*a, *b)));
    }

    #[test]
    fn bindings_and_initializers_are_children() {
        let add = MethodRef {
            declaring_type: "Acme.Lines",
            name: "Add".to_string(),
            parameter_types: vec!["String"],
        };
        let tree = Tree::MemberInit {
            new_expression: Box::new(new_order()),
            bindings: vec![
                MemberBinding::Assignment {
                    member: member("Id"),
                    expression: Tree::constant(7, "Int64"),
                },
                MemberBinding::MemberMember {
                    member: member("Customer"),
                    bindings: vec![MemberBinding::Assignment {
                        member: member("Name"),
                        expression: Tree::constant("ada", "String"),
                    }],
                },
                MemberBinding::List {
                    member: member("Lines"),
                    initializers: vec![
                        ElementInit {
                            add_method: add.clone(),
                            arguments: vec![Tree::constant("a", "String")],
                        },
                        ElementInit {
                            add_method: add,
                            arguments: vec![Tree::constant("b", "String")],
                        },
                    ],
                },
            ],
        };

        let children = visit_all_connected_nodes(&tree);
        assert_eq!(children.len(), 5);
        assert_eq!(children[0].kind(), ExpressionKind::New);
        assert_eq!(visit_all_nodes(&tree).len(), 6);
    }

    #[test]
    fn static_member_has_no_children() {
        let tree = Tree::Member {
            target: None,
            member: member("Default"),
        };
        assert!(tree.connected_nodes().is_empty());

        let call = Tree::MethodCall {
            target: Some(Box::new(tree)),
            method: MethodRef {
                declaring_type: "Acme.Order",
                name: "Total".to_string(),
                parameter_types: Vec::new(),
            },
            arguments: vec![Tree::constant(true, "Boolean")],
        };
        assert_eq!(call.connected_nodes().len(), 2);
        assert_eq!(visit_all_nodes(&call).len(), 3);
    }
}
