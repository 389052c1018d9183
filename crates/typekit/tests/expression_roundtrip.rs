// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Expression description integration tests
//!
//! Describe, serialize, reconstruct and evaluate expressions against a
//! declared type universe.

use std::sync::Arc;

use typekit::expression::{
    visit_all_connected_nodes, visit_all_nodes, BinaryOperator, ConstructorRef, Expression,
    ExpressionDescription, ExpressionError, ExpressionKind, ExpressionTree, MemberBinding,
    MemberRef, Value,
};
use typekit::model::SelfValidating;
use typekit::types::{AssemblyName, AssemblyVersion, TypeDescriptor, TypeResolver, TypeUniverse};

fn universe() -> TypeUniverse {
    TypeUniverse::builder()
        .assembly(AssemblyName::unversioned("System"), |a| {
            a.add_rust_type::<i64>("System.Int64")
                .add_rust_type::<bool>("System.Boolean")
                .add_rust_type::<String>("System.String");
        })
        .assembly(
            AssemblyName::new("Acme.Widgets", Some(AssemblyVersion::new(1, 0, 0, 0))),
            |a| {
                a.add_type("Acme.Widgets.Widget");
            },
        )
        .build()
        .expect("universe")
}

fn json_round_trip(description: &ExpressionDescription) -> ExpressionDescription {
    let json = serde_json::to_string(description).expect("serialize");
    serde_json::from_str(&json).expect("deserialize")
}

/// `(x, y) => IIF((x > y), (x - y), (y - x))`
fn distance(universe: &TypeUniverse) -> Expression {
    let int = universe.handle_of::<i64>().expect("int");
    let x = || Expression::parameter("x", int.clone());
    let y = || Expression::parameter("y", int.clone());

    let body = Expression::conditional(
        Expression::binary(BinaryOperator::GreaterThan, x(), y()),
        Expression::binary(BinaryOperator::Subtract, x(), y()),
        Expression::binary(BinaryOperator::Subtract, y(), x()),
        int.clone(),
    );
    Expression::lambda(vec![x(), y()], body).expect("lambda")
}

#[test]
fn test_describe_serialize_and_evaluate() {
    let universe = universe();
    let expression = distance(&universe);

    let description = json_round_trip(&expression.describe());
    assert!(description.is_valid());

    let resolver = TypeResolver::new(Arc::new(universe));
    let rebuilt = description.to_expression(&resolver).expect("rebuild");
    assert_eq!(rebuilt.to_string(), "(x, y) => IIF((x > y), (x - y), (y - x))");
    assert_eq!(rebuilt.to_string(), expression.to_string());

    let compiled = rebuilt.compile().expect("compile");
    assert_eq!(compiled.arity(), 2);
    assert_eq!(
        compiled.invoke(&[Value::Int(3), Value::Int(10)]).expect("invoke"),
        Value::Int(7)
    );
    assert_eq!(
        compiled.invoke(&[Value::Int(10), Value::Int(3)]).expect("invoke"),
        Value::Int(7)
    );
    assert!(matches!(
        compiled.invoke(&[Value::Int(1)]),
        Err(ExpressionError::Evaluation(_))
    ));
}

#[test]
fn test_every_type_reference_is_described() {
    let universe = universe();
    let description = distance(&universe).describe();

    let mut names = Vec::new();
    let _ = description.map_types(|descriptor: &TypeDescriptor| {
        names.push(descriptor.display_name());
    });
    assert!(!names.is_empty());
    assert!(names.iter().all(|name| name == "System.Int64"), "{:?}", names);
}

/// `new Widget() { Size = (1 + 2) }`
fn widget_initializer(universe: &TypeUniverse) -> Expression {
    let int = universe.handle_of::<i64>().expect("int");
    let widget = universe.find("Acme.Widgets.Widget").expect("widget");

    ExpressionTree::MemberInit {
        new_expression: Box::new(ExpressionTree::New {
            constructor: ConstructorRef {
                declaring_type: widget.clone(),
                parameter_types: Vec::new(),
            },
            arguments: Vec::new(),
        }),
        bindings: vec![MemberBinding::Assignment {
            member: MemberRef {
                declaring_type: widget,
                name: "Size".into(),
            },
            expression: Expression::binary(
                BinaryOperator::Add,
                Expression::constant(1, int.clone()),
                Expression::constant(2, int),
            ),
        }],
    }
}

#[test]
fn test_visitor_reaches_binding_expressions() {
    let universe = universe();
    let tree = widget_initializer(&universe);

    let children: Vec<ExpressionKind> = visit_all_connected_nodes(&tree)
        .into_iter()
        .map(Expression::kind)
        .collect();
    assert_eq!(children, vec![ExpressionKind::New, ExpressionKind::Binary]);

    let all = visit_all_nodes(&tree);
    assert_eq!(all.len(), 5);
    assert_eq!(all.last().map(|node| node.kind()), Some(ExpressionKind::MemberInit));
    let constants = all
        .iter()
        .filter(|node| node.kind() == ExpressionKind::Constant)
        .count();
    assert_eq!(constants, 2);
}

#[test]
fn test_host_bound_nodes_survive_round_trip_but_do_not_compile() {
    let universe = universe();
    let lambda =
        Expression::lambda(Vec::new(), widget_initializer(&universe)).expect("lambda");

    let description = json_round_trip(&lambda.describe());
    let resolver = TypeResolver::new(Arc::new(universe));
    let rebuilt = description.to_expression(&resolver).expect("rebuild");

    assert_eq!(visit_all_nodes(&rebuilt).len(), 6);
    assert!(matches!(
        rebuilt.compile(),
        Err(ExpressionError::Unsupported { .. })
    ));
}

#[test]
fn test_unknown_type_fails_reconstruction() {
    let universe = universe();
    let foreign = TypeDescriptor::new(
        Some("Elsewhere"),
        "Thing",
        Some("Elsewhere.Thing, Elsewhere, Version=1.0.0.0"),
    );
    let description = ExpressionDescription::parameter("thing", foreign);

    let resolver = TypeResolver::new(Arc::new(universe));
    let err = description.to_expression(&resolver).unwrap_err();
    assert!(matches!(err, ExpressionError::UnresolvedType { .. }));
    assert!(err.to_string().contains("Thing"), "{}", err);
}

#[test]
fn test_blank_names_fail_validation() {
    let universe = universe();
    let int = universe.handle_of::<i64>().expect("int");
    let description = Expression::parameter(" ", int).describe();

    let err = description.ensure_valid().unwrap_err();
    assert!(err.to_string().contains("ExpressionTree"), "{}", err);
    assert!(!description.is_valid());
}
