// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Evaluation of lambdas over [`Value`]s.
//!
//! Nodes that need a host object model (members, methods, constructors and
//! initializers) are rejected when compiling.

use std::any::TypeId;
use std::cmp::Ordering;

use super::description::Expression;
use super::error::ExpressionError;
use super::tree::{BinaryOperator, ExpressionKind, ExpressionTree, NewArrayKind, UnaryOperator};
use super::value::Value;
use super::visitor::visit_all_nodes;
use crate::types::TypeHandle;

/// A lambda ready to be invoked.
#[derive(Debug, Clone)]
pub struct CompiledLambda {
    parameters: Vec<String>,
    body: Expression,
}

impl ExpressionTree<TypeHandle> {
    /// Compile a `Lambda` node.
    pub fn compile(&self) -> Result<CompiledLambda, ExpressionError> {
        let ExpressionTree::Lambda { body, .. } = self else {
            return Err(ExpressionError::Invalid(format!(
                "only lambdas can be compiled, found {}",
                self.kind()
            )));
        };

        for node in visit_all_nodes(self) {
            match node.kind() {
                kind @ (ExpressionKind::Member
                | ExpressionKind::MemberInit
                | ExpressionKind::MethodCall
                | ExpressionKind::New
                | ExpressionKind::ListInit) => return Err(ExpressionError::Unsupported { kind }),
                _ => {}
            }
        }

        Ok(CompiledLambda {
            parameters: self.parameter_names().into_iter().map(String::from).collect(),
            body: (**body).clone(),
        })
    }
}

impl CompiledLambda {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameters
    }

    pub fn invoke(&self, arguments: &[Value]) -> Result<Value, ExpressionError> {
        if arguments.len() != self.parameters.len() {
            return Err(ExpressionError::Evaluation(format!(
                "expected {} argument(s), got {}",
                self.parameters.len(),
                arguments.len()
            )));
        }

        let mut scope: Vec<(&str, Value)> = self
            .parameters
            .iter()
            .map(String::as_str)
            .zip(arguments.iter().cloned())
            .collect();
        evaluate(&self.body, &mut scope)
    }
}

type Scope<'a> = Vec<(&'a str, Value)>;

fn evaluate<'a>(node: &'a Expression, scope: &mut Scope<'a>) -> Result<Value, ExpressionError> {
    match node {
        ExpressionTree::Constant { value, .. } => Ok(value.clone()),
        ExpressionTree::Parameter { name, .. } => scope
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name.as_str())
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ExpressionError::Evaluation(format!("unbound parameter '{}'", name))),
        ExpressionTree::Binary {
            operator,
            left,
            right,
        } => match operator {
            BinaryOperator::AndAlso => {
                if !as_bool(evaluate(left, scope)?, "&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(as_bool(evaluate(right, scope)?, "&&")?))
            }
            BinaryOperator::OrElse => {
                if as_bool(evaluate(left, scope)?, "||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(as_bool(evaluate(right, scope)?, "||")?))
            }
            BinaryOperator::Coalesce => {
                let value = evaluate(left, scope)?;
                if value.is_null() {
                    evaluate(right, scope)
                } else {
                    Ok(value)
                }
            }
            _ => {
                let left = evaluate(left, scope)?;
                let right = evaluate(right, scope)?;
                apply_binary(*operator, left, right)
            }
        },
        ExpressionTree::Conditional {
            test,
            if_true,
            if_false,
            ..
        } => {
            if as_bool(evaluate(test, scope)?, "conditional")? {
                evaluate(if_true, scope)
            } else {
                evaluate(if_false, scope)
            }
        }
        ExpressionTree::Unary {
            operator,
            operand,
            result_type,
        } => apply_unary(*operator, evaluate(operand, scope)?, result_type),
        ExpressionTree::Invocation { target, arguments } => {
            let ExpressionTree::Lambda { parameters, body } = &**target else {
                return Err(ExpressionError::Unsupported {
                    kind: ExpressionKind::Invocation,
                });
            };
            if parameters.len() != arguments.len() {
                return Err(ExpressionError::Evaluation(format!(
                    "invocation expected {} argument(s), got {}",
                    parameters.len(),
                    arguments.len()
                )));
            }

            let mut bound = Vec::with_capacity(arguments.len());
            for argument in arguments {
                bound.push(evaluate(argument, scope)?);
            }
            let depth = scope.len();
            scope.extend(target.parameter_names().into_iter().zip(bound));
            let result = evaluate(body, scope);
            scope.truncate(depth);
            result
        }
        ExpressionTree::Lambda { .. } => Err(ExpressionError::Evaluation(
            "nested lambdas can only be invoked directly".into(),
        )),
        ExpressionTree::NewArray {
            kind: NewArrayKind::Init,
            expressions,
            ..
        } => expressions
            .iter()
            .map(|expression| evaluate(expression, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ExpressionTree::NewArray {
            kind: NewArrayKind::Bounds,
            expressions,
            ..
        } => {
            let [bound] = expressions.as_slice() else {
                return Err(ExpressionError::Evaluation(
                    "only one-dimensional arrays can be allocated".into(),
                ));
            };
            match evaluate(bound, scope)? {
                Value::Int(length) => allocate_array(length).map(Value::Array),
                other => Err(ExpressionError::Evaluation(format!(
                    "invalid array length {}",
                    other
                ))),
            }
        }
        ExpressionTree::TypeBinary {
            operand,
            type_operand,
        } => {
            let value = evaluate(operand, scope)?;
            Ok(Value::Bool(is_instance_of(&value, type_operand)))
        }
        ExpressionTree::ListInit { .. }
        | ExpressionTree::Member { .. }
        | ExpressionTree::MemberInit { .. }
        | ExpressionTree::MethodCall { .. }
        | ExpressionTree::New { .. } => Err(ExpressionError::Unsupported { kind: node.kind() }),
    }
}

fn as_bool(value: Value, context: &str) -> Result<bool, ExpressionError> {
    value.as_bool().ok_or_else(|| {
        ExpressionError::Evaluation(format!("{} expects bool, found {}", context, value.kind()))
    })
}

fn is_instance_of(value: &Value, ty: &TypeHandle) -> bool {
    match value {
        Value::Null => false,
        Value::Array(_) => ty.is_array(),
        _ => value.rust_type_id().is_some() && value.rust_type_id() == ty.rust_type_id(),
    }
}

fn apply_binary(
    operator: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, ExpressionError> {
    let mismatch = |left: &Value, right: &Value| {
        ExpressionError::Evaluation(format!(
            "cannot apply '{}' to {} and {}",
            operator.symbol(),
            left.kind(),
            right.kind()
        ))
    };

    match operator {
        BinaryOperator::Add
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) =>
        {
            Ok(Value::String(format!("{}{}", text(&left), text(&right))))
        }
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo => arithmetic(operator, &left, &right)
            .ok_or_else(|| mismatch(&left, &right))?,
        BinaryOperator::Equal => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOperator::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => {
            let ordering = compare(&left, &right).ok_or_else(|| mismatch(&left, &right))?;
            Ok(Value::Bool(match (operator, ordering) {
                (_, None) => false,
                (BinaryOperator::LessThan, Some(o)) => o == Ordering::Less,
                (BinaryOperator::LessThanOrEqual, Some(o)) => o != Ordering::Greater,
                (BinaryOperator::GreaterThan, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            }))
        }
        BinaryOperator::AndAlso | BinaryOperator::OrElse => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match operator {
                BinaryOperator::AndAlso => *a && *b,
                _ => *a || *b,
            })),
            _ => Err(mismatch(&left, &right)),
        },
        BinaryOperator::Coalesce => Ok(if left.is_null() { right } else { left }),
        BinaryOperator::ArrayIndex => match (&left, &right) {
            (Value::Array(items), Value::Int(index)) => usize::try_from(*index)
                .ok()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or_else(|| {
                    ExpressionError::Evaluation(format!(
                        "index {} out of range for array of length {}",
                        index,
                        items.len()
                    ))
                }),
            _ => Err(mismatch(&left, &right)),
        },
    }
}

/// `None` when the operands are not numeric; `Some(Err)` on overflow.
fn arithmetic(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Option<Result<Value, ExpressionError>> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match operator {
                BinaryOperator::Add => a.checked_add(*b),
                BinaryOperator::Subtract => a.checked_sub(*b),
                BinaryOperator::Multiply => a.checked_mul(*b),
                BinaryOperator::Divide => a.checked_div(*b),
                _ => a.checked_rem(*b),
            };
            Some(result.map(Value::Int).ok_or_else(|| {
                ExpressionError::Evaluation(format!(
                    "integer overflow or division by zero in {} {} {}",
                    a,
                    operator.symbol(),
                    b
                ))
            }))
        }
        _ => {
            let (a, b) = (left.as_float()?, right.as_float()?);
            Some(Ok(Value::Float(match operator {
                BinaryOperator::Add => a + b,
                BinaryOperator::Subtract => a - b,
                BinaryOperator::Multiply => a * b,
                BinaryOperator::Divide => a / b,
                _ => a % b,
            })))
        }
    }
}

/// `None` for incomparable kinds; `Some(None)` for unordered floats.
fn compare(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(Some(a.cmp(b))),
        (Value::String(a), Value::String(b)) => Some(Some(a.cmp(b))),
        (Value::Bool(a), Value::Bool(b)) => Some(Some(a.cmp(b))),
        _ => Some(left.as_float()?.partial_cmp(&right.as_float()?)),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
            left.as_float() == right.as_float()
        }
        _ => left == right,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn apply_unary(
    operator: UnaryOperator,
    operand: Value,
    result_type: &TypeHandle,
) -> Result<Value, ExpressionError> {
    let invalid = |operand: &Value| {
        ExpressionError::Evaluation(format!("cannot apply {:?} to {}", operator, operand.kind()))
    };

    match operator {
        UnaryOperator::Negate => match operand {
            Value::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| ExpressionError::Evaluation(format!("cannot negate {}", i))),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(invalid(&other)),
        },
        UnaryOperator::Not => match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Int(i) => Ok(Value::Int(!i)),
            other => Err(invalid(&other)),
        },
        UnaryOperator::ArrayLength => match operand {
            Value::Array(items) => Ok(Value::Int(items.len() as i64)),
            other => Err(invalid(&other)),
        },
        UnaryOperator::Convert => convert(operand, result_type),
    }
}

fn convert(value: Value, target: &TypeHandle) -> Result<Value, ExpressionError> {
    let Some(target_id) = target.rust_type_id() else {
        return Err(ExpressionError::Evaluation(format!(
            "no conversion to {}",
            target.readable_name()
        )));
    };
    if value.is_null() || value.rust_type_id() == Some(target_id) {
        return Ok(value);
    }

    let converted = if target_id == TypeId::of::<f64>() {
        value.as_float().map(Value::Float)
    } else if target_id == TypeId::of::<i64>() {
        match value {
            Value::Float(x) if x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64 => {
                Some(Value::Int(x.trunc() as i64))
            }
            Value::Bool(b) => Some(Value::Int(i64::from(b))),
            _ => None,
        }
    } else if target_id == TypeId::of::<String>() {
        Some(Value::String(text(&value)))
    } else {
        None
    };

    converted.ok_or_else(|| {
        ExpressionError::Evaluation(format!(
            "cannot convert {} to {}",
            value.kind(),
            target.readable_name()
        ))
    })
}

/// `length` null slots; fails instead of aborting when the length is
/// negative or cannot be allocated.
fn allocate_array(length: i64) -> Result<Vec<Value>, ExpressionError> {
    let invalid = || ExpressionError::Evaluation(format!("invalid array length {}", length));
    let length = usize::try_from(length).map_err(|_| invalid())?;
    let mut values = Vec::new();
    values.try_reserve_exact(length).map_err(|_| invalid())?;
    values.resize(length, Value::Null);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::MemberRef;
    use crate::types::{AssemblyName, TypeUniverse};

    struct Primitives {
        int: TypeHandle,
        float: TypeHandle,
        boolean: TypeHandle,
        string: TypeHandle,
    }

    fn primitives() -> Primitives {
        let universe = TypeUniverse::builder()
            .assembly(AssemblyName::unversioned("System"), |a| {
                a.add_rust_type::<i64>("System.Int64")
                    .add_rust_type::<f64>("System.Double")
                    .add_rust_type::<bool>("System.Boolean")
                    .add_rust_type::<String>("System.String");
            })
            .build()
            .expect("universe");
        let handle = |name: &str| universe.find(name).expect("declared");
        Primitives {
            int: handle("System.Int64"),
            float: handle("System.Double"),
            boolean: handle("System.Boolean"),
            string: handle("System.String"),
        }
    }

    #[test]
    fn arithmetic_lambda() {
        let p = primitives();
        // (x, y) => ((x * 2) + y)
        let lambda = Expression::lambda(
            vec![
                Expression::parameter("x", p.int.clone()),
                Expression::parameter("y", p.int.clone()),
            ],
            Expression::binary(
                BinaryOperator::Add,
                Expression::binary(
                    BinaryOperator::Multiply,
                    Expression::parameter("x", p.int.clone()),
                    Expression::constant(2, p.int.clone()),
                ),
                Expression::parameter("y", p.int.clone()),
            ),
        )
        .expect("lambda");
        assert_eq!(lambda.to_string(), "(x, y) => ((x * 2) + y)");

        let compiled = lambda.compile().expect("compile");
        assert_eq!(compiled.arity(), 2);
        assert_eq!(
            compiled.invoke(&[Value::Int(20), Value::Int(2)]).expect("invoke"),
            Value::Int(42)
        );
        assert_eq!(
            compiled.invoke(&[Value::Float(1.5), Value::Int(1)]).expect("invoke"),
            Value::Float(4.0)
        );
        assert!(compiled.invoke(&[Value::Int(1)]).is_err());
        assert!(compiled
            .invoke(&[Value::Int(i64::MAX), Value::Int(0)])
            .is_err());
    }

    #[test]
    fn short_circuit_and_conditional() {
        let p = primitives();
        // s => IIF(((s ?? "") == ""), "empty", ("hi " + s))
        let s = || Expression::parameter("s", p.string.clone());
        let lambda = Expression::lambda(
            vec![s()],
            Expression::conditional(
                Expression::binary(
                    BinaryOperator::Equal,
                    Expression::binary(
                        BinaryOperator::Coalesce,
                        s(),
                        Expression::constant("", p.string.clone()),
                    ),
                    Expression::constant("", p.string.clone()),
                ),
                Expression::constant("empty", p.string.clone()),
                Expression::binary(
                    BinaryOperator::Add,
                    Expression::constant("hi ", p.string.clone()),
                    s(),
                ),
                p.string.clone(),
            ),
        )
        .expect("lambda");
        let compiled = lambda.compile().expect("compile");
        assert_eq!(compiled.invoke(&[Value::Null]).expect("null"), Value::from("empty"));
        assert_eq!(compiled.invoke(&["ada".into()]).expect("ada"), Value::from("hi ada"));

        // false && <unbound> never evaluates the right side.
        let guarded = Expression::lambda(
            Vec::new(),
            Expression::binary(
                BinaryOperator::AndAlso,
                Expression::constant(false, p.boolean.clone()),
                Expression::parameter("missing", p.boolean.clone()),
            ),
        )
        .expect("lambda");
        assert_eq!(
            guarded.compile().expect("compile").invoke(&[]).expect("invoke"),
            Value::Bool(false)
        );
    }

    #[test]
    fn arrays_type_tests_and_invocation() {
        let p = primitives();
        let ints = p.int.array_of();
        // () => Invoke(a => ArrayLength(a), new Int64[] {1, 2, 3})
        let inner = Expression::lambda(
            vec![Expression::parameter("a", ints.clone())],
            Expression::unary(
                UnaryOperator::ArrayLength,
                Expression::parameter("a", ints.clone()),
                p.int.clone(),
            ),
        )
        .expect("inner");
        let outer = Expression::lambda(
            Vec::new(),
            Expression::invoke(
                inner,
                vec![Expression::new_array(
                    p.int.clone(),
                    vec![
                        Expression::constant(1, p.int.clone()),
                        Expression::constant(2, p.int.clone()),
                        Expression::constant(3, p.int.clone()),
                    ],
                )],
            ),
        )
        .expect("outer");
        assert_eq!(
            outer.compile().expect("compile").invoke(&[]).expect("invoke"),
            Value::Int(3)
        );

        // v => (v is Double)
        let is_double = Expression::lambda(
            vec![Expression::parameter("v", p.float.clone())],
            Expression::type_is(Expression::parameter("v", p.float.clone()), p.float.clone()),
        )
        .expect("lambda")
        .compile()
        .expect("compile");
        assert_eq!(is_double.invoke(&[Value::Float(1.0)]).expect("f"), Value::Bool(true));
        assert_eq!(is_double.invoke(&[Value::Int(1)]).expect("i"), Value::Bool(false));
        assert_eq!(is_double.invoke(&[Value::Null]).expect("n"), Value::Bool(false));
    }

    #[test]
    fn convert_between_primitives() {
        let p = primitives();
        let to_int = Expression::lambda(
            vec![Expression::parameter("x", p.float.clone())],
            Expression::unary(
                UnaryOperator::Convert,
                Expression::parameter("x", p.float.clone()),
                p.int.clone(),
            ),
        )
        .expect("lambda")
        .compile()
        .expect("compile");
        assert_eq!(to_int.invoke(&[Value::Float(2.9)]).expect("2.9"), Value::Int(2));
        assert!(to_int.invoke(&[Value::Float(f64::NAN)]).is_err());
    }

    #[test]
    fn array_bounds_are_checked() {
        let p = primitives();
        // n => new Int64[n]
        let allocate = Expression::lambda(
            vec![Expression::parameter("n", p.int.clone())],
            Expression::NewArray {
                kind: NewArrayKind::Bounds,
                element_type: p.int.clone(),
                expressions: vec![Expression::parameter("n", p.int.clone())],
            },
        )
        .expect("lambda")
        .compile()
        .expect("compile");

        assert_eq!(
            allocate.invoke(&[Value::Int(2)]).expect("two"),
            Value::Array(vec![Value::Null, Value::Null])
        );
        assert!(matches!(
            allocate.invoke(&[Value::Int(-1)]),
            Err(ExpressionError::Evaluation(_))
        ));
        assert!(matches!(
            allocate.invoke(&[Value::Int(i64::MAX)]),
            Err(ExpressionError::Evaluation(_))
        ));
    }

    #[test]
    fn host_bound_nodes_rejected() {
        let p = primitives();
        let lambda = Expression::lambda(
            Vec::new(),
            Expression::Member {
                target: None,
                member: MemberRef {
                    declaring_type: p.string.clone(),
                    name: "Empty".into(),
                },
            },
        )
        .expect("lambda");
        assert!(matches!(
            lambda.compile(),
            Err(ExpressionError::Unsupported {
                kind: ExpressionKind::Member
            })
        ));
        assert!(matches!(
            Expression::constant(1, p.int).compile(),
            Err(ExpressionError::Invalid(_))
        ));
    }
}
