// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Expression trees and their serializable descriptions.
//!
//! An [`Expression`] references types by [`TypeHandle`]; describing it
//! replaces every handle by a [`TypeDescriptor`], producing an
//! [`ExpressionDescription`] that serializes with serde. Reconstruction
//! resolves the descriptors back through a [`TypeResolver`].
//!
//! ```
//! use std::sync::Arc;
//! use typekit::expression::{BinaryOperator, Expression, ExpressionDescription, Value};
//! use typekit::types::{AssemblyName, TypeResolver, TypeUniverse};
//!
//! let universe = TypeUniverse::builder()
//!     .assembly(AssemblyName::unversioned("System"), |a| {
//!         a.add_rust_type::<i64>("System.Int64");
//!     })
//!     .build()
//!     .unwrap();
//! let int = universe.handle_of::<i64>().unwrap();
//!
//! let increment = Expression::lambda(
//!     vec![Expression::parameter("x", int.clone())],
//!     Expression::binary(
//!         BinaryOperator::Add,
//!         Expression::parameter("x", int.clone()),
//!         Expression::constant(1, int),
//!     ),
//! )
//! .unwrap();
//!
//! let json = serde_json::to_string(&increment.describe()).unwrap();
//! let description: ExpressionDescription = serde_json::from_str(&json).unwrap();
//!
//! let resolver = TypeResolver::new(Arc::new(universe));
//! let rebuilt = description.to_expression(&resolver).unwrap();
//! assert_eq!(rebuilt.to_string(), "x => (x + 1)");
//! assert_eq!(rebuilt.compile().unwrap().invoke(&[Value::Int(41)]).unwrap(), Value::Int(42));
//! ```
//!
//! [`TypeHandle`]: crate::types::TypeHandle
//! [`TypeDescriptor`]: crate::types::TypeDescriptor
//! [`TypeResolver`]: crate::types::TypeResolver

mod description;
mod error;
mod eval;
mod tree;
mod value;
mod visitor;

pub use description::{Expression, ExpressionDescription};
pub use error::ExpressionError;
pub use eval::CompiledLambda;
pub use tree::{
    BinaryOperator, ConstructorRef, ElementInit, ExpressionKind, ExpressionTree, MemberBinding,
    MemberRef, MethodRef, NewArrayKind, TypeReference, UnaryOperator,
};
pub use value::Value;
pub use visitor::{visit_all_connected_nodes, visit_all_nodes, ExpressionNode};
