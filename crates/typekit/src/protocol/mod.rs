// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation dispatch.
//!
//! An [`Operation`] is a plain data object; a [`Protocol`] executes one or
//! more operation types and declares them through [`DeclaresOperations`].
//! A [`ProtocolRegistry`] maps each operation type to a protocol factory, and
//! a [`ChainOfResponsibilityProtocolFactory`] falls back across factories.
//!
//! # Example
//!
//! ```
//! use typekit::protocol::*;
//!
//! #[derive(Debug)]
//! struct Double(i32);
//! impl Operation for Double {}
//! impl ReturningOperation for Double { type Output = i32; }
//!
//! struct Arithmetic;
//! impl Protocol for Arithmetic {}
//! impl Executes<Double> for Arithmetic {
//!     fn execute(&self, op: &Double) -> Result<i32, ProtocolError> { Ok(op.0 * 2) }
//! }
//! impl DeclaresOperations for Arithmetic {
//!     fn declare(caps: &mut Capabilities<Self>) { caps.executes::<Double>(); }
//! }
//!
//! let registry = ProtocolRegistry::new();
//! registry.register(ProtocolRegistration::new(|| Arithmetic)).unwrap();
//! assert_eq!(registry.execute_operation(&Double(21)).unwrap(), 42);
//! ```

mod chain;
mod error;
mod factory;
mod operation;
#[allow(clippy::module_inception)]
mod protocol;
mod registry;

pub use chain::ChainOfResponsibilityProtocolFactory;
pub use error::{DispatchError, DispatchResult, ProtocolError};
pub use factory::{
    execute_async, execute_operation_async, GetProtocol, MissingProtocolStrategy, ProtocolFactory,
    ResolvedProtocol,
};
pub use operation::{AsAny, Operation, OperationKey, ReturningOperation};
pub use protocol::{Capabilities, DeclaresOperations, Executes, Protocol};
pub use registry::{CollisionStrategy, ProtocolRegistration, ProtocolRegistry};
