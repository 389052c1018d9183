// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocols and their declared capabilities.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::error::{DispatchError, ProtocolError};
use super::operation::{AsAny, Operation, OperationKey, ReturningOperation};

/// An object able to execute one or more operation types.
pub trait Protocol: AsAny + Send + Sync {
    fn protocol_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Protocol {
    pub fn downcast_ref<P: Protocol>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }
}

/// Execution of one operation type.
///
/// A protocol implements this once per operation it serves.
pub trait Executes<O: ReturningOperation>: Protocol {
    fn execute(&self, operation: &O) -> Result<O::Output, ProtocolError>;
}

/// Explicit declaration of the operations a protocol serves.
///
/// ```
/// use typekit::protocol::{Capabilities, DeclaresOperations, Executes, Operation, Protocol,
///                         ProtocolError, ReturningOperation};
///
/// #[derive(Debug)]
/// struct Greet(String);
/// impl Operation for Greet {}
/// impl ReturningOperation for Greet { type Output = String; }
///
/// struct Greeter;
/// impl Protocol for Greeter {}
/// impl Executes<Greet> for Greeter {
///     fn execute(&self, op: &Greet) -> Result<String, ProtocolError> {
///         Ok(format!("hello {}", op.0))
///     }
/// }
/// impl DeclaresOperations for Greeter {
///     fn declare(caps: &mut Capabilities<Self>) {
///         caps.executes::<Greet>();
///     }
/// }
/// ```
pub trait DeclaresOperations: Protocol + Sized {
    fn declare(capabilities: &mut Capabilities<Self>);
}

/// Type-erased call of `Executes<O>::execute` on `P`.
pub(crate) type Executor = Arc<
    dyn Fn(&dyn Protocol, &dyn Operation) -> Result<Box<dyn Any + Send>, DispatchError>
        + Send
        + Sync,
>;

/// Operations declared by protocol `P`.
///
/// `executes::<O>()` only compiles when `P: Executes<O>`.
pub struct Capabilities<P> {
    entries: Vec<(OperationKey, Executor)>,
    _protocol: PhantomData<fn() -> P>,
}

impl<P: Protocol> Capabilities<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            _protocol: PhantomData,
        }
    }

    /// Collect the declarations of `P`.
    pub(crate) fn declared() -> Self
    where
        P: DeclaresOperations,
    {
        let mut capabilities = Self::new();
        P::declare(&mut capabilities);
        capabilities
    }

    /// Declare that `P` executes `O`. Declaring twice is a no-op.
    pub fn executes<O>(&mut self) -> &mut Self
    where
        O: ReturningOperation,
        P: Executes<O>,
    {
        let key = OperationKey::of::<O>();
        if self.entries.iter().any(|(existing, _)| *existing == key) {
            return self;
        }

        let executor: Executor = Arc::new(|protocol: &dyn Protocol, operation: &dyn Operation| {
            let mismatch = || DispatchError::Mismatch {
                protocol: protocol.protocol_name(),
                operation: operation.operation_name(),
            };
            let protocol = protocol.downcast_ref::<P>().ok_or_else(mismatch)?;
            let operation = operation.downcast_ref::<O>().ok_or_else(mismatch)?;
            let output = <P as Executes<O>>::execute(protocol, operation)?;
            Ok(Box::new(output) as Box<dyn Any + Send>)
        });
        self.entries.push((key, executor));
        self
    }

    pub fn operations(&self) -> Vec<OperationKey> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(OperationKey, Executor)> {
        self.entries
    }
}
