// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The protocol factory contract.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::DispatchError;
use super::operation::{Operation, OperationKey, ReturningOperation};
use super::protocol::{Executor, Protocol};

/// What a factory does when no protocol serves the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingProtocolStrategy {
    #[default]
    Throw,
    ReturnNone,
}

/// Request for the protocol serving one operation.
#[derive(Debug, Clone, Copy)]
pub struct GetProtocol<'a> {
    operation: &'a dyn Operation,
    missing: MissingProtocolStrategy,
}

impl<'a> GetProtocol<'a> {
    /// Request that fails with `NotFound` when nothing serves the operation.
    pub fn new(operation: &'a dyn Operation) -> Self {
        Self::with_missing(operation, MissingProtocolStrategy::Throw)
    }

    /// Request that yields `None` when nothing serves the operation.
    pub fn or_none(operation: &'a dyn Operation) -> Self {
        Self::with_missing(operation, MissingProtocolStrategy::ReturnNone)
    }

    pub fn with_missing(operation: &'a dyn Operation, missing: MissingProtocolStrategy) -> Self {
        Self { operation, missing }
    }

    pub fn operation(&self) -> &'a dyn Operation {
        self.operation
    }

    pub fn missing_strategy(&self) -> MissingProtocolStrategy {
        self.missing
    }

    /// Outcome for an operation nobody serves.
    pub fn not_found<T>(&self) -> Result<Option<T>, DispatchError> {
        match self.missing {
            MissingProtocolStrategy::Throw => Err(DispatchError::NotFound {
                operation: self.operation.operation_name(),
            }),
            MissingProtocolStrategy::ReturnNone => Ok(None),
        }
    }
}

/// A protocol instance bound to the operation it was resolved for.
pub struct ResolvedProtocol {
    operation: OperationKey,
    protocol_name: &'static str,
    protocol: Arc<dyn Protocol>,
    executor: Executor,
}

impl ResolvedProtocol {
    pub(crate) fn new(
        operation: OperationKey,
        protocol_name: &'static str,
        protocol: Arc<dyn Protocol>,
        executor: Executor,
    ) -> Self {
        Self {
            operation,
            protocol_name,
            protocol,
            executor,
        }
    }

    pub fn protocol(&self) -> &Arc<dyn Protocol> {
        &self.protocol
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol_name
    }

    pub fn operation(&self) -> OperationKey {
        self.operation
    }

    pub fn downcast_ref<P: Protocol>(&self) -> Option<&P> {
        self.protocol.downcast_ref::<P>()
    }

    /// Execute `operation` on the resolved protocol.
    pub fn run<O: ReturningOperation>(&self, operation: &O) -> Result<O::Output, DispatchError> {
        let mismatch = || DispatchError::Mismatch {
            protocol: self.protocol_name,
            operation: operation.operation_name(),
        };
        if OperationKey::of::<O>() != self.operation {
            return Err(mismatch());
        }

        let output = (self.executor)(self.protocol.as_ref(), operation)?;
        output
            .downcast::<O::Output>()
            .map(|output| *output)
            .map_err(|_| mismatch())
    }
}

impl fmt::Debug for ResolvedProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProtocol")
            .field("operation", &self.operation)
            .field("protocol_name", &self.protocol_name)
            .finish_non_exhaustive()
    }
}

/// Source of protocols for operations.
pub trait ProtocolFactory: Send + Sync {
    /// Look up the protocol serving `request.operation()`.
    fn execute(&self, request: &GetProtocol<'_>) -> Result<Option<ResolvedProtocol>, DispatchError>;

    /// Look up the protocol for `operation` and run it.
    fn execute_operation<O: ReturningOperation>(
        &self,
        operation: &O,
    ) -> Result<O::Output, DispatchError>
    where
        Self: Sized,
    {
        run_operation(self, operation)
    }
}

fn run_operation<F, O>(factory: &F, operation: &O) -> Result<O::Output, DispatchError>
where
    F: ProtocolFactory + ?Sized,
    O: ReturningOperation,
{
    let request = GetProtocol::new(operation);
    match factory.execute(&request)? {
        Some(resolved) => resolved.run(operation),
        // A factory ignoring `Throw` still means nothing serves the operation.
        None => Err(DispatchError::NotFound {
            operation: operation.operation_name(),
        }),
    }
}

impl dyn ProtocolFactory {
    /// [`ProtocolFactory::execute_operation`] for trait objects.
    pub fn execute_operation<O: ReturningOperation>(
        &self,
        operation: &O,
    ) -> Result<O::Output, DispatchError> {
        run_operation(self, operation)
    }
}

// ---- async pass-through ----

/// Async form of [`ProtocolFactory::execute`]; completes on first poll.
pub async fn execute_async<F>(
    factory: &F,
    request: &GetProtocol<'_>,
) -> Result<Option<ResolvedProtocol>, DispatchError>
where
    F: ProtocolFactory + ?Sized,
{
    factory.execute(request)
}

/// Async form of [`ProtocolFactory::execute_operation`]; completes on first poll.
pub async fn execute_operation_async<F, O>(
    factory: &F,
    operation: &O,
) -> Result<O::Output, DispatchError>
where
    F: ProtocolFactory + ?Sized,
    O: ReturningOperation,
{
    run_operation(factory, operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;
    impl Operation for Ping {}
    impl ReturningOperation for Ping {
        type Output = &'static str;
    }

    struct Nothing;
    impl ProtocolFactory for Nothing {
        fn execute(
            &self,
            request: &GetProtocol<'_>,
        ) -> Result<Option<ResolvedProtocol>, DispatchError> {
            request.not_found()
        }
    }

    #[test]
    fn missing_strategies() {
        assert!(matches!(
            Nothing.execute(&GetProtocol::new(&Ping)),
            Err(DispatchError::NotFound { operation }) if operation.ends_with("Ping")
        ));
        assert!(Nothing
            .execute(&GetProtocol::or_none(&Ping))
            .expect("lookup")
            .is_none());
        assert_eq!(
            GetProtocol::or_none(&Ping).missing_strategy(),
            MissingProtocolStrategy::ReturnNone
        );
    }

    #[test]
    fn execute_operation_on_missing_is_not_found() {
        assert!(matches!(
            Nothing.execute_operation(&Ping),
            Err(DispatchError::NotFound { .. })
        ));
        let boxed: Arc<dyn ProtocolFactory> = Arc::new(Nothing);
        assert!(matches!(
            boxed.execute_operation(&Ping),
            Err(DispatchError::NotFound { .. })
        ));
    }
}
