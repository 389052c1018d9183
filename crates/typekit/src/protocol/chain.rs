// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ordered fallback across several protocol factories.

use std::fmt;
use std::sync::Arc;

use super::error::DispatchError;
use super::factory::{GetProtocol, MissingProtocolStrategy, ProtocolFactory, ResolvedProtocol};

/// Asks each factory in order; the first one serving the operation wins.
pub struct ChainOfResponsibilityProtocolFactory {
    factories: Vec<Arc<dyn ProtocolFactory>>,
}

impl ChainOfResponsibilityProtocolFactory {
    pub fn new(factories: Vec<Arc<dyn ProtocolFactory>>) -> Result<Self, DispatchError> {
        if factories.is_empty() {
            return Err(DispatchError::Argument(
                "protocol factory chain requires at least one factory".into(),
            ));
        }
        Ok(Self { factories })
    }

    pub fn factories(&self) -> &[Arc<dyn ProtocolFactory>] {
        &self.factories
    }
}

impl ProtocolFactory for ChainOfResponsibilityProtocolFactory {
    fn execute(
        &self,
        request: &GetProtocol<'_>,
    ) -> Result<Option<ResolvedProtocol>, DispatchError> {
        let probe =
            GetProtocol::with_missing(request.operation(), MissingProtocolStrategy::ReturnNone);

        for (position, factory) in self.factories.iter().enumerate() {
            if let Some(resolved) = factory.execute(&probe)? {
                log::trace!(
                    "[ProtocolChain] '{}' served by factory #{} ('{}')",
                    resolved.operation(),
                    position,
                    resolved.protocol_name()
                );
                return Ok(Some(resolved));
            }
        }

        request.not_found()
    }
}

impl fmt::Debug for ChainOfResponsibilityProtocolFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainOfResponsibilityProtocolFactory")
            .field("factories", &self.factories.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        Capabilities, DeclaresOperations, Executes, Operation, Protocol, ProtocolError,
        ProtocolRegistration, ProtocolRegistry, ReturningOperation,
    };

    #[derive(Debug)]
    struct Ask;
    impl Operation for Ask {}
    impl ReturningOperation for Ask {
        type Output = &'static str;
    }

    struct Primary;
    impl Protocol for Primary {}
    impl Executes<Ask> for Primary {
        fn execute(&self, _: &Ask) -> Result<&'static str, ProtocolError> {
            Ok("primary")
        }
    }
    impl DeclaresOperations for Primary {
        fn declare(caps: &mut Capabilities<Self>) {
            caps.executes::<Ask>();
        }
    }

    struct Secondary;
    impl Protocol for Secondary {}
    impl Executes<Ask> for Secondary {
        fn execute(&self, _: &Ask) -> Result<&'static str, ProtocolError> {
            Ok("secondary")
        }
    }
    impl DeclaresOperations for Secondary {
        fn declare(caps: &mut Capabilities<Self>) {
            caps.executes::<Ask>();
        }
    }

    struct Broken;
    impl ProtocolFactory for Broken {
        fn execute(&self, _: &GetProtocol<'_>) -> Result<Option<ResolvedProtocol>, DispatchError> {
            Err(DispatchError::Argument("broken".into()))
        }
    }

    fn registry_with(registration: Option<ProtocolRegistration>) -> Arc<dyn ProtocolFactory> {
        let registry = ProtocolRegistry::new();
        if let Some(registration) = registration {
            registry.register(registration).expect("register");
        }
        Arc::new(registry)
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(matches!(
            ChainOfResponsibilityProtocolFactory::new(Vec::new()),
            Err(DispatchError::Argument(_))
        ));
    }

    #[test]
    fn first_serving_factory_wins() {
        let chain = ChainOfResponsibilityProtocolFactory::new(vec![
            registry_with(None),
            registry_with(Some(ProtocolRegistration::new(|| Secondary))),
            registry_with(Some(ProtocolRegistration::new(|| Primary))),
        ])
        .expect("chain");
        assert_eq!(chain.execute_operation(&Ask).expect("ask"), "secondary");
    }

    #[test]
    fn exhausted_chain_applies_caller_strategy() {
        let chain = ChainOfResponsibilityProtocolFactory::new(vec![registry_with(None)])
            .expect("chain");
        assert!(matches!(
            chain.execute(&GetProtocol::new(&Ask)),
            Err(DispatchError::NotFound { .. })
        ));
        assert!(chain
            .execute(&GetProtocol::or_none(&Ask))
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn child_errors_propagate() {
        let chain = ChainOfResponsibilityProtocolFactory::new(vec![
            Arc::new(Broken) as Arc<dyn ProtocolFactory>,
            registry_with(Some(ProtocolRegistration::new(|| Primary))),
        ])
        .expect("chain");
        assert!(matches!(
            chain.execute_operation(&Ask),
            Err(DispatchError::Argument(_))
        ));
    }

    #[test]
    fn chains_nest() {
        let inner = ChainOfResponsibilityProtocolFactory::new(vec![registry_with(Some(
            ProtocolRegistration::new(|| Primary),
        ))])
        .expect("inner");
        let outer = ChainOfResponsibilityProtocolFactory::new(vec![
            registry_with(None),
            Arc::new(inner) as Arc<dyn ProtocolFactory>,
        ])
        .expect("outer");
        assert_eq!(outer.factories().len(), 2);
        assert_eq!(outer.execute_operation(&Ask).expect("ask"), "primary");
    }
}
