// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation -> protocol registry.
//!
//! Maps each operation type to the protocol that serves it. Lookups are
//! lock-free reads of a `DashMap`; registrations serialize on a single write
//! lock so that a batch of operations is checked and inserted atomically.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::error::DispatchError;
use super::factory::{GetProtocol, ProtocolFactory, ResolvedProtocol};
use super::operation::{Operation, OperationKey};
use super::protocol::{Capabilities, DeclaresOperations, Executor, Protocol};
use crate::config::ProtocolConfig;

/// What to do when a registration targets an operation already served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionStrategy {
    /// Reject the whole registration.
    #[default]
    Throw,
    /// Keep the existing protocol for that operation.
    Skip,
    /// Overwrite the existing protocol for that operation.
    Replace,
}

type Factory = Arc<dyn Fn() -> Option<Arc<dyn Protocol>> + Send + Sync>;

// ---- registration ----

/// A protocol factory together with the operations the protocol declares.
pub struct ProtocolRegistration {
    protocol_name: &'static str,
    operations: Vec<(OperationKey, Executor)>,
    factory: Factory,
}

impl ProtocolRegistration {
    /// A fresh protocol instance per lookup.
    pub fn new<P, F>(factory: F) -> Self
    where
        P: DeclaresOperations,
        F: Fn() -> P + Send + Sync + 'static,
    {
        Self::fallible(move || Some(factory()))
    }

    /// A factory that may decline to produce an instance.
    pub fn fallible<P, F>(factory: F) -> Self
    where
        P: DeclaresOperations,
        F: Fn() -> Option<P> + Send + Sync + 'static,
    {
        Self::from_parts::<P>(Arc::new(move || {
            factory().map(|protocol| Arc::new(protocol) as Arc<dyn Protocol>)
        }))
    }

    /// The same instance for every lookup.
    pub fn shared<P: DeclaresOperations>(instance: Arc<P>) -> Self {
        Self::from_parts::<P>(Arc::new(move || {
            Some(Arc::clone(&instance) as Arc<dyn Protocol>)
        }))
    }

    fn from_parts<P: DeclaresOperations>(factory: Factory) -> Self {
        Self {
            protocol_name: std::any::type_name::<P>(),
            operations: Capabilities::<P>::declared().into_entries(),
            factory,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol_name
    }

    pub fn operations(&self) -> Vec<OperationKey> {
        self.operations.iter().map(|(key, _)| *key).collect()
    }
}

impl fmt::Debug for ProtocolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolRegistration")
            .field("protocol_name", &self.protocol_name)
            .field("operations", &self.operations())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct RegistryEntry {
    protocol_name: &'static str,
    factory: Factory,
    executor: Executor,
}

// ---- registry ----

/// Thread-safe map from operation type to protocol factory.
pub struct ProtocolRegistry {
    entries: DashMap<OperationKey, RegistryEntry>,
    write_lock: Mutex<()>,
    collision_strategy: CollisionStrategy,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::with_config(&ProtocolConfig::default())
    }

    pub fn with_config(config: &ProtocolConfig) -> Self {
        Self {
            entries: DashMap::new(),
            write_lock: Mutex::new(()),
            collision_strategy: config.collision_strategy,
        }
    }

    /// Build a registry from registrations applied in order.
    pub fn from_registrations<I>(
        registrations: I,
        strategy: CollisionStrategy,
    ) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = ProtocolRegistration>,
    {
        let registry = Self::with_config(&ProtocolConfig {
            collision_strategy: strategy,
        });
        for registration in registrations {
            registry.register(registration)?;
        }
        Ok(registry)
    }

    /// Default strategy used by [`register`](Self::register).
    pub fn collision_strategy(&self) -> CollisionStrategy {
        self.collision_strategy
    }

    /// Register using the configured collision strategy.
    pub fn register(&self, registration: ProtocolRegistration) -> Result<(), DispatchError> {
        self.register_with(registration, self.collision_strategy)
    }

    /// Register every operation declared by the protocol.
    ///
    /// All operations are checked before any is inserted: on a `Throw`
    /// collision the table is left unchanged.
    pub fn register_with(
        &self,
        registration: ProtocolRegistration,
        strategy: CollisionStrategy,
    ) -> Result<(), DispatchError> {
        let ProtocolRegistration {
            protocol_name,
            operations,
            factory,
        } = registration;

        if operations.is_empty() {
            return Err(DispatchError::Argument(format!(
                "protocol '{}' declares no operations",
                protocol_name
            )));
        }

        let _guard = self.write_lock.lock();

        if strategy == CollisionStrategy::Throw {
            for (key, _) in &operations {
                if let Some(existing) = self.entries.get(key) {
                    return Err(DispatchError::Collision {
                        protocol: protocol_name,
                        operation: key.name(),
                        existing: existing.protocol_name,
                    });
                }
            }
        }

        let mut inserted = 0usize;
        for (key, executor) in operations {
            if strategy == CollisionStrategy::Skip && self.entries.contains_key(&key) {
                log::debug!(
                    "[ProtocolRegistry] '{}' already served, skipping '{}'",
                    key,
                    protocol_name
                );
                continue;
            }

            let entry = RegistryEntry {
                protocol_name,
                factory: Arc::clone(&factory),
                executor,
            };
            if let Some(previous) = self.entries.insert(key, entry) {
                log::info!(
                    "[ProtocolRegistry] '{}' now served by '{}' (was '{}')",
                    key,
                    protocol_name,
                    previous.protocol_name
                );
            }
            inserted += 1;
        }

        log::debug!(
            "[ProtocolRegistry] registered '{}' for {} operation(s)",
            protocol_name,
            inserted
        );
        Ok(())
    }

    /// Registered operations, sorted by name.
    pub fn registered_operations(&self) -> Vec<OperationKey> {
        let mut keys: Vec<OperationKey> = self.entries.iter().map(|entry| *entry.key()).collect();
        keys.sort_by(|a, b| a.name().cmp(b.name()));
        keys
    }

    pub fn contains<O: Operation>(&self) -> bool {
        self.entries.contains_key(&OperationKey::of::<O>())
    }

    /// Name of the protocol serving `O`.
    pub fn protocol_name_for<O: Operation>(&self) -> Option<&'static str> {
        self.entries
            .get(&OperationKey::of::<O>())
            .map(|entry| entry.protocol_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolRegistry")
            .field("operations", &self.registered_operations())
            .field("collision_strategy", &self.collision_strategy)
            .finish()
    }
}

impl ProtocolFactory for ProtocolRegistry {
    fn execute(
        &self,
        request: &GetProtocol<'_>,
    ) -> Result<Option<ResolvedProtocol>, DispatchError> {
        let key = request.operation().key();
        // Clone out so no shard lock is held while the factory runs.
        let entry = self.entries.get(&key).map(|entry| entry.value().clone());
        let Some(entry) = entry else {
            return request.not_found();
        };

        let protocol = (entry.factory)().ok_or(DispatchError::FactoryReturnedNone {
            protocol: entry.protocol_name,
            operation: key.name(),
        })?;
        Ok(Some(ResolvedProtocol::new(
            key,
            entry.protocol_name,
            protocol,
            entry.executor,
        )))
    }
}
