// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operations: data objects describing work to dispatch by runtime type.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Upcast to `&dyn Any`, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A request to perform work.
pub trait Operation: AsAny + Send + Sync + fmt::Debug {
    fn operation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// An operation that yields a value when executed.
pub trait ReturningOperation: Operation {
    type Output: Send + 'static;
}

impl dyn Operation {
    /// Dispatch key of the concrete operation type.
    pub fn key(&self) -> OperationKey {
        OperationKey {
            id: self.as_any().type_id(),
            name: self.operation_name(),
        }
    }

    pub fn downcast_ref<O: Operation>(&self) -> Option<&O> {
        self.as_any().downcast_ref::<O>()
    }
}

/// Runtime identity of an operation type; equality ignores the name.
#[derive(Clone, Copy)]
pub struct OperationKey {
    id: TypeId,
    name: &'static str,
}

impl OperationKey {
    pub fn of<O: Operation>() -> Self {
        Self {
            id: TypeId::of::<O>(),
            name: std::any::type_name::<O>(),
        }
    }

    pub fn of_operation(operation: &dyn Operation) -> Self {
        operation.key()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for OperationKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OperationKey {}

impl Hash for OperationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationKey({})", self.name)
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
