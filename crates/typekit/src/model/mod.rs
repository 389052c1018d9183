// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model-object contract.
//!
//! Equality, cloning and hashing come from derives; this module adds the
//! pieces derives do not cover: self validation, a deterministic hash, and
//! the readable string form every model exposes through `Display`.

mod described;
mod validation;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use described::DescribedSerialization;
pub use validation::{SelfValidating, SelfValidationFailure, ValidationError};

/// Contract shared by model objects: clonable, printable, self-validating.
pub trait ModelObject: Clone + fmt::Debug + fmt::Display + SelfValidating {}

/// Deterministic 64-bit hash of `value`.
///
/// Stable within one build of the library; not meant for persistence.
pub fn stable_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash("widget"), stable_hash("widget"));
        assert_ne!(stable_hash("widget"), stable_hash("gadget"));
    }
}
