// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

use serde::{Deserialize, Serialize};

/// One reason an object is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelfValidationFailure {
    pub property_name: String,
    pub message: String,
}

impl SelfValidationFailure {
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SelfValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property_name, self.message)
    }
}

/// Aggregate of every failure reported by [`SelfValidating::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{type_name} is invalid: {}", join_failures(.failures))]
pub struct ValidationError {
    pub type_name: &'static str,
    pub failures: Vec<SelfValidationFailure>,
}

fn join_failures(failures: &[SelfValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Objects able to check their own invariants.
pub trait SelfValidating {
    /// Every violated invariant; empty when valid.
    fn validate(&self) -> Vec<SelfValidationFailure>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    fn ensure_valid(&self) -> Result<(), ValidationError> {
        let failures = self.validate();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                type_name: short_type_name::<Self>(),
                failures,
            })
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Drop generic arguments before trimming the module path.
    let outer = full.split('<').next().unwrap_or(full);
    outer.rsplit("::").next().unwrap_or(outer)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Span {
        start: u32,
        end: u32,
    }

    impl SelfValidating for Span {
        fn validate(&self) -> Vec<SelfValidationFailure> {
            if self.start > self.end {
                vec![SelfValidationFailure::new("start", "must not exceed end")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn ensure_valid_reports_every_failure() {
        let err = Span { start: 5, end: 1 }.ensure_valid().unwrap_err();
        assert_eq!(err.type_name, "Span");
        assert_eq!(err.to_string(), "Span is invalid: start: must not exceed end");
        assert!(Span { start: 1, end: 5 }.ensure_valid().is_ok());
    }
}
