// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{SelfValidating, SelfValidationFailure, ValidationError};
use super::ModelObject;
use crate::types::TypeDescriptor;

/// A payload serialized by an external serializer, with enough metadata to
/// find the serializer and the payload type again.
///
/// `serializer` and `payload` are opaque here; they are carried, never
/// interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribedSerialization {
    payload_type: TypeDescriptor,
    serializer: String,
    payload: String,
}

impl DescribedSerialization {
    pub fn new(
        payload_type: TypeDescriptor,
        serializer: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let described = Self {
            payload_type,
            serializer: serializer.into(),
            payload: payload.into(),
        };
        described.ensure_valid()?;
        Ok(described)
    }

    pub fn payload_type(&self) -> &TypeDescriptor {
        &self.payload_type
    }

    pub fn serializer(&self) -> &str {
        &self.serializer
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl SelfValidating for DescribedSerialization {
    fn validate(&self) -> Vec<SelfValidationFailure> {
        let mut failures: Vec<SelfValidationFailure> = self
            .payload_type
            .validate()
            .into_iter()
            .map(|f| {
                SelfValidationFailure::new(format!("payload_type.{}", f.property_name), f.message)
            })
            .collect();
        if self.serializer.trim().is_empty() {
            failures.push(SelfValidationFailure::new("serializer", "must not be blank"));
        }
        if self.payload.trim().is_empty() {
            failures.push(SelfValidationFailure::new("payload", "must not be blank"));
        }
        failures
    }
}

impl fmt::Display for DescribedSerialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via '{}' ({} bytes)",
            self.payload_type.display_name(),
            self.serializer,
            self.payload.len()
        )
    }
}

impl ModelObject for DescribedSerialization {}
