// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializable type descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::handle::TypeHandle;
use super::qualified_name::{QualifiedName, ARRAY_MARKER};
use crate::model::{stable_hash, ModelObject, SelfValidating, SelfValidationFailure};

/// Flat, reflection-free stand-in for a runtime type.
///
/// Descriptors deliberately do not implement `PartialEq` or `Hash`: the
/// namespace/name pair and the assembly-qualified name can each be
/// ambiguous across assembly versions, so callers pick a
/// [`TypeMatchStrategy`] explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    namespace: Option<String>,
    name: String,
    assembly_qualified_name: Option<String>,
}

impl TypeDescriptor {
    pub fn new(
        namespace: Option<impl Into<String>>,
        name: impl Into<String>,
        assembly_qualified_name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            namespace: namespace.map(Into::into).filter(|ns: &String| !ns.is_empty()),
            name: name.into(),
            assembly_qualified_name: assembly_qualified_name.map(Into::into),
        }
    }

    /// Descriptor carrying only an assembly-qualified name; namespace and
    /// name are derived from it.
    pub fn from_qualified_name(qualified: &QualifiedName) -> Self {
        Self {
            namespace: qualified.namespace().map(str::to_string),
            name: qualified.name(),
            assembly_qualified_name: Some(qualified.to_string()),
        }
    }

    pub fn from_handle(handle: &TypeHandle) -> Self {
        Self {
            namespace: handle.namespace().map(str::to_string),
            name: handle.name(),
            assembly_qualified_name: Some(handle.assembly_qualified_name()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assembly_qualified_name(&self) -> Option<&str> {
        self.assembly_qualified_name.as_deref()
    }

    /// Parsed form of the assembly-qualified name, if present and well formed.
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        self.assembly_qualified_name
            .as_deref()
            .and_then(|aqn| QualifiedName::parse(aqn).ok())
    }

    /// Canonical text of the qualified name; the raw text when it does not parse.
    fn normalized_qualified_name(&self) -> Option<String> {
        let aqn = self.assembly_qualified_name.as_deref()?;
        Some(
            QualifiedName::parse(aqn)
                .map(|qualified| qualified.to_string())
                .unwrap_or_else(|_| aqn.to_string()),
        )
    }

    /// True when either the name or the qualified name carries an array marker.
    pub fn is_array(&self) -> bool {
        self.name.ends_with(ARRAY_MARKER)
            || self.qualified_name().is_some_and(|q| q.is_array())
    }

    /// Descriptor of the element type (one array marker stripped).
    pub fn element(&self) -> Option<TypeDescriptor> {
        if !self.is_array() {
            return None;
        }
        let name = self
            .name
            .strip_suffix(ARRAY_MARKER)
            .unwrap_or(&self.name)
            .to_string();
        let assembly_qualified_name = match self.qualified_name() {
            Some(qualified) => qualified.element().map(|e| e.to_string()),
            None => self.assembly_qualified_name.clone(),
        };
        Some(Self {
            namespace: self.namespace.clone(),
            name,
            assembly_qualified_name,
        })
    }

    /// `Namespace.Name` for messages.
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.assembly_qualified_name {
            Some(aqn) => f.write_str(aqn),
            None => f.write_str(&self.display_name()),
        }
    }
}

impl SelfValidating for TypeDescriptor {
    fn validate(&self) -> Vec<SelfValidationFailure> {
        let mut failures = Vec::new();
        if self.name.trim().is_empty() {
            failures.push(SelfValidationFailure::new("name", "must not be blank"));
        }
        if let Some(aqn) = &self.assembly_qualified_name {
            if let Err(e) = QualifiedName::parse(aqn) {
                failures.push(SelfValidationFailure::new(
                    "assembly_qualified_name",
                    e.to_string(),
                ));
            }
        }
        failures
    }
}

impl ModelObject for TypeDescriptor {}

/// Equality rule used to compare two descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMatchStrategy {
    /// Namespace and simple name are equal (ordinal).
    #[default]
    NamespaceAndName,
    /// Assembly-qualified names are present and equal once normalized:
    /// versions expanded to four parts, other assembly attributes dropped.
    AssemblyQualifiedName,
}

impl TypeMatchStrategy {
    pub fn matches(self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        match self {
            Self::NamespaceAndName => a.namespace == b.namespace && a.name == b.name,
            Self::AssemblyQualifiedName => match (
                a.normalized_qualified_name(),
                b.normalized_qualified_name(),
            ) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Hash consistent with [`matches`](Self::matches).
    pub fn hash_descriptor(self, descriptor: &TypeDescriptor) -> u64 {
        match self {
            Self::NamespaceAndName => stable_hash(&(self, &descriptor.namespace, &descriptor.name)),
            Self::AssemblyQualifiedName => {
                stable_hash(&(self, descriptor.normalized_qualified_name()))
            }
        }
    }
}
