// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor to type resolution against a [`TypeCatalog`].
//!
//! # Algorithm
//!
//! 1. Array descriptors: strip one `[]`, resolve the element, re-wrap.
//! 2. Closed generics (`[[...]]` in the qualified name): resolve the
//!    definition and every argument, then close the definition.
//! 3. Anything else: scan every assembly of the catalog, keep the types
//!    whose own descriptor matches under the chosen strategy, and settle
//!    multiple matches with the [`MultipleMatchStrategy`].
//!
//! Every successful answer, including "not found", is memoized.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cache::TypeResolutionCache;
use super::descriptor::{TypeDescriptor, TypeMatchStrategy};
use super::handle::{TypeHandle, TypeShapeError};
use super::qualified_name::QualifiedName;
use super::universe::{TypeCatalog, TypeLoadError};
use crate::config::ResolverConfig;

/// Rule applied when more than one loaded type matches a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleMatchStrategy {
    /// Report every candidate as an error.
    #[default]
    ThrowOnMultiple,
    /// Pick the candidate from the highest assembly version.
    NewestVersion,
    /// Pick the candidate from the lowest assembly version.
    OldestVersion,
}

/// Resolution errors.
///
/// "Not found" is not an error: it is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid type descriptor: {0}")]
    Argument(String),

    #[error(
        "type '{descriptor}' is ambiguous, {} loaded types match: [{}]{}",
        .candidates.len(),
        .candidates.join("; "),
        FailureSummary(.failures)
    )]
    Ambiguous {
        descriptor: String,
        candidates: Vec<String>,
        failures: Vec<TypeLoadError>,
    },

    #[error("type '{descriptor}' was not found{}", FailureSummary(.failures))]
    Incomplete {
        descriptor: String,
        failures: Vec<TypeLoadError>,
    },

    #[error(transparent)]
    Shape(#[from] TypeShapeError),
}

struct FailureSummary<'a>(&'a [TypeLoadError]);

impl fmt::Display for FailureSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " ({} assembly load failure(s):", self.0.len())?;
        for failure in self.0 {
            write!(f, " {};", failure)?;
        }
        f.write_str(")")
    }
}

/// Resolves [`TypeDescriptor`]s back to [`TypeHandle`]s.
pub struct TypeResolver {
    catalog: Arc<dyn TypeCatalog>,
    cache: TypeResolutionCache,
    defaults: ResolverConfig,
}

impl TypeResolver {
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self::with_config(catalog, &ResolverConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn TypeCatalog>, config: &ResolverConfig) -> Self {
        Self {
            catalog,
            cache: TypeResolutionCache::new(),
            defaults: config.clone(),
        }
    }

    pub fn catalog(&self) -> &Arc<dyn TypeCatalog> {
        &self.catalog
    }

    pub fn cache(&self) -> &TypeResolutionCache {
        &self.cache
    }

    /// Resolve with the configured default strategies.
    pub fn resolve_default(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<TypeHandle>, ResolveError> {
        self.resolve(
            descriptor,
            self.defaults.match_strategy,
            self.defaults.multiple_match_strategy,
        )
    }

    pub fn resolve(
        &self,
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Result<Option<TypeHandle>, ResolveError> {
        if descriptor.name().trim().is_empty() {
            return Err(ResolveError::Argument(format!(
                "descriptor '{}' has a blank name",
                descriptor
            )));
        }
        if match_strategy == TypeMatchStrategy::AssemblyQualifiedName
            && descriptor.assembly_qualified_name().is_none()
        {
            return Err(ResolveError::Argument(format!(
                "descriptor '{}' has no assembly-qualified name to match on",
                descriptor.display_name()
            )));
        }

        if let Some(cached) = self
            .cache
            .get(descriptor, match_strategy, multiple_match_strategy)
        {
            return Ok(cached);
        }

        log::debug!(
            "[TypeResolver] cache miss for '{}' ({:?}, {:?})",
            descriptor,
            match_strategy,
            multiple_match_strategy
        );
        let resolved = self.resolve_uncached(descriptor, match_strategy, multiple_match_strategy)?;
        self.cache.insert(
            descriptor,
            match_strategy,
            multiple_match_strategy,
            resolved.clone(),
        );
        Ok(resolved)
    }

    fn resolve_uncached(
        &self,
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Result<Option<TypeHandle>, ResolveError> {
        // Only the qualified-name strategy requires a well-formed name.
        let qualified = match descriptor.assembly_qualified_name().map(QualifiedName::parse) {
            None => None,
            Some(Ok(qualified)) => Some(qualified),
            Some(Err(e)) if match_strategy == TypeMatchStrategy::AssemblyQualifiedName => {
                return Err(ResolveError::Argument(e.to_string()));
            }
            Some(Err(e)) => {
                log::debug!(
                    "[TypeResolver] ignoring qualified name of '{}': {}",
                    descriptor.display_name(),
                    e
                );
                None
            }
        };

        if let Some(element) = descriptor.element() {
            let element = self.resolve(&element, match_strategy, multiple_match_strategy)?;
            return Ok(element.map(|e| e.array_of()));
        }

        if let Some(qualified) = qualified.filter(QualifiedName::is_closed_generic) {
            let definition = TypeDescriptor::from_qualified_name(&qualified.definition());
            let Some(definition) =
                self.resolve(&definition, match_strategy, multiple_match_strategy)?
            else {
                return Ok(None);
            };

            let mut arguments = Vec::with_capacity(qualified.generic_arguments.len());
            for argument in &qualified.generic_arguments {
                let argument = TypeDescriptor::from_qualified_name(argument);
                match self.resolve(&argument, match_strategy, multiple_match_strategy)? {
                    Some(handle) => arguments.push(handle),
                    None => return Ok(None),
                }
            }
            return Ok(Some(definition.make_generic(arguments)?));
        }

        self.scan(descriptor, match_strategy, multiple_match_strategy)
    }

    fn scan(
        &self,
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Result<Option<TypeHandle>, ResolveError> {
        let mut failures = Vec::new();
        let mut candidates: Vec<TypeHandle> = Vec::new();
        let mut seen_assemblies = HashSet::new();

        for assembly in self.catalog.assemblies() {
            if !seen_assemblies.insert(assembly.clone()) {
                continue;
            }
            let types = match self.catalog.types_in(&assembly) {
                Ok(types) => types,
                Err(failure) => {
                    log::warn!(
                        "[TypeResolver] partial load of '{}', continuing with {} type(s): {}",
                        assembly,
                        failure.loaded.len(),
                        failure.message
                    );
                    let loaded = failure.loaded.clone();
                    failures.push(failure);
                    loaded
                }
            };
            for candidate in types {
                if match_strategy.matches(&candidate.describe(), descriptor)
                    && !candidates.contains(&candidate)
                {
                    candidates.push(candidate);
                }
            }
        }

        match candidates.len() {
            0 if failures.is_empty() => Ok(None),
            0 => Err(ResolveError::Incomplete {
                descriptor: descriptor.to_string(),
                failures,
            }),
            1 => Ok(candidates.pop()),
            _ => match multiple_match_strategy {
                MultipleMatchStrategy::ThrowOnMultiple => Err(ResolveError::Ambiguous {
                    descriptor: descriptor.display_name(),
                    candidates: candidates
                        .iter()
                        .map(TypeHandle::assembly_qualified_name)
                        .collect(),
                    failures,
                }),
                MultipleMatchStrategy::NewestVersion => {
                    candidates.sort_by_key(|c| Reverse(c.assembly().effective_version()));
                    Ok(candidates.into_iter().next())
                }
                MultipleMatchStrategy::OldestVersion => {
                    candidates.sort_by_key(|c| c.assembly().effective_version());
                    Ok(candidates.into_iter().next())
                }
            },
        }
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResolver")
            .field("cache", &self.cache.stats())
            .field("defaults", &self.defaults)
            .finish()
    }
}
