// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Memoization of type resolutions.
//!
//! Keys are `(descriptor, match strategy, multiple-match strategy)`. The
//! cache is never invalidated: a type universe only grows, so an answer once
//! computed stays correct for the life of the resolver.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::descriptor::{TypeDescriptor, TypeMatchStrategy};
use super::handle::TypeHandle;
use super::resolver::MultipleMatchStrategy;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    namespace: Option<String>,
    name: String,
    assembly_qualified_name: Option<String>,
    match_strategy: TypeMatchStrategy,
    multiple_match_strategy: MultipleMatchStrategy,
}

impl CacheKey {
    fn new(
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Self {
        Self {
            namespace: descriptor.namespace().map(str::to_string),
            name: descriptor.name().to_string(),
            assembly_qualified_name: descriptor.assembly_qualified_name().map(str::to_string),
            match_strategy,
            multiple_match_strategy,
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Concurrent resolution cache; `None` ("not found") results are cached too.
#[derive(Debug, Default)]
pub struct TypeResolutionCache {
    entries: DashMap<CacheKey, Option<TypeHandle>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TypeResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(result)` on a hit, `None` on a miss.
    pub fn get(
        &self,
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
    ) -> Option<Option<TypeHandle>> {
        let key = CacheKey::new(descriptor, match_strategy, multiple_match_strategy);
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Record a result. A concurrent insert for the same key keeps the first
    /// value; both are equal since resolution is deterministic.
    pub fn insert(
        &self,
        descriptor: &TypeDescriptor,
        match_strategy: TypeMatchStrategy,
        multiple_match_strategy: MultipleMatchStrategy,
        resolved: Option<TypeHandle>,
    ) {
        let key = CacheKey::new(descriptor, match_strategy, multiple_match_strategy);
        self.entries.entry(key).or_insert(resolved);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
