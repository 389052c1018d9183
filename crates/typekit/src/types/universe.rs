// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The set of types a process knows about.
//!
//! Rust has no loaded-assembly reflection, so the type universe is declared
//! up front (in code or configuration) and is complete by construction.
//! [`TypeCatalog`] is the seam the resolver scans; lazily populated catalogs
//! may report partial loads through [`TypeLoadError`].

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use super::handle::TypeHandle;
use super::qualified_name::split_full_name;
use super::version::{AssemblyName, AssemblyVersion};
use crate::config::AssemblyConfig;

// ---------------------------------------------------------------------------
// TypeCatalog
// ---------------------------------------------------------------------------

/// Failure to enumerate the types of one assembly.
///
/// `loaded` holds the types that did load; the resolver keeps scanning them.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load types from assembly '{assembly}': {message}")]
pub struct TypeLoadError {
    pub assembly: AssemblyName,
    pub message: String,
    pub loaded: Vec<TypeHandle>,
}

/// Source of "loaded" assemblies and their types.
pub trait TypeCatalog: Send + Sync {
    /// Assemblies in enumeration order.
    fn assemblies(&self) -> Vec<AssemblyName>;

    /// Types published by `assembly`.
    fn types_in(&self, assembly: &AssemblyName) -> Result<Vec<TypeHandle>, TypeLoadError>;
}

// ---------------------------------------------------------------------------
// UniverseError
// ---------------------------------------------------------------------------

/// Errors raised while declaring a type universe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("assembly name must not be blank")]
    BlankAssemblyName,

    #[error("invalid version '{version}' for assembly '{assembly}'")]
    InvalidVersion { assembly: String, version: String },

    #[error("assembly '{0}' declares a type with a blank name")]
    BlankTypeName(String),

    #[error("assembly '{assembly}' declares type '{full_name}' more than once")]
    DuplicateType { assembly: String, full_name: String },

    #[error("Rust type bound to '{0}' is already bound to another declared type")]
    DuplicateRustBinding(String),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct TypeSpec {
    full_name: String,
    generic_arity: usize,
    rust_type: Option<TypeId>,
}

#[derive(Debug)]
struct AssemblySpec {
    name: AssemblyName,
    types: Vec<TypeSpec>,
}

/// Declares the types of one assembly.
pub struct AssemblyBuilder<'a> {
    spec: &'a mut AssemblySpec,
}

impl AssemblyBuilder<'_> {
    /// Declare a plain type by its namespace-qualified name.
    pub fn add_type(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.push(full_name.into(), 0, None)
    }

    /// Declare a type and bind it to the Rust type `T`.
    pub fn add_rust_type<T: 'static>(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.push(full_name.into(), 0, Some(TypeId::of::<T>()))
    }

    /// Declare a generic type definition; ``List`` with arity 1 becomes ``List`1``.
    pub fn add_generic_definition(
        &mut self,
        full_name: impl Into<String>,
        arity: usize,
    ) -> &mut Self {
        self.push(full_name.into(), arity, None)
    }

    fn push(
        &mut self,
        full_name: String,
        generic_arity: usize,
        rust_type: Option<TypeId>,
    ) -> &mut Self {
        let full_name = full_name.trim().to_string();
        let suffix = format!("`{}", generic_arity);
        let full_name = if generic_arity > 0 && !full_name.ends_with(&suffix) {
            format!("{}`{}", full_name, generic_arity)
        } else {
            full_name
        };
        self.spec.types.push(TypeSpec {
            full_name,
            generic_arity,
            rust_type,
        });
        self
    }
}

/// Builder for [`TypeUniverse`].
#[derive(Debug, Default)]
pub struct TypeUniverseBuilder {
    assemblies: Vec<AssemblySpec>,
}

impl TypeUniverseBuilder {
    /// Declare types in `name`. Declaring the same assembly (name and
    /// version) twice appends to the first declaration.
    pub fn assembly(
        mut self,
        name: AssemblyName,
        declare: impl FnOnce(&mut AssemblyBuilder<'_>),
    ) -> Self {
        let index = match self.assemblies.iter().position(|a| a.name == name) {
            Some(index) => index,
            None => {
                self.assemblies.push(AssemblySpec {
                    name,
                    types: Vec::new(),
                });
                self.assemblies.len() - 1
            }
        };
        declare(&mut AssemblyBuilder {
            spec: &mut self.assemblies[index],
        });
        self
    }

    pub fn build(self) -> Result<TypeUniverse, UniverseError> {
        let mut assemblies = Vec::with_capacity(self.assemblies.len());
        let mut rust_types = HashMap::new();

        for spec in self.assemblies {
            if spec.name.name.trim().is_empty() {
                return Err(UniverseError::BlankAssemblyName);
            }

            let mut seen = HashSet::new();
            let mut types = Vec::with_capacity(spec.types.len());
            for type_spec in spec.types {
                let (namespace, name) = split_full_name(&type_spec.full_name);
                if name.is_empty() {
                    return Err(UniverseError::BlankTypeName(spec.name.to_string()));
                }
                if !seen.insert(type_spec.full_name.clone()) {
                    return Err(UniverseError::DuplicateType {
                        assembly: spec.name.to_string(),
                        full_name: type_spec.full_name,
                    });
                }

                let handle = TypeHandle::named(
                    namespace.map(str::to_string),
                    name.to_string(),
                    spec.name.clone(),
                    type_spec.generic_arity,
                    type_spec.rust_type,
                );
                if let Some(type_id) = type_spec.rust_type {
                    if rust_types.insert(type_id, handle.clone()).is_some() {
                        return Err(UniverseError::DuplicateRustBinding(type_spec.full_name));
                    }
                }
                types.push(handle);
            }

            assemblies.push(AssemblyEntry {
                name: spec.name,
                types,
            });
        }

        log::debug!(
            "[TypeUniverse] built with {} assemblies, {} types",
            assemblies.len(),
            assemblies.iter().map(|a| a.types.len()).sum::<usize>()
        );

        Ok(TypeUniverse {
            assemblies,
            rust_types,
        })
    }
}

// ---------------------------------------------------------------------------
// TypeUniverse
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct AssemblyEntry {
    name: AssemblyName,
    types: Vec<TypeHandle>,
}

/// Immutable, explicitly declared set of known types.
#[derive(Debug)]
pub struct TypeUniverse {
    assemblies: Vec<AssemblyEntry>,
    rust_types: HashMap<TypeId, TypeHandle>,
}

impl TypeUniverse {
    pub fn builder() -> TypeUniverseBuilder {
        TypeUniverseBuilder::default()
    }

    /// Build a universe from the `[[assemblies]]` configuration section.
    pub fn from_config(assemblies: &[AssemblyConfig]) -> Result<Self, UniverseError> {
        let mut builder = Self::builder();
        for assembly in assemblies {
            let version = match assembly.version.as_deref() {
                None => None,
                Some(raw) => Some(raw.parse::<AssemblyVersion>().map_err(|_| {
                    UniverseError::InvalidVersion {
                        assembly: assembly.name.clone(),
                        version: raw.to_string(),
                    }
                })?),
            };
            builder = builder.assembly(AssemblyName::new(assembly.name.clone(), version), |a| {
                for declared in &assembly.types {
                    a.add_generic_definition(declared.full_name.clone(), declared.generic_arity);
                }
            });
        }
        builder.build()
    }

    /// Handle bound to the Rust type `T`, if declared.
    pub fn handle_of<T: 'static>(&self) -> Option<TypeHandle> {
        self.rust_types.get(&TypeId::of::<T>()).cloned()
    }

    /// Every declared type, in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeHandle> {
        self.assemblies.iter().flat_map(|a| a.types.iter())
    }

    /// First declared type with the given namespace-qualified name.
    pub fn find(&self, full_name: &str) -> Option<TypeHandle> {
        self.types().find(|t| t.full_name() == full_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.assemblies.iter().map(|a| a.types.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeCatalog for TypeUniverse {
    fn assemblies(&self) -> Vec<AssemblyName> {
        self.assemblies.iter().map(|a| a.name.clone()).collect()
    }

    fn types_in(&self, assembly: &AssemblyName) -> Result<Vec<TypeHandle>, TypeLoadError> {
        self.assemblies
            .iter()
            .find(|a| &a.name == assembly)
            .map(|a| a.types.clone())
            .ok_or_else(|| TypeLoadError {
                assembly: assembly.clone(),
                message: "assembly is not part of this universe".to_string(),
                loaded: Vec::new(),
            })
    }
}
