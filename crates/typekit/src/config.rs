// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Library configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! [resolver]
//! match_strategy = "namespace_and_name"
//! multiple_match_strategy = "newest_version"
//!
//! [protocols]
//! collision_strategy = "throw"
//!
//! [[assemblies]]
//! name = "Acme.Widgets"
//! version = "2.1.0.0"
//! types = [
//!     { full_name = "Acme.Widgets.Widget" },
//!     { full_name = "Acme.Widgets.Box", generic_arity = 1 },
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::CollisionStrategy;
use crate::types::{
    AssemblyVersion, MultipleMatchStrategy, TypeMatchStrategy, TypeUniverse, UniverseError,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid type universe: {0}")]
    Universe(#[from] UniverseError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypekitConfig {
    /// Default strategies of the type resolver.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Defaults of protocol registries.
    #[serde(default)]
    pub protocols: ProtocolConfig,

    /// Declared type universe.
    #[serde(default)]
    pub assemblies: Vec<AssemblyConfig>,
}

impl TypekitConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut assemblies = HashSet::new();

        for (i, assembly) in self.assemblies.iter().enumerate() {
            if assembly.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Assembly {} has an empty name",
                    i
                )));
            }

            let version = match assembly.version.as_deref() {
                None => None,
                Some(raw) => Some(raw.parse::<AssemblyVersion>().map_err(|_| {
                    ConfigError::Invalid(format!(
                        "Assembly '{}' has invalid version '{}'",
                        assembly.name, raw
                    ))
                })?),
            };
            if !assemblies.insert((assembly.name.as_str(), version)) {
                return Err(ConfigError::Invalid(format!(
                    "Assembly '{}' is declared more than once",
                    assembly.name
                )));
            }

            let mut types = HashSet::new();
            for declared in &assembly.types {
                if declared.full_name.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "Assembly '{}' declares a type with an empty name",
                        assembly.name
                    )));
                }
                if !types.insert(declared.full_name.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "Assembly '{}' declares type '{}' more than once",
                        assembly.name, declared.full_name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build the declared type universe.
    pub fn build_universe(&self) -> Result<TypeUniverse, ConfigError> {
        self.validate()?;
        Ok(TypeUniverse::from_config(&self.assemblies)?)
    }
}

/// Type resolver defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub match_strategy: TypeMatchStrategy,

    #[serde(default)]
    pub multiple_match_strategy: MultipleMatchStrategy,
}

/// Protocol registry defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Applied by `ProtocolRegistry::register`.
    #[serde(default)]
    pub collision_strategy: CollisionStrategy,
}

/// One declared assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    pub name: String,

    /// `major[.minor[.build[.revision]]]`; absent means unversioned.
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub types: Vec<DeclaredType>,
}

/// One declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Namespace-qualified name, e.g. `Acme.Widgets.Widget`.
    pub full_name: String,

    /// Number of type parameters; 0 for non-generic types.
    #[serde(default)]
    pub generic_arity: usize,
}
