// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Assembly versions and names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Four-part assembly version (`major.minor.build.revision`).
///
/// Ordering is numeric and component-wise, so `9.0.0.0 < 10.0.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssemblyVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl AssemblyVersion {
    /// Version assumed for assemblies that carry none.
    pub const UNVERSIONED: AssemblyVersion = AssemblyVersion::new(0, 0, 0, 0);

    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid assembly version '{0}'")]
pub struct ParseVersionError(pub String);

impl FromStr for AssemblyVersion {
    type Err = ParseVersionError;

    /// Accepts one to four dot-separated components; missing ones are 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseVersionError(s.to_string()));
        }

        let mut parts = [0u32; 4];
        let mut count = 0;
        for component in trimmed.split('.') {
            if count == 4 {
                return Err(ParseVersionError(s.to_string()));
            }
            parts[count] = component
                .parse()
                .map_err(|_| ParseVersionError(s.to_string()))?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

/// Name and optional version of an assembly (a unit of type publication).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyName {
    pub name: String,
    pub version: Option<AssemblyVersion>,
}

impl AssemblyName {
    pub fn new(name: impl Into<String>, version: Option<AssemblyVersion>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn unversioned(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Version used for ordering; unversioned assemblies sort lowest.
    pub fn effective_version(&self) -> AssemblyVersion {
        self.version.unwrap_or(AssemblyVersion::UNVERSIONED)
    }
}

impl fmt::Display for AssemblyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "{}, Version={}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
