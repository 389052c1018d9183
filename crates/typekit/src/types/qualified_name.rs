// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Assembly-qualified name parsing.
//!
//! Grammar (whitespace around separators is ignored):
//!
//! ```text
//! qualified  := type_part [ "," assembly { "," key "=" value } ]
//! type_part  := full_name [ "[" "[" qualified "]" { "," "[" qualified "]" } "]" ] { "[]" }
//! ```
//!
//! Only the `Version` key is interpreted; other keys (`Culture`,
//! `PublicKeyToken`, ...) are accepted and dropped.

use std::fmt;

use super::version::{AssemblyName, AssemblyVersion};

/// Marker appended to a type name to denote a one-dimensional array.
pub const ARRAY_MARKER: &str = "[]";

/// Malformed qualified name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed qualified name '{input}': {reason}")]
pub struct QualifiedNameError {
    pub input: String,
    pub reason: &'static str,
}

impl QualifiedNameError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A parsed assembly-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Namespace-qualified name without generic arguments or array markers.
    pub full_name: String,
    /// Qualified names of the generic arguments, outermost first.
    pub generic_arguments: Vec<QualifiedName>,
    /// Number of trailing `[]` markers.
    pub array_rank: usize,
    pub assembly: Option<AssemblyName>,
}

impl QualifiedName {
    pub fn parse(input: &str) -> Result<Self, QualifiedNameError> {
        let segments = split_top_level(input, ',');
        let type_part = segments
            .first()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| QualifiedNameError::new(input, "missing type name"))?;

        let assembly = match segments.get(1).map(|s| s.trim()) {
            None => None,
            Some("") => return Err(QualifiedNameError::new(input, "blank assembly name")),
            Some(name) => {
                let mut version = None;
                for attribute in &segments[2..] {
                    let (key, value) = attribute
                        .split_once('=')
                        .ok_or_else(|| QualifiedNameError::new(input, "expected key=value"))?;
                    if key.trim().eq_ignore_ascii_case("version") {
                        let parsed: AssemblyVersion = value
                            .trim()
                            .parse()
                            .map_err(|_| QualifiedNameError::new(input, "invalid version"))?;
                        version = Some(parsed);
                    }
                }
                Some(AssemblyName::new(name, version))
            }
        };

        let mut rest = type_part;
        let mut array_rank = 0;
        while let Some(stripped) = rest.strip_suffix(ARRAY_MARKER) {
            rest = stripped.trim_end();
            array_rank += 1;
        }

        let (full_name, generic_arguments) = match rest.find('[') {
            None => (rest, Vec::new()),
            Some(open) => {
                let inner = rest[open..]
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| QualifiedNameError::new(input, "unbalanced brackets"))?;
                let mut arguments = Vec::new();
                for item in split_top_level(inner, ',') {
                    let item = item.trim();
                    let argument = item
                        .strip_prefix('[')
                        .and_then(|s| s.strip_suffix(']'))
                        .ok_or_else(|| {
                            QualifiedNameError::new(input, "generic argument must be bracketed")
                        })?;
                    arguments.push(QualifiedName::parse(argument)?);
                }
                if arguments.is_empty() {
                    return Err(QualifiedNameError::new(input, "empty generic argument list"));
                }
                (rest[..open].trim_end(), arguments)
            }
        };

        if full_name.is_empty() {
            return Err(QualifiedNameError::new(input, "missing type name"));
        }

        Ok(Self {
            full_name: full_name.to_string(),
            generic_arguments,
            array_rank,
            assembly,
        })
    }

    /// Namespace portion of the full name (text before the last `.`).
    pub fn namespace(&self) -> Option<&str> {
        split_full_name(&self.full_name).0
    }

    /// Simple name including any array markers, e.g. ``List`1[]``.
    pub fn name(&self) -> String {
        let mut name = split_full_name(&self.full_name).1.to_string();
        for _ in 0..self.array_rank {
            name.push_str(ARRAY_MARKER);
        }
        name
    }

    pub fn is_array(&self) -> bool {
        self.array_rank > 0
    }

    pub fn is_closed_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// Same name with one array marker removed.
    pub fn element(&self) -> Option<QualifiedName> {
        if self.array_rank == 0 {
            return None;
        }
        let mut element = self.clone();
        element.array_rank -= 1;
        Some(element)
    }

    /// Generic definition of a closed generic name (arguments and markers dropped).
    pub fn definition(&self) -> QualifiedName {
        QualifiedName {
            full_name: self.full_name.clone(),
            generic_arguments: Vec::new(),
            array_rank: 0,
            assembly: self.assembly.clone(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)?;
        if !self.generic_arguments.is_empty() {
            f.write_str("[")?;
            for (i, argument) in self.generic_arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "[{}]", argument)?;
            }
            f.write_str("]")?;
        }
        for _ in 0..self.array_rank {
            f.write_str(ARRAY_MARKER)?;
        }
        if let Some(assembly) = &self.assembly {
            write!(f, ", {}", assembly)?;
        }
        Ok(())
    }
}

/// Split `Namespace.Sub.Name` into `(Some("Namespace.Sub"), "Name")`.
pub fn split_full_name(full_name: &str) -> (Option<&str>, &str) {
    match full_name.rfind('.') {
        Some(dot) if dot > 0 => (Some(&full_name[..dot]), &full_name[dot + 1..]),
        _ => (None, full_name),
    }
}

/// Join a namespace and simple name back into a full name.
pub fn join_full_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
