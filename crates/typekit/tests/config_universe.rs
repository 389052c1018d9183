// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Configuration file integration tests
//!
//! Loads a TOML file from disk and wires its sections into a universe,
//! a resolver and a protocol registry.

use std::io::Write;
use std::sync::Arc;

use typekit::config::{ConfigError, TypekitConfig};
use typekit::protocol::{
    Capabilities, CollisionStrategy, DeclaresOperations, Executes, Operation, Protocol,
    ProtocolError, ProtocolFactory, ProtocolRegistration, ProtocolRegistry, ReturningOperation,
};
use typekit::types::{AssemblyVersion, TypeDescriptor, TypeResolver};

const CONFIG: &str = r#"
[resolver]
match_strategy = "namespace_and_name"
multiple_match_strategy = "newest_version"

[protocols]
collision_strategy = "skip"

[[assemblies]]
name = "Acme.Widgets"
version = "1.0"
types = [{ full_name = "Acme.Widgets.Widget" }]

[[assemblies]]
name = "Acme.Widgets"
version = "2.1"
types = [
    { full_name = "Acme.Widgets.Widget" },
    { full_name = "Acme.Widgets.Box", generic_arity = 1 },
]
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(CONFIG);
    let config = TypekitConfig::from_file(file.path()).expect("load");

    assert_eq!(config.protocols.collision_strategy, CollisionStrategy::Skip);
    assert_eq!(config.assemblies.len(), 2);
    assert_eq!(config.assemblies[1].types.len(), 2);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = TypekitConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_file_rejected() {
    let file = write_config("[[assemblies]]\nname = \"\"\n");
    let err = TypekitConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_configured_resolver_prefers_newest() {
    let file = write_config(CONFIG);
    let config = TypekitConfig::from_file(file.path()).expect("load");
    let universe = Arc::new(config.build_universe().expect("universe"));
    assert_eq!(universe.len(), 3);

    let resolver = TypeResolver::with_config(universe, &config.resolver);
    let descriptor = TypeDescriptor::new(Some("Acme.Widgets"), "Widget", None::<String>);

    let resolved = resolver
        .resolve_default(&descriptor)
        .expect("resolve")
        .expect("found");
    assert_eq!(
        resolved.assembly().version,
        Some(AssemblyVersion::new(2, 1, 0, 0))
    );

    let generic = resolver
        .resolve_default(&TypeDescriptor::new(
            Some("Acme.Widgets"),
            "Box`1",
            None::<String>,
        ))
        .expect("resolve")
        .expect("found");
    assert!(generic.is_generic_definition());
    assert_eq!(generic.generic_arity(), 1);
}

#[test]
fn test_default_resolver_rejects_ambiguity() {
    let config = TypekitConfig::from_toml_str(CONFIG).expect("parse");
    let resolver = TypeResolver::new(Arc::new(config.build_universe().expect("universe")));
    let descriptor = TypeDescriptor::new(Some("Acme.Widgets"), "Widget", None::<String>);

    let err = resolver.resolve_default(&descriptor).unwrap_err();
    assert!(err.to_string().contains("Version=1.0.0.0"), "{}", err);
    assert!(err.to_string().contains("Version=2.1.0.0"), "{}", err);
}

// ---- protocol defaults ----

#[derive(Debug)]
struct Ping;
impl Operation for Ping {}
impl ReturningOperation for Ping {
    type Output = u8;
}

struct First;
impl Protocol for First {}
impl Executes<Ping> for First {
    fn execute(&self, _: &Ping) -> Result<u8, ProtocolError> {
        Ok(1)
    }
}
impl DeclaresOperations for First {
    fn declare(caps: &mut Capabilities<Self>) {
        caps.executes::<Ping>();
    }
}

struct Second;
impl Protocol for Second {}
impl Executes<Ping> for Second {
    fn execute(&self, _: &Ping) -> Result<u8, ProtocolError> {
        Ok(2)
    }
}
impl DeclaresOperations for Second {
    fn declare(caps: &mut Capabilities<Self>) {
        caps.executes::<Ping>();
    }
}

#[test]
fn test_configured_registry_skips_collisions() {
    let config = TypekitConfig::from_toml_str(CONFIG).expect("parse");
    let registry = ProtocolRegistry::with_config(&config.protocols);
    assert_eq!(registry.collision_strategy(), CollisionStrategy::Skip);

    registry
        .register(ProtocolRegistration::new(|| First))
        .expect("first");
    registry
        .register(ProtocolRegistration::new(|| Second))
        .expect("second is skipped");
    assert_eq!(registry.execute_operation(&Ping).expect("run"), 1);
}
