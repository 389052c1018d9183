// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors, known-type resolution, protocol dispatch and
//! expression descriptions.
//!
//! # Features
//!
//! - **Type resolution**: describe in-process types as serializable
//!   descriptors and resolve them back against a declared type universe,
//!   with array unwrapping, generic closing and version-aware collision
//!   strategies
//! - **Protocol dispatch**: map operation types to the protocols that
//!   execute them, with collision policies and chain-of-responsibility
//!   fallback
//! - **Expression descriptions**: serializable expression trees, structural
//!   traversal and evaluation of simple lambdas
//! - **Model contract**: self-validation and described serialization
//!
//! # Architecture
//!
//! ```text
//!   TypeHandle --describe--> TypeDescriptor --resolve--> TypeHandle
//!                                  |                         ^
//!                                  v                         |
//!                          TypeResolver --(cache)--> TypeCatalog (TypeUniverse)
//!
//!   Operation --> ProtocolFactory (ProtocolRegistry | Chain) --> Protocol
//! ```

pub mod config;
pub mod expression;
pub mod model;
pub mod protocol;
pub mod types;

pub use config::{ConfigError, TypekitConfig};
pub use expression::{Expression, ExpressionDescription};
pub use model::{ModelObject, SelfValidating};
pub use protocol::{ProtocolFactory, ProtocolRegistry};
pub use types::{TypeDescriptor, TypeHandle, TypeResolver, TypeUniverse};
