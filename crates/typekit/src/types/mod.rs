// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type description and resolution.
//!
//! # Overview
//!
//! - [`TypeHandle`]: an in-process type (named, array, or closed generic)
//! - [`TypeDescriptor`]: its flat, serializable description
//!   `{namespace, name, assembly_qualified_name}`
//! - [`TypeUniverse`]: the explicitly declared set of known types
//! - [`TypeResolver`]: descriptor -> handle, memoized in a
//!   [`TypeResolutionCache`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typekit::types::{AssemblyName, TypeResolver, TypeUniverse};
//!
//! struct Widget;
//!
//! let universe = TypeUniverse::builder()
//!     .assembly(AssemblyName::unversioned("Acme"), |a| {
//!         a.add_rust_type::<Widget>("Acme.Widget");
//!     })
//!     .build()
//!     .unwrap();
//! let widget = universe.handle_of::<Widget>().unwrap();
//! let descriptor = widget.describe();
//!
//! let resolver = TypeResolver::new(Arc::new(universe));
//! assert_eq!(resolver.resolve_default(&descriptor).unwrap(), Some(widget));
//! ```

mod cache;
mod descriptor;
mod handle;
mod qualified_name;
mod resolver;
mod universe;
mod version;

pub use cache::{CacheStats, TypeResolutionCache};
pub use descriptor::{TypeDescriptor, TypeMatchStrategy};
pub use handle::{TypeHandle, TypeShapeError};
pub use qualified_name::{QualifiedName, QualifiedNameError, ARRAY_MARKER};
pub use resolver::{MultipleMatchStrategy, ResolveError, TypeResolver};
pub use universe::{
    AssemblyBuilder, TypeCatalog, TypeLoadError, TypeUniverse, TypeUniverseBuilder, UniverseError,
};
pub use version::{AssemblyName, AssemblyVersion, ParseVersionError};
