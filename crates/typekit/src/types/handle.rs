// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type handles.
//!
//! A [`TypeHandle`] is the in-process stand-in for a "loaded type". Named
//! types are minted once by a [`TypeUniverse`](super::TypeUniverse); arrays
//! and closed generics are derived from them on demand and compare equal
//! structurally, so `int[]` built twice is the same type.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::descriptor::TypeDescriptor;
use super::qualified_name::{join_full_name, QualifiedName, ARRAY_MARKER};
use super::version::AssemblyName;

/// Invalid type construction (closing a non-generic type, wrong arity).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeShapeError {
    #[error("type '{0}' is not a generic type definition")]
    NotGenericDefinition(String),

    #[error("generic type '{type_name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum TypeShape {
    Named {
        namespace: Option<String>,
        name: String,
        assembly: AssemblyName,
        generic_arity: usize,
    },
    Array {
        element: TypeHandle,
    },
    GenericInstance {
        definition: TypeHandle,
        arguments: Vec<TypeHandle>,
    },
}

#[derive(Debug)]
struct TypeInfo {
    shape: TypeShape,
    rust_type: Option<TypeId>,
}

/// Shared handle to a type known to the process.
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeInfo>);

impl TypeHandle {
    pub(crate) fn named(
        namespace: Option<String>,
        name: String,
        assembly: AssemblyName,
        generic_arity: usize,
        rust_type: Option<TypeId>,
    ) -> Self {
        Self(Arc::new(TypeInfo {
            shape: TypeShape::Named {
                namespace: namespace.filter(|ns| !ns.is_empty()),
                name,
                assembly,
                generic_arity,
            },
            rust_type,
        }))
    }

    fn derived(shape: TypeShape) -> Self {
        Self(Arc::new(TypeInfo {
            shape,
            rust_type: None,
        }))
    }

    pub fn namespace(&self) -> Option<&str> {
        match &self.0.shape {
            TypeShape::Named { namespace, .. } => namespace.as_deref(),
            TypeShape::Array { element } => element.namespace(),
            TypeShape::GenericInstance { definition, .. } => definition.namespace(),
        }
    }

    /// Simple name: `Int32`, ``List`1``, `Int32[]`.
    pub fn name(&self) -> String {
        match &self.0.shape {
            TypeShape::Named { name, .. } => name.clone(),
            TypeShape::Array { element } => format!("{}{}", element.name(), ARRAY_MARKER),
            TypeShape::GenericInstance { definition, .. } => definition.name(),
        }
    }

    /// Namespace-qualified name without generic arguments.
    pub fn full_name(&self) -> String {
        join_full_name(self.namespace(), &self.name())
    }

    pub fn assembly(&self) -> &AssemblyName {
        match &self.0.shape {
            TypeShape::Named { assembly, .. } => assembly,
            TypeShape::Array { element } => element.assembly(),
            TypeShape::GenericInstance { definition, .. } => definition.assembly(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        match &self.0.shape {
            TypeShape::Named {
                namespace,
                name,
                assembly,
                ..
            } => QualifiedName {
                full_name: join_full_name(namespace.as_deref(), name),
                generic_arguments: Vec::new(),
                array_rank: 0,
                assembly: Some(assembly.clone()),
            },
            TypeShape::Array { element } => {
                let mut qualified = element.qualified_name();
                qualified.array_rank += 1;
                qualified
            }
            TypeShape::GenericInstance {
                definition,
                arguments,
            } => {
                let mut qualified = definition.qualified_name();
                qualified.generic_arguments =
                    arguments.iter().map(TypeHandle::qualified_name).collect();
                qualified
            }
        }
    }

    pub fn assembly_qualified_name(&self) -> String {
        self.qualified_name().to_string()
    }

    pub fn rust_type_id(&self) -> Option<TypeId> {
        self.0.rust_type
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.shape, TypeShape::Array { .. })
    }

    pub fn is_generic_definition(&self) -> bool {
        matches!(self.0.shape, TypeShape::Named { generic_arity, .. } if generic_arity > 0)
    }

    pub fn is_closed_generic(&self) -> bool {
        matches!(self.0.shape, TypeShape::GenericInstance { .. })
    }

    pub fn element_type(&self) -> Option<&TypeHandle> {
        match &self.0.shape {
            TypeShape::Array { element } => Some(element),
            _ => None,
        }
    }

    pub fn generic_definition(&self) -> Option<&TypeHandle> {
        match &self.0.shape {
            TypeShape::GenericInstance { definition, .. } => Some(definition),
            _ => None,
        }
    }

    pub fn generic_arguments(&self) -> &[TypeHandle] {
        match &self.0.shape {
            TypeShape::GenericInstance { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Number of type parameters of a generic definition (0 otherwise).
    pub fn generic_arity(&self) -> usize {
        match &self.0.shape {
            TypeShape::Named { generic_arity, .. } => *generic_arity,
            _ => 0,
        }
    }

    /// One-dimensional array whose elements are of this type.
    pub fn array_of(&self) -> TypeHandle {
        Self::derived(TypeShape::Array {
            element: self.clone(),
        })
    }

    /// Close this generic definition over `arguments`.
    pub fn make_generic(&self, arguments: Vec<TypeHandle>) -> Result<TypeHandle, TypeShapeError> {
        let expected = self.generic_arity();
        if expected == 0 {
            return Err(TypeShapeError::NotGenericDefinition(self.full_name()));
        }
        if arguments.len() != expected {
            return Err(TypeShapeError::ArityMismatch {
                type_name: self.full_name(),
                expected,
                actual: arguments.len(),
            });
        }
        Ok(Self::derived(TypeShape::GenericInstance {
            definition: self.clone(),
            arguments,
        }))
    }

    /// Source-like rendering: `Int32`, `List<Int32>`, `Dictionary<,>`, `Int32[]`.
    pub fn readable_name(&self) -> String {
        match &self.0.shape {
            TypeShape::Named {
                name,
                generic_arity,
                ..
            } => {
                if *generic_arity == 0 {
                    name.clone()
                } else {
                    format!(
                        "{}<{}>",
                        strip_arity(name),
                        ",".repeat(generic_arity - 1)
                    )
                }
            }
            TypeShape::Array { element } => format!("{}{}", element.readable_name(), ARRAY_MARKER),
            TypeShape::GenericInstance {
                definition,
                arguments,
            } => {
                let arguments: Vec<String> =
                    arguments.iter().map(TypeHandle::readable_name).collect();
                format!(
                    "{}<{}>",
                    strip_arity(&definition.name()),
                    arguments.join(", ")
                )
            }
        }
    }

    pub fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::from_handle(self)
    }
}

fn strip_arity(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.shape == other.0.shape
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.shape.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({})", self.assembly_qualified_name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::version::AssemblyVersion;

    fn mscorlib() -> AssemblyName {
        AssemblyName::new("mscorlib", Some(AssemblyVersion::new(4, 0, 0, 0)))
    }

    fn int32() -> TypeHandle {
        TypeHandle::named(Some("System".into()), "Int32".into(), mscorlib(), 0, None)
    }

    fn list() -> TypeHandle {
        TypeHandle::named(
            Some("System.Collections.Generic".into()),
            "List`1".into(),
            mscorlib(),
            1,
            None,
        )
    }

    #[test]
    fn named_type_names() {
        let t = int32();
        assert_eq!(t.full_name(), "System.Int32");
        assert_eq!(
            t.assembly_qualified_name(),
            "System.Int32, mscorlib, Version=4.0.0.0"
        );
        assert_eq!(t.readable_name(), "Int32");
    }

    #[test]
    fn array_types_compare_structurally() {
        let a = int32().array_of();
        let b = int32().array_of();
        assert_eq!(a, b);
        assert_eq!(a.name(), "Int32[]");
        assert_eq!(
            a.assembly_qualified_name(),
            "System.Int32[], mscorlib, Version=4.0.0.0"
        );
        assert_eq!(a.element_type(), Some(&int32()));
    }

    #[test]
    fn closed_generic_names() {
        let closed = list().make_generic(vec![int32()]).unwrap();
        assert!(closed.is_closed_generic());
        assert_eq!(closed.name(), "List`1");
        assert_eq!(closed.readable_name(), "List<Int32>");
        assert_eq!(
            closed.assembly_qualified_name(),
            "System.Collections.Generic.List`1[[System.Int32, mscorlib, Version=4.0.0.0]], mscorlib, Version=4.0.0.0"
        );
        assert_eq!(closed.array_of().readable_name(), "List<Int32>[]");
        assert_eq!(list().readable_name(), "List<>");
    }

    #[test]
    fn make_generic_checks_shape() {
        assert_eq!(
            int32().make_generic(vec![int32()]),
            Err(TypeShapeError::NotGenericDefinition("System.Int32".into()))
        );
        assert!(matches!(
            list().make_generic(vec![int32(), int32()]),
            Err(TypeShapeError::ArityMismatch { expected: 1, actual: 2, .. })
        ));
    }
}
