//! Type identity for interpreter construction.
//!
//! `TypeKey` is the structural identity used by caches and error messages.
//! `TypeRef` pairs a key with the means to obtain the type's shape, which is
//! what lets the engine recurse from a parameter into the parameter's own type
//! without knowing that type statically.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::descriptor::{Interpretable, Shape};

/// Identity of a target type.
///
/// Equality and hashing use only the `TypeId`; the name is carried for
/// diagnostics.
#[derive(Copy, Clone)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A reference to a target type that can produce the type's shape on demand.
///
/// Parameter descriptors hold `TypeRef`s, so a rule for `Line` can name its
/// `Point` parameters without the engine being generic over `Point`.
#[derive(Copy, Clone)]
pub struct TypeRef {
    key: TypeKey,
    shape: fn() -> Shape,
}

impl TypeRef {
    /// Reference to a type with a descriptor table.
    pub fn of<T: Interpretable>() -> Self {
        TypeRef {
            key: TypeKey::of::<T>(),
            shape: described_shape::<T>,
        }
    }

    /// Reference to a type without a descriptor table.
    ///
    /// Such a type can only be interpreted through an interpreter registered
    /// with the context, which is how foreign types (UUIDs, timestamps, ...)
    /// take part in rules.
    pub fn opaque<T: Send + 'static>() -> Self {
        TypeRef {
            key: TypeKey::of::<T>(),
            shape: opaque_shape,
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Build the type's shape. Shapes are rebuilt on every call.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.key.name())
    }
}

fn described_shape<T: Interpretable>() -> Shape {
    T::descriptor().into_shape()
}

fn opaque_shape() -> Shape {
    Shape::Opaque
}
