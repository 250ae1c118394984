//! Parameter descriptors: what each capture group of a rule decodes into.

use std::fmt;

use crate::descriptor::Interpretable;
use crate::ty::{TypeKey, TypeRef};
use crate::value::{collect_into, Collector};

/// Separator used by list parameters unless one is given.
pub const DEFAULT_SEPARATOR: &str = r",\s*";

/// One parameter of a recognition rule.
#[derive(Clone)]
pub enum ParameterDescriptor {
    /// A single value, decoded by the interpreter of `ty`.
    Scalar {
        name: String,
        ty: TypeRef,
        /// Replaces the rules of `ty` for this parameter only.
        pattern: Option<String>,
    },
    /// A homogeneous collection split out of one capture.
    Collection {
        name: String,
        item: TypeRef,
        container: TypeKey,
        separator: String,
        /// Replaces the rules of `item` for the items of this parameter.
        pattern: Option<String>,
        collect: Collector,
    },
}

/// Shorthand used when declaring forms: `Param::scalar::<i64>("x")`.
pub type Param = ParameterDescriptor;

impl ParameterDescriptor {
    pub fn scalar<T: Interpretable>(name: impl Into<String>) -> Self {
        ParameterDescriptor::Scalar {
            name: name.into(),
            ty: TypeRef::of::<T>(),
            pattern: None,
        }
    }

    /// A parameter of a type that is only interpretable through a registered
    /// interpreter.
    pub fn opaque<T: Send + 'static>(name: impl Into<String>) -> Self {
        ParameterDescriptor::Scalar {
            name: name.into(),
            ty: TypeRef::opaque::<T>(),
            pattern: None,
        }
    }

    /// A `Vec<T>` separated by [`DEFAULT_SEPARATOR`].
    pub fn list<T: Interpretable>(name: impl Into<String>) -> Self {
        Self::collection::<Vec<T>, T>(name, DEFAULT_SEPARATOR)
    }

    /// A `Vec<T>` separated by matches of `separator`.
    pub fn list_separated_by<T: Interpretable>(
        name: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        Self::collection::<Vec<T>, T>(name, separator)
    }

    /// Any container `C` collected from items of `T`, in input order.
    pub fn collection<C, T>(name: impl Into<String>, separator: impl Into<String>) -> Self
    where
        C: FromIterator<T> + Send + 'static,
        T: Interpretable,
    {
        ParameterDescriptor::Collection {
            name: name.into(),
            item: TypeRef::of::<T>(),
            container: TypeKey::of::<C>(),
            separator: separator.into(),
            pattern: None,
            collect: collect_into::<C, T>,
        }
    }

    /// Override the pattern used to decode this parameter (or, for
    /// collections, each of its items).
    #[must_use]
    pub fn with_pattern(mut self, override_pattern: impl Into<String>) -> Self {
        match &mut self {
            ParameterDescriptor::Scalar { pattern, .. }
            | ParameterDescriptor::Collection { pattern, .. } => {
                *pattern = Some(override_pattern.into());
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterDescriptor::Scalar { name, .. }
            | ParameterDescriptor::Collection { name, .. } => name,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            ParameterDescriptor::Scalar { pattern, .. }
            | ParameterDescriptor::Collection { pattern, .. } => pattern.as_deref(),
        }
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterDescriptor::Scalar { name, ty, pattern } => f
                .debug_struct("Scalar")
                .field("name", name)
                .field("ty", ty)
                .field("pattern", pattern)
                .finish(),
            ParameterDescriptor::Collection {
                name,
                item,
                container,
                separator,
                pattern,
                ..
            } => f
                .debug_struct("Collection")
                .field("name", name)
                .field("item", item)
                .field("container", container)
                .field("separator", separator)
                .field("pattern", pattern)
                .finish_non_exhaustive(),
        }
    }
}
