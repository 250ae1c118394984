//! Typed interpreter handles.

use std::marker::PhantomData;
use std::sync::Arc;

use sift_rules::TypeKey;

use crate::cache::CacheAnchor;
use crate::error::InterpretationError;
use crate::interpret::DynInterpreter;
use crate::leaf::leaf;

/// Decodes strings into `T`.
///
/// Handles obtained from a context keep that context's cache alive, so
/// recursive interpreters inside them stay resolvable after the context
/// itself is dropped. Clones share the underlying interpreter.
pub struct Interpreter<T> {
    raw: DynInterpreter,
    ty: TypeKey,
    anchor: Option<CacheAnchor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Interpreter<T> {
    pub(crate) fn new(raw: DynInterpreter, anchor: Option<CacheAnchor>) -> Self {
        Interpreter {
            raw,
            ty: TypeKey::of::<T>(),
            anchor,
            _marker: PhantomData,
        }
    }

    /// A standalone interpreter backed by `decode`, for registration.
    pub fn from_fn<F>(decode: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Self::new(leaf(decode), None)
    }

    /// Wrap an erased interpreter whose values are `T`s.
    ///
    /// A value of any other type is reported as
    /// [`InterpretationError::UnexpectedValue`] when decoded.
    pub fn from_raw(raw: DynInterpreter) -> Self {
        Self::new(raw, None)
    }

    /// Decode `input`, returning `Ok(None)` when no rule matches it.
    pub fn try_interpret(&self, input: &str) -> Result<Option<T>, InterpretationError> {
        let Some(value) = self.raw.interpret_raw(input)? else {
            return Ok(None);
        };
        value
            .downcast::<T>()
            .map(|value| Some(*value))
            .map_err(|_| InterpretationError::UnexpectedValue {
                type_name: self.ty.name(),
            })
    }

    /// Decode `input`, failing with [`InterpretationError::NoMatch`] when no
    /// rule matches it.
    pub fn interpret(&self, input: &str) -> Result<T, InterpretationError> {
        self.try_interpret(input)?
            .ok_or_else(|| InterpretationError::NoMatch {
                type_name: self.ty.name(),
                input: input.to_owned(),
            })
    }

    /// Decode every input in order, stopping at the first failure.
    pub fn interpret_all<I>(&self, inputs: I) -> Result<Vec<T>, InterpretationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        inputs
            .into_iter()
            .map(|input| self.interpret(input.as_ref()))
            .collect()
    }

    /// The type this interpreter produces.
    pub fn target(&self) -> TypeKey {
        self.ty
    }

    pub fn into_raw(self) -> DynInterpreter {
        self.raw
    }

    /// Whether both handles share one underlying interpreter.
    pub fn same_as(&self, other: &Interpreter<T>) -> bool {
        Arc::ptr_eq(&self.raw, &other.raw)
    }
}

impl<T> Clone for Interpreter<T> {
    fn clone(&self) -> Self {
        Interpreter {
            raw: Arc::clone(&self.raw),
            ty: self.ty,
            anchor: self.anchor.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Interpreter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("target", &self.ty)
            .field("anchored", &self.anchor.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
