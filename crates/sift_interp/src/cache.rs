//! Memoizing interpreter cache with cycle-safe construction.
//!
//! Interpreters are expensive to build (pattern compilation, recursive
//! assembly of parameter interpreters), so every built interpreter is stored
//! under a structural [`CacheKey`] and shared for the life of the cache.
//!
//! # Recursion
//!
//! Building the interpreter for a recursive type requests the interpreter for
//! that same type before the first request has finished. Each top-level
//! construction carries a [`BuildSession`] recording the keys currently being
//! built on that call chain; a request for one of them yields a
//! [`DeferredInterpreter`], which looks the real interpreter up on first use.
//!
//! # Concurrency
//!
//! The map is a `DashMap`, and no map guard is held while building. Two
//! threads missing on the same key may both build; the first install wins and
//! both return the installed instance.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashSet};
use sift_rules::{AnyValue, BuildError, TypeKey};

use crate::error::InterpretationError;
use crate::interpret::{DynInterpreter, Interpret};

/// Structural identity of a memoized interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A type, optionally narrowed by an override pattern.
    Type {
        ty: TypeKey,
        pattern: Option<Box<str>>,
    },
    /// A split-then-map collection of `item` values.
    Collection {
        container: TypeKey,
        item: TypeKey,
        separator: Box<str>,
        /// Override pattern applied to each item.
        pattern: Option<Box<str>>,
    },
}

impl CacheKey {
    pub fn of_type(ty: TypeKey, pattern: Option<&str>) -> Self {
        CacheKey::Type {
            ty,
            pattern: pattern.map(Box::from),
        }
    }

    pub fn collection(
        container: TypeKey,
        item: TypeKey,
        separator: &str,
        pattern: Option<&str>,
    ) -> Self {
        CacheKey::Collection {
            container,
            item,
            separator: Box::from(separator),
            pattern: pattern.map(Box::from),
        }
    }

    /// Name of the type whose values the keyed interpreter produces.
    pub fn type_name(&self) -> &'static str {
        match self {
            CacheKey::Type { ty, .. } => ty.name(),
            CacheKey::Collection { container, .. } => container.name(),
        }
    }
}

type InterpreterMap = DashMap<CacheKey, DynInterpreter, FxBuildHasher>;

/// Keys under construction on one call chain.
///
/// Created by the top-level request and threaded through every nested
/// request; never shared between threads.
#[derive(Debug, Default)]
pub struct BuildSession {
    in_flight: FxHashSet<CacheKey>,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_building(&self, key: &CacheKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Number of constructions currently nested on this chain.
    pub fn depth(&self) -> usize {
        self.in_flight.len()
    }
}

/// Concurrent map from [`CacheKey`] to built interpreter.
///
/// Clones share storage.
#[derive(Clone)]
pub struct InterpreterCache {
    entries: Arc<InterpreterMap>,
}

impl InterpreterCache {
    pub fn new() -> Self {
        InterpreterCache {
            entries: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    /// Install `interpreter` under `key`, replacing any previous entry.
    ///
    /// This is the only way an existing entry changes. Deferred interpreters
    /// already bound to a replaced entry rebind on their next use.
    pub fn register(&self, key: CacheKey, interpreter: DynInterpreter) {
        tracing::debug!(key = ?key, "registered interpreter");
        self.entries.insert(key, interpreter);
    }

    pub fn get(&self, key: &CacheKey) -> Option<DynInterpreter> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A handle that keeps this cache's storage alive.
    pub fn anchor(&self) -> CacheAnchor {
        CacheAnchor(Arc::clone(&self.entries))
    }

    /// Return the interpreter for `key`, building it with `build` on a miss.
    ///
    /// - cached: the cached instance
    /// - already being built on this chain: a [`DeferredInterpreter`]
    /// - otherwise: `build` runs once with `key` marked in `session`, and its
    ///   result is installed unless another thread installed first
    ///
    /// A failed build is returned to the caller and leaves no entry behind.
    pub fn resolve<F>(
        &self,
        key: CacheKey,
        session: &mut BuildSession,
        build: F,
    ) -> Result<DynInterpreter, BuildError>
    where
        F: FnOnce(&mut BuildSession) -> Result<DynInterpreter, BuildError>,
    {
        // Fast path: already built
        if let Some(found) = self.get(&key) {
            tracing::trace!(key = ?key, "cache hit");
            return Ok(found);
        }

        if session.is_building(&key) {
            tracing::debug!(key = ?key, "recursive request, deferring");
            return Ok(Arc::new(DeferredInterpreter::new(
                Arc::downgrade(&self.entries),
                key,
            )));
        }

        // Slow path: build with the key marked in flight
        session.in_flight.insert(key.clone());
        let built = build(session);
        session.in_flight.remove(&key);

        match built {
            Ok(interpreter) => {
                let installed =
                    Arc::clone(self.entries.entry(key.clone()).or_insert(interpreter).value());
                tracing::debug!(key = ?key, "installed interpreter");
                Ok(installed)
            }
            Err(err) => {
                tracing::debug!(key = ?key, error = %err, "build failed");
                Err(err)
            }
        }
    }
}

impl Default for InterpreterCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InterpreterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Keeps a cache's storage alive so that deferred interpreters inside
/// handed-out interpreters can still resolve.
#[derive(Clone)]
pub struct CacheAnchor(Arc<InterpreterMap>);

impl std::fmt::Debug for CacheAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CacheAnchor").field(&self.0.len()).finish()
    }
}

/// Stand-in for an interpreter whose construction was still in progress
/// when it was requested.
///
/// On first use it looks its key up in the cache and binds to the result.
/// The binding is weak: the real interpreter usually contains this proxy,
/// and the cache owns the real interpreter.
pub struct DeferredInterpreter {
    entries: Weak<InterpreterMap>,
    key: CacheKey,
    target: RwLock<Option<Weak<dyn Interpret>>>,
}

impl DeferredInterpreter {
    fn new(entries: Weak<InterpreterMap>, key: CacheKey) -> Self {
        DeferredInterpreter {
            entries,
            key,
            target: RwLock::new(None),
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    fn target(&self) -> Result<DynInterpreter, InterpretationError> {
        if let Some(bound) = self.target.read().as_ref().and_then(Weak::upgrade) {
            return Ok(bound);
        }

        let unresolved = || InterpretationError::Unresolved {
            type_name: self.key.type_name(),
        };
        let entries = self.entries.upgrade().ok_or_else(unresolved)?;
        let target = entries
            .get(&self.key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(unresolved)?;
        *self.target.write() = Some(Arc::downgrade(&target));
        Ok(target)
    }
}

impl Interpret for DeferredInterpreter {
    fn interpret_raw(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError> {
        self.target()?.interpret_raw(input)
    }
}

impl std::fmt::Debug for DeferredInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredInterpreter")
            .field("key", &self.key)
            .field("bound", &self.target.read().is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
