//! Construction contexts: recursive assembly of interpreters from rules.
//!
//! A context pairs an [`InterpreterCache`] with a [`RuleProvider`]. Asking it
//! for the interpreter of a type:
//!
//! 1. looks the type (and override pattern) up in the cache
//! 2. on a miss, asks the provider for the type's rules
//! 3. resolves an interpreter for every parameter of every rule, recursing
//!    through this same process
//! 4. wraps each rule in an [`InstanceBuilder`] and the lot in a
//!    [`FirstMatchDispatcher`], which is cached and returned
//!
//! Interpreters registered with the context sit in the cache under the
//! type's plain key, so they win over derived rules both at the top level
//! and for every parameter of that type.

use std::sync::Arc;

use sift_rules::{
    BuildError, DescriptorProvider, Interpretable, ParameterDescriptor, RecognitionRule,
    RuleProvider, TypeKey, TypeRef,
};

use crate::builder::InstanceBuilder;
use crate::cache::{BuildSession, CacheKey, InterpreterCache};
use crate::collection::{compile_separator, CollectionInterpreter};
use crate::dispatch::FirstMatchDispatcher;
use crate::error::Error;
use crate::extract::{BoundParameter, ParameterValueExtractor};
use crate::interpret::DynInterpreter;
use crate::interpreter::Interpreter;
use crate::leaf::seed_primitives;

/// Builds, caches and hands out interpreters.
///
/// Clones share the cache and the provider.
#[derive(Clone)]
pub struct InterpretationContext {
    cache: InterpreterCache,
    provider: Arc<dyn RuleProvider>,
}

/// Configures an [`InterpretationContext`].
pub struct ContextBuilder {
    provider: Arc<dyn RuleProvider>,
    seed_primitives: bool,
}

impl ContextBuilder {
    /// Take rules from `provider` instead of descriptor tables.
    #[must_use]
    pub fn provider(self, provider: impl RuleProvider + 'static) -> Self {
        self.shared_provider(Arc::new(provider))
    }

    #[must_use]
    pub fn shared_provider(mut self, provider: Arc<dyn RuleProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Start with an empty cache: primitives must then be registered or
    /// come from the provider.
    #[must_use]
    pub fn without_primitives(mut self) -> Self {
        self.seed_primitives = false;
        self
    }

    pub fn build(self) -> InterpretationContext {
        let cache = InterpreterCache::new();
        if self.seed_primitives {
            seed_primitives(&cache);
        }
        InterpretationContext {
            cache,
            provider: self.provider,
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        ContextBuilder {
            provider: Arc::new(DescriptorProvider),
            seed_primitives: true,
        }
    }
}

impl InterpretationContext {
    /// A context seeded with the primitive leaves, deriving rules from
    /// descriptor tables.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    pub fn cache(&self) -> &InterpreterCache {
        &self.cache
    }

    pub fn provider(&self) -> &dyn RuleProvider {
        &*self.provider
    }

    /// The interpreter for `T`.
    pub fn interpreter<T: Interpretable>(&self) -> Result<Interpreter<T>, BuildError> {
        self.typed(&TypeRef::of::<T>(), None)
    }

    /// The interpreter for `T` with its default pattern replaced by `pattern`.
    pub fn interpreter_with_pattern<T: Interpretable>(
        &self,
        pattern: &str,
    ) -> Result<Interpreter<T>, BuildError> {
        self.typed(&TypeRef::of::<T>(), Some(pattern))
    }

    /// The interpreter for a type without a descriptor table, which must have
    /// been registered.
    pub fn leaf_interpreter<T: Send + 'static>(&self) -> Result<Interpreter<T>, BuildError> {
        self.typed(&TypeRef::opaque::<T>(), None)
    }

    /// Decode `input` as a `T`, failing if no rule of `T` matches it.
    pub fn interpret<T: Interpretable>(&self, input: &str) -> Result<T, Error> {
        Ok(self.interpreter::<T>()?.interpret(input)?)
    }

    /// Decode `input` as a `T`, returning `Ok(None)` if no rule of `T`
    /// matches it.
    pub fn try_interpret<T: Interpretable>(&self, input: &str) -> Result<Option<T>, Error> {
        Ok(self.interpreter::<T>()?.try_interpret(input)?)
    }

    /// Decode `T` with `decode` everywhere `T` is needed, replacing any
    /// derived or previously registered interpreter.
    pub fn register<T, F>(&self, decode: F)
    where
        T: Send + 'static,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.register_interpreter(Interpreter::from_fn(decode));
    }

    /// Use `interpreter` everywhere `T` is needed.
    pub fn register_interpreter<T: Send + 'static>(&self, interpreter: Interpreter<T>) {
        self.cache.register(
            CacheKey::of_type(TypeKey::of::<T>(), None),
            interpreter.into_raw(),
        );
    }

    fn typed<T: Send + 'static>(
        &self,
        ty: &TypeRef,
        pattern: Option<&str>,
    ) -> Result<Interpreter<T>, BuildError> {
        let raw = self.make(ty, pattern, &mut BuildSession::new())?;
        Ok(Interpreter::new(raw, Some(self.cache.anchor())))
    }

    /// The erased interpreter for `ty`, built within `session`.
    pub fn make(
        &self,
        ty: &TypeRef,
        pattern: Option<&str>,
        session: &mut BuildSession,
    ) -> Result<DynInterpreter, BuildError> {
        self.cache
            .resolve(CacheKey::of_type(ty.key(), pattern), session, |session| {
                self.build(ty, pattern, session)
            })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ty = ty.name(), pattern = ?pattern))]
    fn build(
        &self,
        ty: &TypeRef,
        pattern: Option<&str>,
        session: &mut BuildSession,
    ) -> Result<DynInterpreter, BuildError> {
        if let Some(pattern) = pattern {
            if self.provider.is_closed_union(ty) {
                return Err(BuildError::OverrideOnUnion {
                    type_name: ty.name(),
                    pattern: pattern.to_owned(),
                });
            }
        }

        let rules = self.provider.rules_for(ty, pattern)?;
        if rules.is_empty() {
            return Err(BuildError::NoRules {
                type_name: ty.name(),
            });
        }

        let builders = rules
            .into_iter()
            .map(|rule| self.instance_builder(ty.key(), rule, session))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rules = builders.len(), "assembled dispatcher");
        Ok(Arc::new(FirstMatchDispatcher::new(ty.name(), builders)))
    }

    fn instance_builder(
        &self,
        owner: TypeKey,
        rule: RecognitionRule,
        session: &mut BuildSession,
    ) -> Result<InstanceBuilder, BuildError> {
        let params = rule
            .params()
            .iter()
            .map(|param| self.bind(owner, param, session))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InstanceBuilder::new(
            owner,
            rule,
            ParameterValueExtractor::new(params),
        ))
    }

    fn bind(
        &self,
        owner: TypeKey,
        param: &ParameterDescriptor,
        session: &mut BuildSession,
    ) -> Result<BoundParameter, BuildError> {
        match param {
            ParameterDescriptor::Scalar { ty, pattern, .. } => Ok(BoundParameter {
                type_name: ty.name(),
                interpreter: self.make(ty, pattern.as_deref(), session)?,
            }),
            ParameterDescriptor::Collection {
                name,
                item,
                container,
                separator,
                pattern,
                collect,
            } => {
                let key =
                    CacheKey::collection(*container, item.key(), separator, pattern.as_deref());
                let interpreter = self.cache.resolve(key, session, |session| {
                    let split = compile_separator(owner.name(), name, separator)?;
                    let items = self.make(item, pattern.as_deref(), session)?;
                    Ok(Arc::new(CollectionInterpreter::new(
                        container.name(),
                        item.name(),
                        split,
                        items,
                        *collect,
                    )) as DynInterpreter)
                })?;
                Ok(BoundParameter {
                    type_name: container.name(),
                    interpreter,
                })
            }
        }
    }
}

impl Default for InterpretationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InterpretationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpretationContext")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
