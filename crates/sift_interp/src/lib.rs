//! Interpreter construction and execution.
//!
//! Turns the recognition rules of a type into an interpreter that decodes
//! strings into values of that type:
//!
//! - `InterpretationContext` assembles interpreters recursively from a
//!   `RuleProvider`, memoizing them in an `InterpreterCache`
//! - `FirstMatchDispatcher` tries a type's rules in order; the first rule
//!   whose pattern matches the whole input decides the result
//! - `Interpreter<T>` is the typed handle callers decode with
//!
//! Recursive and mutually recursive types are supported: a request for a
//! type already under construction on the same call chain yields a
//! `DeferredInterpreter` that resolves on first use.

mod builder;
mod cache;
mod collection;
mod context;
mod dispatch;
mod error;
mod extract;
mod interpret;
mod interpreter;
mod leaf;
mod stack;

pub use builder::InstanceBuilder;
pub use cache::{BuildSession, CacheAnchor, CacheKey, DeferredInterpreter, InterpreterCache};
pub use collection::{compile_separator, CollectionInterpreter};
pub use context::{ContextBuilder, InterpretationContext};
pub use dispatch::FirstMatchDispatcher;
pub use error::{Error, InterpretationError};
pub use extract::{BoundParameter, ParameterValueExtractor};
pub use interpret::{DynInterpreter, Interpret};
pub use interpreter::Interpreter;
pub use leaf::{leaf, parsed, seed_primitives, FnInterpreter};
pub use stack::ensure_sufficient_stack;
