//! Decode strings into typed values through declared recognition rules.
//!
//! A type describes the ways it can be written by implementing
//! [`Interpretable`]:
//!
//! ```text
//! impl Interpretable for Point {
//!     fn descriptor() -> Descriptor<Self> {
//!         Record::with_pattern(r"\((-?\d+),\s?(-?\d+)\)")
//!             .primary(Form::new(
//!                 [Param::scalar::<i64>("x"), Param::scalar::<i64>("y")],
//!                 |mut args| Ok(Point { x: args.take()?, y: args.take()? }),
//!             ))
//!             .into()
//!     }
//! }
//!
//! let point: Point = sift::interpret("(23, -6)")?;
//! ```
//!
//! The free functions here work against a process-wide default context.
//! Use an [`InterpretationContext`] directly (or [`in_new_context`]) for an
//! isolated set of registrations.

use std::sync::{Once, OnceLock};

pub use sift_interp::{
    ContextBuilder, DynInterpreter, Error, Interpret, InterpretationContext,
    InterpretationError, Interpreter,
};
pub use sift_rules::{
    AnyValue, Args, BuildError, Descriptor, DescriptorProvider, Enumeration, Form, Interpretable,
    Param, ParameterDescriptor, RecognitionRule, Record, Rejection, RuleProvider, TypeKey,
    TypeRef, Union, DEFAULT_SEPARATOR,
};

static DEFAULT_CONTEXT: OnceLock<InterpretationContext> = OnceLock::new();

static TRACING_INIT: Once = Once::new();

/// The process-wide context used by the free functions.
pub fn default_context() -> &'static InterpretationContext {
    DEFAULT_CONTEXT.get_or_init(InterpretationContext::new)
}

/// The interpreter for `T` from the default context.
pub fn interpreter<T: Interpretable>() -> Result<Interpreter<T>, BuildError> {
    default_context().interpreter::<T>()
}

/// The interpreter for `T` with its default pattern replaced by `pattern`,
/// from the default context.
pub fn interpreter_with_pattern<T: Interpretable>(
    pattern: &str,
) -> Result<Interpreter<T>, BuildError> {
    default_context().interpreter_with_pattern::<T>(pattern)
}

/// Decode `input` as a `T` using the default context.
pub fn interpret<T: Interpretable>(input: &str) -> Result<T, Error> {
    default_context().interpret::<T>(input)
}

/// Decode `T` with `decode` everywhere in the default context.
pub fn register<T, F>(decode: F)
where
    T: Send + 'static,
    F: Fn(&str) -> Option<T> + Send + Sync + 'static,
{
    default_context().register(decode);
}

/// Use `interpreter` for `T` everywhere in the default context.
pub fn register_interpreter<T: Send + 'static>(interpreter: Interpreter<T>) {
    default_context().register_interpreter(interpreter);
}

/// Run `f` against a fresh context, isolated from the default one.
pub fn in_new_context<R>(f: impl FnOnce(&InterpretationContext) -> R) -> R {
    f(&InterpretationContext::new())
}

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=sift_interp=debug`,
/// or `trace` to follow dispatch per input.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
            if installed.is_ok() {
                tracing::debug!("tracing initialized");
            }
        }
    });
}
