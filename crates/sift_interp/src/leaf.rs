//! Leaf interpreters: plain decoding functions for scalar types.
//!
//! Every context is seeded with leaves for the Rust primitives. Callers add
//! their own for foreign types (or to replace a derived interpreter) through
//! the context's `register`.

use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use sift_rules::{AnyValue, TypeKey};

use crate::cache::{CacheKey, InterpreterCache};
use crate::error::InterpretationError;
use crate::interpret::{DynInterpreter, Interpret};

/// Interpreter backed by a function returning `None` for unusable input.
pub struct FnInterpreter<T, F> {
    decode: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> FnInterpreter<T, F>
where
    T: Send + 'static,
    F: Fn(&str) -> Option<T> + Send + Sync,
{
    pub fn new(decode: F) -> Self {
        FnInterpreter {
            decode,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Interpret for FnInterpreter<T, F>
where
    T: Send + 'static,
    F: Fn(&str) -> Option<T> + Send + Sync,
{
    fn interpret_raw(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError> {
        Ok((self.decode)(input).map(|value| Box::new(value) as AnyValue))
    }
}

/// Erased leaf interpreter for `decode`.
pub fn leaf<T, F>(decode: F) -> DynInterpreter
where
    T: Send + 'static,
    F: Fn(&str) -> Option<T> + Send + Sync + 'static,
{
    Arc::new(FnInterpreter::new(decode))
}

/// Leaf that accepts exactly what `T::from_str` accepts.
pub fn parsed<T>() -> DynInterpreter
where
    T: FromStr + Send + 'static,
{
    leaf(|input: &str| input.parse::<T>().ok())
}

fn boolean(input: &str) -> Option<bool> {
    if input.eq_ignore_ascii_case("true") {
        Some(true)
    } else if input.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn single_char(input: &str) -> Option<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn seed<T: Send + 'static>(cache: &InterpreterCache, interpreter: DynInterpreter) {
    cache.register(CacheKey::of_type(TypeKey::of::<T>(), None), interpreter);
}

macro_rules! seed_parsed {
    ($cache:expr; $($ty:ty),* $(,)?) => {
        $( seed::<$ty>($cache, parsed::<$ty>()); )*
    };
}

/// Install the primitive leaves.
pub fn seed_primitives(cache: &InterpreterCache) {
    seed_parsed!(cache;
        i8, i16, i32, i64, i128, isize,
        u8, u16, u32, u64, u128, usize,
        f32, f64,
    );
    seed::<bool>(cache, leaf(boolean));
    seed::<char>(cache, leaf(single_char));
    seed::<String>(cache, leaf(|input: &str| Some(input.to_owned())));
    tracing::trace!(entries = cache.len(), "seeded primitive interpreters");
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
