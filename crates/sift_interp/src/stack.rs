//! Stack growth for decoding deeply nested input.
//!
//! Recursive types (lists of lists, linked nodes) decode nested input by
//! re-entering dispatch once per level. Each re-entry goes through
//! [`ensure_sufficient_stack`], so nesting depth is bounded by memory rather
//! than by the thread's stack size.
//!
//! WASM targets call the closure directly.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
