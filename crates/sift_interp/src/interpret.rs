//! The erased interpreter contract.

use std::sync::Arc;

use sift_rules::AnyValue;

use crate::error::InterpretationError;

/// Decodes an input string into a value of one target type.
///
/// `Ok(None)` is a soft failure: the input is not in this interpreter's
/// language and the caller may try something else. `Err` is a hard failure
/// that the caller must propagate.
pub trait Interpret: Send + Sync {
    fn interpret_raw(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError>;
}

/// Shared handle to an erased interpreter.
pub type DynInterpreter = Arc<dyn Interpret>;
