//! First-match dispatch across a type's rules.

use sift_rules::AnyValue;

use crate::builder::InstanceBuilder;
use crate::error::InterpretationError;
use crate::interpret::Interpret;
use crate::stack::ensure_sufficient_stack;

/// Tries a type's instance builders in declaration order.
///
/// The first builder whose pattern matches decides the outcome: its value,
/// or its error. Later builders are not consulted, even if the first one
/// fails after matching. When no pattern matches the dispatcher soft-fails.
#[derive(Debug)]
pub struct FirstMatchDispatcher {
    owner: &'static str,
    builders: Vec<InstanceBuilder>,
}

impl FirstMatchDispatcher {
    pub fn new(owner: &'static str, builders: Vec<InstanceBuilder>) -> Self {
        FirstMatchDispatcher { owner, builders }
    }

    pub fn builders(&self) -> &[InstanceBuilder] {
        &self.builders
    }
}

impl Interpret for FirstMatchDispatcher {
    fn interpret_raw(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError> {
        // Nested values re-enter dispatch once per level.
        ensure_sufficient_stack(|| {
            for builder in &self.builders {
                if let Some(value) = builder.try_build(input)? {
                    tracing::trace!(owner = self.owner, rule = builder.source(), "rule matched");
                    return Ok(Some(value));
                }
            }
            tracing::trace!(owner = self.owner, input, "no rule matched");
            Ok(None)
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
