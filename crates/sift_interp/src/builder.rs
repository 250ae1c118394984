//! Instance builders: one compiled rule ready to produce values.

use regex::Regex;
use sift_rules::{AnyValue, Args, Constructor, RecognitionRule, Rejection, TypeKey};

use crate::error::InterpretationError;
use crate::extract::ParameterValueExtractor;

/// A rule's pattern, the extractor for its parameters and its constructor.
pub struct InstanceBuilder {
    owner: &'static str,
    pattern: Regex,
    source: String,
    extractor: ParameterValueExtractor,
    construct: Constructor,
}

impl InstanceBuilder {
    pub fn new(owner: TypeKey, rule: RecognitionRule, extractor: ParameterValueExtractor) -> Self {
        let (pattern, source, _, construct) = rule.into_parts();
        InstanceBuilder {
            owner: owner.name(),
            pattern,
            source,
            extractor,
            construct,
        }
    }

    /// The rule's pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build a value if the rule's pattern matches the entire input.
    ///
    /// `Ok(None)` when the pattern does not match. Once it matches, any
    /// failure (a parameter that does not decode, a constructor rejection)
    /// is an error.
    pub fn try_build(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError> {
        let Some(captures) = self.pattern.captures(input) else {
            return Ok(None);
        };
        let values = self.extractor.extract(&captures, self.owner, &self.source)?;
        (self.construct)(Args::new(values))
            .map(Some)
            .map_err(|rejection| self.rejected(rejection, input))
    }

    fn rejected(&self, rejection: Rejection, input: &str) -> InterpretationError {
        match rejection {
            Rejection::Domain(reason) => InterpretationError::Rejected {
                type_name: self.owner,
                input: input.to_owned(),
                reason,
            },
            Rejection::UnknownConstant { input } => InterpretationError::UnknownConstant {
                type_name: self.owner,
                input,
            },
            Rejection::Argument { index, expected } => {
                tracing::warn!(
                    owner = self.owner,
                    rule = %self.source,
                    index,
                    expected,
                    "parameter value of unexpected type"
                );
                InterpretationError::UnexpectedValue {
                    type_name: self.owner,
                }
            }
        }
    }
}

impl std::fmt::Debug for InstanceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceBuilder")
            .field("owner", &self.owner)
            .field("pattern", &self.source)
            .field("params", &self.extractor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
