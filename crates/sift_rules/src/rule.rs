//! Compiled recognition rules.

use regex::Regex;

use crate::error::BuildError;
use crate::param::ParameterDescriptor;
use crate::ty::TypeKey;
use crate::value::Constructor;

/// Pattern, ordered parameters and constructor for one way of writing a value.
///
/// The pattern is compiled anchored at both ends, so a rule only ever
/// accepts an entire input.
#[derive(Clone)]
pub struct RecognitionRule {
    pattern: Regex,
    source: String,
    params: Vec<ParameterDescriptor>,
    construct: Constructor,
}

impl RecognitionRule {
    /// Compile `pattern` for a rule of `owner`.
    pub fn new(
        owner: TypeKey,
        pattern: &str,
        params: Vec<ParameterDescriptor>,
        construct: Constructor,
    ) -> Result<Self, BuildError> {
        Ok(RecognitionRule {
            pattern: compile_anchored(owner, pattern)?,
            source: pattern.to_owned(),
            params,
            construct,
        })
    }

    /// The anchored, compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn constructor(&self) -> &Constructor {
        &self.construct
    }

    /// Number of capture groups, not counting the implicit whole match.
    pub fn capture_groups(&self) -> usize {
        self.pattern.captures_len() - 1
    }

    pub fn into_parts(self) -> (Regex, String, Vec<ParameterDescriptor>, Constructor) {
        (self.pattern, self.source, self.params, self.construct)
    }
}

impl std::fmt::Debug for RecognitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionRule")
            .field("pattern", &self.source)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Compile `pattern` so that it must match the whole input.
pub fn compile_anchored(owner: TypeKey, pattern: &str) -> Result<Regex, BuildError> {
    Regex::new(&format!(r"\A(?:{pattern})\z")).map_err(|err| BuildError::InvalidPattern {
        type_name: owner.name(),
        pattern: pattern.to_owned(),
        message: err.to_string(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
