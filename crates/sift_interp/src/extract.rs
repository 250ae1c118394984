//! Binding a match's capture groups to a rule's parameters.

use regex::Captures;
use sift_rules::AnyValue;

use crate::error::InterpretationError;
use crate::interpret::DynInterpreter;

/// A parameter's interpreter and the name of the type it produces.
#[derive(Clone)]
pub struct BoundParameter {
    pub type_name: &'static str,
    pub interpreter: DynInterpreter,
}

/// Decodes the captures of a successful match into parameter values.
///
/// - no capture groups: the rule must have exactly one parameter, which
///   receives the whole match
/// - N capture groups: the rule must have N parameters; group `i` feeds
///   parameter `i - 1`
///
/// Any other combination is an [`InterpretationError::Arity`] error.
/// Parameter values are decoded strictly: a parameter interpreter that does
/// not accept its text fails the whole extraction.
#[derive(Clone)]
pub struct ParameterValueExtractor {
    params: Vec<BoundParameter>,
}

impl ParameterValueExtractor {
    pub fn new(params: Vec<BoundParameter>) -> Self {
        ParameterValueExtractor { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Decode one value per parameter, in parameter order.
    ///
    /// `owner` and `rule` only name the rule in errors.
    pub fn extract(
        &self,
        captures: &Captures<'_>,
        owner: &'static str,
        rule: &str,
    ) -> Result<Vec<AnyValue>, InterpretationError> {
        let groups = captures.len() - 1;
        let arity = || InterpretationError::Arity {
            type_name: owner,
            pattern: rule.to_owned(),
            groups,
            params: self.params.len(),
        };

        if groups == 0 {
            let [param] = self.params.as_slice() else {
                return Err(arity());
            };
            let whole = captures.get(0).map_or("", |m| m.as_str());
            return Ok(vec![decode(param, whole)?]);
        }

        if groups != self.params.len() {
            return Err(arity());
        }
        self.params
            .iter()
            .zip(captures.iter().skip(1))
            .map(|(param, group)| {
                // A group that took no part in the match binds the empty string.
                decode(param, group.map_or("", |m| m.as_str()))
            })
            .collect()
    }
}

fn decode(param: &BoundParameter, text: &str) -> Result<AnyValue, InterpretationError> {
    param
        .interpreter
        .interpret_raw(text)?
        .ok_or_else(|| InterpretationError::NoMatch {
            type_name: param.type_name,
            input: text.to_owned(),
        })
}

impl std::fmt::Debug for ParameterValueExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.params.iter().map(|p| p.type_name))
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
