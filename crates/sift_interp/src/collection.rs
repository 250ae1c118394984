//! Split-then-map interpreters for collection parameters.

use regex::Regex;
use sift_rules::{AnyValue, BuildError, Collector};

use crate::error::InterpretationError;
use crate::interpret::{DynInterpreter, Interpret};

/// Splits its input on every separator match and decodes each fragment with
/// the item interpreter.
///
/// Items are collected in input order. Empty fragments at the end of the
/// input are dropped, so empty input is the empty collection and a trailing
/// separator is allowed. Any other fragment the item interpreter does not
/// accept, empty ones included, fails the whole input.
pub struct CollectionInterpreter {
    container: &'static str,
    item: &'static str,
    separator: Regex,
    items: DynInterpreter,
    collect: Collector,
}

impl CollectionInterpreter {
    pub fn new(
        container: &'static str,
        item: &'static str,
        separator: Regex,
        items: DynInterpreter,
        collect: Collector,
    ) -> Self {
        CollectionInterpreter {
            container,
            item,
            separator,
            items,
            collect,
        }
    }

    fn decode_item(&self, fragment: &str) -> Result<AnyValue, InterpretationError> {
        self.items
            .interpret_raw(fragment)?
            .ok_or_else(|| InterpretationError::NoMatch {
                type_name: self.item,
                input: fragment.to_owned(),
            })
    }
}

impl Interpret for CollectionInterpreter {
    fn interpret_raw(&self, input: &str) -> Result<Option<AnyValue>, InterpretationError> {
        let mut fragments: Vec<&str> = self.separator.split(input).collect();
        // Trailing empty fragments are dropped, so "" and "1, 2," are
        // the empty collection and [1, 2]
        while fragments.last().is_some_and(|fragment| fragment.is_empty()) {
            fragments.pop();
        }
        let values = fragments
            .into_iter()
            .map(|fragment| self.decode_item(fragment))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(container = self.container, items = values.len(), "decoded collection");
        (self.collect)(values).map(Some).map_err(|_| {
            InterpretationError::UnexpectedValue {
                type_name: self.container,
            }
        })
    }
}

impl std::fmt::Debug for CollectionInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionInterpreter")
            .field("container", &self.container)
            .field("item", &self.item)
            .field("separator", &self.separator.as_str())
            .finish_non_exhaustive()
    }
}

/// Compile a collection separator.
///
/// The separator is searched for, not anchored. A separator that can match
/// the empty string would split between every character, so it is refused.
pub fn compile_separator(
    owner: &'static str,
    parameter: &str,
    separator: &str,
) -> Result<Regex, BuildError> {
    let malformed = |message: String| BuildError::MalformedCollection {
        type_name: owner,
        parameter: parameter.to_owned(),
        separator: separator.to_owned(),
        message,
    };
    let regex = Regex::new(separator).map_err(|err| malformed(err.to_string()))?;
    if regex.is_match("") {
        return Err(malformed("separator matches the empty string".to_owned()));
    }
    Ok(regex)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
