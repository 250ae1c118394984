//! Errors raised while decoding input.

use sift_rules::BuildError;

/// Hard failure while decoding an input.
///
/// A rule that simply does not match is not an error; dispatch moves on to
/// the next rule. These are the failures that stop dispatch outright.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterpretationError {
    /// No rule of `type_name` matched the input.
    #[error("no rule of `{type_name}` matched `{input}`")]
    NoMatch {
        type_name: &'static str,
        input: String,
    },

    /// A rule's capture groups cannot be bound to its parameters.
    #[error(
        "rule `{pattern}` of `{type_name}` has {groups} capture group(s) for {params} parameter(s)"
    )]
    Arity {
        type_name: &'static str,
        pattern: String,
        groups: usize,
        params: usize,
    },

    /// A constructor refused the decoded parameter values.
    #[error("`{type_name}` rejected `{input}`: {reason}")]
    Rejected {
        type_name: &'static str,
        input: String,
        reason: String,
    },

    /// Matched text names no constant of an enumeration.
    #[error("`{input}` is not a constant of `{type_name}`")]
    UnknownConstant {
        type_name: &'static str,
        input: String,
    },

    /// A deferred interpreter was invoked but its construction never finished.
    #[error("interpreter for `{type_name}` was never resolved")]
    Unresolved { type_name: &'static str },

    /// An interpreter produced a value of a different type than its key.
    #[error("interpreter for `{type_name}` produced a value of another type")]
    UnexpectedValue { type_name: &'static str },
}

/// Either failure an operation that both builds and decodes can report.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Interpretation(#[from] InterpretationError),
}
