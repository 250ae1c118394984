//! Errors raised while deriving or compiling recognition rules.

/// Failure to build an interpreter for a type.
///
/// Build errors are returned to the caller that requested the interpreter and
/// are never memoized: a later request retries from scratch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no recognition rules for `{type_name}`")]
    NoRules { type_name: &'static str },

    #[error("closed union `{type_name}` cannot take an override pattern (`{pattern}`)")]
    OverrideOnUnion {
        type_name: &'static str,
        pattern: String,
    },

    #[error("invalid pattern `{pattern}` for `{type_name}`: {message}")]
    InvalidPattern {
        type_name: &'static str,
        pattern: String,
        message: String,
    },

    /// Opaque type with neither a registered interpreter nor an override.
    #[error("`{type_name}` has no descriptor and no registered interpreter")]
    Unresolvable { type_name: &'static str },

    #[error(
        "collection parameter `{parameter}` of `{type_name}` has unusable separator `{separator}`: {message}"
    )]
    MalformedCollection {
        type_name: &'static str,
        parameter: String,
        separator: String,
        message: String,
    },
}

impl BuildError {
    /// Name of the type whose interpreter could not be built.
    pub fn type_name(&self) -> &'static str {
        match self {
            BuildError::NoRules { type_name }
            | BuildError::OverrideOnUnion { type_name, .. }
            | BuildError::InvalidPattern { type_name, .. }
            | BuildError::Unresolvable { type_name }
            | BuildError::MalformedCollection { type_name, .. } => type_name,
        }
    }
}
