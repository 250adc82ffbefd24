//! Error types for filter parsing and version handling.

use thiserror::Error;

/// Grammar errors raised while parsing a filter string.
///
/// Parsing never yields a partial filter; each variant carries the input (or
/// the offending fragment of it) so callers can report it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The input was empty or contained only whitespace.
    #[error("Null or empty filter")]
    Empty,

    /// The first non-whitespace character was not `(`.
    #[error("Missing opening parenthesis: {0}")]
    MissingOpeningParenthesis(String),

    /// The input ended before every `(` was closed.
    #[error("Missing closing parenthesis: {0}")]
    MissingClosingParenthesis(String),

    /// A `)` appeared with no matching `(`.
    #[error("Unbalanced closing parenthesis: {0}")]
    UnbalancedParenthesis(String),

    /// More than one expression appeared at the top level.
    #[error("Only one top-level operation allowed: {0}")]
    MultipleTopLevel(String),

    /// A comparison used something other than `=`, `<=`, `>=` or `~=`.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// A comparison had no attribute name before its operator.
    #[error("Missing attribute name: {0}")]
    MissingAttributeName(String),
}

/// Errors raised while parsing versions and version ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version \"{version}\": {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Invalid version range \"{0}\"")]
    InvalidRange(String),
}
