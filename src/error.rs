use thiserror::Error;

use crate::classifier::layer_call::Verb;

/// Errors raised while parsing a statement that does contain a layer call.
///
/// "Not a layer statement" is deliberately not represented here: the parser
/// returns `Ok(None)` for it, since the caller should execute the SQL
/// unmodified rather than fail. All variants indicate malformed input and are
/// not retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The outer `CREATE OR REPLACE TABLE` shape or the nested
    /// parenthesis/`SELECT` shape does not match the expected pattern.
    #[error("invalid SQL syntax: {0}")]
    InvalidSqlSyntax(String),

    /// A `SELECT` fragment lacks a `FROM <identifier>` clause.
    #[error("invalid SQL: missing 'from' clause")]
    MissingFromClause,

    /// A recognized verb's argument list has too few tokens or the wrong
    /// shape.
    #[error("invalid {verb} function syntax: {raw}")]
    InvalidFunctionSyntax {
        /// The verb whose arguments were malformed.
        verb: Verb,
        /// The offending raw argument text, space-joined.
        raw: String,
    },

    /// The call's verb is not `train`, `predict`, or `automl`.
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),
}
