//! Errors raised while parsing or evaluating an expression.
//!
//! These never cross the display boundary: [`evaluate_expression`] turns
//! every one of them into the literal `"Error"`. They exist so callers that
//! want to know *why* something failed can use [`try_evaluate`] instead.
//!
//! [`evaluate_expression`]: super::evaluate_expression
//! [`try_evaluate`]: super::try_evaluate

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("malformed number '{0}'")]
    BadNumber(String),

    #[error("unexpected {found} at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("expression is longer than {0} tokens")]
    TooLong(usize),

    #[error("undefined symbol '{0}'")]
    UndefinedSymbol(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{name}() takes {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("result is not a finite number")]
    NonFinite,
}
