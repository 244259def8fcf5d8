//! Defines [`TermError`], the error type for typed access to terms and
//! for parsing the built-in type names.

use smartstring::alias::String;
use thiserror::Error;

/// Errors returned by the typed accessors of [`Term`](crate::Term) and by
/// the string conversions of the data model.
///
/// Unification failures and invalid substitutions are not errors; they are
/// reported as empty results by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Arity mismatch: expected {expected}, found {found}")]
    UnexpectedArity { expected: usize, found: usize },

    #[error("Name mismatch: expected {expected}, found {found}")]
    UnexpectedName { expected: String, found: String },

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("unknown built-in type: {0}")]
    UnknownBuiltinType(String),
}
