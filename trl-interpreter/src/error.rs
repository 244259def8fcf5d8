//! Defines [`InterpreterError`], the error type of the interpreter's
//! fallible entry points.

use crate::ValidationMessage;
use thiserror::Error;
use trl_terms::TermError;

/// Errors surfaced by [`Interpreter::try_new`](crate::Interpreter::try_new)
/// and [`Interpreter::run_to_fixpoint`](crate::Interpreter::run_to_fixpoint).
///
/// Failed unifications and type-invalid substitutions are ordinary "no
/// match" outcomes and never appear here.
#[derive(Debug, Clone, Error)]
pub enum InterpreterError {
    #[error("invalid program: {} error(s), first: {}", .0.len(), first_message(.0))]
    InvalidProgram(Vec<ValidationMessage>),

    #[error("no fixpoint reached within {steps} rewrite steps")]
    StepLimitExceeded { steps: usize },

    #[error(transparent)]
    Term(#[from] TermError),
}

fn first_message(messages: &[ValidationMessage]) -> &str {
    messages.first().map(|m| m.message.as_str()).unwrap_or("<none>")
}
