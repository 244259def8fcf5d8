//! Defines [`ArithError`].

use smartstring::alias::String;
use thiserror::Error;
use trl_interpreter::InterpreterError;

#[derive(Debug, Clone, Error)]
pub enum ArithError {
    #[error("unknown demo: {0}")]
    UnknownDemo(String),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}
