//! # TRL Arithmetic
//!
//! Arithmetic plugins for [`trl_interpreter`]:
//!
//! * [`ArithmeticFunctions`] evaluates `add`, `sub`, `mul` and `div` in rules
//!   whose tail is `native`;
//! * [`ArithmeticUnifier`] solves one-operation linear equations such as
//!   `add[:x,1] = 2` when built-in unification fails, so a rule head
//!   `house(add[:x,1])` matches the term `house(2)` with `{:x => 1}`;
//! * [`ZeroUnifier`] binds every variable of a failed equation to `0`.
//!
//! The crate also ships the `trl-demo` binary, which runs the programs in
//! [`demos`].
//!
//! ## Example
//! ```rust
//! use trl_arith::demos;
//! use trl_interpreter::InterpreterConfig;
//!
//! let demo = demos::find("trees").unwrap();
//! let mut interpreter = demo.interpreter(InterpreterConfig::default()).unwrap();
//! interpreter.run_to_fixpoint(10).unwrap();
//! let terms: Vec<String> = interpreter.cache_terms().map(|t| t.to_string()).collect();
//! assert_eq!(terms, ["tree(1,2)"]);
//! ```
//!
//! ## License
//!
//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0 or
//! (at your option) any later version (LGPL-3.0-or-later).

pub mod demos;
mod error;
mod native;
mod solver;
mod zero;

pub use demos::Demo;
pub use error::ArithError;
pub use native::ArithmeticFunctions;
pub use solver::{ArithmeticUnifier, solver_program};
pub use zero::ZeroUnifier;
