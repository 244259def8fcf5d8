//! # TRL Interpreter
//!
//! A fixpoint interpreter for the term rewriting language whose terms are
//! defined in [`trl_terms`].
//!
//! A [`Program`](trl_terms::Program) is validated, its terms are loaded
//! into an execution cache and its reduction rules are applied step by
//! step until no rule changes any term. Matching uses most general
//! unifiers with associative-commutative (AC) unification
//! ([`UnificationEngine`]). Variables can be limited to types described by
//! a bottom-up tree automaton ([`TypeChecker`]). Two extension points let
//! a host plug in domain knowledge:
//!
//! * [`NativeFunction`]s evaluate the matched subterm of rules whose tail
//!   is `native`;
//! * [`CustomUnifier`]s solve equations that built-in unification rejects.
//!
//! ## Example
//! ```rust
//! use trl_interpreter::Interpreter;
//! use trl_terms::{func, product, var, Program, ReductionRule};
//!
//! let program = Program::new()
//!     .with(func!("water"; 1))
//!     .with(func!("house"; 1))
//!     .with(ReductionRule::new(
//!         product!(func!("water"; var!("x")), func!("house"; var!("x"))),
//!         func!("tree"; var!("x")),
//!     ));
//! let mut interpreter = Interpreter::new(program);
//! let steps = interpreter.run_to_fixpoint(100).unwrap();
//! assert_eq!(steps, 1);
//! let result = interpreter.get_current_rewrite_result();
//! assert!(result.program.to_string().starts_with("tree(1);\n"));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: rejected programs and step
//! summaries at `debug`, individual rewrites and unification outcomes at
//! `trace`, and truncated searches at `warn`.
//!
//! ## License
//!
//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0 or
//! (at your option) any later version (LGPL-3.0-or-later).

mod config;
mod error;
mod interpreter;
mod partition;
mod plugin;
mod preprocess;
mod typecheck;
mod unify;
mod validate;

pub use config::InterpreterConfig;
pub use error::InterpreterError;
pub use interpreter::{Interpreter, RewriteResult};
pub use plugin::{CustomUnifier, NativeFunction};
pub use typecheck::TypeChecker;
pub use unify::{UnificationEngine, UnificationResult};
pub use validate::{Severity, ValidationMessage, validate};
