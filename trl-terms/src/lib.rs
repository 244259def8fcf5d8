//! # TRL Terms
//!
//! The term model of a small term rewriting language.
//!
//! This crate provides the immutable [`Term`] value type, associative and
//! commutative terms kept in order normal form ([`AcTerm`]), substitutions
//! and the structural operations on terms (substitution application, occurs
//! check, subterm replacement, variable collection), and the program
//! entities consumed by the interpreter: [`ReductionRule`],
//! [`TypeDefinition`], [`LimitStatement`], [`Statement`] and [`Program`].
//!
//! Terms are owned trees with structural equality and hashing, so two
//! independently built terms with the same structure compare and hash
//! equal. Every transformation returns a new term.
//!
//! ## Example
//! ```rust
//! # use trl_terms::{ac, func, var, Substitution, Term, Var};
//! let head = func!("tree"; var!("x"), ac!("add"; var!("y"), 1));
//! let out = head.apply_substitutions(&[
//!     Substitution::new(Var::new("x"), Term::int(1)),
//!     Substitution::new(Var::new("y"), Term::int(1)),
//! ]);
//! assert_eq!(out.to_string(), "tree(1,add[1,1])");
//! assert!(out.is_ground());
//! ```
//!
//! ## License
//!
//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0 or
//! (at your option) any later version (LGPL-3.0-or-later).

mod ac;
mod display;
mod error;
mod program;
mod subst;
mod term;
mod types;

pub use ac::{AcArg, AcTerm};
pub use error::TermError;
pub use program::{Program, ReductionRule, Statement};
pub use subst::Substitution;
pub use term::{Func, IntoTerm, Term, Var};
pub use types::{BuiltinType, LimitStatement, TypeDefinition, TypeName, TypeShape};
