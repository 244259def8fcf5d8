//! Defines the [`Term`] type, the immutable value representation of
//! terms in the rewriting language, together with [`Var`], [`Func`],
//! the [`IntoTerm`] conversion trait and the construction macros.
//!
//! Terms are plain owned trees. Every transformation (substitution,
//! subterm replacement, AC normalization) builds a new tree, and equality
//! and hashing are derived from structure only.

use crate::{AcTerm, TermError};
use smartstring::alias::String;

/// A variable, identified solely by its name. Two variables with the same
/// name anywhere in a program are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Var(String);

impl Var {
    /// Creates a variable with the given name (without the leading `:`).
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(String::from(name.as_ref()))
    }

    /// Returns the name of the variable.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A compound term `name(arg, ...)` with at least one argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Func {
    name: String,
    args: Vec<Term>,
}

impl Func {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A term of the rewriting language.
///
/// Atoms are [`Term::Number`], [`Term::Str`] and [`Term::Const`]; they
/// compare by value and by kind, so the number `1` and the constant `1` are
/// different terms. [`Term::Product`] and [`Term::Native`] only occur in
/// reduction rules: a product is a multi-term rule head and `native` is a
/// rule tail that delegates to the registered native functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    Var(Var),
    /// A number, kept as its source literal.
    Number(String),
    Str(String),
    /// A constant, i.e. a zero-arity function symbol.
    Const(String),
    Func(Func),
    Ac(AcTerm),
    Product(Vec<Term>),
    Native,
}

impl From<Var> for Term {
    #[inline]
    fn from(v: Var) -> Self {
        Term::Var(v)
    }
}

impl From<AcTerm> for Term {
    #[inline]
    fn from(t: AcTerm) -> Self {
        Term::Ac(t)
    }
}

impl From<Func> for Term {
    #[inline]
    fn from(t: Func) -> Self {
        Term::Func(t)
    }
}

macro_rules! impl_from_integers_for_term {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Term {
            #[inline]
            fn from(v: $t) -> Self { Term::int(v as i64) }
        }
    )*};
}
impl_from_integers_for_term!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_floats_for_term {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Term {
            #[inline]
            fn from(v: $t) -> Self { Term::real(v as f64) }
        }
    )*};
}
impl_from_floats_for_term!(f32, f64);

/// Conversion into a [`Term`], used by the construction macros.
///
/// Integers and floats become numbers, string slices become string
/// literals. Use [`Term::constant`] or [`atom!`](crate::atom) for
/// constants and [`var!`](crate::var) for variables.
pub trait IntoTerm {
    fn into_term(self) -> Term;
}

macro_rules! impl_intoterm_for_numbers {
    ($($t:ty),* $(,)?) => {$(
        impl IntoTerm for $t {
            #[inline]
            fn into_term(self) -> Term { Term::from(self) }
        }
    )*};
}
impl_intoterm_for_numbers!(i8, i16, i32, i64, u8, u16, u32, f32, f64);

impl<'a> IntoTerm for &'a str {
    #[inline]
    fn into_term(self) -> Term {
        Term::str(self)
    }
}

impl IntoTerm for Var {
    #[inline]
    fn into_term(self) -> Term {
        Term::Var(self)
    }
}

impl IntoTerm for Term {
    #[inline]
    fn into_term(self) -> Term {
        self
    }
}

impl IntoTerm for &Term {
    #[inline]
    fn into_term(self) -> Term {
        self.clone()
    }
}

impl Term {
    /// Constructs a variable term.
    #[inline]
    pub fn var(name: impl AsRef<str>) -> Self {
        Term::Var(Var::new(name))
    }

    /// Constructs a number from its literal text.
    #[inline]
    pub fn number(literal: impl AsRef<str>) -> Self {
        Term::Number(String::from(literal.as_ref()))
    }

    /// Constructs a number from an integer.
    #[inline]
    pub fn int(i: impl Into<i64>) -> Self {
        Term::Number(String::from(i.into().to_string()))
    }

    /// Constructs a number from a float. Integral values are written
    /// without a fractional part, so `2.0` becomes the literal `2`.
    #[inline]
    pub fn real(f: impl Into<f64>) -> Self {
        Term::Number(String::from(f.into().to_string()))
    }

    /// Constructs a string literal.
    #[inline]
    pub fn str(s: impl AsRef<str>) -> Self {
        Term::Str(String::from(s.as_ref()))
    }

    /// Constructs a constant.
    #[inline]
    pub fn constant(name: impl AsRef<str>) -> Self {
        Term::Const(String::from(name.as_ref()))
    }

    /// Constructs a compound term. A function symbol of arity zero results
    /// in a constant.
    pub fn func(name: impl AsRef<str>, args: impl IntoIterator<Item = impl IntoTerm>) -> Self {
        let args: Vec<Term> = args.into_iter().map(IntoTerm::into_term).collect();
        if args.is_empty() {
            return Term::constant(name);
        }
        Term::Func(Func {
            name: String::from(name.as_ref()),
            args,
        })
    }

    /// Constructs an AC term in order normal form. Nested AC terms with the
    /// same name are flattened into the result. Without arguments the
    /// result is a constant.
    ///
    /// A single argument is accepted so that programs can be validated
    /// rather than rejected at construction; the validator reports AC terms
    /// whose total cardinality is below two.
    pub fn ac(name: impl AsRef<str>, args: impl IntoIterator<Item = impl IntoTerm>) -> Self {
        let args: Vec<(Term, usize)> = args.into_iter().map(|a| (a.into_term(), 1)).collect();
        if args.is_empty() {
            return Term::constant(name);
        }
        Term::Ac(AcTerm::normalize(name.as_ref(), args))
    }

    /// Constructs a term product, the head of a multi-term reduction rule.
    #[inline]
    pub fn product(terms: impl IntoIterator<Item = impl IntoTerm>) -> Self {
        Term::Product(terms.into_iter().map(IntoTerm::into_term).collect())
    }

    /// Returns `true` if the term is a variable.
    #[inline]
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Returns `true` if the term is a number.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Term::Number(_))
    }

    /// Returns `true` if the term is a string.
    #[inline]
    pub fn is_str(&self) -> bool {
        matches!(self, Term::Str(_))
    }

    /// Returns `true` if the term is a constant.
    #[inline]
    pub fn is_const(&self) -> bool {
        matches!(self, Term::Const(_))
    }

    /// Returns `true` for numbers, strings and constants.
    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Number(_) | Term::Str(_) | Term::Const(_))
    }

    /// Returns `true` if the term is a compound term.
    #[inline]
    pub fn is_func(&self) -> bool {
        matches!(self, Term::Func(_))
    }

    /// Returns `true` if the term is an AC term.
    #[inline]
    pub fn is_ac(&self) -> bool {
        matches!(self, Term::Ac(_))
    }

    /// Returns `true` if the term is a term product.
    #[inline]
    pub fn is_product(&self) -> bool {
        matches!(self, Term::Product(_))
    }

    /// Returns `true` if the term is the `native` marker.
    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self, Term::Native)
    }

    /// Returns the function symbol of a compound or AC term.
    #[inline]
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Term::Func(f) => Some(f.name()),
            Term::Ac(a) => Some(a.name()),
            _ => None,
        }
    }

    /// Returns the immediate subterms: compound arguments in order, each
    /// distinct AC argument once, or the members of a product.
    pub fn children(&self) -> Vec<&Term> {
        match self {
            Term::Func(f) => f.args().iter().collect(),
            Term::Ac(a) => a.args().iter().map(|arg| arg.term()).collect(),
            Term::Product(ts) => ts.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns a string describing the kind of this term.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Var(_) => "variable",
            Term::Number(_) => "number",
            Term::Str(_) => "string",
            Term::Const(_) => "constant",
            Term::Func(_) => "term",
            Term::Ac(_) => "ac term",
            Term::Product(_) => "term product",
            Term::Native => "native",
        }
    }

    /// Returns the value of a number.
    pub fn unpack_number(&self) -> Result<f64, TermError> {
        match self {
            Term::Number(lit) => lit
                .trim()
                .parse::<f64>()
                .map_err(|_| TermError::InvalidNumber(lit.clone())),
            other => Err(TermError::UnexpectedKind {
                expected: "number",
                found: other.kind_name(),
            }),
        }
    }

    /// Returns the variable of a variable term.
    pub fn unpack_var(&self) -> Result<&Var, TermError> {
        match self {
            Term::Var(v) => Ok(v),
            other => Err(TermError::UnexpectedKind {
                expected: "variable",
                found: other.kind_name(),
            }),
        }
    }

    /// Returns the arguments of a compound term with the given name and
    /// arity.
    pub fn unpack_func<const ARITY: usize>(&self, name: &str) -> Result<&[Term; ARITY], TermError> {
        let f = self.unpack_func_any()?;
        if f.name() != name {
            return Err(TermError::UnexpectedName {
                expected: String::from(name),
                found: f.name.clone(),
            });
        }
        f.args().try_into().map_err(|_| TermError::UnexpectedArity {
            expected: ARITY,
            found: f.arity(),
        })
    }

    /// Returns the compound term of any name and arity.
    pub fn unpack_func_any(&self) -> Result<&Func, TermError> {
        match self {
            Term::Func(f) => Ok(f),
            other => Err(TermError::UnexpectedKind {
                expected: "term",
                found: other.kind_name(),
            }),
        }
    }

    /// Returns the AC term.
    pub fn unpack_ac(&self) -> Result<&AcTerm, TermError> {
        match self {
            Term::Ac(a) => Ok(a),
            other => Err(TermError::UnexpectedKind {
                expected: "ac term",
                found: other.kind_name(),
            }),
        }
    }
}

/// Constructs a compound term. Arguments are converted with [`IntoTerm`].
///
/// ```rust
/// # use trl_terms::{func, var};
/// let t = func!("house"; 2, var!("y"));
/// assert_eq!(t.to_string(), "house(2,:y)");
/// ```
#[macro_export]
macro_rules! func {
    ($name:expr; $($arg:expr),+ $(,)?) => {
        $crate::Term::func($name, [$($crate::IntoTerm::into_term($arg)),+])
    };
}

/// Constructs an AC term in order normal form.
///
/// ```rust
/// # use trl_terms::{ac, var};
/// let t = ac!("add"; var!("x"), 1);
/// assert_eq!(t.to_string(), "add[1,:x]");
/// ```
#[macro_export]
macro_rules! ac {
    ($name:expr; $($arg:expr),+ $(,)?) => {
        $crate::Term::ac($name, [$($crate::IntoTerm::into_term($arg)),+])
    };
}

/// Constructs a term product.
#[macro_export]
macro_rules! product {
    ($($arg:expr),+ $(,)?) => {
        $crate::Term::product([$($crate::IntoTerm::into_term($arg)),+])
    };
}

#[macro_export]
macro_rules! atom {
    ($name:expr) => {
        $crate::Term::constant($name)
    };
}

#[macro_export]
macro_rules! var {
    ($name:expr) => {
        $crate::Term::var($name)
    };
}
