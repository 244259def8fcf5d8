//! Defines [`AcTerm`], an associative-commutative term stored in order
//! normal form (ONF), and its argument pairs [`AcArg`].
//!
//! ONF construction flattens nested AC terms of the same name into the
//! parent, groups equal arguments into `(term, cardinality)` pairs and
//! sorts the pairs by the source text of their terms. Two AC terms are
//! equal exactly when they have the same name and the same ONF, which makes
//! the derived `Eq` and `Hash` correct AC equality.

use crate::Term;
use indexmap::IndexMap;
use smartstring::alias::String;

/// One argument of an AC term together with the number of times it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcArg {
    term: Term,
    cardinality: usize,
}

impl AcArg {
    #[inline]
    pub fn term(&self) -> &Term {
        &self.term
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }
}

/// An AC term `name[arg, ...]` in order normal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcTerm {
    name: String,
    args: Vec<AcArg>,
}

impl AcTerm {
    /// Builds the ONF of `name[args]` where every argument carries a
    /// multiplicity. Arguments that are AC terms named `name` are spliced
    /// into the result with their cardinalities multiplied.
    pub(crate) fn normalize(name: &str, args: impl IntoIterator<Item = (Term, usize)>) -> Self {
        let mut grouped: IndexMap<Term, usize> = IndexMap::new();
        for (term, count) in args {
            if count == 0 {
                continue;
            }
            match term {
                Term::Ac(inner) if inner.name == name => {
                    for arg in inner.args {
                        *grouped.entry(arg.term).or_insert(0) += arg.cardinality * count;
                    }
                }
                other => *grouped.entry(other).or_insert(0) += count,
            }
        }
        let mut args: Vec<AcArg> = grouped
            .into_iter()
            .map(|(term, cardinality)| AcArg { term, cardinality })
            .collect();
        args.sort_by_cached_key(|arg| onf_key(&arg.term));
        Self {
            name: String::from(name),
            args,
        }
    }

    /// Rebuilds this term with `f` applied to every distinct argument,
    /// keeping cardinalities and re-deriving ONF.
    pub fn map_args(&self, mut f: impl FnMut(&Term) -> Term) -> Term {
        Term::Ac(Self::normalize(
            &self.name,
            self.args.iter().map(|arg| (f(&arg.term), arg.cardinality)),
        ))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ONF argument pairs, sorted by their canonical key.
    #[inline]
    pub fn args(&self) -> &[AcArg] {
        &self.args
    }

    /// The sum of all argument cardinalities.
    #[inline]
    pub fn total_cardinality(&self) -> usize {
        self.args.iter().map(|arg| arg.cardinality).sum()
    }

    /// The arguments with every term repeated by its cardinality, in ONF
    /// order.
    pub fn expanded_args(&self) -> impl Iterator<Item = &Term> {
        self.args
            .iter()
            .flat_map(|arg| std::iter::repeat_n(&arg.term, arg.cardinality))
    }
}

/// Canonical sort key of a term inside an AC argument list: its source
/// text, with the kind as a tie-breaker for atoms of equal text.
fn onf_key(term: &Term) -> (std::string::String, u8) {
    let rank = match term {
        Term::Var(_) => 0,
        Term::Number(_) => 1,
        Term::Str(_) => 2,
        Term::Const(_) => 3,
        Term::Func(_) => 4,
        Term::Ac(_) => 5,
        Term::Product(_) => 6,
        Term::Native => 7,
    };
    (term.to_string(), rank)
}
