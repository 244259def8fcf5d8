//! Capability traits injected into the interpreter at construction.

use crate::UnificationResult;
use trl_terms::Term;

/// Evaluates the matched subterm of a rule whose tail is `native`.
///
/// The input has the rule's unifier applied. Returning a term equal to
/// the input means "not applicable"; the interpreter only rewrites when the
/// result differs.
pub trait NativeFunction {
    fn evaluate(&self, term: &Term) -> Term;
}

impl<F> NativeFunction for F
where
    F: Fn(&Term) -> Term,
{
    #[inline]
    fn evaluate(&self, term: &Term) -> Term {
        self(term)
    }
}

/// A domain-specific unifier consulted when built-in unification fails on
/// an equation.
///
/// Every returned result is occurs-checked and checked for conflicts with
/// the bindings of the failing branch before it is accepted; each
/// accepted result continues as its own branch.
pub trait CustomUnifier {
    fn unifiers(&self, head: &Term, matched: &Term) -> Vec<UnificationResult>;
}

impl<F> CustomUnifier for F
where
    F: Fn(&Term, &Term) -> Vec<UnificationResult>,
{
    #[inline]
    fn unifiers(&self, head: &Term, matched: &Term) -> Vec<UnificationResult> {
        self(head, matched)
    }
}
