//! Most general unifiers with AC-unification and pluggable rescue.
//!
//! Unification runs a work queue of continuations. A continuation is one
//! branch of the search: the equations still to solve and the bindings
//! found so far. AC equations fork one continuation per way of
//! distributing arguments, and a custom unifier may fork one continuation
//! per result it returns. Every continuation that runs out of equations
//! contributes one unifier.

use crate::CustomUnifier;
use crate::partition::PartitionMappings;
use indexmap::{IndexMap, IndexSet};
use log::{trace, warn};
use std::collections::VecDeque;
use trl_terms::{AcTerm, Substitution, Term, Var};

/// A successful unifier: substitutions sorted by variable.
///
/// Two unifiers with the same bindings compare and hash equal regardless
/// of the order the bindings were found in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnificationResult {
    substitutions: Vec<Substitution>,
}

impl UnificationResult {
    pub fn new(substitutions: impl IntoIterator<Item = Substitution>) -> Self {
        let mut substitutions: Vec<Substitution> = substitutions.into_iter().collect();
        substitutions.sort_by(|a, b| a.variable.cmp(&b.variable));
        Self { substitutions }
    }

    /// The unifier that binds nothing.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    #[inline]
    pub fn into_substitutions(self) -> Vec<Substitution> {
        self.substitutions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    /// The term bound to `variable`, if any.
    pub fn get(&self, variable: &Var) -> Option<&Term> {
        self.substitutions
            .iter()
            .find(|s| s.variable == *variable)
            .map(|s| &s.term)
    }
}

impl FromIterator<Substitution> for UnificationResult {
    fn from_iter<I: IntoIterator<Item = Substitution>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Clone)]
struct Equation {
    lhs: Term,
    rhs: Term,
}

impl Equation {
    fn new(lhs: Term, rhs: Term) -> Self {
        Self { lhs, rhs }
    }
}

#[derive(Debug, Clone)]
struct Continuation {
    equations: Vec<Equation>,
    substitutions: Vec<Substitution>,
}

impl Continuation {
    fn new(head: Term, matched: Term) -> Self {
        Self {
            equations: vec![Equation::new(head, matched)],
            substitutions: Vec::new(),
        }
    }

    /// Composes a new binding into the continuation: it is applied to the
    /// existing bindings and to every pending equation.
    fn bind(&mut self, substitution: Substitution) {
        for s in &mut self.substitutions {
            s.term = s.term.apply_substitution(&substitution);
        }
        self.substitutions.retain(|s| !s.is_trivial());
        for eq in &mut self.equations {
            eq.lhs = eq.lhs.apply_substitution(&substitution);
            eq.rhs = eq.rhs.apply_substitution(&substitution);
        }
        if !substitution.is_trivial() {
            self.substitutions.push(substitution);
        }
    }

    /// Binds `variable` to `term`. When `term` is itself a variable and
    /// `variable` belongs to the matched term, the binding is reversed so
    /// that the matched term's variables survive.
    fn bind_preserving(&mut self, variable: Var, term: Term, preserve: &IndexSet<Var>) {
        let substitution = match term {
            Term::Var(other) if preserve.contains(&variable) => {
                Substitution::new(other, Term::Var(variable))
            }
            term => Substitution::new(variable, term),
        };
        self.bind(substitution);
    }

    /// Whether `variable` occurs in a pending equation or a binding.
    fn mentions(&self, variable: &Var) -> bool {
        self.equations
            .iter()
            .any(|eq| eq.lhs.contains_variable(variable) || eq.rhs.contains_variable(variable))
            || self
                .substitutions
                .iter()
                .any(|s| s.variable == *variable || s.term.contains_variable(variable))
    }

    fn conflicts_with(&self, candidate: &Substitution) -> bool {
        self.substitutions
            .iter()
            .any(|s| s.variable == candidate.variable && s.term != candidate.term)
    }
}

/// Computes the set of most general unifiers of two terms.
///
/// Built-in unification handles variables, atoms, compound terms and AC
/// terms. When an equation cannot be solved the registered
/// [`CustomUnifier`]s are asked for solutions before the branch is
/// abandoned.
///
/// In AC equations, variables that occur once and share a symmetry class
/// are interchangeable, and only one assignment per set of blocks is
/// produced for them. Variables without a class share class `0`.
pub struct UnificationEngine {
    custom: Vec<Box<dyn CustomUnifier>>,
    max_branches: Option<usize>,
    variable_classes: IndexMap<Var, usize>,
}

impl std::fmt::Debug for UnificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnificationEngine")
            .field("custom", &self.custom.len())
            .field("max_branches", &self.max_branches)
            .field("variable_classes", &self.variable_classes)
            .finish()
    }
}

impl Default for UnificationEngine {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl UnificationEngine {
    pub fn new(custom: Vec<Box<dyn CustomUnifier>>, max_branches: Option<usize>) -> Self {
        Self {
            custom,
            max_branches,
            variable_classes: IndexMap::new(),
        }
    }

    /// Sets the symmetry classes of variables. Variables bound to terms
    /// of different types must be in different classes.
    pub fn set_variable_classes(&mut self, classes: IndexMap<Var, usize>) {
        self.variable_classes = classes;
    }

    /// Returns every most general unifier of `head` and `matched`, in
    /// discovery order and without duplicates. An empty result means the
    /// terms do not unify.
    ///
    /// Variables of `matched` are preserved: a variable-to-variable
    /// equation binds the head side.
    pub fn unify(&self, head: &Term, matched: &Term) -> Vec<UnificationResult> {
        let preserve = matched.variable_set();
        let budget = self.max_branches.unwrap_or(usize::MAX);
        let mut queue = VecDeque::from([Continuation::new(head.clone(), matched.clone())]);
        let mut results: IndexSet<UnificationResult> = IndexSet::new();
        let mut explored = 0usize;

        'branches: while let Some(mut current) = queue.pop_front() {
            if explored == budget {
                warn!(
                    "unification of {head} with {matched} truncated after {explored} branches, {} pending",
                    queue.len() + 1
                );
                break;
            }
            explored += 1;
            while let Some(eq) = current.equations.pop() {
                let remaining = budget.saturating_sub(explored + queue.len());
                if self.decompose(&mut current, &eq, &preserve, &mut queue, remaining) {
                    continue;
                }
                trace!("cannot unify {} with {}", eq.lhs, eq.rhs);
                let mut rescued = self.rescue(&current, &eq, &preserve).into_iter();
                match rescued.next() {
                    Some(first) => {
                        queue.extend(rescued);
                        current = first;
                    }
                    None => continue 'branches,
                }
            }
            results.insert(UnificationResult::new(current.substitutions));
        }

        trace!("{head} ~ {matched}: {} unifier(s)", results.len());
        results.into_iter().collect()
    }

    /// Solves one equation in place. Returns `false` on a clash.
    fn decompose(
        &self,
        current: &mut Continuation,
        eq: &Equation,
        preserve: &IndexSet<Var>,
        queue: &mut VecDeque<Continuation>,
        remaining: usize,
    ) -> bool {
        if eq.lhs == eq.rhs {
            return true;
        }
        match (&eq.lhs, &eq.rhs) {
            (Term::Func(l), Term::Func(r)) => {
                if l.name() != r.name() || l.arity() != r.arity() {
                    return false;
                }
                current.equations.extend(
                    l.args()
                        .iter()
                        .zip(r.args())
                        .map(|(a, b)| Equation::new(a.clone(), b.clone())),
                );
                true
            }
            (Term::Ac(l), Term::Ac(r)) => {
                let symmetry = Symmetry {
                    classes: &self.variable_classes,
                    preserve,
                };
                decompose_ac(current, l, r, &symmetry, queue, remaining)
            }
            (Term::Var(v), rhs) => {
                if rhs.contains_variable(v) {
                    return false;
                }
                current.bind_preserving(v.clone(), rhs.clone(), preserve);
                true
            }
            (lhs, Term::Var(_)) => {
                current
                    .equations
                    .push(Equation::new(eq.rhs.clone(), lhs.clone()));
                true
            }
            _ => false,
        }
    }

    /// Asks every custom unifier to solve a failed equation. Each accepted
    /// result becomes a copy of `current` with the result's bindings
    /// composed in.
    fn rescue(
        &self,
        current: &Continuation,
        eq: &Equation,
        preserve: &IndexSet<Var>,
    ) -> Vec<Continuation> {
        let mut found: IndexSet<UnificationResult> = IndexSet::new();
        for unifier in &self.custom {
            found.extend(unifier.unifiers(&eq.lhs, &eq.rhs));
        }
        let mut branches = Vec::new();
        for result in found {
            let acceptable = result
                .substitutions()
                .iter()
                .all(|s| !s.term.contains_variable(&s.variable) && !current.conflicts_with(s));
            if !acceptable {
                trace!("rejected custom unifier for {} ~ {}", eq.lhs, eq.rhs);
                continue;
            }
            let mut branch = current.clone();
            for s in result.into_substitutions() {
                if branch.substitutions.contains(&s) {
                    continue;
                }
                branch.bind_preserving(s.variable, s.term, preserve);
            }
            branches.push(branch);
        }
        branches
    }
}

/// Decides which variables of an AC equation are interchangeable.
struct Symmetry<'a> {
    classes: &'a IndexMap<Var, usize>,
    preserve: &'a IndexSet<Var>,
}

impl Symmetry<'_> {
    /// The symmetry class of one argument of the smaller side, or `None`
    /// when it must receive every block: it is not a variable, or the
    /// variable occurs more than once in the equation set.
    fn class_of(
        &self,
        arg: &Term,
        from: &[Term],
        to: &[Term],
        current: &Continuation,
    ) -> Option<usize> {
        let Term::Var(v) = arg else {
            return None;
        };
        let occurrences = from
            .iter()
            .chain(to)
            .filter(|t| t.contains_variable(v))
            .count();
        if occurrences != 1 || current.mentions(v) {
            return None;
        }
        let class = self.classes.get(v).copied().unwrap_or(0);
        Some(class * 2 + usize::from(self.preserve.contains(v)))
    }
}

/// Solves `f[...] = f[...]`. Ground arguments present on both sides are
/// cancelled first; the remaining arguments of the side with the smaller
/// total cardinality are then matched against blocks of the other side.
fn decompose_ac(
    current: &mut Continuation,
    lhs: &AcTerm,
    rhs: &AcTerm,
    symmetry: &Symmetry<'_>,
    queue: &mut VecDeque<Continuation>,
    remaining: usize,
) -> bool {
    if lhs.name() != rhs.name() {
        return false;
    }
    let (l, r) = cancel_common_ground(lhs, rhs);
    let (from, to) = if l.len() > r.len() { (r, l) } else { (l, r) };
    if from.is_empty() {
        return to.is_empty();
    }

    let classes = from
        .iter()
        .map(|arg| symmetry.class_of(arg, &from, &to, &*current))
        .collect();
    let mut mappings = PartitionMappings::new(classes, to.len());
    let Some(first) = mappings.next() else {
        return false;
    };

    let block_term = |block: &[usize]| match block {
        [single] => to[*single].clone(),
        _ => Term::ac(lhs.name(), block.iter().map(|&i| &to[i])),
    };
    let push_mapping = |continuation: &mut Continuation, mapping: &[Vec<usize>]| {
        continuation.equations.extend(
            from.iter()
                .zip(mapping)
                .map(|(arg, block)| Equation::new(arg.clone(), block_term(block))),
        );
    };

    let mut forked = 0usize;
    for mapping in mappings {
        if forked == remaining {
            warn!(
                "AC unification of {}[..] stopped forking after {forked} branches",
                lhs.name()
            );
            break;
        }
        let mut branch = current.clone();
        push_mapping(&mut branch, &mapping);
        queue.push_back(branch);
        forked += 1;
    }
    push_mapping(current, &first);
    true
}

/// The expanded arguments of both sides with common ground arguments
/// removed as many times as they occur on both sides.
fn cancel_common_ground<'a>(lhs: &'a AcTerm, rhs: &'a AcTerm) -> (Vec<Term>, Vec<Term>) {
    let counted = |ac: &'a AcTerm| -> Vec<(&'a Term, usize)> {
        ac.args().iter().map(|a| (a.term(), a.cardinality())).collect()
    };
    let mut l = counted(lhs);
    let mut r = counted(rhs);
    for (lt, lc) in l.iter_mut() {
        if !lt.is_ground() {
            continue;
        }
        if let Some((_, rc)) = r.iter_mut().find(|(rt, _)| rt == lt) {
            let common = (*lc).min(*rc);
            *lc -= common;
            *rc -= common;
        }
    }
    let expand = |args: Vec<(&Term, usize)>| -> Vec<Term> {
        args.into_iter()
            .flat_map(|(t, c)| std::iter::repeat_n(t.clone(), c))
            .collect()
    };
    (expand(l), expand(r))
}
