//! Substitutions and the structural operations on terms that the
//! unification and rewriting engines are built on.

use crate::{Term, Var};
use indexmap::IndexSet;

/// A binding of a variable to a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Substitution {
    pub variable: Var,
    pub term: Term,
}

impl Substitution {
    #[inline]
    pub fn new(variable: Var, term: Term) -> Self {
        Self { variable, term }
    }

    /// Returns `true` for a binding of a variable to itself.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        matches!(&self.term, Term::Var(v) if *v == self.variable)
    }
}

impl Term {
    /// Applies one substitution. AC terms are rebuilt in ONF so that a
    /// variable bound to an AC term of the same name is flattened into its
    /// parent.
    pub fn apply_substitution(&self, substitution: &Substitution) -> Term {
        match self {
            Term::Var(v) if *v == substitution.variable => substitution.term.clone(),
            Term::Var(_) | Term::Number(_) | Term::Str(_) | Term::Const(_) | Term::Native => {
                self.clone()
            }
            Term::Func(f) => Term::func(
                f.name(),
                f.args().iter().map(|arg| arg.apply_substitution(substitution)),
            ),
            Term::Ac(a) => a.map_args(|arg| arg.apply_substitution(substitution)),
            Term::Product(ts) => {
                Term::Product(ts.iter().map(|t| t.apply_substitution(substitution)).collect())
            }
        }
    }

    /// Applies the substitutions one after the other, in order.
    pub fn apply_substitutions<'a>(
        &self,
        substitutions: impl IntoIterator<Item = &'a Substitution>,
    ) -> Term {
        let mut substitutions = substitutions.into_iter().peekable();
        if substitutions.peek().is_none() {
            return self.clone();
        }
        substitutions.fold(self.clone(), |term, s| term.apply_substitution(s))
    }

    /// Occurs check: returns `true` if `variable` appears anywhere in the
    /// term.
    pub fn contains_variable(&self, variable: &Var) -> bool {
        match self {
            Term::Var(v) => v == variable,
            Term::Number(_) | Term::Str(_) | Term::Const(_) | Term::Native => false,
            Term::Func(f) => f.args().iter().any(|arg| arg.contains_variable(variable)),
            Term::Ac(a) => a.args().iter().any(|arg| arg.term().contains_variable(variable)),
            Term::Product(ts) => ts.iter().any(|t| t.contains_variable(variable)),
        }
    }

    /// Returns a copy of the term in which every subterm structurally equal
    /// to `target` is replaced by `replacement`.
    ///
    /// Equality is value equality: atoms match when kind and value agree
    /// and AC terms match by ONF. Replacing inside an AC term re-derives
    /// its ONF.
    pub fn replace_subterm(&self, target: &Term, replacement: &Term) -> Term {
        if self == target {
            return replacement.clone();
        }
        match self {
            Term::Var(_) | Term::Number(_) | Term::Str(_) | Term::Const(_) | Term::Native => {
                self.clone()
            }
            Term::Func(f) => Term::func(
                f.name(),
                f.args().iter().map(|arg| arg.replace_subterm(target, replacement)),
            ),
            Term::Ac(a) => a.map_args(|arg| arg.replace_subterm(target, replacement)),
            Term::Product(ts) => Term::Product(
                ts.iter()
                    .map(|t| t.replace_subterm(target, replacement))
                    .collect(),
            ),
        }
    }

    /// Collects the variables of the term in left-to-right order. A
    /// variable is listed once per occurrence; AC arguments are visited
    /// once per distinct argument.
    pub fn variables(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    /// The distinct variables of the term, in order of first occurrence.
    pub fn variable_set(&self) -> IndexSet<Var> {
        self.variables().into_iter().collect()
    }

    fn collect_variables(&self, out: &mut Vec<Var>) {
        match self {
            Term::Var(v) => out.push(v.clone()),
            Term::Number(_) | Term::Str(_) | Term::Const(_) | Term::Native => {}
            Term::Func(f) => f.args().iter().for_each(|arg| arg.collect_variables(out)),
            Term::Ac(a) => a.args().iter().for_each(|arg| arg.term().collect_variables(out)),
            Term::Product(ts) => ts.iter().for_each(|t| t.collect_variables(out)),
        }
    }

    /// Returns `true` if the term contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Number(_) | Term::Str(_) | Term::Const(_) | Term::Native => true,
            Term::Func(f) => f.args().iter().all(Term::is_ground),
            Term::Ac(a) => a.args().iter().all(|arg| arg.term().is_ground()),
            Term::Product(ts) => ts.iter().all(Term::is_ground),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ac, atom, func, var};
    use proptest::prelude::*;
    use quickcheck::{Arbitrary, Gen, TestResult};

    fn sub(name: &str, term: Term) -> Substitution {
        Substitution::new(Var::new(name), term)
    }

    #[test]
    fn substitution_rebuilds_terms() {
        let t = func!("tree"; var!("x"), ac!("add"; var!("y"), 1));
        let out = t.apply_substitutions(&[sub("x", Term::int(1)), sub("y", Term::int(1))]);
        assert_eq!(out, func!("tree"; 1, ac!("add"; 1, 1)));
        assert_eq!(out.to_string(), "tree(1,add[1,1])");
    }

    #[test]
    fn substitutions_apply_sequentially() {
        let t = func!("f"; var!("x"));
        let out = t.apply_substitutions(&[sub("x", var!("y")), sub("y", Term::int(3))]);
        assert_eq!(out, func!("f"; 3));
    }

    #[test]
    fn binding_inside_ac_flattens_same_name() {
        let t = ac!("add"; var!("x"), 3);
        let out = t.apply_substitution(&sub("x", ac!("add"; 1, 2)));
        assert_eq!(out, ac!("add"; 1, 2, 3));
    }

    #[test]
    fn occurs_check() {
        let t = func!("f"; ac!("add"; var!("x"), 1));
        assert!(t.contains_variable(&Var::new("x")));
        assert!(!t.contains_variable(&Var::new("y")));
    }

    #[test]
    fn replace_is_structural_and_deep() {
        let root = func!("tree"; 1, ac!("add"; 1, 1));
        let out = root.replace_subterm(&ac!("add"; 1, 1), &Term::int(2));
        assert_eq!(out, func!("tree"; 1, 2));

        let root = func!("f"; 1, Term::constant("1"));
        let out = root.replace_subterm(&Term::int(1), &atom!("one"));
        assert_eq!(out, func!("f"; atom!("one"), atom!("1")));

        let root = ac!("add"; func!("g"; ac!("mul"; 2, 3)), 4);
        let out = root.replace_subterm(&ac!("mul"; 3, 2), &Term::int(6));
        assert_eq!(out, ac!("add"; func!("g"; 6), 4));
    }

    #[test]
    fn variables_keep_occurrences() {
        let t = func!("f"; var!("x"), func!("g"; var!("y"), var!("x")));
        let vars = t.variables();
        let names: Vec<&str> = vars.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["x", "y", "x"]);
        let set = t.variable_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_index(0), Some(&Var::new("x")));
        assert_eq!(set.get_index(1), Some(&Var::new("y")));
    }

    #[test]
    fn trivial_substitution() {
        assert!(sub("x", var!("x")).is_trivial());
        assert!(!sub("x", var!("y")).is_trivial());
    }

    /// Small random terms for quickcheck.
    #[derive(Debug, Clone)]
    struct SmallTerm(Term);

    impl Arbitrary for SmallTerm {
        fn arbitrary(g: &mut Gen) -> Self {
            fn build(g: &mut Gen, depth: u8) -> Term {
                let choice = u8::arbitrary(g) % if depth == 0 { 3 } else { 5 };
                match choice {
                    0 => Term::int(i8::arbitrary(g)),
                    1 => Term::var(*g.choose(&["x", "y", "z"]).unwrap_or(&"x")),
                    2 => Term::constant(*g.choose(&["a", "b"]).unwrap_or(&"a")),
                    3 => Term::func("f", [build(g, depth - 1), build(g, depth - 1)]),
                    _ => Term::ac("add", [build(g, depth - 1), build(g, depth - 1)]),
                }
            }
            SmallTerm(build(g, 3))
        }
    }

    #[test]
    fn quickcheck_empty_substitution_is_identity() {
        fn prop(t: SmallTerm) -> bool {
            t.0.apply_substitutions(std::iter::empty()) == t.0
        }
        quickcheck::quickcheck(prop as fn(SmallTerm) -> bool);
    }

    #[test]
    fn quickcheck_ground_terms_have_no_variables() {
        fn prop(t: SmallTerm) -> TestResult {
            if !t.0.is_ground() {
                return TestResult::discard();
            }
            TestResult::from_bool(t.0.variables().is_empty())
        }
        quickcheck::quickcheck(prop as fn(SmallTerm) -> TestResult);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]

        #[test]
        fn ground_after_binding_all_variables(n in -100i64..100) {
            let t = func!("f"; var!("x"), ac!("add"; var!("y"), var!("x")));
            let subs: Vec<Substitution> = t
                .variable_set()
                .into_iter()
                .map(|v| Substitution::new(v, Term::int(n)))
                .collect();
            let out = t.apply_substitutions(&subs);
            prop_assert!(out.is_ground());
            prop_assert!(out.variables().is_empty());
        }
    }
}
