//! The type checker: a bottom-up tree automaton over terms.
//!
//! Type names are the automaton's states and accepted shapes are its
//! transitions. A term is evaluated from the leaves up; each subterm is
//! assigned the set of type names it reaches, including those reached
//! through ε-transitions (shapes that are plain type names). A
//! substitution `:x => t` is valid when the root of `t` reaches every type
//! `:x` is limited to.
//!
//! The transition table is built once and never mutated. Built-in types
//! are supplied per check by an overlay that maps the atoms and variables
//! of the checked term to `$TrsNumber`, `$TrsString`, `$TrsConstant` and
//! `$TrsVariable`.

use crate::preprocess::{self, TypeTable};
use indexmap::{IndexMap, IndexSet};
use log::trace;
use trl_terms::{
    BuiltinType, LimitStatement, Program, Substitution, Term, TypeDefinition, TypeName, TypeShape,
    Var,
};

/// Built-in types of the atoms and variables of one term.
struct BuiltinOverlay<'t> {
    leaves: IndexMap<&'t Term, TypeName>,
}

impl<'t> BuiltinOverlay<'t> {
    fn for_term(term: &'t Term) -> Self {
        let mut leaves = IndexMap::new();
        let mut stack = vec![term];
        while let Some(t) = stack.pop() {
            let builtin = match t {
                Term::Number(_) => BuiltinType::Number,
                Term::Str(_) => BuiltinType::String,
                Term::Const(_) => BuiltinType::Constant,
                Term::Var(_) => BuiltinType::Variable,
                _ => {
                    stack.extend(t.children());
                    continue;
                }
            };
            leaves.insert(t, TypeName::builtin(builtin));
        }
        Self { leaves }
    }

    fn get(&self, term: &Term) -> Option<&TypeName> {
        self.leaves.get(term)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeChecker {
    /// Variable to the type names it is limited to.
    limits: IndexMap<Var, IndexSet<TypeName>>,
    /// Shape to the type names accepting it.
    transitions: IndexMap<TypeShape, Vec<TypeName>>,
}

impl TypeChecker {
    /// Builds the automaton from the type definitions and limit
    /// statements of `program`. AC shapes are flattened first.
    pub fn new(program: &Program) -> Self {
        let table = preprocess::flatten_ac_types(preprocess::merge_type_definitions(
            program.type_definitions(),
        ));
        let mut limits: IndexMap<Var, IndexSet<TypeName>> = IndexMap::new();
        for limit in program.limits() {
            for v in &limit.variables {
                limits
                    .entry(v.clone())
                    .or_default()
                    .insert(limit.type_name.clone());
            }
        }
        Self {
            limits,
            transitions: transitions_of(&table),
        }
    }

    /// The type names `variable` is limited to, if any.
    pub fn limits_for(&self, variable: &Var) -> Option<&IndexSet<TypeName>> {
        self.limits.get(variable)
    }

    /// Numbers the distinct sets of limit types, starting at 1, and maps
    /// every limited variable to the number of its set.
    pub fn limit_classes(&self) -> IndexMap<Var, usize> {
        let mut groups: Vec<&IndexSet<TypeName>> = Vec::new();
        self.limits
            .iter()
            .map(|(v, types)| {
                let index = match groups.iter().position(|g| *g == types) {
                    Some(index) => index,
                    None => {
                        groups.push(types);
                        groups.len() - 1
                    }
                };
                (v.clone(), index + 1)
            })
            .collect()
    }

    /// Returns `true` if the bound term reaches every type the variable is
    /// limited to. Unlimited variables accept any term.
    pub fn is_substitution_valid(&self, substitution: &Substitution) -> bool {
        let Some(required) = self.limits.get(&substitution.variable) else {
            return true;
        };
        let reached = self.reached_types(&substitution.term);
        let valid = required.iter().all(|t| reached.contains(t));
        if !valid {
            trace!("type check rejected {substitution}");
        }
        valid
    }

    /// Returns `true` if `term` reaches `type_name`.
    pub fn accepts(&self, type_name: &TypeName, term: &Term) -> bool {
        self.reached_types(term).contains(type_name)
    }

    /// Every type name the root of `term` reaches.
    pub fn reached_types(&self, term: &Term) -> IndexSet<TypeName> {
        let overlay = BuiltinOverlay::for_term(term);
        self.evaluate(term, &overlay)
    }

    fn evaluate(&self, term: &Term, overlay: &BuiltinOverlay<'_>) -> IndexSet<TypeName> {
        let mut reached = IndexSet::new();
        match term {
            Term::Number(n) => self.leaf(&TypeShape::Number(n.clone()), &mut reached),
            Term::Str(s) => self.leaf(&TypeShape::Str(s.clone()), &mut reached),
            Term::Const(c) => self.leaf(&TypeShape::Const(c.clone()), &mut reached),
            Term::Var(_) => {}
            Term::Func(f) => {
                let children: Vec<IndexSet<TypeName>> =
                    f.args().iter().map(|a| self.evaluate(a, overlay)).collect();
                for (shape, targets) in &self.transitions {
                    match shape {
                        TypeShape::Term { name, args }
                            if name == f.name()
                                && args.len() == children.len()
                                && args.iter().zip(&children).all(|(t, c)| c.contains(t)) =>
                        {
                            reached.extend(targets.iter().cloned());
                        }
                        _ => {}
                    }
                }
            }
            Term::Ac(a) => {
                let mut counts: IndexMap<TypeName, usize> = IndexMap::new();
                for arg in a.args() {
                    for t in self.evaluate(arg.term(), overlay) {
                        *counts.entry(t).or_insert(0) += arg.cardinality();
                    }
                }
                for (shape, targets) in &self.transitions {
                    match shape {
                        TypeShape::Ac { name, args }
                            if name == a.name()
                                && !args.is_empty()
                                && args.iter().all(|(t, card)| {
                                    counts.get(t).is_some_and(|count| count >= card)
                                }) =>
                        {
                            reached.extend(targets.iter().cloned());
                        }
                        _ => {}
                    }
                }
            }
            Term::Product(_) | Term::Native => {}
        }
        if let Some(builtin) = overlay.get(term) {
            reached.insert(builtin.clone());
        }
        self.close_epsilon(&mut reached);
        reached
    }

    fn leaf(&self, shape: &TypeShape, reached: &mut IndexSet<TypeName>) {
        if let Some(targets) = self.transitions.get(shape) {
            reached.extend(targets.iter().cloned());
        }
    }

    fn close_epsilon(&self, reached: &mut IndexSet<TypeName>) {
        let mut frontier: Vec<TypeName> = reached.iter().cloned().collect();
        while let Some(t) = frontier.pop() {
            let Some(next) = self.transitions.get(&TypeShape::TypeName(t)) else {
                continue;
            };
            for n in next {
                if reached.insert(n.clone()) {
                    frontier.push(n.clone());
                }
            }
        }
    }

    /// The flattened type definitions, one per type name.
    pub fn type_definitions(&self) -> Vec<TypeDefinition> {
        let mut grouped: IndexMap<&TypeName, Vec<TypeShape>> = IndexMap::new();
        for (shape, targets) in &self.transitions {
            for t in targets {
                grouped.entry(t).or_default().push(shape.clone());
            }
        }
        grouped
            .into_iter()
            .map(|(name, shapes)| TypeDefinition::new(name.clone(), shapes))
            .collect()
    }

    /// The limits as statements, one per type name.
    pub fn limit_statements(&self) -> Vec<LimitStatement> {
        let mut grouped: IndexMap<&TypeName, Vec<Var>> = IndexMap::new();
        for (v, types) in &self.limits {
            for t in types {
                grouped.entry(t).or_default().push(v.clone());
            }
        }
        grouped
            .into_iter()
            .map(|(t, vars)| LimitStatement::new(vars, t.clone()))
            .collect()
    }
}

fn transitions_of(table: &TypeTable) -> IndexMap<TypeShape, Vec<TypeName>> {
    let mut transitions: IndexMap<TypeShape, Vec<TypeName>> = IndexMap::new();
    for (name, shapes) in table {
        for shape in shapes {
            let targets = transitions.entry(shape.clone()).or_default();
            if !targets.contains(name) {
                targets.push(name.clone());
            }
        }
    }
    transitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use trl_terms::{ac, func, var};

    fn tn(name: &str) -> TypeName {
        TypeName::new(name)
    }

    fn builtin(b: BuiltinType) -> TypeName {
        TypeName::builtin(b)
    }

    fn checker(statements: Vec<trl_terms::Statement>) -> TypeChecker {
        TypeChecker::new(&statements.into_iter().collect())
    }

    fn valid(checker: &TypeChecker, var: &str, term: Term) -> bool {
        checker.is_substitution_valid(&Substitution::new(Var::new(var), term))
    }

    #[test]
    fn builtin_number_through_named_type() {
        let c = checker(vec![
            TypeDefinition::new(tn("num"), [TypeShape::TypeName(builtin(BuiltinType::Number))])
                .into(),
            LimitStatement::new([Var::new("x")], tn("num")).into(),
        ]);
        assert!(valid(&c, "x", Term::int(5)));
        assert!(!valid(&c, "x", Term::str("s")));
        assert!(!valid(&c, "x", var!("y")));
        assert!(valid(&c, "unlimited", Term::str("s")));
    }

    #[test]
    fn builtin_limits_need_no_definitions() {
        let c = checker(vec![
            LimitStatement::new([Var::new("v")], builtin(BuiltinType::Variable)).into(),
            LimitStatement::new([Var::new("c")], builtin(BuiltinType::Constant)).into(),
        ]);
        assert!(valid(&c, "v", var!("q")));
        assert!(!valid(&c, "v", Term::int(1)));
        assert!(valid(&c, "c", Term::constant("nil")));
        assert!(!valid(&c, "c", func!("f"; 1)));
    }

    #[test]
    fn literal_shapes_match_exactly() {
        let c = checker(vec![
            TypeDefinition::new(
                tn("bit"),
                [TypeShape::Number("0".into()), TypeShape::Number("1".into())],
            )
            .into(),
            LimitStatement::new([Var::new("b")], tn("bit")).into(),
        ]);
        assert!(valid(&c, "b", Term::int(1)));
        assert!(!valid(&c, "b", Term::int(2)));
    }

    #[test]
    fn compound_shapes_check_arguments() {
        let num = builtin(BuiltinType::Number);
        let var_t = builtin(BuiltinType::Variable);
        let c = checker(vec![
            TypeDefinition::new(tn("lin"), [TypeShape::term("div", [var_t, num])]).into(),
            LimitStatement::new([Var::new("e")], tn("lin")).into(),
        ]);
        assert!(valid(&c, "e", func!("div"; var!("x"), 2)));
        assert!(!valid(&c, "e", func!("div"; 2, var!("x"))));
        assert!(!valid(&c, "e", func!("div"; var!("x"), 2, 3)));
    }

    #[test]
    fn ac_shapes_count_cardinalities() {
        let num = builtin(BuiltinType::Number);
        let c = checker(vec![
            TypeDefinition::new(tn("sum"), [TypeShape::ac("add", [num.clone(), num])]).into(),
            LimitStatement::new([Var::new("s")], tn("sum")).into(),
        ]);
        assert!(valid(&c, "s", ac!("add"; 1, 2)));
        assert!(valid(&c, "s", ac!("add"; 3, 3)));
        assert!(!valid(&c, "s", ac!("add"; 1, var!("x"))));
    }

    #[test]
    fn several_limits_must_all_hold() {
        let c = checker(vec![
            TypeDefinition::new(tn("one"), [TypeShape::Number("1".into())]).into(),
            LimitStatement::new([Var::new("x")], tn("one")).into(),
            LimitStatement::new([Var::new("x")], builtin(BuiltinType::Number)).into(),
        ]);
        assert!(valid(&c, "x", Term::int(1)));
        assert!(!valid(&c, "x", Term::int(2)));
        assert_eq!(c.limits_for(&Var::new("x")).map(IndexSet::len), Some(2));
    }

    #[test]
    fn variables_with_equal_limits_share_a_class() {
        let c = checker(vec![
            LimitStatement::new([Var::new("a"), Var::new("b")], builtin(BuiltinType::Number))
                .into(),
            LimitStatement::new([Var::new("s")], builtin(BuiltinType::String)).into(),
        ]);
        let classes = c.limit_classes();
        assert_eq!(classes.get(&Var::new("a")), Some(&1));
        assert_eq!(classes.get(&Var::new("b")), Some(&1));
        assert_eq!(classes.get(&Var::new("s")), Some(&2));
        assert_eq!(classes.get(&Var::new("x")), None);
    }

    #[test]
    fn exports_regrouped_definitions() {
        let c = checker(vec![
            TypeDefinition::new(tn("a"), [TypeShape::Number("1".into())]).into(),
            TypeDefinition::new(tn("a"), [TypeShape::Number("2".into())]).into(),
            LimitStatement::new([Var::new("x"), Var::new("y")], tn("a")).into(),
        ]);
        let defs = c.type_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].to_string(), "type $a = 1 | 2");
        let limits = c.limit_statements();
        assert_eq!(limits.len(), 1);
        assert_eq!(limits[0].to_string(), "limit :x,:y to $a");
    }
}
