//! The rewrite engine.
//!
//! An [`Interpreter`] holds an execution cache of terms and a list of
//! reduction rules. Each call to [`Interpreter::execute_rewrite_step`]
//! applies every rule to every term that was in the cache when the step
//! started, adds the rewritten terms, and then drops the terms that were
//! rewritten together with duplicates. Running steps until one makes no
//! change computes a fixpoint.

use crate::typecheck::TypeChecker;
use crate::unify::{UnificationEngine, UnificationResult};
use crate::validate::{self, ValidationMessage};
use crate::{CustomUnifier, InterpreterConfig, InterpreterError, NativeFunction};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace, warn};
use trl_terms::{Program, ReductionRule, Statement, Substitution, Term, Var};

#[derive(Debug, Clone)]
struct CachedTerm {
    term: Term,
    /// Added during the current step; not matched until the next one.
    is_new: bool,
    /// Rewritten during the current step; removed when the step ends.
    deleted: bool,
}

impl CachedTerm {
    fn existing(term: Term) -> Self {
        Self {
            term,
            is_new: false,
            deleted: false,
        }
    }

    fn fresh(term: Term) -> Self {
        Self {
            term,
            is_new: true,
            deleted: false,
        }
    }
}

/// A subterm of a cached term that unifies with one head slot.
#[derive(Debug, Clone)]
struct Candidate {
    root: usize,
    subterm: Term,
    unifier: UnificationResult,
}

/// A snapshot of the interpreter: its validation messages and a program
/// made of the normalized type definitions and limits, the current
/// execution cache, and the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub messages: Vec<ValidationMessage>,
    pub program: Program,
}

/// A term rewriting interpreter for one program.
///
/// ```rust
/// # use trl_interpreter::Interpreter;
/// # use trl_terms::{func, var, Program, ReductionRule, Term};
/// let program = Program::new()
///     .with(func!("f"; 1))
///     .with(ReductionRule::new(func!("f"; var!("x")), func!("g"; var!("x"))));
/// let mut interpreter = Interpreter::new(program);
/// assert!(interpreter.execute_rewrite_step());
/// assert!(!interpreter.execute_rewrite_step());
/// let terms: Vec<&Term> = interpreter.cache_terms().collect();
/// assert_eq!(terms, vec![&func!("g"; 1)]);
/// ```
pub struct Interpreter {
    messages: Vec<ValidationMessage>,
    has_errors: bool,
    type_checker: TypeChecker,
    /// Rules with their heads split into product slots.
    rules: Vec<(Vec<Term>, ReductionRule)>,
    cache: Vec<CachedTerm>,
    natives: Vec<Box<dyn NativeFunction>>,
    unification: UnificationEngine,
    config: InterpreterConfig,
    rewriting_took_place: bool,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("messages", &self.messages)
            .field("rules", &self.rules.len())
            .field("cache", &self.cache.len())
            .field("natives", &self.natives.len())
            .field("unification", &self.unification)
            .field("config", &self.config)
            .finish()
    }
}

impl Interpreter {
    /// Creates an interpreter without native functions or custom
    /// unifiers.
    pub fn new(program: Program) -> Self {
        Self::with_plugins(program, Vec::new(), Vec::new())
    }

    /// Creates an interpreter with the given native functions and custom
    /// unifiers and the default configuration.
    pub fn with_plugins(
        program: Program,
        natives: Vec<Box<dyn NativeFunction>>,
        unifiers: Vec<Box<dyn CustomUnifier>>,
    ) -> Self {
        Self::with_config(program, natives, unifiers, InterpreterConfig::default())
    }

    /// Creates an interpreter.
    ///
    /// The program is validated first. An invalid program yields an
    /// interpreter that reports its messages and never rewrites.
    pub fn with_config(
        program: Program,
        natives: Vec<Box<dyn NativeFunction>>,
        unifiers: Vec<Box<dyn CustomUnifier>>,
        config: InterpreterConfig,
    ) -> Self {
        let messages = validate::validate(&program);
        let has_errors = messages.iter().any(ValidationMessage::is_error);
        let mut interpreter = Self {
            messages,
            has_errors,
            type_checker: TypeChecker::default(),
            rules: Vec::new(),
            cache: Vec::new(),
            natives,
            unification: UnificationEngine::new(unifiers, config.max_unification_branches),
            config,
            rewriting_took_place: true,
        };
        if has_errors {
            debug!(
                "program rejected with {} message(s)",
                interpreter.messages.len()
            );
            return interpreter;
        }
        interpreter.type_checker = TypeChecker::new(&program);
        interpreter
            .unification
            .set_variable_classes(interpreter.type_checker.limit_classes());
        for statement in program {
            match statement {
                Statement::Term(term) => interpreter.cache.push(CachedTerm::existing(term)),
                Statement::Rule(rule) => {
                    let slots = rule.head_terms().to_vec();
                    interpreter.rules.push((slots, rule));
                }
                Statement::Type(_) | Statement::Limit(_) => {}
            }
        }
        debug!(
            "loaded {} term(s) and {} rule(s)",
            interpreter.cache.len(),
            interpreter.rules.len()
        );
        interpreter
    }

    /// Like [`Interpreter::with_plugins`], but fails on an invalid program.
    pub fn try_new(
        program: Program,
        natives: Vec<Box<dyn NativeFunction>>,
        unifiers: Vec<Box<dyn CustomUnifier>>,
    ) -> Result<Self, InterpreterError> {
        let interpreter = Self::with_plugins(program, natives, unifiers);
        if interpreter.has_errors {
            return Err(InterpreterError::InvalidProgram(interpreter.errors()));
        }
        Ok(interpreter)
    }

    /// Validation messages, warnings included.
    #[inline]
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    fn errors(&self) -> Vec<ValidationMessage> {
        self.messages.iter().filter(|m| m.is_error()).cloned().collect()
    }

    #[inline]
    pub fn type_checker(&self) -> &TypeChecker {
        &self.type_checker
    }

    #[inline]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The terms in the execution cache, in cache order.
    pub fn cache_terms(&self) -> impl Iterator<Item = &Term> {
        self.cache.iter().map(|c| &c.term)
    }

    /// The rules, as given in the program.
    pub fn rules(&self) -> impl Iterator<Item = &ReductionRule> {
        self.rules.iter().map(|(_, rule)| rule)
    }

    /// Empties the execution cache and re-arms rewriting.
    pub fn clear_execution_cache(&mut self) {
        self.cache.clear();
        self.rewriting_took_place = true;
    }

    /// Appends terms to the execution cache.
    ///
    /// Loading does not re-arm rewriting: after a step without change,
    /// call [`Interpreter::clear_execution_cache`] before loading new
    /// input.
    pub fn load_terms(&mut self, terms: impl IntoIterator<Item = Term>) {
        self.cache.extend(terms.into_iter().map(CachedTerm::existing));
    }

    /// Executes one rewrite step and returns `true` if any term changed.
    ///
    /// Returns `false` without doing anything when the program is invalid
    /// or the previous step made no change.
    pub fn execute_rewrite_step(&mut self) -> bool {
        if self.has_errors || !self.rewriting_took_place {
            return false;
        }
        self.rewriting_took_place = false;
        if !self.cache.is_empty() {
            for index in 0..self.rules.len() {
                self.apply_rule(index);
            }
            self.remove_rewritten_terms();
        }
        debug!(
            "rewrite step done: changed={}, {} term(s) in cache",
            self.rewriting_took_place,
            self.cache.len()
        );
        self.rewriting_took_place
    }

    /// Executes rewrite steps until one makes no change and returns the
    /// number of steps that did.
    pub fn run_to_fixpoint(&mut self, max_steps: usize) -> Result<usize, InterpreterError> {
        if self.has_errors {
            return Err(InterpreterError::InvalidProgram(self.errors()));
        }
        for steps in 0..max_steps {
            if !self.execute_rewrite_step() {
                return Ok(steps);
            }
        }
        if self.execute_rewrite_step() {
            return Err(InterpreterError::StepLimitExceeded { steps: max_steps });
        }
        Ok(max_steps)
    }

    /// Returns the messages and the current state as a program.
    pub fn get_current_rewrite_result(&self) -> RewriteResult {
        let mut program = Program::new();
        program.extend(self.type_checker.type_definitions());
        program.extend(self.type_checker.limit_statements());
        program.extend(self.cache_terms().cloned());
        program.extend(self.rules.iter().map(|(slots, rule)| match slots.as_slice() {
            [single] => ReductionRule::new(single.clone(), rule.tail.clone()),
            _ => rule.clone(),
        }));
        RewriteResult {
            messages: self.messages.clone(),
            program,
        }
    }

    fn apply_rule(&mut self, index: usize) {
        let (slots, rule) = self.rules[index].clone();
        let mut columns = Vec::with_capacity(slots.len());
        for slot in &slots {
            let candidates = self.collect_candidates(slot);
            if candidates.is_empty() {
                return;
            }
            columns.push(candidates);
        }

        let total = columns
            .iter()
            .try_fold(1usize, |acc, c| acc.checked_mul(c.len()));
        let Some(total) = total else {
            warn!("rule {rule} has too many candidate combinations; skipped");
            return;
        };
        trace!("rule {rule}: {total} candidate combination(s)");

        for combination in 0..total {
            let mut rest = combination;
            let tuple: Vec<&Candidate> = columns
                .iter()
                .map(|column| {
                    let picked = &column[rest % column.len()];
                    rest /= column.len();
                    picked
                })
                .collect();
            let Some(unifier) = compose_unifiers(tuple.iter().map(|c| &c.unifier)) else {
                continue;
            };
            for candidate in tuple {
                self.rewrite(candidate, &rule, &unifier);
            }
        }
    }

    /// Every subterm of a cached term (new terms excepted) that unifies
    /// with `slot` under a type-valid unifier, once per unifier.
    fn collect_candidates(&self, slot: &Term) -> Vec<Candidate> {
        let limit = self.config.max_candidates_per_slot.unwrap_or(usize::MAX);
        let mut candidates = Vec::new();
        for (root, cached) in self.cache.iter().enumerate() {
            if cached.is_new {
                continue;
            }
            let mut stack = vec![&cached.term];
            while let Some(subterm) = stack.pop() {
                if subterm.is_var() {
                    continue;
                }
                for unifier in self.unification.unify(slot, subterm) {
                    if !self.is_unifier_valid(&unifier, slot) {
                        continue;
                    }
                    if candidates.len() == limit {
                        warn!("candidates for {slot} truncated at {limit}");
                        return candidates;
                    }
                    candidates.push(Candidate {
                        root,
                        subterm: subterm.clone(),
                        unifier,
                    });
                }
                stack.extend(subterm.children());
            }
        }
        candidates
    }

    /// Rewrites one matched subterm and appends the results to the cache.
    fn rewrite(
        &mut self,
        candidate: &Candidate,
        rule: &ReductionRule,
        unifier: &UnificationResult,
    ) {
        let root = &self.cache[candidate.root].term;
        let mut produced = Vec::new();
        if rule.is_native() {
            let input = candidate.subterm.apply_substitutions(unifier.substitutions());
            for native in &self.natives {
                let output = native.evaluate(&input);
                if output != input {
                    produced.push(root.replace_subterm(&candidate.subterm, &output));
                }
            }
        } else {
            let replacement = rule.tail.apply_substitutions(unifier.substitutions());
            if replacement != candidate.subterm {
                produced.push(root.replace_subterm(&candidate.subterm, &replacement));
            }
        }
        if produced.is_empty() {
            return;
        }
        trace!(
            "{} => {}",
            self.cache[candidate.root].term,
            produced
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.rewriting_took_place = true;
        self.cache[candidate.root].deleted = true;
        self.cache.extend(produced.into_iter().map(CachedTerm::fresh));
    }

    /// Keeps the terms that were not rewritten, without duplicates, and
    /// clears the per-step flags.
    fn remove_rewritten_terms(&mut self) {
        let kept: IndexSet<Term> = self
            .cache
            .drain(..)
            .filter(|c| !c.deleted)
            .map(|c| c.term)
            .collect();
        self.cache = kept.into_iter().map(CachedTerm::existing).collect();
    }

    /// Checks every binding against the type limits.
    ///
    /// A variable that occurs in `head` only directly below AC terms may
    /// be bound to an AC term of one of those names: AC flattening has
    /// then spliced the bound term's arguments into the parent, so each
    /// of its arguments is checked instead of the term itself.
    fn is_unifier_valid(&self, unifier: &UnificationResult, head: &Term) -> bool {
        if unifier.is_empty() {
            return true;
        }
        let parents = variable_parents(head);
        unifier.substitutions().iter().all(|s| {
            let spliced = parents.get(&s.variable).and_then(|p| match &s.term {
                Term::Ac(bound) if !p.under_non_ac && p.ac_names.contains(bound.name()) => {
                    Some(bound)
                }
                _ => None,
            });
            match spliced {
                Some(bound) => bound.args().iter().all(|arg| {
                    let element = Substitution::new(s.variable.clone(), arg.term().clone());
                    self.type_checker.is_substitution_valid(&element)
                }),
                None => self.type_checker.is_substitution_valid(s),
            }
        })
    }
}

#[derive(Debug, Default)]
struct VariableParents<'a> {
    under_non_ac: bool,
    ac_names: IndexSet<&'a str>,
}

/// For every variable of `head`, whether it occurs below a non-AC parent
/// (or at the root) and the names of its AC parents.
fn variable_parents(head: &Term) -> IndexMap<&Var, VariableParents<'_>> {
    let mut out: IndexMap<&Var, VariableParents<'_>> = IndexMap::new();
    let mut stack: Vec<(&Term, Option<&str>)> = vec![(head, None)];
    while let Some((term, ac_parent)) = stack.pop() {
        match term {
            Term::Var(v) => {
                let entry = out.entry(v).or_default();
                match ac_parent {
                    Some(name) => {
                        entry.ac_names.insert(name);
                    }
                    None => entry.under_non_ac = true,
                }
            }
            Term::Ac(a) => stack.extend(a.args().iter().map(|arg| (arg.term(), Some(a.name())))),
            other => stack.extend(other.children().into_iter().map(|c| (c, None))),
        }
    }
    out
}

/// Merges the unifiers of one candidate tuple. Returns `None` when two of
/// them bind a variable to different terms.
fn compose_unifiers<'a>(
    unifiers: impl IntoIterator<Item = &'a UnificationResult>,
) -> Option<UnificationResult> {
    let mut unifiers = unifiers.into_iter();
    let first = unifiers.next()?;
    let mut merged: IndexMap<&Var, &Term> = first
        .substitutions()
        .iter()
        .map(|s| (&s.variable, &s.term))
        .collect();
    let mut composed = false;
    for unifier in unifiers {
        composed = true;
        for s in unifier.substitutions() {
            match merged.get(&s.variable) {
                Some(existing) if *existing != &s.term => return None,
                Some(_) => {}
                None => {
                    merged.insert(&s.variable, &s.term);
                }
            }
        }
    }
    if !composed {
        return Some(first.clone());
    }
    Some(
        merged
            .into_iter()
            .map(|(v, t)| Substitution::new(v.clone(), t.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trl_terms::{
        BuiltinType, LimitStatement, TypeDefinition, TypeName, TypeShape, ac, func, product, var,
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cache(interpreter: &Interpreter) -> Vec<String> {
        interpreter.cache_terms().map(ToString::to_string).collect()
    }

    #[test]
    fn rewrites_to_fixpoint() {
        init_logger();
        let program = Program::new()
            .with(func!("s"; func!("s"; Term::constant("z"))))
            .with(ReductionRule::new(func!("s"; var!("x")), func!("p"; var!("x"))));
        let mut interpreter = Interpreter::new(program);
        assert!(interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["p(s(z))", "s(p(z))"]);
        assert!(interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["p(p(z))"]);
        assert!(!interpreter.execute_rewrite_step());
        assert!(!interpreter.execute_rewrite_step());
    }

    #[test]
    fn invalid_program_never_rewrites() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("a"),
                [TypeShape::TypeName(TypeName::new("b"))],
            ))
            .with(TypeDefinition::new(
                TypeName::new("b"),
                [TypeShape::TypeName(TypeName::new("a"))],
            ))
            .with(func!("f"; 1))
            .with(ReductionRule::new(func!("f"; var!("x")), var!("x")));
        let mut interpreter = Interpreter::new(program.clone());
        assert!(interpreter.has_errors());
        assert!(!interpreter.execute_rewrite_step());
        assert!(matches!(
            interpreter.run_to_fixpoint(10),
            Err(InterpreterError::InvalidProgram(_))
        ));
        assert!(matches!(
            Interpreter::try_new(program, Vec::new(), Vec::new()),
            Err(InterpreterError::InvalidProgram(errors)) if errors.len() == 2
        ));
    }

    #[test]
    fn limits_restrict_matches() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("num"),
                [TypeShape::TypeName(TypeName::builtin(BuiltinType::Number))],
            ))
            .with(LimitStatement::new([Var::new("x")], TypeName::new("num")))
            .with(func!("f"; 5))
            .with(func!("f"; Term::str("s")))
            .with(ReductionRule::new(func!("f"; var!("x")), func!("g"; var!("x"))));
        let mut interpreter = Interpreter::new(program);
        assert_eq!(interpreter.run_to_fixpoint(10).ok(), Some(1));
        assert_eq!(cache(&interpreter), vec!["f(\"s\")", "g(5)"]);
    }

    #[test]
    fn differently_limited_ac_variables_get_every_assignment() {
        let program = Program::new()
            .with(LimitStatement::new([Var::new("a")], TypeName::builtin(BuiltinType::Number)))
            .with(LimitStatement::new([Var::new("b")], TypeName::builtin(BuiltinType::String)))
            .with(ac!("add"; 1, Term::str("s")))
            .with(ReductionRule::new(
                ac!("add"; var!("a"), var!("b")),
                func!("pair"; var!("a"), var!("b")),
            ));
        let mut interpreter = Interpreter::new(program);
        assert_eq!(interpreter.run_to_fixpoint(10).ok(), Some(1));
        assert_eq!(cache(&interpreter), vec!["pair(1,\"s\")"]);
    }

    #[test]
    fn candidate_limit_truncates_one_slot() {
        init_logger();
        let program = Program::new()
            .with(func!("f"; 1))
            .with(func!("f"; 2))
            .with(func!("f"; 3))
            .with(ReductionRule::new(func!("f"; var!("x")), func!("g"; var!("x"))));
        let config = InterpreterConfig::default().with_max_candidates_per_slot(1);
        let mut interpreter = Interpreter::with_config(program, Vec::new(), Vec::new(), config);
        assert!(interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["f(2)", "f(3)", "g(1)"]);
        assert_eq!(interpreter.run_to_fixpoint(10).ok(), Some(2));
        assert_eq!(cache(&interpreter), vec!["g(1)", "g(2)", "g(3)"]);
    }

    #[test]
    fn term_product_heads_join_on_shared_variables() {
        let program = Program::new()
            .with(func!("water"; 1))
            .with(func!("house"; 1))
            .with(func!("house"; 2))
            .with(ReductionRule::new(
                product!(func!("water"; var!("x")), func!("house"; var!("x"))),
                func!("tree"; var!("x")),
            ));
        let mut interpreter = Interpreter::new(program);
        assert!(interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["house(2)", "tree(1)"]);
    }

    #[test]
    fn native_functions_rewrite_matched_subterm() {
        let program = Program::new()
            .with(LimitStatement::new(
                [Var::new("a"), Var::new("b")],
                TypeName::builtin(BuiltinType::Number),
            ))
            .with(func!("out"; ac!("add"; 1, 2)))
            .with(ReductionRule::new(ac!("add"; var!("a"), var!("b")), Term::Native));
        let sum = |t: &Term| match t.unpack_ac() {
            Ok(ac) if ac.name() == "add" => ac
                .expanded_args()
                .map(Term::unpack_number)
                .sum::<Result<f64, _>>()
                .map(|v| Term::real(v))
                .unwrap_or_else(|_| t.clone()),
            _ => t.clone(),
        };
        let natives: Vec<Box<dyn NativeFunction>> = vec![Box::new(sum)];
        let mut interpreter = Interpreter::with_plugins(program, natives, Vec::new());
        assert_eq!(interpreter.run_to_fixpoint(10).ok(), Some(1));
        assert_eq!(cache(&interpreter), vec!["out(3)"]);
    }

    #[test]
    fn unchanged_native_result_is_not_a_rewrite() {
        let program = Program::new()
            .with(LimitStatement::new([Var::new("a")], TypeName::builtin(BuiltinType::Number)))
            .with(func!("f"; 1))
            .with(ReductionRule::new(func!("f"; var!("a")), Term::Native));
        let identity = |t: &Term| t.clone();
        let natives: Vec<Box<dyn NativeFunction>> = vec![Box::new(identity)];
        let mut interpreter = Interpreter::with_plugins(program, natives, Vec::new());
        assert!(!interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["f(1)"]);
    }

    #[test]
    fn custom_unifier_enables_rewrites() {
        init_logger();
        let program = Program::new()
            .with(func!("f"; func!("g"; 7)))
            .with(ReductionRule::new(func!("f"; var!("x")), func!("h"; var!("x"))));
        let zeroes = |head: &Term, _: &Term| {
            vec![
                head.variable_set()
                    .into_iter()
                    .map(|v| Substitution::new(v, Term::int(0)))
                    .collect::<UnificationResult>(),
            ]
        };
        let unifiers: Vec<Box<dyn CustomUnifier>> = vec![Box::new(zeroes)];
        let mut interpreter = Interpreter::with_plugins(program, Vec::new(), unifiers);
        assert!(interpreter.execute_rewrite_step());
        let terms = cache(&interpreter);
        assert!(terms.contains(&"h(g(7))".to_string()));
        assert!(terms.contains(&"f(h(0))".to_string()));
        assert!(terms.contains(&"f(g(h(0)))".to_string()));
    }

    #[test]
    fn ac_spliced_bindings_check_each_argument() {
        let program = Program::new()
            .with(LimitStatement::new([Var::new("a")], TypeName::builtin(BuiltinType::Number)))
            .with(ac!("add"; 1, 2, 3))
            .with(ReductionRule::new(ac!("add"; var!("a"), 10), Term::constant("hit")));
        let interpreter = Interpreter::new(program);
        let head = ac!("add"; var!("a"), 10);
        let spliced = UnificationResult::new([Substitution::new(Var::new("a"), ac!("add"; 1, 2))]);
        assert!(interpreter.is_unifier_valid(&spliced, &head));
        let other = UnificationResult::new([Substitution::new(Var::new("a"), ac!("mul"; 1, 2))]);
        assert!(!interpreter.is_unifier_valid(&other, &head));
        let plain_head = func!("f"; var!("a"));
        assert!(!interpreter.is_unifier_valid(&spliced, &plain_head));
        assert!(interpreter.is_unifier_valid(&UnificationResult::empty(), &plain_head));
    }

    #[test]
    fn result_snapshot_restores_single_heads() {
        let program = Program::new()
            .with(TypeDefinition::new(TypeName::new("n"), [TypeShape::Number("1".into())]))
            .with(LimitStatement::new([Var::new("x")], TypeName::new("n")))
            .with(func!("f"; 1))
            .with(ReductionRule::new(func!("f"; var!("x")), func!("g"; var!("x"))))
            .with(ReductionRule::new(
                product!(func!("a"; var!("x")), func!("b"; var!("x"))),
                func!("c"; var!("x")),
            ));
        let mut interpreter = Interpreter::new(program);
        interpreter.execute_rewrite_step();
        let result = interpreter.get_current_rewrite_result();
        assert!(result.messages.is_empty());
        assert_eq!(
            result.program.to_string(),
            "type $n = 1;\nlimit :x to $n;\ng(1);\nf(:x) => g(:x);\n[a(:x),b(:x)] => c(:x);\n"
        );
    }

    #[test]
    fn clearing_cache_rearms_rewriting() {
        let program = Program::new()
            .with(func!("f"; 1))
            .with(ReductionRule::new(func!("f"; var!("x")), func!("g"; var!("x"))));
        let mut interpreter = Interpreter::new(program);
        assert_eq!(interpreter.run_to_fixpoint(5).ok(), Some(1));
        interpreter.load_terms([func!("f"; 2)]);
        assert!(!interpreter.execute_rewrite_step());
        interpreter.clear_execution_cache();
        interpreter.load_terms([func!("f"; 3)]);
        assert!(interpreter.execute_rewrite_step());
        assert_eq!(cache(&interpreter), vec!["g(3)"]);
    }

    #[test]
    fn step_limit_is_reported() {
        let program = Program::new()
            .with(func!("n"; 0))
            .with(ReductionRule::new(
                func!("n"; var!("x")),
                func!("n"; func!("s"; var!("x"))),
            ));
        let mut interpreter = Interpreter::new(program);
        assert!(matches!(
            interpreter.run_to_fixpoint(3),
            Err(InterpreterError::StepLimitExceeded { steps: 3 })
        ));
    }

    #[test]
    fn compose_rejects_conflicts() {
        let a = UnificationResult::new([Substitution::new(Var::new("x"), Term::int(1))]);
        let b = UnificationResult::new([Substitution::new(Var::new("x"), Term::int(2))]);
        let c = UnificationResult::new([Substitution::new(Var::new("y"), Term::int(2))]);
        assert_eq!(compose_unifiers([&a]), Some(a.clone()));
        assert_eq!(compose_unifiers([&a, &b]), None);
        let merged = compose_unifiers([&a, &c, &a]).unwrap_or_default();
        assert_eq!(merged.len(), 2);
    }
}
