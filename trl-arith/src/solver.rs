//! A [`CustomUnifier`] that solves linear equations in one variable.
//!
//! When built-in unification fails on `add[:x,7] = 9`, the equation is
//! handed to a small rewriting program that isolates the variable:
//! `eq(9,add[:x,7])` becomes `eq(sub(9,7),:x)` and then `eq(2,:x)`, which
//! yields the unifier `{:x => 2}`. Only one operation deep is solved:
//! `c = op(x, b)` where `op` is `add`, `sub`, `mul` or `div` and the
//! operands may be swapped.

use crate::{ArithError, ArithmeticFunctions};
use log::{debug, warn};
use std::cell::RefCell;
use trl_interpreter::{
    CustomUnifier, Interpreter, InterpreterError, NativeFunction, UnificationResult,
};
use trl_terms::{
    BuiltinType, LimitStatement, Program, ReductionRule, Substitution, Term, TypeDefinition,
    TypeName, TypeShape, Var, ac, func, product, var,
};

/// Rewrite steps allowed for one equation.
const MAX_SOLVER_STEPS: usize = 64;

/// The rewriting program that isolates the variable of an equation.
///
/// `lhs(:exp_l)` holds the number and `rhs(:exp_r)` the arithmetic
/// expression; the product rule joins them into `eq(:exp_l,:exp_r)`.
pub fn solver_program() -> Program {
    let number = TypeName::builtin(BuiltinType::Number);
    let variable = TypeName::builtin(BuiltinType::Variable);
    let var_or_num = TypeName::new("var_or_num");
    let arith = TypeName::new("arith");
    let rule = |head: Term, tail: Term| ReductionRule::new(head, tail);

    Program::new()
        .with(TypeDefinition::new(
            var_or_num.clone(),
            [
                TypeShape::TypeName(number.clone()),
                TypeShape::TypeName(variable.clone()),
            ],
        ))
        .with(TypeDefinition::new(
            arith.clone(),
            [
                TypeShape::ac("add", [var_or_num.clone(), var_or_num.clone()]),
                TypeShape::term("sub", [var_or_num.clone(), var_or_num.clone()]),
                TypeShape::ac("mul", [var_or_num.clone(), var_or_num.clone()]),
                TypeShape::term("div", [variable.clone(), number.clone()]),
            ],
        ))
        .with(LimitStatement::new([Var::new("x")], variable))
        .with(LimitStatement::new([Var::new("y"), Var::new("c")], number.clone()))
        .with(LimitStatement::new([Var::new("a"), Var::new("b")], number.clone()))
        .with(LimitStatement::new([Var::new("exp_l")], number))
        .with(LimitStatement::new([Var::new("exp_r")], arith))
        .with(rule(
            product!(func!("lhs"; var!("exp_l")), func!("rhs"; var!("exp_r"))),
            func!("eq"; var!("exp_l"), var!("exp_r")),
        ))
        .with(rule(
            func!("eq"; var!("y"), ac!("add"; var!("x"), var!("c"))),
            func!("eq"; func!("sub"; var!("y"), var!("c")), var!("x")),
        ))
        .with(rule(
            func!("eq"; var!("y"), func!("sub"; var!("x"), var!("c"))),
            func!("eq"; ac!("add"; var!("y"), var!("c")), var!("x")),
        ))
        .with(rule(
            func!("eq"; var!("y"), func!("sub"; var!("c"), var!("x"))),
            func!("eq"; ac!("add"; ac!("mul"; -1, var!("y")), var!("c")), var!("x")),
        ))
        .with(rule(
            func!("eq"; var!("y"), ac!("mul"; var!("x"), var!("c"))),
            func!("eq"; func!("div"; var!("y"), var!("c")), var!("x")),
        ))
        .with(rule(
            func!("eq"; var!("y"), func!("div"; var!("x"), var!("c"))),
            func!("eq"; ac!("mul"; var!("y"), var!("c")), var!("x")),
        ))
        .with(rule(ac!("add"; var!("a"), var!("b")), Term::Native))
        .with(rule(func!("sub"; var!("a"), var!("b")), Term::Native))
        .with(rule(ac!("mul"; var!("a"), var!("b")), Term::Native))
        .with(rule(func!("div"; var!("a"), var!("b")), Term::Native))
}

/// Solves `number = expression` equations rejected by built-in
/// unification, where the expression is one arithmetic operation over a
/// variable and a number.
///
/// The unifier owns an interpreter for [`solver_program`], reused for
/// every equation. It is not reentrant.
#[derive(Debug)]
pub struct ArithmeticUnifier {
    solver: RefCell<Interpreter>,
}

impl ArithmeticUnifier {
    pub fn new() -> Result<Self, ArithError> {
        let natives: Vec<Box<dyn NativeFunction>> = vec![Box::new(ArithmeticFunctions)];
        let solver = Interpreter::try_new(solver_program(), natives, Vec::new())?;
        Ok(Self {
            solver: RefCell::new(solver),
        })
    }

    /// Solves `matched = head` and returns the bindings found.
    pub fn solve(
        &self,
        head: &Term,
        matched: &Term,
    ) -> Result<Vec<UnificationResult>, InterpreterError> {
        let Ok(mut solver) = self.solver.try_borrow_mut() else {
            warn!("arithmetic unifier called reentrantly for {head}");
            return Ok(Vec::new());
        };
        let checker = solver.type_checker();
        let lhs_valid = checker
            .is_substitution_valid(&Substitution::new(Var::new("exp_l"), matched.clone()));
        let rhs_valid =
            checker.is_substitution_valid(&Substitution::new(Var::new("exp_r"), head.clone()));
        if !lhs_valid || !rhs_valid {
            return Ok(Vec::new());
        }

        solver.clear_execution_cache();
        solver.load_terms([func!("rhs"; head), func!("lhs"; matched)]);
        let steps = solver.run_to_fixpoint(MAX_SOLVER_STEPS)?;
        debug!("solved {matched} = {head} in {steps} step(s)");

        let mut results = Vec::new();
        for term in solver.cache_terms() {
            let Ok([value, unknown]) = term.unpack_func::<2>("eq") else {
                continue;
            };
            if let (Term::Number(_), Term::Var(v)) = (value, unknown) {
                let result = UnificationResult::new([Substitution::new(v.clone(), value.clone())]);
                if !results.contains(&result) {
                    results.push(result);
                }
            }
        }
        Ok(results)
    }
}

impl CustomUnifier for ArithmeticUnifier {
    fn unifiers(&self, head: &Term, matched: &Term) -> Vec<UnificationResult> {
        self.solve(head, matched).unwrap_or_else(|e| {
            warn!("arithmetic unifier gave up on {matched} = {head}: {e}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn solve(head: Term, matched: Term) -> Vec<UnificationResult> {
        let unifier = ArithmeticUnifier::new().expect("solver program is valid");
        unifier.unifiers(&head, &matched)
    }

    fn single_binding(results: &[UnificationResult], name: &str) -> Option<Term> {
        match results {
            [only] => only.get(&Var::new(name)).cloned(),
            _ => None,
        }
    }

    #[test]
    fn solver_program_is_valid() {
        let interpreter = Interpreter::new(solver_program());
        assert!(interpreter.messages().is_empty(), "{:?}", interpreter.messages());
    }

    #[test]
    fn solves_each_operation() {
        init_logger();
        let cases = [
            (ac!("add"; var!("x"), 7), 9, "2"),
            (func!("sub"; var!("x"), 3), 4, "7"),
            (func!("sub"; 10, var!("x")), 4, "6"),
            (ac!("mul"; var!("x"), 5), 20, "4"),
            (func!("div"; var!("x"), 4), 2, "8"),
        ];
        for (head, value, expected) in cases {
            let results = solve(head.clone(), Term::int(value));
            assert_eq!(
                single_binding(&results, "x"),
                Some(Term::number(expected)),
                "{head} = {value}"
            );
        }
    }

    #[test]
    fn solves_for_any_variable_name() {
        let results = solve(ac!("add"; var!("z"), 1), Term::int(2));
        assert_eq!(single_binding(&results, "z"), Some(Term::int(1)));
    }

    #[test]
    fn rejects_non_arithmetic_input() {
        assert!(solve(func!("water"; var!("x")), Term::int(2)).is_empty());
        assert!(solve(ac!("add"; var!("x"), 1), Term::str("2")).is_empty());
        assert!(solve(ac!("add"; var!("x"), var!("y")), Term::int(2)).is_empty());
    }

    #[test]
    fn unifier_is_reusable() {
        let unifier = ArithmeticUnifier::new().expect("solver program is valid");
        let first = unifier.unifiers(&ac!("add"; var!("x"), 1), &Term::int(3));
        let second = unifier.unifiers(&ac!("add"; var!("x"), 1), &Term::int(5));
        assert_eq!(single_binding(&first, "x"), Some(Term::int(2)));
        assert_eq!(single_binding(&second, "x"), Some(Term::int(4)));
    }
}
