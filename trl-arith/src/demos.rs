//! Demonstration programs bundled with `trl-demo`.

use crate::{ArithError, ArithmeticFunctions, ArithmeticUnifier};
use smartstring::alias::String;
use trl_interpreter::{CustomUnifier, Interpreter, InterpreterConfig, NativeFunction};
use trl_terms::{
    BuiltinType, LimitStatement, Program, ReductionRule, Term, TypeName, Var, ac, atom, func,
    product, var,
};

/// A named program, optionally run with the arithmetic plugins.
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub description: &'static str,
    pub arithmetic: bool,
    build: fn() -> Program,
}

impl Demo {
    pub fn program(&self) -> Program {
        (self.build)()
    }

    /// Builds an interpreter for the program, with [`ArithmeticFunctions`]
    /// and [`ArithmeticUnifier`] registered when the demo uses arithmetic.
    pub fn interpreter(&self, config: InterpreterConfig) -> Result<Interpreter, ArithError> {
        let mut natives: Vec<Box<dyn NativeFunction>> = Vec::new();
        let mut unifiers: Vec<Box<dyn CustomUnifier>> = Vec::new();
        if self.arithmetic {
            natives.push(Box::new(ArithmeticFunctions));
            unifiers.push(Box::new(ArithmeticUnifier::new()?));
        }
        Ok(Interpreter::with_config(self.program(), natives, unifiers, config))
    }
}

/// Every bundled demo.
pub const DEMOS: &[Demo] = &[
    Demo {
        name: "trees",
        description: "water and a house at the same place grow a tree",
        arithmetic: true,
        build: trees,
    },
    Demo {
        name: "linear",
        description: "solves 9 = x + 7 during matching",
        arithmetic: true,
        build: linear,
    },
    Demo {
        name: "sum",
        description: "adds up an AC sum through a native function",
        arithmetic: true,
        build: sum,
    },
    Demo {
        name: "peano",
        description: "adds Peano numerals without plugins",
        arithmetic: false,
        build: peano,
    },
];

/// Looks up a demo by name.
pub fn find(name: &str) -> Result<&'static Demo, ArithError> {
    DEMOS
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| ArithError::UnknownDemo(String::from(name)))
}

fn number_limit(names: &[&str]) -> LimitStatement {
    LimitStatement::new(
        names.iter().map(Var::new),
        TypeName::builtin(BuiltinType::Number),
    )
}

/// `water(1,1); house(2,1);
/// [water(:x,:y),house(add[:x,1],:y)] => tree(:x,add[:y,1]);
/// limit :a,:b to $TrsNumber; add[:a,:b] => native;`
pub fn trees() -> Program {
    Program::new()
        .with(func!("water"; 1, 1))
        .with(func!("house"; 2, 1))
        .with(ReductionRule::new(
            product!(
                func!("water"; var!("x"), var!("y")),
                func!("house"; ac!("add"; var!("x"), 1), var!("y"))
            ),
            func!("tree"; var!("x"), ac!("add"; var!("y"), 1)),
        ))
        .with(number_limit(&["a", "b"]))
        .with(ReductionRule::new(ac!("add"; var!("a"), var!("b")), Term::Native))
}

fn linear() -> Program {
    Program::new()
        .with(func!("total"; 9))
        .with(ReductionRule::new(
            func!("total"; ac!("add"; var!("x"), 7)),
            func!("solved"; var!("x")),
        ))
}

fn sum() -> Program {
    Program::new()
        .with(func!("sum"; ac!("add"; 1, 2, 3, 4)))
        .with(number_limit(&["a", "b"]))
        .with(ReductionRule::new(ac!("add"; var!("a"), var!("b")), Term::Native))
}

fn peano() -> Program {
    let zero = atom!("z");
    Program::new()
        .with(func!("plus"; func!("s"; func!("s"; zero.clone())), func!("s"; zero.clone())))
        .with(ReductionRule::new(
            func!("plus"; func!("s"; var!("x")), var!("y")),
            func!("plus"; var!("x"), func!("s"; var!("y"))),
        ))
        .with(ReductionRule::new(func!("plus"; zero, var!("y")), var!("y")))
}
