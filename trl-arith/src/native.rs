//! Arithmetic over numbers as a [`NativeFunction`].

use log::trace;
use trl_interpreter::NativeFunction;
use trl_terms::{AcTerm, Func, Term};

/// Evaluates `sub(a,b)` and `div(a,b)` on two numbers, and `add[...]` and
/// `mul[...]` when every argument is a number.
///
/// Anything else, including division by zero, is returned unchanged,
/// which the interpreter treats as "not applicable".
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticFunctions;

impl NativeFunction for ArithmeticFunctions {
    fn evaluate(&self, term: &Term) -> Term {
        let result = match term {
            Term::Func(f) => binary(f),
            Term::Ac(a) => fold(a),
            _ => None,
        };
        match result {
            Some(value) => {
                trace!("{term} = {value}");
                Term::real(value)
            }
            None => term.clone(),
        }
    }
}

fn binary(f: &Func) -> Option<f64> {
    let [lhs, rhs] = f.args() else {
        return None;
    };
    let lhs = lhs.unpack_number().ok()?;
    let rhs = rhs.unpack_number().ok()?;
    match f.name().to_ascii_lowercase().as_str() {
        "sub" => Some(lhs - rhs),
        "div" if rhs != 0.0 => Some(lhs / rhs),
        _ => None,
    }
}

fn fold(a: &AcTerm) -> Option<f64> {
    if a.total_cardinality() < 2 {
        return None;
    }
    let numbers = a
        .expanded_args()
        .map(Term::unpack_number)
        .collect::<Result<Vec<f64>, _>>()
        .ok()?;
    match a.name() {
        "add" => Some(numbers.iter().sum()),
        "mul" => Some(numbers.iter().product()),
        _ => None,
    }
}
