//! Source rendering for terms and program entities.
//!
//! Rendering is a pure function of structure and produces the concrete
//! syntax of the language: `name(a,b)` for compound terms, `name[a,a,b]`
//! for AC terms with every cardinality expanded, `:x` for variables,
//! quoted strings, `[t1,t2]` for term products and `native`. The rendered
//! text is also the canonical sort key of AC arguments.

use crate::{
    AcTerm, BuiltinType, Func, LimitStatement, Program, ReductionRule, Statement, Substitution,
    Term, TypeDefinition, TypeName, TypeShape, Var,
};
use std::fmt;

fn write_args<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    args: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, t) in args.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

fn write_str_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let mut out = std::string::String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    f.write_str(&out)
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        write_args(f, self.args())?;
        f.write_str(")")
    }
}

impl fmt::Display for AcTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name())?;
        write_args(f, self.expanded_args())?;
        f.write_str("]")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{v}"),
            Term::Number(n) => f.write_str(n),
            Term::Str(s) => write_str_quoted(f, s),
            Term::Const(c) => f.write_str(c),
            Term::Func(t) => write!(f, "{t}"),
            Term::Ac(t) => write!(f, "{t}"),
            Term::Product(ts) => {
                f.write_str("[")?;
                write_args(f, ts)?;
                f.write_str("]")
            }
            Term::Native => f.write_str("native"),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.variable, self.term)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

impl fmt::Display for BuiltinType {
    /// Formats the built-in type as its keyword, e.g. `TrsNumber`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(BuiltinType::STRS[usize::from(*self)])
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Number(n) => f.write_str(n),
            TypeShape::Str(s) => write_str_quoted(f, s),
            TypeShape::Const(c) => f.write_str(c),
            TypeShape::TypeName(t) => write!(f, "{t}"),
            TypeShape::Term { name, args } => {
                write!(f, "{name}(")?;
                write_args(f, args)?;
                f.write_str(")")
            }
            TypeShape::Ac { name, args } => {
                write!(f, "{name}[")?;
                write_args(
                    f,
                    args.iter()
                        .flat_map(|(t, card)| std::iter::repeat_n(t, *card)),
                )?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} = ", self.name)?;
        for (i, shape) in self.accepted.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{shape}")?;
        }
        Ok(())
    }
}

impl fmt::Display for LimitStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("limit ")?;
        write_args(f, &self.variables)?;
        write!(f, " to {}", self.type_name)
    }
}

impl fmt::Display for ReductionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.head, self.tail)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Term(t) => write!(f, "{t}"),
            Statement::Rule(r) => write!(f, "{r}"),
            Statement::Type(t) => write!(f, "{t}"),
            Statement::Limit(l) => write!(f, "{l}"),
        }
    }
}

/// Renders one statement per line, each terminated by `;`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in self.statements() {
            writeln!(f, "{statement};")?;
        }
        Ok(())
    }
}
