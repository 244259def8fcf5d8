//! Static validation of programs.
//!
//! Validation never stops at the first problem: every statement is checked
//! and all messages are returned. A program with at least one
//! [`Severity::Error`] is not executed.

use crate::preprocess;
use indexmap::{IndexMap, IndexSet};
use smartstring::alias::String;
use std::fmt;
use trl_terms::{
    BuiltinType, Program, ReductionRule, Statement, Term, TypeName, TypeShape, Var,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One diagnostic produced by validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
}

impl ValidationMessage {
    pub fn error(message: impl AsRef<str>) -> Self {
        Self {
            severity: Severity::Error,
            message: String::from(message.as_ref()),
        }
    }

    pub fn warning(message: impl AsRef<str>) -> Self {
        Self {
            severity: Severity::Warning,
            message: String::from(message.as_ref()),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Validates a program and returns every message found.
pub fn validate(program: &Program) -> Vec<ValidationMessage> {
    let mut validator = Validator::default();
    if program.is_empty() {
        validator.warn("Empty program block.");
    }
    validator.type_definitions(program);
    validator.limits(program);
    validator.statements(program);
    validator.mixed_ac_type_shapes(program);
    validator.messages
}

#[derive(Default)]
struct Validator {
    messages: Vec<ValidationMessage>,
    /// Function symbol to whether it has been seen as an AC symbol.
    ac_symbols: IndexMap<String, bool>,
}

impl Validator {
    fn error(&mut self, message: impl AsRef<str>) {
        self.messages.push(ValidationMessage::error(message));
    }

    fn warn(&mut self, message: impl AsRef<str>) {
        self.messages.push(ValidationMessage::warning(message));
    }

    fn type_definitions(&mut self, program: &Program) {
        let table = preprocess::merge_type_definitions(program.type_definitions());

        for name in preprocess::nodes_on_cycles(&preprocess::type_name_graph(&table)) {
            self.error(format!("Found cycle in type graph for type name {name}"));
        }
        for name in preprocess::nodes_on_cycles(&preprocess::ac_expansion_graph(&table)) {
            self.error(format!(
                "Found cycle in AC Term Type Graph for type name {name}"
            ));
        }

        for def in program.type_definitions() {
            if def.name.is_builtin() {
                self.error(format!(
                    "A type definition name may not be the same as a built-in type name: {}",
                    BuiltinType::STRS.join(" ")
                ));
            }
            for referenced in def.referenced_types() {
                if !referenced.is_builtin() && !table.contains_key(referenced) {
                    self.error(format!("Unknown type: {referenced}"));
                }
            }
            for shape in &def.accepted {
                match shape {
                    TypeShape::Ac { name, args }
                        if args.iter().map(|(_, card)| card).sum::<usize>() < 2 =>
                    {
                        self.error(format!(
                            "{name} defined in type {} must have at least two arguments.",
                            def.name
                        ));
                    }
                    _ => {}
                }
            }
        }
    }

    fn limits(&mut self, program: &Program) {
        let declared: IndexSet<&TypeName> = program.type_definitions().map(|d| &d.name).collect();
        let mut mapped: IndexSet<&Var> = IndexSet::new();
        for limit in program.limits() {
            mapped.extend(limit.variables.iter());
            if !limit.type_name.is_builtin() && !declared.contains(&limit.type_name) {
                self.error(format!(
                    "Unknown type referenced in limit statement: {}",
                    limit.type_name
                ));
            }
        }
        for rule in program.rules().filter(|r| r.is_native()) {
            for v in rule.head.variable_set() {
                if !mapped.contains(&v) {
                    self.error(format!(
                        "Variable {v} in term head for native function is not mapped to a type definition."
                    ));
                }
            }
        }
    }

    fn statements(&mut self, program: &Program) {
        for statement in program.statements() {
            match statement {
                Statement::Term(term) if term.is_var() => self.error(
                    "A term cannot only be a variable, this would match every rewrite rule.",
                ),
                Statement::Term(term) => self.term(term),
                Statement::Rule(rule) => self.rule(rule),
                Statement::Type(_) | Statement::Limit(_) => {}
            }
        }
    }

    fn rule(&mut self, rule: &ReductionRule) {
        if rule.head.is_var() {
            self.error("A reduction rule head may not only be a variable.");
        }
        let head_vars = rule.head.variable_set();
        if rule.tail.variables().iter().any(|v| !head_vars.contains(v)) {
            self.error(
                "A reduction rule head must contain all variables that are in the reduction rule tail.",
            );
        }
        match &rule.head {
            Term::Product(slots) => {
                if slots.is_empty() {
                    self.error("A term product must contain at least one term.");
                }
                for slot in slots {
                    self.term(slot);
                }
            }
            head => self.term(head),
        }
        if !rule.is_native() {
            self.term(&rule.tail);
        }
    }

    fn term(&mut self, term: &Term) {
        if let Some(symbol) = term.symbol() {
            self.record_symbol(symbol, term.is_ac());
        }
        match term {
            Term::Native => {
                self.error("The 'native' keyword can only be used in reduction rule tails.")
            }
            Term::Product(_) => {
                self.error("Term product can only be used as a reduction rule head.")
            }
            Term::Func(f) => {
                for arg in f.args() {
                    self.term(arg);
                }
            }
            Term::Ac(a) => {
                if a.total_cardinality() < 2 {
                    self.error(format!(
                        "AC terms must have at least 2 arguments: '{}' does not.",
                        a.name()
                    ));
                }
                for arg in a.args() {
                    self.term(arg.term());
                }
            }
            Term::Var(_) | Term::Number(_) | Term::Str(_) | Term::Const(_) => {}
        }
    }

    fn record_symbol(&mut self, symbol: &str, is_ac: bool) {
        let seen = *self.ac_symbols.entry(String::from(symbol)).or_insert(is_ac);
        if seen != is_ac {
            self.error(format!(
                "The '{symbol}' term may not be an AC and non-AC term at the same time."
            ));
        }
    }

    fn mixed_ac_type_shapes(&mut self, program: &Program) {
        for def in program.type_definitions() {
            for shape in &def.accepted {
                if let Some(symbol) = shape.symbol() {
                    self.record_symbol(symbol, matches!(shape, TypeShape::Ac { .. }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trl_terms::{LimitStatement, TypeDefinition, ac, func, product, var};

    fn errors(program: &Program) -> Vec<std::string::String> {
        validate(program)
            .into_iter()
            .filter(ValidationMessage::is_error)
            .map(|m| m.message.to_string())
            .collect()
    }

    #[test]
    fn empty_program_is_a_warning() {
        let messages = validate(&Program::new());
        assert_eq!(messages, vec![ValidationMessage::warning("Empty program block.")]);
        assert_eq!(messages[0].to_string(), "warning: Empty program block.");
    }

    #[test]
    fn valid_program_has_no_messages() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("num"),
                [TypeShape::TypeName(TypeName::builtin(BuiltinType::Number))],
            ))
            .with(LimitStatement::new([Var::new("a"), Var::new("b")], TypeName::new("num")))
            .with(ac!("add"; 1, 2))
            .with(ReductionRule::new(ac!("add"; var!("a"), var!("b")), Term::Native));
        assert!(validate(&program).is_empty());
    }

    #[test]
    fn type_cycles_are_errors() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("a"),
                [TypeShape::TypeName(TypeName::new("b"))],
            ))
            .with(TypeDefinition::new(
                TypeName::new("b"),
                [TypeShape::TypeName(TypeName::new("a"))],
            ));
        assert_eq!(
            errors(&program),
            vec![
                "Found cycle in type graph for type name $a",
                "Found cycle in type graph for type name $b",
            ]
        );
    }

    #[test]
    fn unknown_types_are_errors() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("a"),
                [TypeShape::term("f", [TypeName::new("missing")])],
            ))
            .with(LimitStatement::new([Var::new("x")], TypeName::new("nowhere")));
        assert_eq!(
            errors(&program),
            vec![
                "Unknown type: $missing",
                "Unknown type referenced in limit statement: $nowhere",
            ]
        );
    }

    #[test]
    fn type_definition_checks() {
        let program = Program::new()
            .with(TypeDefinition::new(
                TypeName::new("TrsNumber"),
                [TypeShape::Number("1".into())],
            ))
            .with(TypeDefinition::new(
                TypeName::new("s"),
                [TypeShape::ac("add", [TypeName::builtin(BuiltinType::Number)])],
            ));
        let errs = errors(&program);
        assert_eq!(errs.len(), 2);
        assert!(errs[0].starts_with("A type definition name may not be the same"));
        assert_eq!(errs[1], "add defined in type $s must have at least two arguments.");
    }

    #[test]
    fn native_rule_variables_must_be_limited() {
        let program = Program::new().with(ReductionRule::new(
            func!("sub"; var!("a"), var!("b")),
            Term::Native,
        ));
        assert_eq!(
            errors(&program),
            vec![
                "Variable :a in term head for native function is not mapped to a type definition.",
                "Variable :b in term head for native function is not mapped to a type definition.",
            ]
        );
    }

    #[test]
    fn rule_shape_checks() {
        let program = Program::new()
            .with(ReductionRule::new(var!("x"), Term::int(1)))
            .with(ReductionRule::new(func!("f"; var!("x")), var!("y")))
            .with(ReductionRule::new(func!("g"; 1), product!(func!("a"; 1), func!("b"; 2))));
        assert_eq!(
            errors(&program),
            vec![
                "A reduction rule head may not only be a variable.",
                "A reduction rule head must contain all variables that are in the reduction rule tail.",
                "Term product can only be used as a reduction rule head.",
            ]
        );
    }

    #[test]
    fn statement_term_checks() {
        let program = Program::new()
            .with(var!("x"))
            .with(Term::Native)
            .with(func!("f"; ac!("add"; 1)));
        assert_eq!(
            errors(&program),
            vec![
                "A term cannot only be a variable, this would match every rewrite rule.",
                "The 'native' keyword can only be used in reduction rule tails.",
                "AC terms must have at least 2 arguments: 'add' does not.",
            ]
        );
    }

    #[test]
    fn mixed_ac_symbols_are_errors() {
        let program = Program::new()
            .with(func!("f"; var!("x"), var!("y")))
            .with(ac!("f"; 1, 2));
        assert_eq!(
            errors(&program),
            vec!["The 'f' term may not be an AC and non-AC term at the same time."]
        );

        let program = Program::new()
            .with(func!("g"; 1, 2))
            .with(TypeDefinition::new(
                TypeName::new("t"),
                [TypeShape::ac(
                    "g",
                    [
                        TypeName::builtin(BuiltinType::Number),
                        TypeName::builtin(BuiltinType::Number),
                    ],
                )],
            ));
        assert_eq!(
            errors(&program),
            vec!["The 'g' term may not be an AC and non-AC term at the same time."]
        );
    }
}
