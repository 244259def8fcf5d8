//! Defines [`ReductionRule`], [`Statement`] and [`Program`].

use crate::{LimitStatement, Term, TypeDefinition};

/// `head => tail`. The head is a term or a term product; the tail is a
/// term or [`Term::Native`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReductionRule {
    pub head: Term,
    pub tail: Term,
}

impl ReductionRule {
    #[inline]
    pub fn new(head: Term, tail: Term) -> Self {
        Self { head, tail }
    }

    /// Returns `true` if the tail delegates to the native functions.
    #[inline]
    pub fn is_native(&self) -> bool {
        self.tail.is_native()
    }

    /// The head as a list of product slots. A single-term head is one
    /// slot.
    pub fn head_terms(&self) -> &[Term] {
        match &self.head {
            Term::Product(ts) => ts,
            single => std::slice::from_ref(single),
        }
    }
}

/// One statement of a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Term(Term),
    Rule(ReductionRule),
    Type(TypeDefinition),
    Limit(LimitStatement),
}

impl From<Term> for Statement {
    fn from(t: Term) -> Self {
        Statement::Term(t)
    }
}

impl From<ReductionRule> for Statement {
    fn from(r: ReductionRule) -> Self {
        Statement::Rule(r)
    }
}

impl From<TypeDefinition> for Statement {
    fn from(t: TypeDefinition) -> Self {
        Statement::Type(t)
    }
}

impl From<LimitStatement> for Statement {
    fn from(l: LimitStatement) -> Self {
        Statement::Limit(l)
    }
}

/// A program block: an ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a statement.
    pub fn push(&mut self, statement: impl Into<Statement>) -> &mut Self {
        self.statements.push(statement.into());
        self
    }

    /// Builder form of [`Program::push`].
    pub fn with(mut self, statement: impl Into<Statement>) -> Self {
        self.statements.push(statement.into());
        self
    }

    #[inline]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Term(t) => Some(t),
            _ => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &ReductionRule> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Rule(r) => Some(r),
            _ => None,
        })
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn limits(&self) -> impl Iterator<Item = &LimitStatement> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Limit(l) => Some(l),
            _ => None,
        })
    }
}

impl<S: Into<Statement>> FromIterator<S> for Program {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<Statement>> Extend<S> for Program {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.statements.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for Program {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;
    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TypeName, TypeShape, Var, func, product, var};

    #[test]
    fn head_terms_wraps_single_heads() {
        let single = ReductionRule::new(func!("f"; var!("x")), var!("x"));
        assert_eq!(single.head_terms().len(), 1);
        let multi = ReductionRule::new(
            product!(func!("a"; var!("x")), func!("b"; var!("x"))),
            var!("x"),
        );
        assert_eq!(multi.head_terms().len(), 2);
        assert!(!multi.is_native());
    }

    #[test]
    fn program_accessors_filter_by_kind() {
        let program = Program::new()
            .with(func!("water"; 1, 1))
            .with(ReductionRule::new(func!("f"; var!("x")), Term::Native))
            .with(TypeDefinition::new(
                TypeName::new("num"),
                [TypeShape::TypeName(TypeName::new("TrsNumber"))],
            ))
            .with(LimitStatement::new([Var::new("x")], TypeName::new("num")));
        assert_eq!(program.statements().len(), 4);
        assert_eq!(program.terms().count(), 1);
        assert_eq!(program.rules().count(), 1);
        assert_eq!(program.type_definitions().count(), 1);
        assert_eq!(program.limits().count(), 1);
        assert!(Program::new().is_empty());
    }
}
