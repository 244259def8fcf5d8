//! Type declarations of the rewriting language.
//!
//! A [`TypeDefinition`] lists the term shapes accepted by a type name and
//! a [`LimitStatement`] constrains variables to a type name. Together they
//! describe a bottom-up tree automaton: type names are its states, shapes
//! are its transitions, and a shape that is itself a type name is an
//! ε-transition.

use crate::{TermError, Var};
use smartstring::alias::String;
use std::str::FromStr;

/// The four built-in type names that accept every number, string,
/// constant or variable respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BuiltinType {
    /// Every number, `$TrsNumber`.
    Number = 0,
    /// Every string, `$TrsString`.
    String = 1,
    /// Every constant, `$TrsConstant`.
    Constant = 2,
    /// Every variable, `$TrsVariable`.
    Variable = 3,
}

impl BuiltinType {
    /// The total number of built-in types.
    pub const COUNT: usize = 4;

    /// Keywords of each built-in type, in declaration order.
    pub const STRS: &[&str] = &["TrsNumber", "TrsString", "TrsConstant", "TrsVariable"];

    /// All built-in types, in declaration order.
    pub const ALL: [BuiltinType; 4] = [
        BuiltinType::Number,
        BuiltinType::String,
        BuiltinType::Constant,
        BuiltinType::Variable,
    ];
}

impl From<BuiltinType> for usize {
    fn from(b: BuiltinType) -> Self {
        b as usize
    }
}

impl From<BuiltinType> for String {
    fn from(b: BuiltinType) -> Self {
        BuiltinType::STRS[usize::from(b)].into()
    }
}

impl TryFrom<&str> for BuiltinType {
    type Error = TermError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Parses a built-in type keyword such as `"TrsNumber"`.
impl FromStr for BuiltinType {
    type Err = TermError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TrsNumber" => Ok(BuiltinType::Number),
            "TrsString" => Ok(BuiltinType::String),
            "TrsConstant" => Ok(BuiltinType::Constant),
            "TrsVariable" => Ok(BuiltinType::Variable),
            other => Err(TermError::UnknownBuiltinType(String::from(other))),
        }
    }
}

/// The name of a type, written `$name` in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name (without the leading `$`).
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(String::from(name.as_ref()))
    }

    /// The type name of a built-in type.
    #[inline]
    pub fn builtin(b: BuiltinType) -> Self {
        Self(String::from(b))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the built-in type this name refers to, if any.
    #[inline]
    pub fn as_builtin(&self) -> Option<BuiltinType> {
        self.0.parse().ok()
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        self.as_builtin().is_some()
    }
}

/// A term shape accepted by a type.
///
/// Arguments of compound and AC shapes are type names. AC shapes keep
/// their arguments as `(type name, cardinality)` pairs sorted by type
/// name, mirroring the ONF of AC terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeShape {
    /// A literal number.
    Number(String),
    /// A literal string.
    Str(String),
    /// A literal constant.
    Const(String),
    /// Another type name: an ε-transition into the declaring type.
    TypeName(TypeName),
    /// A compound term shape `name($a,$b)`.
    Term { name: String, args: Vec<TypeName> },
    /// An AC term shape `name[$a,$a,$b]`.
    Ac {
        name: String,
        args: Vec<(TypeName, usize)>,
    },
}

impl TypeShape {
    /// A compound shape. Without arguments the shape is a constant.
    pub fn term(name: impl AsRef<str>, args: impl IntoIterator<Item = TypeName>) -> Self {
        let args: Vec<TypeName> = args.into_iter().collect();
        if args.is_empty() {
            return TypeShape::Const(String::from(name.as_ref()));
        }
        TypeShape::Term {
            name: String::from(name.as_ref()),
            args,
        }
    }

    /// An AC shape; equal argument types are grouped into cardinalities.
    pub fn ac(name: impl AsRef<str>, args: impl IntoIterator<Item = TypeName>) -> Self {
        Self::ac_weighted(name, args.into_iter().map(|t| (t, 1)))
    }

    /// An AC shape from `(type name, cardinality)` pairs.
    pub fn ac_weighted(
        name: impl AsRef<str>,
        args: impl IntoIterator<Item = (TypeName, usize)>,
    ) -> Self {
        let mut grouped: Vec<(TypeName, usize)> = Vec::new();
        for (t, card) in args {
            if card == 0 {
                continue;
            }
            match grouped.iter_mut().find(|(existing, _)| *existing == t) {
                Some((_, c)) => *c += card,
                None => grouped.push((t, card)),
            }
        }
        grouped.sort_by(|(a, _), (b, _)| a.cmp(b));
        TypeShape::Ac {
            name: String::from(name.as_ref()),
            args: grouped,
        }
    }

    /// The function symbol of a compound or AC shape.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            TypeShape::Term { name, .. } | TypeShape::Ac { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The type names this shape refers to, in order.
    pub fn referenced_types(&self) -> Vec<&TypeName> {
        match self {
            TypeShape::TypeName(t) => vec![t],
            TypeShape::Term { args, .. } => args.iter().collect(),
            TypeShape::Ac { args, .. } => args.iter().map(|(t, _)| t).collect(),
            TypeShape::Number(_) | TypeShape::Str(_) | TypeShape::Const(_) => Vec::new(),
        }
    }
}

/// `type $name = shape | shape ...`. Repeated declarations of the same
/// name are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDefinition {
    pub name: TypeName,
    pub accepted: Vec<TypeShape>,
}

impl TypeDefinition {
    pub fn new(name: TypeName, accepted: impl IntoIterator<Item = TypeShape>) -> Self {
        Self {
            name,
            accepted: accepted.into_iter().collect(),
        }
    }

    /// Every type name referenced by the accepted shapes.
    pub fn referenced_types(&self) -> impl Iterator<Item = &TypeName> {
        self.accepted.iter().flat_map(TypeShape::referenced_types)
    }
}

/// `limit :a,:b to $name`: the variables may only be bound to terms that
/// reach the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitStatement {
    pub variables: Vec<Var>,
    pub type_name: TypeName,
}

impl LimitStatement {
    pub fn new(variables: impl IntoIterator<Item = Var>, type_name: TypeName) -> Self {
        Self {
            variables: variables.into_iter().collect(),
            type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_from_str_valid() {
        assert_eq!("TrsNumber".parse::<BuiltinType>().unwrap(), BuiltinType::Number);
        assert_eq!(BuiltinType::try_from("TrsVariable").unwrap(), BuiltinType::Variable);
        for (i, b) in BuiltinType::ALL.iter().enumerate() {
            assert_eq!(usize::from(*b), i);
            assert_eq!(b.to_string(), BuiltinType::STRS[i]);
        }
        assert_eq!(BuiltinType::ALL.len(), BuiltinType::COUNT);
    }

    #[test]
    fn builtin_from_str_invalid() {
        let err = "trsnumber".parse::<BuiltinType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown built-in type: trsnumber");
    }

    #[test]
    fn type_name_builtin_detection() {
        assert!(TypeName::new("TrsString").is_builtin());
        assert!(!TypeName::new("num").is_builtin());
        assert_eq!(TypeName::builtin(BuiltinType::Constant).to_string(), "$TrsConstant");
    }

    #[test]
    fn ac_shapes_group_cardinalities() {
        let a = TypeShape::ac("add", [TypeName::new("b"), TypeName::new("a"), TypeName::new("b")]);
        let b = TypeShape::ac_weighted("add", [(TypeName::new("a"), 1), (TypeName::new("b"), 2)]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "add[$a,$b,$b]");
        assert_eq!(a.symbol(), Some("add"));
    }

    #[test]
    fn zero_arity_shape_is_constant() {
        assert_eq!(TypeShape::term("nil", []), TypeShape::Const("nil".into()));
    }

    #[test]
    fn referenced_types_cover_all_shapes() {
        let def = TypeDefinition::new(
            TypeName::new("t"),
            [
                TypeShape::TypeName(TypeName::new("a")),
                TypeShape::term("f", [TypeName::new("b")]),
                TypeShape::ac("g", [TypeName::new("c"), TypeName::new("c")]),
                TypeShape::Number("1".into()),
            ],
        );
        let names: Vec<&str> = def.referenced_types().map(TypeName::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
