//! The analysis-time type model.
//!
//! [`Ty`] is what the symbol tables store and what expression typing
//! computes. [`Ty::Unknown`] is the cascade-suppression sentinel: once a
//! subtree failed to type (an unresolved name, a bad operand mix), every
//! enclosing expression becomes `Unknown` and no further type diagnostics
//! are produced for it.

use std::collections::HashMap;

use lacc_base::Symbol;
use lacc_language::ast::BaseType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Inteiro,
    Real,
    Literal,
    Logico,
    /// `^T`
    Pointer(Box<Ty>),
    /// A record type, named by its declaration (or by the synthetic name of
    /// an inline record).
    Record(Symbol),
    /// Sentinel after a failed resolution; silences cascades.
    Unknown,
}

impl Ty {
    pub fn from_base(base: BaseType) -> Ty {
        match base {
            BaseType::Inteiro => Ty::Inteiro,
            BaseType::Real => Ty::Real,
            BaseType::Literal => Ty::Literal,
            BaseType::Logico => Ty::Logico,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Inteiro | Ty::Real)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }
}

/// Assignment compatibility: identical types, or widening `inteiro` into a
/// `real` target. Nothing narrows.
pub fn assignable(target: &Ty, value: &Ty) -> bool {
    target == value || (*target == Ty::Real && *value == Ty::Inteiro)
}

/// A declared user type: a record body or an alias of another type.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Record { fields: Vec<(Symbol, Ty)> },
    Alias(Ty),
}

/// Name-to-definition table for user-declared (and synthesized) types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<Symbol, TypeDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.types.contains_key(&name)
    }

    /// Registers a type; the first definition of a name wins.
    pub fn declare(&mut self, name: Symbol, def: TypeDef) {
        self.types.entry(name).or_insert(def);
    }

    pub fn get(&self, name: Symbol) -> Option<&TypeDef> {
        self.types.get(&name)
    }

    /// Field lookup on a record type, in declaration order.
    pub fn field_type(&self, record: Symbol, field: Symbol) -> Option<&Ty> {
        match self.types.get(&record) {
            Some(TypeDef::Record { fields }) => {
                fields.iter().find(|(name, _)| *name == field).map(|(_, ty)| ty)
            }
            _ => None,
        }
    }
}

/// A named compile-time constant: its type and its already-rendered C
/// spelling, substituted textually at code-generation time.
#[derive(Debug, Clone)]
pub struct Constant {
    pub ty: Ty,
    pub c_text: String,
}

/// A function or procedure signature; `ret` is `None` for procedures.
#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<(Symbol, Ty)>,
    pub ret: Option<Ty>,
}
