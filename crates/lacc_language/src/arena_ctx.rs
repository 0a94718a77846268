//! Arena bundle handed to the parser.
//!
//! One arena per node kind keeps the borrow story simple: every arena is
//! borrowed for the same `'a`, so every reference inside the tree shares
//! that lifetime. The caller declares the arenas as locals, builds an
//! [`AstContext`] over them, and drops everything together after code
//! generation.

use lacc_base::Arena;

use crate::ast::{CaseArm, CaseLabel, Command, Decl, Expr, Field, Name, Param, VarDecl, VarItem};

#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub decls: &'a Arena<Decl<'a>>,
    pub commands: &'a Arena<Command<'a>>,
    pub exprs: &'a Arena<Expr<'a>>,
    pub fields: &'a Arena<Field<'a>>,
    pub names: &'a Arena<Name>,
    pub params: &'a Arena<Param>,
    pub var_decls: &'a Arena<VarDecl<'a>>,
    pub var_items: &'a Arena<VarItem>,
    pub case_arms: &'a Arena<CaseArm<'a>>,
    pub case_labels: &'a Arena<CaseLabel>,
}

impl<'a> AstContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        decls: &'a Arena<Decl<'a>>,
        commands: &'a Arena<Command<'a>>,
        exprs: &'a Arena<Expr<'a>>,
        fields: &'a Arena<Field<'a>>,
        names: &'a Arena<Name>,
        params: &'a Arena<Param>,
        var_decls: &'a Arena<VarDecl<'a>>,
        var_items: &'a Arena<VarItem>,
        case_arms: &'a Arena<CaseArm<'a>>,
        case_labels: &'a Arena<CaseLabel>,
    ) -> Self {
        AstContext {
            decls,
            commands,
            exprs,
            fields,
            names,
            params,
            var_decls,
            var_items,
            case_arms,
            case_labels,
        }
    }

    /// Moves an expression into the arena, returning a tree reference.
    pub fn expr(&self, e: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(e)
    }
}
