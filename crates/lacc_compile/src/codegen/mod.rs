//! C code generation.
//!
//! Runs only when analysis produced no diagnostics, and assembles one C
//! translation unit with a fixed layout:
//!
//! 1. `#include` header block
//! 2. `#define` per constant, declaration order
//! 3. `typedef` blocks for records and aliases, declaration order
//!    (anonymous inline records under their synthetic names)
//! 4. function and procedure definitions, declaration order
//! 5. `int main()` holding the top-level variable declarations and the
//!    program body, closed by `return 0;`
//!
//! Sections are collected into separate buffers during a single
//! declaration walk and concatenated at the end, so each subroutine sees
//! exactly the variables declared before it.

pub(crate) mod emit;
pub(crate) mod types;

use std::fmt::Write;

use lacc_base::{Interner, Symbol};
use lacc_language::ast::{Decl, Program, Subroutine, TypeNode, VarDecl};

use crate::analysis::types::{Ty, TypeDef};
use crate::analysis::Analysis;

use emit::{emit_commands, CContext};
use types::{c_field_decl, c_param, c_return, c_scalar, c_var_decl};

/// Translates an analyzed program into C source text.
pub fn generate(program: &Program<'_>, analysis: &Analysis, interner: &Interner) -> String {
    let mut ctx = CContext::new(analysis, interner);

    let mut defines = String::new();
    let mut typedefs = String::new();
    let mut subroutines = String::new();
    let mut main_decls = String::new();
    let mut main_body = String::new();

    for decl in program.decls {
        match decl {
            Decl::Const { name, .. } => {
                if let Some(constant) = ctx.consts.get(&name.sym) {
                    writeln!(
                        defines,
                        "#define {} {}",
                        ctx.resolve(name.sym),
                        constant.c_text
                    )
                    .unwrap();
                }
            }
            Decl::Type { name, def } => {
                emit_typedef(name.sym, def, &ctx, &mut typedefs);
            }
            Decl::Vars(var_decl) => {
                declare_variables(var_decl, &mut ctx, &mut typedefs, &mut main_decls, 1);
            }
            Decl::Function(sub) | Decl::Procedure(sub) => {
                emit_subroutine(sub, &mut ctx, &mut typedefs, &mut subroutines);
            }
        }
    }

    emit_commands(program.body, &ctx, &mut main_body, 1);

    let mut out = String::with_capacity(4096);
    out.push_str("#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n\n");
    if !defines.is_empty() {
        out.push_str(&defines);
        out.push('\n');
    }
    if !typedefs.is_empty() {
        out.push_str(&typedefs);
        out.push('\n');
    }
    out.push_str(&subroutines);
    out.push_str("int main() {\n");
    out.push_str(&main_decls);
    out.push_str(&main_body);
    out.push_str("\treturn 0;\n}\n");
    out
}

/// Emits the typedef for a `tipo` declaration: a struct block for records,
/// a one-line alias otherwise.
fn emit_typedef(name: Symbol, def: &TypeNode<'_>, ctx: &CContext<'_>, out: &mut String) {
    match def {
        TypeNode::Record { .. } => {
            if let Some(TypeDef::Record { fields }) = ctx.types.get(name) {
                emit_struct_typedef(ctx.resolve(name), fields, ctx, out);
            }
        }
        other => {
            let target = ctx.node_type(other);
            writeln!(
                out,
                "typedef {} {};",
                c_scalar(&target, ctx.interner),
                ctx.resolve(name)
            )
            .unwrap();
        }
    }
}

fn emit_struct_typedef(
    name: &str,
    fields: &[(Symbol, Ty)],
    ctx: &CContext<'_>,
    out: &mut String,
) {
    writeln!(out, "typedef struct {{").unwrap();
    for (field, ty) in fields {
        writeln!(out, "{}", c_field_decl(ctx.resolve(*field), ty, ctx.interner)).unwrap();
    }
    writeln!(out, "}} {};", name).unwrap();
}

/// Resolves a `declare` line: registers the names in the emission scope and
/// appends their C declarations. An inline record first contributes its
/// synthetic typedef.
fn declare_variables(
    var_decl: &VarDecl<'_>,
    ctx: &mut CContext<'_>,
    typedefs: &mut String,
    out: &mut String,
    indent: usize,
) {
    let ty = ctx.node_type(&var_decl.ty);
    if matches!(var_decl.ty, TypeNode::Record { .. }) {
        if let Ty::Record(sym) = &ty {
            if let Some(TypeDef::Record { fields }) = ctx.types.get(*sym) {
                emit_struct_typedef(ctx.resolve(*sym), fields, ctx, typedefs);
            }
        }
    }
    for item in var_decl.items {
        let name = ctx.resolve(item.name.sym).to_string();
        let bound = item.array_len.map(|sym| ctx.resolve(sym).to_string());
        for _ in 0..indent {
            out.push('\t');
        }
        out.push_str(&c_var_decl(&name, &ty, bound.as_deref(), ctx.interner));
        out.push('\n');
        ctx.vars.insert(item.name.sym, ty.clone());
    }
}

/// Emits one function or procedure definition followed by a blank line.
/// Local declarations come first in the body; the surrounding variable
/// scope is restored afterwards.
fn emit_subroutine(
    sub: &Subroutine<'_>,
    ctx: &mut CContext<'_>,
    typedefs: &mut String,
    out: &mut String,
) {
    let ret = match sub.ret {
        Some(base) => c_return(&Ty::from_base(base), ctx.interner),
        None => "void".to_string(),
    };

    let saved_vars = ctx.vars.clone();

    let mut params = Vec::new();
    for param in sub.params {
        let ty = ctx.simple_type(&param.ty);
        params.push(c_param(ctx.resolve(param.name.sym), &ty, ctx.interner));
        ctx.vars.insert(param.name.sym, ty);
    }
    writeln!(
        out,
        "{} {}({}) {{",
        ret,
        ctx.resolve(sub.name.sym),
        params.join(", ")
    )
    .unwrap();

    for local in sub.locals {
        declare_variables(local, ctx, typedefs, out, 1);
    }
    emit_commands(sub.body, ctx, out, 1);

    writeln!(out, "}}\n").unwrap();
    ctx.vars = saved_vars;
}
