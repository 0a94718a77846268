//! Statement and expression emission.
//!
//! Pure manual recursion: `emit_command` descends into control-flow bodies
//! itself, so each statement is emitted exactly once, in depth-first order
//! of its source position. Expressions are rebuilt from operator nodes —
//! `e`/`ou`/`nao` become `&&`/`||`/`!`, the comparison `=` becomes `==`,
//! boolean literals become `1`/`0` — and string literals pass through
//! verbatim. Named constants are substituted by their rendered value at
//! the identifier node.

use std::collections::HashMap;

use lacc_base::{Interner, Symbol};
use lacc_language::ast::{
    BinaryOp, Command, Expr, SimpleType, Target, TypeNode, UnaryOp,
};

use crate::analysis::types::{Constant, Ty, TypeDef, TypeRegistry};
use crate::analysis::Analysis;

use super::types::printf_format;

/// Read-mostly emission context. `vars` is the only mutable part: it maps
/// visible variables to their analyzed types, and is saved and restored
/// around each subroutine body.
pub(crate) struct CContext<'a> {
    pub(crate) interner: &'a Interner,
    pub(crate) types: &'a TypeRegistry,
    pub(crate) consts: &'a HashMap<Symbol, Constant>,
    pub(crate) inline_names: &'a HashMap<usize, Symbol>,
    pub(crate) vars: HashMap<Symbol, Ty>,
}

impl<'a> CContext<'a> {
    pub(crate) fn new(analysis: &'a Analysis, interner: &'a Interner) -> Self {
        CContext {
            interner,
            types: &analysis.types,
            consts: &analysis.consts,
            inline_names: &analysis.inline_names,
            vars: HashMap::new(),
        }
    }

    pub(crate) fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Resolves a written type node against the analysis tables. Inline
    /// records come back under their synthetic name; analysis has already
    /// validated everything, so lookups cannot miss on the success path.
    pub(crate) fn node_type(&self, node: &TypeNode<'_>) -> Ty {
        match node {
            TypeNode::Base(base) => Ty::from_base(*base),
            TypeNode::Named(name) => self.named_type(name.sym),
            TypeNode::Pointer(simple) => Ty::Pointer(Box::new(self.simple_type(simple))),
            TypeNode::Record { span, .. } => self
                .inline_names
                .get(&span.start)
                .copied()
                .map(Ty::Record)
                .unwrap_or(Ty::Unknown),
        }
    }

    pub(crate) fn simple_type(&self, simple: &SimpleType) -> Ty {
        match simple {
            SimpleType::Base(base) => Ty::from_base(*base),
            SimpleType::Named(name) => self.named_type(name.sym),
        }
    }

    fn named_type(&self, sym: Symbol) -> Ty {
        match self.types.get(sym) {
            Some(TypeDef::Record { .. }) => Ty::Record(sym),
            Some(TypeDef::Alias(ty)) => ty.clone(),
            None => Ty::Unknown,
        }
    }

    fn field_ty(&self, base: Symbol, field: Symbol) -> Ty {
        if let Some(Ty::Record(record)) = self.vars.get(&base) {
            if let Some(ty) = self.types.field_type(*record, field) {
                return ty.clone();
            }
        }
        Ty::Unknown
    }
}

/// Declared-type inference for format selection. Composite arithmetic
/// follows the widening rule, so an expression mentioning any `real`
/// operand prints with `%f`.
pub(crate) fn expr_type(expr: &Expr<'_>, ctx: &CContext<'_>) -> Ty {
    match expr {
        Expr::IntLit(_) => Ty::Inteiro,
        Expr::RealLit(_) => Ty::Real,
        Expr::StrLit(_) => Ty::Literal,
        Expr::BoolLit(_) => Ty::Logico,
        Expr::Ident(name) => {
            if let Some(constant) = ctx.consts.get(&name.sym) {
                constant.ty.clone()
            } else {
                ctx.vars.get(&name.sym).cloned().unwrap_or(Ty::Unknown)
            }
        }
        Expr::Field { base, field } => ctx.field_ty(base.sym, field.sym),
        Expr::Index { base, .. } => ctx.vars.get(&base.sym).cloned().unwrap_or(Ty::Unknown),
        Expr::Deref(name) => match ctx.vars.get(&name.sym) {
            Some(Ty::Pointer(inner)) => (**inner).clone(),
            _ => Ty::Unknown,
        },
        Expr::AddrOf(name) => ctx
            .vars
            .get(&name.sym)
            .cloned()
            .map(|ty| Ty::Pointer(Box::new(ty)))
            .unwrap_or(Ty::Unknown),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => expr_type(operand, ctx),
        Expr::Unary {
            op: UnaryOp::Not, ..
        } => Ty::Logico,
        Expr::Binary { op, lhs, rhs } => {
            if op.is_relational() || op.is_logical() {
                return Ty::Logico;
            }
            let lt = expr_type(lhs, ctx);
            let rt = expr_type(rhs, ctx);
            if lt == Ty::Real || rt == Ty::Real {
                Ty::Real
            } else if lt == Ty::Literal && rt == Ty::Literal {
                Ty::Literal
            } else {
                Ty::Inteiro
            }
        }
        Expr::Paren(inner) => expr_type(inner, ctx),
    }
}

fn c_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

pub(crate) fn emit_expr(expr: &Expr<'_>, ctx: &CContext<'_>) -> String {
    match expr {
        Expr::IntLit(sym) | Expr::RealLit(sym) | Expr::StrLit(sym) => {
            ctx.resolve(*sym).to_string()
        }
        Expr::BoolLit(true) => "1".to_string(),
        Expr::BoolLit(false) => "0".to_string(),
        Expr::Ident(name) => {
            if let Some(constant) = ctx.consts.get(&name.sym) {
                constant.c_text.clone()
            } else {
                ctx.resolve(name.sym).to_string()
            }
        }
        Expr::Field { base, field } => {
            format!("{}.{}", ctx.resolve(base.sym), ctx.resolve(field.sym))
        }
        Expr::Index { base, index } => {
            format!("{}[{}]", ctx.resolve(base.sym), emit_expr(index, ctx))
        }
        Expr::Deref(name) => format!("*{}", ctx.resolve(name.sym)),
        Expr::AddrOf(name) => format!("&{}", ctx.resolve(name.sym)),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => format!("-{}", emit_expr(operand, ctx)),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => format!("!{}", emit_expr(operand, ctx)),
        Expr::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            emit_expr(lhs, ctx),
            c_op(*op),
            emit_expr(rhs, ctx)
        ),
        Expr::Paren(inner) => format!("({})", emit_expr(inner, ctx)),
    }
}

fn push_line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push('\t');
    }
    out.push_str(text);
    out.push('\n');
}

pub(crate) fn emit_commands(
    commands: &[Command<'_>],
    ctx: &CContext<'_>,
    out: &mut String,
    indent: usize,
) {
    for command in commands {
        emit_command(command, ctx, out, indent);
    }
}

pub(crate) fn emit_command(
    command: &Command<'_>,
    ctx: &CContext<'_>,
    out: &mut String,
    indent: usize,
) {
    match command {
        Command::Assign { target, value } => emit_assign(target, value, ctx, out, indent),
        Command::Read { names } => {
            for name in *names {
                let text = ctx.resolve(name.sym);
                let ty = ctx.vars.get(&name.sym).cloned().unwrap_or(Ty::Unknown);
                if ty == Ty::Literal {
                    push_line(out, indent, &format!("fgets({}, 80, stdin);", text));
                    push_line(
                        out,
                        indent,
                        &format!("{}[strcspn({}, \"\\n\")] = '\\0';", text, text),
                    );
                } else {
                    push_line(
                        out,
                        indent,
                        &format!("scanf(\"{}\",&{});", printf_format(&ty), text),
                    );
                }
            }
        }
        Command::Write { args } => {
            let mut formats = String::new();
            let mut rendered = Vec::new();
            for arg in *args {
                formats.push_str(printf_format(&expr_type(arg, ctx)));
                rendered.push(emit_expr(arg, ctx));
            }
            let line = if rendered.is_empty() {
                format!("printf(\"{}\");", formats)
            } else {
                format!("printf(\"{}\",{});", formats, rendered.join(","))
            };
            push_line(out, indent, &line);
        }
        Command::If {
            cond,
            then_block,
            else_block,
        } => {
            push_line(out, indent, &format!("if ({}) {{", emit_expr(cond, ctx)));
            emit_commands(then_block, ctx, out, indent + 1);
            if let Some(block) = else_block {
                push_line(out, indent, "} else {");
                emit_commands(block, ctx, out, indent + 1);
            }
            push_line(out, indent, "}");
        }
        Command::Case {
            scrutinee,
            arms,
            otherwise,
        } => {
            push_line(
                out,
                indent,
                &format!("switch ({}) {{", emit_expr(scrutinee, ctx)),
            );
            for arm in *arms {
                for label in arm.labels {
                    for value in label.lo..=label.hi.unwrap_or(label.lo) {
                        push_line(out, indent + 1, &format!("case {}:", value));
                    }
                }
                emit_commands(arm.body, ctx, out, indent + 2);
                push_line(out, indent + 2, "break;");
            }
            if let Some(block) = otherwise {
                push_line(out, indent + 1, "default:");
                emit_commands(block, ctx, out, indent + 2);
                push_line(out, indent + 2, "break;");
            }
            push_line(out, indent, "}");
        }
        Command::For {
            var,
            from,
            to,
            body,
        } => {
            let name = ctx.resolve(var.sym);
            push_line(
                out,
                indent,
                &format!(
                    "for ({} = {}; {} <= {}; {}++) {{",
                    name,
                    emit_expr(from, ctx),
                    name,
                    emit_expr(to, ctx),
                    name
                ),
            );
            emit_commands(body, ctx, out, indent + 1);
            push_line(out, indent, "}");
        }
        Command::While { cond, body } => {
            push_line(out, indent, &format!("while ({}) {{", emit_expr(cond, ctx)));
            emit_commands(body, ctx, out, indent + 1);
            push_line(out, indent, "}");
        }
        Command::DoUntil { body, cond } => {
            // the guard arrives already in its negated form
            push_line(out, indent, "do {");
            emit_commands(body, ctx, out, indent + 1);
            push_line(out, indent, &format!("}} while ({});", emit_expr(cond, ctx)));
        }
        Command::Call { name, args } => {
            let rendered: Vec<String> = args.iter().map(|arg| emit_expr(arg, ctx)).collect();
            push_line(
                out,
                indent,
                &format!("{}({});", ctx.resolve(name.sym), rendered.join(", ")),
            );
        }
        Command::Return { value } => {
            push_line(out, indent, &format!("return {};", emit_expr(value, ctx)));
        }
    }
}

fn emit_assign(
    target: &Target<'_>,
    value: &Expr<'_>,
    ctx: &CContext<'_>,
    out: &mut String,
    indent: usize,
) {
    let target_text = match target {
        Target::Var(name) => ctx.resolve(name.sym).to_string(),
        Target::Deref(name) => format!("*{}", ctx.resolve(name.sym)),
        Target::Field { base, field } => {
            format!("{}.{}", ctx.resolve(base.sym), ctx.resolve(field.sym))
        }
        Target::Index { base, index } => {
            format!("{}[{}]", ctx.resolve(base.sym), emit_expr(index, ctx))
        }
    };
    let value_text = emit_expr(value, ctx);

    // string literals land in record string fields via strcpy
    let string_field = matches!(
        (target, value),
        (Target::Field { base, field }, Expr::StrLit(_))
            if ctx.field_ty(base.sym, field.sym) == Ty::Literal
    );
    if string_field {
        push_line(
            out,
            indent,
            &format!("strcpy({}, {});", target_text, value_text),
        );
    } else {
        push_line(out, indent, &format!("{} = {};", target_text, value_text));
    }
}
