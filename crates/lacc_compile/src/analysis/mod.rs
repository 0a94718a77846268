//! Semantic analysis.
//!
//! A single pre-order walk over the parse tree that populates the symbol
//! tables and appends diagnostics as it goes. The walk always runs to the
//! end — diagnostics accumulate, traversal never aborts — and any
//! diagnostic at all prevents code generation.
//!
//! Scope handling mirrors the language: one global frame, plus one local
//! frame that exists exactly while a subroutine body is being analyzed.
//! Expression typing is bottom-up with an `Unknown` sentinel that silences
//! cascaded errors on enclosing expressions.
//!
//! Conditions of control-flow commands are not type-checked — only the
//! record-field and array-access forms inside them are validated, matching
//! the checked node set of the access rules. Assignment and `escreva`
//! expressions are typed in full.

pub mod scope;
pub mod types;

use std::collections::HashMap;

use lacc_base::{Interner, Span, Symbol};
use lacc_language::ast::{
    Command, ConstValue, Decl, Expr, Field, Name, Program, SimpleType, Subroutine, Target,
    TypeNode, UnaryOp, VarDecl,
};

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use scope::ScopeStack;
use types::{assignable, Constant, Signature, Ty, TypeDef, TypeRegistry};

/// Everything the code generator needs from analysis.
pub struct Analysis {
    pub types: TypeRegistry,
    pub consts: HashMap<Symbol, Constant>,
    pub subs: HashMap<Symbol, Signature>,
    /// Synthetic type names for inline records, keyed by the byte offset of
    /// their `registro` keyword.
    pub inline_names: HashMap<usize, Symbol>,
}

/// Runs the semantic walk, returning the tables and the diagnostics.
pub fn analyze(
    program: &Program<'_>,
    source: &str,
    interner: &mut Interner,
) -> (Analysis, Diagnostics) {
    let mut analyzer = Analyzer {
        source,
        interner,
        diags: Diagnostics::new(),
        types: TypeRegistry::new(),
        consts: HashMap::new(),
        subs: HashMap::new(),
        scopes: ScopeStack::new(),
        inline_names: HashMap::new(),
    };

    for decl in program.decls {
        match decl {
            Decl::Vars(var_decl) => analyzer.declare_vars(var_decl),
            Decl::Const { name, ty, value } => analyzer.declare_const(*name, *ty, *value),
            Decl::Type { name, def } => analyzer.declare_type(*name, def),
            Decl::Function(sub) | Decl::Procedure(sub) => analyzer.declare_subroutine(sub),
        }
    }
    analyzer.check_commands(program.body);

    let Analyzer {
        diags,
        types,
        consts,
        subs,
        inline_names,
        ..
    } = analyzer;
    (
        Analysis {
            types,
            consts,
            subs,
            inline_names,
        },
        diags,
    )
}

struct Analyzer<'src, 'int> {
    source: &'src str,
    interner: &'int mut Interner,
    diags: Diagnostics,
    types: TypeRegistry,
    consts: HashMap<Symbol, Constant>,
    subs: HashMap<Symbol, Signature>,
    scopes: ScopeStack,
    inline_names: HashMap<usize, Symbol>,
}

impl<'src, 'int> Analyzer<'src, 'int> {
    fn error(&mut self, span: Span, kind: DiagnosticKind) {
        self.diags.push(span.line(self.source), kind);
    }

    fn text(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare_vars(&mut self, var_decl: &VarDecl<'_>) {
        let ty = self.resolve_type(&var_decl.ty);
        for item in var_decl.items {
            if self.scopes.declare(item.name.sym, ty.clone()).is_err() {
                let name = self.text(item.name.sym);
                self.error(item.name.span, DiagnosticKind::DuplicateIdent(name));
            }
        }
    }

    fn declare_const(&mut self, name: Name, base: lacc_language::ast::BaseType, value: ConstValue) {
        let ty = Ty::from_base(base);
        let c_text = match value {
            ConstValue::Int(sym) | ConstValue::Real(sym) | ConstValue::Str(sym) => self.text(sym),
            ConstValue::Bool(true) => "1".to_string(),
            ConstValue::Bool(false) => "0".to_string(),
        };
        self.consts.entry(name.sym).or_insert(Constant {
            ty: ty.clone(),
            c_text,
        });
        if self.scopes.declare(name.sym, ty).is_err() {
            let text = self.text(name.sym);
            self.error(name.span, DiagnosticKind::DuplicateIdent(text));
        }
    }

    fn declare_type(&mut self, name: Name, def: &TypeNode<'_>) {
        if self.types.contains(name.sym) {
            let text = self.text(name.sym);
            self.error(name.span, DiagnosticKind::DuplicateType(text));
            return;
        }
        match def {
            TypeNode::Record { fields, .. } => {
                let fields = self.collect_fields(fields);
                self.types.declare(name.sym, TypeDef::Record { fields });
            }
            other => {
                let target = self.resolve_type(other);
                self.types.declare(name.sym, TypeDef::Alias(target));
            }
        }
    }

    fn declare_subroutine(&mut self, sub: &Subroutine<'_>) {
        let params: Vec<(Symbol, Ty)> = sub
            .params
            .iter()
            .map(|param| (param.name.sym, self.resolve_simple(&param.ty)))
            .collect();
        let ret = sub.ret.map(Ty::from_base);
        self.subs.entry(sub.name.sym).or_insert(Signature {
            params: params.clone(),
            ret,
        });

        self.scopes.push_scope();
        for (param, (sym, ty)) in sub.params.iter().zip(params) {
            debug_assert_eq!(param.name.sym, sym);
            if self.scopes.declare(sym, ty).is_err() {
                let text = self.text(sym);
                self.error(param.name.span, DiagnosticKind::DuplicateIdent(text));
            }
        }
        for local in sub.locals {
            self.declare_vars(local);
        }
        self.check_commands(sub.body);
        self.scopes.pop_scope();
    }

    // ========================================================================
    // Type references
    // ========================================================================

    fn resolve_type(&mut self, node: &TypeNode<'_>) -> Ty {
        match node {
            TypeNode::Base(base) => Ty::from_base(*base),
            TypeNode::Named(name) => self.resolve_named(*name),
            TypeNode::Pointer(simple) => Ty::Pointer(Box::new(self.resolve_simple(simple))),
            TypeNode::Record { fields, span } => self.declare_inline_record(fields, *span),
        }
    }

    fn resolve_simple(&mut self, simple: &SimpleType) -> Ty {
        match simple {
            SimpleType::Base(base) => Ty::from_base(*base),
            SimpleType::Named(name) => self.resolve_named(*name),
        }
    }

    fn resolve_named(&mut self, name: Name) -> Ty {
        match self.types.get(name.sym) {
            Some(TypeDef::Record { .. }) => Ty::Record(name.sym),
            Some(TypeDef::Alias(ty)) => ty.clone(),
            None => {
                let text = self.text(name.sym);
                self.error(name.span, DiagnosticKind::UndeclaredType(text));
                Ty::Unknown
            }
        }
    }

    /// Registers an anonymous inline record under a deterministic synthetic
    /// name derived from the source position of its `registro` keyword.
    fn declare_inline_record(&mut self, fields: &[Field<'_>], span: Span) -> Ty {
        let synthetic = format!(
            "__rec_{}_{}",
            span.line(self.source),
            span.column(self.source)
        );
        let sym = self.interner.intern(&synthetic);
        let fields = self.collect_fields(fields);
        self.types.declare(sym, TypeDef::Record { fields });
        self.inline_names.insert(span.start, sym);
        Ty::Record(sym)
    }

    /// Validates field types; a field line with an unresolved type is
    /// dropped from the record after diagnosing.
    fn collect_fields(&mut self, fields: &[Field<'_>]) -> Vec<(Symbol, Ty)> {
        let mut collected = Vec::new();
        for field in fields {
            let ty = match &field.ty {
                SimpleType::Base(base) => Ty::from_base(*base),
                SimpleType::Named(name) => {
                    let resolved = self.resolve_named(*name);
                    if resolved.is_unknown() {
                        continue;
                    }
                    resolved
                }
            };
            for name in field.names {
                collected.push((name.sym, ty.clone()));
            }
        }
        collected
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn check_commands(&mut self, commands: &[Command<'_>]) {
        for command in commands {
            self.check_command(command);
        }
    }

    fn check_command(&mut self, command: &Command<'_>) {
        match command {
            Command::Assign { target, value } => self.check_assign(target, value),
            Command::Read { names } => {
                for name in *names {
                    if self.scopes.lookup(name.sym).is_none() {
                        let text = self.text(name.sym);
                        self.error(name.span, DiagnosticKind::UndeclaredIdent(text));
                    }
                }
            }
            Command::Write { args } => {
                for arg in *args {
                    self.type_of(arg);
                }
            }
            Command::If {
                cond,
                then_block,
                else_block,
            } => {
                self.scan_accesses(cond);
                self.check_commands(then_block);
                if let Some(block) = else_block {
                    self.check_commands(block);
                }
            }
            Command::Case {
                scrutinee,
                arms,
                otherwise,
            } => {
                self.scan_accesses(scrutinee);
                for arm in *arms {
                    self.check_commands(arm.body);
                }
                if let Some(block) = otherwise {
                    self.check_commands(block);
                }
            }
            Command::For { from, to, body, .. } => {
                self.scan_accesses(from);
                self.scan_accesses(to);
                self.check_commands(body);
            }
            Command::While { cond, body } => {
                self.scan_accesses(cond);
                self.check_commands(body);
            }
            Command::DoUntil { body, cond } => {
                self.check_commands(body);
                self.scan_accesses(cond);
            }
            Command::Call { name, args } => self.check_call(*name, args),
            Command::Return { value } => self.scan_accesses(value),
        }
    }

    fn check_assign(&mut self, target: &Target<'_>, value: &Expr<'_>) {
        let target_ty = match target {
            Target::Var(name) => self.lookup_or_diag(*name),
            Target::Deref(name) => match self.lookup_or_diag(*name) {
                Ty::Pointer(inner) => *inner,
                _ => Ty::Unknown,
            },
            Target::Field { base, field } => self.check_field_access(*base, *field),
            Target::Index { base, index } => self.check_index_access(*base, index),
        };
        let value_ty = self.type_of(value);
        if !target_ty.is_unknown()
            && !value_ty.is_unknown()
            && !assignable(&target_ty, &value_ty)
        {
            let name = target.name();
            let text = self.text(name.sym);
            self.error(name.span, DiagnosticKind::IncompatibleAssignment(text));
        }
    }

    /// Arity only; argument types are deliberately left unchecked.
    fn check_call(&mut self, name: Name, args: &[Expr<'_>]) {
        match self.subs.get(&name.sym).map(|sig| sig.params.len()) {
            None => {
                let text = self.text(name.sym);
                self.error(name.span, DiagnosticKind::UndeclaredIdent(text));
            }
            Some(arity) if arity != args.len() => {
                let text = self.text(name.sym);
                self.error(name.span, DiagnosticKind::ParamMismatch(text));
            }
            Some(_) => {}
        }
        for arg in args {
            self.scan_accesses(arg);
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn lookup_or_diag(&mut self, name: Name) -> Ty {
        match self.scopes.lookup(name.sym) {
            Some(ty) => ty.clone(),
            None => {
                let text = self.text(name.sym);
                self.error(name.span, DiagnosticKind::UndeclaredIdent(text));
                Ty::Unknown
            }
        }
    }

    fn check_field_access(&mut self, base: Name, field: Name) -> Ty {
        let base_ty = match self.scopes.lookup(base.sym) {
            Some(ty) => ty.clone(),
            None => {
                let text = self.text(base.sym);
                self.error(base.span, DiagnosticKind::UndeclaredIdent(text));
                return Ty::Unknown;
            }
        };
        let record = match base_ty {
            Ty::Record(sym) => sym,
            Ty::Unknown => return Ty::Unknown,
            _ => {
                let text = self.text(base.sym);
                self.error(base.span, DiagnosticKind::NotARecord(text));
                return Ty::Unknown;
            }
        };
        match self.types.field_type(record, field.sym) {
            Some(ty) => ty.clone(),
            None => {
                let kind = DiagnosticKind::MissingField {
                    field: self.text(field.sym),
                    record: self.text(record),
                };
                self.error(base.span, kind);
                Ty::Unknown
            }
        }
    }

    /// An array variable is declared with its element type; indexing yields
    /// that type. The index must be `inteiro`.
    fn check_index_access(&mut self, base: Name, index: &Expr<'_>) -> Ty {
        let base_ty = match self.scopes.lookup(base.sym) {
            Some(ty) => ty.clone(),
            None => {
                let text = self.text(base.sym);
                self.error(base.span, DiagnosticKind::UndeclaredIdent(text));
                return Ty::Unknown;
            }
        };
        let index_ty = self.type_of(index);
        if !index_ty.is_unknown() && index_ty != Ty::Inteiro {
            self.error(base.span, DiagnosticKind::NonIntegerIndex);
        }
        base_ty
    }

    /// Validates access forms inside expressions that are otherwise not
    /// type-checked (conditions, bounds, call arguments, return values).
    fn scan_accesses(&mut self, expr: &Expr<'_>) {
        match expr {
            Expr::Field { base, field } => {
                self.check_field_access(*base, *field);
            }
            Expr::Index { base, index } => {
                self.check_index_access(*base, index);
            }
            Expr::Unary { operand, .. } => self.scan_accesses(operand),
            Expr::Paren(inner) => self.scan_accesses(inner),
            Expr::Binary { lhs, rhs, .. } => {
                self.scan_accesses(lhs);
                self.scan_accesses(rhs);
            }
            _ => {}
        }
    }

    fn type_of(&mut self, expr: &Expr<'_>) -> Ty {
        match expr {
            Expr::IntLit(_) => Ty::Inteiro,
            Expr::RealLit(_) => Ty::Real,
            Expr::StrLit(_) => Ty::Literal,
            Expr::BoolLit(_) => Ty::Logico,
            Expr::Ident(name) => self.lookup_or_diag(*name),
            Expr::Field { base, field } => self.check_field_access(*base, *field),
            Expr::Index { base, index } => self.check_index_access(*base, index),
            Expr::Deref(name) => match self.lookup_or_diag(*name) {
                Ty::Pointer(inner) => *inner,
                _ => Ty::Unknown,
            },
            Expr::AddrOf(name) => match self.lookup_or_diag(*name) {
                Ty::Unknown => Ty::Unknown,
                ty => Ty::Pointer(Box::new(ty)),
            },
            Expr::Unary { op, operand } => {
                let ty = self.type_of(operand);
                match op {
                    UnaryOp::Neg => ty,
                    UnaryOp::Not => {
                        if ty == Ty::Logico {
                            Ty::Logico
                        } else {
                            Ty::Unknown
                        }
                    }
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lt = self.type_of(lhs);
                let rt = self.type_of(rhs);
                if lt.is_unknown() || rt.is_unknown() {
                    return Ty::Unknown;
                }
                if op.is_logical() {
                    if lt == Ty::Logico && rt == Ty::Logico {
                        Ty::Logico
                    } else {
                        Ty::Unknown
                    }
                } else if op.is_relational() {
                    if (lt.is_numeric() && rt.is_numeric()) || lt == rt {
                        Ty::Logico
                    } else {
                        Ty::Unknown
                    }
                } else if lt.is_numeric() && rt.is_numeric() {
                    if lt == Ty::Real || rt == Ty::Real {
                        Ty::Real
                    } else {
                        Ty::Inteiro
                    }
                } else if lt == Ty::Literal && rt == Ty::Literal {
                    Ty::Literal
                } else {
                    Ty::Unknown
                }
            }
            Expr::Paren(inner) => self.type_of(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lacc_base::Arena;
    use lacc_language::{AstContext, Lexer, Parser};

    /// Runs the front end and analysis, returning the rendered diagnostic
    /// lines (without the terminator).
    fn diagnostics_for(source: &str) -> Vec<String> {
        let mut interner = Interner::new();
        let (tokens, lex_errors) = Lexer::new(source, &mut interner).tokenize();
        assert!(lex_errors.is_empty(), "unexpected lexical errors");
        let decls = Arena::new();
        let commands = Arena::new();
        let exprs = Arena::new();
        let fields = Arena::new();
        let names = Arena::new();
        let params = Arena::new();
        let var_decls = Arena::new();
        let var_items = Arena::new();
        let case_arms = Arena::new();
        let case_labels = Arena::new();
        let ctx = AstContext::new(
            &decls, &commands, &exprs, &fields, &names, &params, &var_decls, &var_items,
            &case_arms, &case_labels,
        );
        let program = {
            let mut parser = Parser::new(tokens, &interner, ctx);
            parser.parse_program().expect("program should parse")
        };
        let (_, diags) = analyze(&program, source, &mut interner);
        diags.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        let diags = diagnostics_for(
            "algoritmo \"ok\" var declare x: inteiro inicio leia(x) escreva(x) fim",
        );
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
    }

    #[test]
    fn duplicate_declarator_is_reported_once() {
        let diags = diagnostics_for("algoritmo \"d\"\nvar declare a,a: inteiro\ninicio fim");
        assert_eq!(diags, vec!["Linha 2: identificador a ja declarado"]);
    }

    #[test]
    fn undeclared_identifier_in_assignment() {
        let diags =
            diagnostics_for("algoritmo \"u\" declare x: inteiro\ninicio\nx <- y\nfim");
        assert_eq!(diags, vec!["Linha 3: identificador y nao declarado"]);
    }

    #[test]
    fn literal_into_inteiro_is_incompatible() {
        let diags = diagnostics_for(
            "algoritmo \"m\" declare n: inteiro\ninicio\nn <- \"abc\"\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: atribuicao nao compativel para n"]);
    }

    #[test]
    fn inteiro_widens_into_real() {
        let diags =
            diagnostics_for("algoritmo \"w\" declare v: real inicio v <- 3 fim");
        assert!(diags.is_empty(), "widening must be silent: {:?}", diags);
    }

    #[test]
    fn real_does_not_narrow_into_inteiro() {
        let diags =
            diagnostics_for("algoritmo \"n\" declare k: inteiro inicio k <- 1.5 fim");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("atribuicao nao compativel para k"));
    }

    #[test]
    fn undeclared_type_in_declaration() {
        let diags =
            diagnostics_for("algoritmo \"t\"\ndeclare p: ponto\ninicio fim");
        assert_eq!(diags, vec!["Linha 2: tipo ponto nao declarado"]);
    }

    #[test]
    fn duplicate_type_keeps_first_definition() {
        let diags = diagnostics_for(
            "algoritmo \"t\"\ntipo idade: inteiro\ntipo idade: real\ndeclare a: idade\ninicio a <- 1 fim",
        );
        assert_eq!(diags, vec!["Linha 3: tipo idade ja declarado"]);
    }

    #[test]
    fn field_access_requires_record_type() {
        let diags = diagnostics_for(
            "algoritmo \"r\" declare x: inteiro\ninicio\nx.campo <- 1\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: x nao e do tipo registro"]);
    }

    #[test]
    fn missing_field_names_the_record_type() {
        let diags = diagnostics_for(
            "algoritmo \"r\" tipo ponto: registro x, y: inteiro fimregistro declare p: ponto\ninicio\np.z <- 1\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: campo z nao existe no registro ponto"]);
    }

    #[test]
    fn inline_record_fields_resolve() {
        let diags = diagnostics_for(
            "algoritmo \"i\" declare p: registro nome: literal idade: inteiro fimregistro\ninicio\np.idade <- 20\np.outro <- 1\nfim",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].starts_with("Linha 4: campo outro nao existe no registro __rec_"));
    }

    #[test]
    fn array_index_must_be_inteiro() {
        let diags = diagnostics_for(
            "algoritmo \"a\" declare v[10]: inteiro declare r: real\ninicio\nv[r] <- 1\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: indice de array deve ser inteiro"]);
    }

    #[test]
    fn call_arity_is_checked() {
        let diags = diagnostics_for(
            "algoritmo \"c\" procedimento soma(a: inteiro, b: inteiro) inicio fimprocedimento\ninicio\nsoma(1)\nfim",
        );
        assert_eq!(
            diags,
            vec!["Linha 3: incompatibilidade de parametros na chamada de soma"]
        );
    }

    #[test]
    fn call_argument_types_are_not_checked() {
        let diags = diagnostics_for(
            "algoritmo \"c\" procedimento p(a: inteiro) inicio fimprocedimento\ninicio\np(\"texto\")\nfim",
        );
        assert!(diags.is_empty(), "arity-only check: {:?}", diags);
    }

    #[test]
    fn unknown_call_target_is_undeclared() {
        let diags = diagnostics_for("algoritmo \"c\" inicio\nrodar(1)\nfim");
        assert_eq!(diags, vec!["Linha 2: identificador rodar nao declarado"]);
    }

    #[test]
    fn local_scope_is_dropped_between_subroutines() {
        let diags = diagnostics_for(
            "algoritmo \"s\" \
             procedimento p1() declare tmp: inteiro inicio tmp <- 1 fimprocedimento \
             procedimento p2() declare tmp: inteiro inicio tmp <- 2 fimprocedimento \
             inicio fim",
        );
        assert!(diags.is_empty(), "locals must not collide: {:?}", diags);
    }

    #[test]
    fn local_name_is_invisible_after_exit() {
        let diags = diagnostics_for(
            "algoritmo \"s\" procedimento p1() declare tmp: inteiro inicio fimprocedimento\ninicio\ntmp <- 1\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: identificador tmp nao declarado"]);
    }

    #[test]
    fn unknown_type_suppresses_cascades() {
        // `y` is undeclared; the enclosing sum and the assignment stay quiet.
        let diags = diagnostics_for(
            "algoritmo \"u\" declare x: inteiro\ninicio\nx <- y + 1\nfim",
        );
        assert_eq!(diags, vec!["Linha 3: identificador y nao declarado"]);
    }

    #[test]
    fn constants_participate_in_typing() {
        let diags = diagnostics_for(
            "algoritmo \"k\" constante MAX: inteiro = 100 declare x: inteiro\ninicio\nx <- MAX\nfim",
        );
        assert!(diags.is_empty(), "constant use must type: {:?}", diags);
    }

    #[test]
    fn diagnostics_keep_traversal_order() {
        let diags = diagnostics_for(
            "algoritmo \"o\" declare x: inteiro\ninicio\nx <- a\nx <- b\nfim",
        );
        assert_eq!(
            diags,
            vec![
                "Linha 3: identificador a nao declarado",
                "Linha 4: identificador b nao declarado",
            ]
        );
    }

    #[test]
    fn pointer_roundtrip_types_cleanly() {
        let diags = diagnostics_for(
            "algoritmo \"p\" declare ptr: ^inteiro declare x: inteiro\ninicio\nptr <- &x\n^ptr <- 5\nfim",
        );
        assert!(diags.is_empty(), "pointer flow must type: {:?}", diags);
    }
}
