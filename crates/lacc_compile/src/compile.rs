//! Top-level compilation pipeline.
//!
//! ```text
//! LA source
//!     │
//!     ▼
//! Lexer ──lexical errors──▶ diagnostics + terminator
//!     │
//!     ▼
//! Parser ──syntax error──▶ diagnostics + terminator
//!     │
//!     ▼
//! Analyzer ──any diagnostic──▶ diagnostics + terminator
//!     │
//!     ▼
//! Code generator ──▶ C translation unit
//! ```
//!
//! Each stage short-circuits the next on failure; generation runs only on
//! a completely clean analysis.

use lacc_base::{Arena, Interner};
use lacc_language::{AstContext, Lexer, Parser};

use crate::analysis::analyze;
use crate::codegen::generate;
use crate::diagnostic::Diagnostics;

/// What a compilation produced: C text, or the diagnostics that stopped it.
pub enum CompileOutcome {
    Code(String),
    Rejected(Diagnostics),
}

impl CompileOutcome {
    pub fn is_code(&self) -> bool {
        matches!(self, CompileOutcome::Code(_))
    }

    /// The exact text of the output file: the C translation unit, or the
    /// diagnostic lines followed by the terminator.
    pub fn render(&self) -> String {
        match self {
            CompileOutcome::Code(code) => code.clone(),
            CompileOutcome::Rejected(diags) => diags.render(),
        }
    }
}

/// Compiles one LA source text.
pub fn compile_source(source: &str) -> CompileOutcome {
    let mut interner = Interner::new();

    let (tokens, lex_errors) = Lexer::new(source, &mut interner).tokenize();
    if !lex_errors.is_empty() {
        let mut diags = Diagnostics::new();
        for error in &lex_errors {
            diags.push_lex(error, source);
        }
        return CompileOutcome::Rejected(diags);
    }

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
        &decls,
        &commands,
        &exprs,
        &fields,
        &names,
        &params,
        &var_decls,
        &var_items,
        &case_arms,
        &case_labels,
    );

    let program = {
        let mut parser = Parser::new(tokens, &interner, ctx);
        match parser.parse_program() {
            Ok(program) => program,
            Err(error) => {
                let mut diags = Diagnostics::new();
                diags.push_syntax(&error, source, &interner);
                return CompileOutcome::Rejected(diags);
            }
        }
    };

    let (analysis, diags) = analyze(&program, source, &mut interner);
    if !diags.is_empty() {
        return CompileOutcome::Rejected(diags);
    }

    CompileOutcome::Code(generate(&program, &analysis, &interner))
}

/// Convenience wrapper: compiles and renders the output file text.
pub fn compile_to_output(source: &str) -> String {
    compile_source(source).render()
}
