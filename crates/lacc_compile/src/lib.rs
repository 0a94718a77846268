//! # lacc-compile
//!
//! The LA compilation pipeline: diagnostics, semantic analysis, and C code
//! generation over the parse tree built by `lacc-language`.
//!
//! ## Architecture
//!
//! ```text
//! LA source
//!      │
//!      ▼
//! ┌─────────┐     ┌──────────┐     ┌────────────┐     ┌─────────┐
//! │  Lexer  │ ──▶ │  Parser  │ ──▶ │  Analyzer  │ ──▶ │ CodeGen │
//! └─────────┘     └──────────┘     └────────────┘     └─────────┘
//!       │               │                │                  │
//!       └───────────────┴── Diagnostics ─┘                  ▼
//!                             │                          C source
//!                             ▼
//!               "Linha L: …" + "Fim da compilacao"
//! ```
//!
//! Any diagnostic anywhere prevents code generation; the output file then
//! holds the diagnostic list and the terminator line instead of C text.
//!
//! ## Modules
//!
//! - [`diagnostic`]: message templates, the ordered collector, the terminator
//! - [`analysis`]: symbol tables, user-type registry, the semantic walk
//! - [`codegen`]: type translation and manually recursive C emission
//! - [`compile`]: the pipeline entry points

pub mod analysis;
pub mod codegen;
pub mod compile;
pub mod diagnostic;

pub use compile::{compile_source, compile_to_output, CompileOutcome};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, TERMINATOR};
