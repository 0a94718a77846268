//! User-visible diagnostics.
//!
//! Every problem the compiler reports is one line of the form
//! `Linha L: <message>`, where the message comes from a closed set of
//! templates. The collector is append-only and keeps emission order;
//! nothing is deduplicated. When any diagnostic exists, the output file is
//! the diagnostic list followed by the literal terminator line.
//!
//! | Kind | Template |
//! |------|----------|
//! | unterminated string | `cadeia literal nao fechada` |
//! | invalid character | `X - simbolo nao identificado` |
//! | unterminated comment | `comentario nao fechado` |
//! | syntax | `erro sintatico proximo a S` |
//! | undeclared identifier | `identificador N nao declarado` |
//! | duplicate identifier | `identificador N ja declarado` |
//! | undeclared type | `tipo T nao declarado` |
//! | duplicate type | `tipo T ja declarado` |
//! | assignment mismatch | `atribuicao nao compativel para N` |
//! | non-record access | `N nao e do tipo registro` |
//! | missing field | `campo F nao existe no registro T` |
//! | bad array index | `indice de array deve ser inteiro` |
//! | wrong arity | `incompatibilidade de parametros na chamada de N` |

use std::fmt;

use lacc_base::Interner;
use lacc_language::lexer::{LexError, LexErrorKind};
use lacc_language::parser::ParseError;

/// The literal last line of every diagnostic-bearing output file.
pub const TERMINATOR: &str = "Fim da compilacao";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnterminatedString,
    InvalidChar(String),
    UnterminatedComment,
    SyntaxNear(String),
    UndeclaredIdent(String),
    DuplicateIdent(String),
    UndeclaredType(String),
    DuplicateType(String),
    IncompatibleAssignment(String),
    NotARecord(String),
    MissingField { field: String, record: String },
    NonIntegerIndex,
    ParamMismatch(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnterminatedString => write!(f, "cadeia literal nao fechada"),
            DiagnosticKind::InvalidChar(text) => {
                write!(f, "{} - simbolo nao identificado", text)
            }
            DiagnosticKind::UnterminatedComment => write!(f, "comentario nao fechado"),
            DiagnosticKind::SyntaxNear(text) => {
                write!(f, "erro sintatico proximo a {}", text)
            }
            DiagnosticKind::UndeclaredIdent(name) => {
                write!(f, "identificador {} nao declarado", name)
            }
            DiagnosticKind::DuplicateIdent(name) => {
                write!(f, "identificador {} ja declarado", name)
            }
            DiagnosticKind::UndeclaredType(name) => write!(f, "tipo {} nao declarado", name),
            DiagnosticKind::DuplicateType(name) => write!(f, "tipo {} ja declarado", name),
            DiagnosticKind::IncompatibleAssignment(name) => {
                write!(f, "atribuicao nao compativel para {}", name)
            }
            DiagnosticKind::NotARecord(name) => write!(f, "{} nao e do tipo registro", name),
            DiagnosticKind::MissingField { field, record } => {
                write!(f, "campo {} nao existe no registro {}", field, record)
            }
            DiagnosticKind::NonIntegerIndex => {
                write!(f, "indice de array deve ser inteiro")
            }
            DiagnosticKind::ParamMismatch(name) => {
                write!(f, "incompatibilidade de parametros na chamada de {}", name)
            }
        }
    }
}

/// One diagnostic, attributed to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Linha {}: {}", self.line, self.kind)
    }
}

/// Ordered, append-only diagnostic collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: u32, kind: DiagnosticKind) {
        self.items.push(Diagnostic { line, kind });
    }

    /// Classifies a lexical error into its template (§4.1 decision order).
    pub fn push_lex(&mut self, error: &LexError, source: &str) {
        let kind = match error.kind {
            LexErrorKind::UnterminatedString => DiagnosticKind::UnterminatedString,
            LexErrorKind::UnterminatedComment => DiagnosticKind::UnterminatedComment,
            LexErrorKind::InvalidChar(ch) => DiagnosticKind::InvalidChar(ch.to_string()),
        };
        self.push(error.span.line(source), kind);
    }

    /// Renders a syntax error; at end of input the offending symbol is the
    /// literal `EOF`.
    pub fn push_syntax(&mut self, error: &ParseError, source: &str, interner: &Interner) {
        let near = if error.is_eof {
            "EOF".to_string()
        } else {
            interner.resolve(error.lexeme).to_string()
        };
        self.push(error.span.line(source), DiagnosticKind::SyntaxNear(near));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// The diagnostic-path output: one line per entry, then the terminator.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.items {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out.push_str(TERMINATOR);
        out.push('\n');
        out
    }
}
