//! Error handling for the µC compiler
//!
//! This module defines the common error type shared by all phases and the
//! diagnostic renderer that prints errors with source context.

use crate::source_loc::Source;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("(byte offset {pos}) error: {message}")]
    LexError { pos: usize, message: String },

    #[error("(byte offset {pos}) error: {message}")]
    ParseError { pos: usize, message: String },

    #[error("(byte offset {pos}) error: {message}")]
    SemanticError {
        pos: usize,
        message: String,
        notes: Vec<Note>,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    /// Create a lexer error
    pub fn lexer_error(message: String, pos: usize) -> Self {
        CompilerError::LexError { pos, message }
    }

    /// Create a parse error
    pub fn parse_error(message: String, pos: usize) -> Self {
        CompilerError::ParseError { pos, message }
    }

    /// Create a semantic error
    pub fn semantic_error(message: String, pos: usize) -> Self {
        CompilerError::SemanticError {
            pos,
            message,
            notes: Vec::new(),
        }
    }

    /// Byte offset the error points at, if any
    pub fn pos(&self) -> Option<usize> {
        match self {
            CompilerError::LexError { pos, .. }
            | CompilerError::ParseError { pos, .. }
            | CompilerError::SemanticError { pos, .. } => Some(*pos),
            CompilerError::IoError { .. } => None,
        }
    }

    /// The bare message, without position prefix
    pub fn message(&self) -> &str {
        match self {
            CompilerError::LexError { message, .. }
            | CompilerError::ParseError { message, .. }
            | CompilerError::SemanticError { message, .. }
            | CompilerError::IoError { message } => message,
        }
    }

    /// Convert into a diagnostic ready for rendering
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.message().to_string(), self.pos());
        if let CompilerError::SemanticError { notes, .. } = self {
            diagnostic.notes.extend(notes.iter().cloned());
        }
        diagnostic
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A secondary message pointing at a related position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pos: usize,
    pub message: String,
}

impl Note {
    pub fn new(message: String, pos: usize) -> Self {
        Self { pos, message }
    }
}

/// A diagnostic message with position and severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub pos: Option<usize>,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn error(message: String, pos: Option<usize>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            pos,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, message: String, pos: usize) -> Self {
        self.notes.push(Note::new(message, pos));
        self
    }

    /// Render the diagnostic.
    ///
    /// With a source the format is
    ///
    /// ```text
    /// (file:line) error: text
    ///   n[2];
    ///    ^
    /// ```
    ///
    /// and without one it is `(byte offset N) error: text`.
    pub fn render(&self, source: Option<&Source>, color: bool) -> String {
        let mut out = render_one(self.severity, &self.message, self.pos, source, color);
        for note in &self.notes {
            out.push('\n');
            out.push_str(&render_one(
                Severity::Note,
                &note.message,
                Some(note.pos),
                source,
                color,
            ));
        }
        out
    }
}

fn render_one(
    severity: Severity,
    message: &str,
    pos: Option<usize>,
    source: Option<&Source>,
    color: bool,
) -> String {
    let prefix = format!("{}:", severity);
    let (prefix, text) = if color {
        let prefix = match severity {
            Severity::Error => prefix.red().bold().to_string(),
            Severity::Note => prefix.cyan().bold().to_string(),
        };
        (prefix, message.bold().to_string())
    } else {
        (prefix, message.to_string())
    };
    let bold = |s: String| if color { s.bold().to_string() } else { s };

    let Some(pos) = pos else {
        return format!("{} {}", prefix, text);
    };
    let Some(src) = source else {
        return format!("{} {} {}", bold(format!("(byte offset {})", pos)), prefix, text);
    };

    let loc = src.position(pos);
    let line = src.line(loc.line);
    let arrow = format!("{:>width$}", "^", width = src.display_column(pos));
    format!(
        "{} {} {}\n{}\n{}",
        bold(format!("({}:{})", src.path, loc.line)),
        prefix,
        text,
        line,
        bold(arrow)
    )
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None, false))
    }
}

impl From<&CompilerError> for Diagnostic {
    fn from(err: &CompilerError) -> Self {
        err.to_diagnostic()
    }
}

/// Error reporter for collecting and displaying diagnostics
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            error_count: 0,
        }
    }

    /// Report an error diagnostic
    pub fn error(&mut self, message: String, pos: usize) -> &mut Diagnostic {
        self.push(Diagnostic::error(message, Some(pos)))
    }

    /// Report an already built diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        if diagnostic.severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self, source: Option<&Source>, color: bool) {
        for diagnostic in &self.diagnostics {
            eprintln!("{}", diagnostic.render(source, color));
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match self.error_count {
            0 => "No errors".to_string(),
            1 => "1 error".to_string(),
            e => format!("{} errors", e),
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
