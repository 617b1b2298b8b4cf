//! µC Compiler - Common Types and Utilities
//! 
//! This crate contains shared types, error definitions, and utilities
//! used across all components of the µC compiler front end.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, Diagnostic, ErrorReporter, Note, Severity};
pub use source_loc::{Source, SourceLocation, SourceSpan};
