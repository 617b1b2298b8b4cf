//! µC Compiler - Frontend
//! 
//! This crate provides the frontend components for the µC compiler:
//! - Encoding: turns raw input bytes into Unicode scalar values
//! - Lexer: tokenizes µC source code
//! - Parser: builds the AST from tokens
//! - Semantic analysis: name resolution, type checking and configurable checks

pub mod ast;
pub mod config;
pub mod encoding;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod types;

pub use ast::{
    BinaryOp, DeclId, DeclKind, Declaration, Expression, ExpressionKind, Item, Statement,
    StatementKind, TranslationUnit, UnaryOp,
};
pub use config::FrontendConfig;
pub use encoding::Encoding;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use semantic::{ExprTypes, SemanticAnalyzer, SemanticError};
pub use types::Type;

use ucc_common::{CompilerError, ErrorReporter, Source};

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Source text for diagnostics, in the normalized form token positions
    /// refer to
    pub fn source(path: impl Into<String>, input: &[u8]) -> Source {
        Source::new(path, encoding::normalize(input))
    }

    /// Tokenize raw source bytes, including comment and error tokens
    pub fn tokenize_bytes(input: &[u8]) -> Vec<Token> {
        Lexer::from_bytes(input).tokenize()
    }

    /// Collect the error tokens of a token stream as diagnostics
    pub fn lex_errors(tokens: &[Token]) -> ErrorReporter {
        let mut reporter = ErrorReporter::new();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Error) {
            reporter.error(token.lexeme.clone(), token.pos);
        }
        reporter
    }

    /// Parse raw source bytes into an AST
    pub fn parse_bytes(input: &[u8]) -> Result<TranslationUnit, CompilerError> {
        let tokens = Self::tokenize_bytes(input);
        Parser::new(tokens).parse_translation_unit()
    }

    /// Parse µC source code into an AST
    pub fn parse_source(source: &str) -> Result<TranslationUnit, CompilerError> {
        Self::parse_bytes(source.as_bytes())
    }

    /// Parse and analyze raw source bytes
    pub fn analyze_bytes(
        input: &[u8],
        config: &FrontendConfig,
    ) -> Result<(TranslationUnit, ExprTypes), CompilerError> {
        let mut unit = Self::parse_bytes(input)?;
        let types = SemanticAnalyzer::new(config.clone()).analyze(&mut unit)?;
        Ok((unit, types))
    }

    /// Parse and analyze µC source code
    pub fn analyze_source(
        source: &str,
        config: &FrontendConfig,
    ) -> Result<(TranslationUnit, ExprTypes), CompilerError> {
        Self::analyze_bytes(source.as_bytes(), config)
    }
}
