//! Parse error types for the µC parser
//! 
//! This module defines all error types that can occur during parsing.

use crate::lexer::{Token, TokenKind};
use thiserror::Error;
use ucc_common::CompilerError;

/// Parse error types specific to the parser
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: usize,
    },

    #[error("lexical error: {message}")]
    Lexical { message: String, pos: usize },

    #[error("invalid integer literal \"{text}\"")]
    InvalidInteger { text: String, pos: usize },

    #[error("invalid character literal {text}")]
    InvalidCharacter { text: String, pos: usize },

    #[error("unknown type name \"{name}\"")]
    UnknownType { name: String, pos: usize },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: describe_token(found),
            pos: found.pos,
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::Lexical { pos, .. }
            | ParseError::InvalidInteger { pos, .. }
            | ParseError::InvalidCharacter { pos, .. }
            | ParseError::UnknownType { pos, .. } => *pos,
        }
    }
}

/// Describe a token for "expected X, got Y" messages
fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::EndOfFile => "end of file".to_string(),
        TokenKind::Identifier | TokenKind::IntLiteral | TokenKind::CharLiteral => {
            format!("{} {:?}", token.kind, token.lexeme)
        }
        kind => format!("{:?}", kind.to_string()),
    }
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lexical { .. } => CompilerError::lexer_error(err.to_string(), err.pos()),
            _ => CompilerError::parse_error(err.to_string(), err.pos()),
        }
    }
}
