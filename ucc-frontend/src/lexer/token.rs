//! Token definitions for the µC lexer
//!
//! This module defines token kinds and the Token struct.

use serde::{Deserialize, Serialize};
use std::fmt;

/// µC token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Special
    EndOfFile,
    Error,
    Comment,

    // Identifiers and literals
    Identifier,
    IntLiteral,
    CharLiteral,

    // Keywords
    If,
    Else,
    While,
    Return,

    // Operators
    Plus,               // +
    Minus,              // -
    Star,               // *
    Slash,              // /
    Equal,              // =
    EqualEqual,         // ==
    BangEqual,          // !=
    Less,               // <
    LessEqual,          // <=
    Greater,            // >
    GreaterEqual,       // >=
    AmpersandAmpersand, // &&
    Bang,               // !

    // Delimiters
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Semicolon,    // ;
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::EndOfFile => write!(f, "end of file"),
            TokenKind::Error => write!(f, "error"),
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::IntLiteral => write!(f, "integer literal"),
            TokenKind::CharLiteral => write!(f, "character literal"),

            TokenKind::If => write!(f, "if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Return => write!(f, "return"),

            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::AmpersandAmpersand => write!(f, "&&"),
            TokenKind::Bang => write!(f, "!"),

            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
        }
    }
}

/// A token with its text and the byte offset where it starts.
///
/// For error tokens the lexeme holds the error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
        }
    }

    pub fn eof(pos: usize) -> Self {
        Self::new(TokenKind::EndOfFile, "", pos)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Byte offset just past the token in the normalized text.
    ///
    /// Exact for every token the parser consumes, whatever the input
    /// encoding. Comment lexemes drop carriage returns and show illegal
    /// bytes as ISO-8859-1, so their end is only approximate.
    pub fn end(&self) -> usize {
        match self.kind {
            TokenKind::Error | TokenKind::EndOfFile => self.pos,
            _ => self.pos + self.lexeme.len(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} at {}", self.kind, self.lexeme, self.pos)
    }
}
