//! µC Recursive Descent Parser
//! 
//! Parses µC tokens into an Abstract Syntax Tree (AST). Comment tokens are
//! skipped; the first error token from the lexer stops parsing.

pub mod declarations;
pub mod errors;
pub mod expressions;
pub mod statements;

use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use log::debug;
use std::collections::VecDeque;
use ucc_common::{CompilerError, SourceSpan};

pub use errors::ParseError;

/// µC Parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) node_id_gen: NodeIdGenerator,
    /// Declarations parsed so far
    pub(crate) unit: TranslationUnit,
    /// End offset of the last consumed token
    pub(crate) last_end: usize,
    eof: Token,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        // Comments are not part of the grammar.
        let tokens: VecDeque<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        let eof_pos = tokens.back().map_or(0, |t| t.pos);

        Self {
            tokens,
            node_id_gen: NodeIdGenerator::new(),
            unit: TranslationUnit::new(),
            last_end: 0,
            eof: Token::eof(eof_pos),
        }
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.front().unwrap_or(&self.eof)
    }

    /// Peek n tokens past the current one
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(n).unwrap_or(&self.eof)
    }

    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens.pop_front().unwrap_or_else(|| self.eof.clone());
        self.last_end = token.end();
        token
    }

    /// Check if current token matches expected kind
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume token if it matches expected kind
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect and consume a specific token kind
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let expected = match kind {
            TokenKind::Identifier => "identifier".to_string(),
            _ => format!("{:?}", kind.to_string()),
        };
        Err(self.unexpected(expected))
    }

    /// Build an error for the current token, surfacing lexer errors as is
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Error {
            ParseError::Lexical {
                message: token.lexeme.clone(),
                pos: token.pos,
            }
        } else {
            ParseError::unexpected(expected, token)
        }
    }

    /// Parse a complete translation unit
    pub fn parse_translation_unit(mut self) -> Result<TranslationUnit, CompilerError> {
        let start = self.peek().pos;

        // Parse all top-level declarations until EOF
        while !self.check(TokenKind::EndOfFile) {
            let item = self.parse_declaration(DeclLevel::File)?;
            self.unit.items.push(item);
        }

        let end = self.peek().pos;
        self.unit.span = SourceSpan::new(start, end);
        debug!(
            "parsed {} top-level declarations, {} declarations in total",
            self.unit.items.len(),
            self.unit.decls.len()
        );
        Ok(self.unit)
    }
}

/// Where a declaration appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclLevel {
    File,
    Block,
}
