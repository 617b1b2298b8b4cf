//! Operator, punctuation and comment lexing for the µC lexer

use crate::encoding::Unit;
use crate::lexer::{describe_char, Lexer, Token, TokenKind};

impl Lexer {
    /// Tokenize an operator or delimiter whose first character has already
    /// been consumed. Returns `None` for characters outside the symbol set.
    pub(crate) fn tokenize_operator(&mut self, ch: char) -> Option<Token> {
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '<' => {
                if self.accept('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.accept('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '=' => {
                if self.accept('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.accept('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '&' => return Some(self.tokenize_ampersand()),
            _ => return None,
        };
        Some(self.emit(kind))
    }

    /// `&&` is the only operator starting with `&`; a lone ampersand is an
    /// error and the following character is lexed again.
    fn tokenize_ampersand(&mut self) -> Token {
        if self.accept('&') {
            return self.emit(TokenKind::AmpersandAmpersand);
        }
        let got = match self.current() {
            None => "EOF".to_string(),
            Some(Unit::Illegal(_)) => describe_char(char::REPLACEMENT_CHARACTER),
            Some(Unit::Char(ch)) => describe_char(ch),
        };
        self.error_at(
            self.offset_of(self.start),
            format!("expected '&' after '&', got {}", got),
        )
    }

    /// Tokenize a division operator, a line comment or a block comment. The
    /// slash has already been consumed.
    pub(crate) fn tokenize_slash(&mut self) -> Token {
        if self.accept('/') {
            self.tokenize_line_comment()
        } else if self.accept('*') {
            self.tokenize_block_comment()
        } else {
            self.emit(TokenKind::Slash)
        }
    }

    /// Line comment: `//` up to the end of the line.
    ///
    /// The line terminator is not part of the lexeme, except when it was
    /// appended to unterminated input.
    fn tokenize_line_comment(&mut self) -> Token {
        while let Some(unit) = self.current() {
            if unit.is_char('\n') {
                break;
            }
            self.position += 1;
        }

        let at_appended_newline =
            self.appended_newline && self.position + 1 == self.scalars.len();
        let mut text = self.text(self.start, self.position);
        if at_appended_newline {
            text.push('\n');
            self.position += 1;
        } else {
            let trimmed = text.trim_end_matches('\r').len();
            text.truncate(trimmed);
        }
        Token::new(TokenKind::Comment, text, self.offset_of(self.start))
    }

    /// Block comment: `/*` up to and including the next `*/`. Carriage
    /// returns are dropped from the lexeme.
    fn tokenize_block_comment(&mut self) -> Token {
        loop {
            match self.advance() {
                None => {
                    return self.error_at(
                        self.offset_of(self.start),
                        "unexpected eof in block comment",
                    );
                }
                Some(unit) if unit.is_char('*') && self.current_is('/') => {
                    self.position += 1;
                    break;
                }
                Some(_) => {}
            }
        }

        let text: String = self
            .text(self.start, self.position)
            .chars()
            .filter(|&ch| ch != '\r')
            .collect();
        Token::new(TokenKind::Comment, text, self.offset_of(self.start))
    }
}
