//! Literal parsing for the µC lexer
//!
//! This module handles integer and character literals.

use crate::encoding::Unit;
use crate::lexer::{describe_char, Lexer, Token, TokenKind};

/// Characters allowed after a backslash, with the byte they stand for
const ESCAPES: &[(char, u8)] = &[
    ('n', b'\n'),
    ('t', b'\t'),
    ('r', b'\r'),
    ('0', 0),
    ('\\', b'\\'),
    ('\'', b'\''),
    ('"', b'"'),
];

fn escape_value(ch: char) -> Option<u8> {
    ESCAPES.iter().find(|(c, _)| *c == ch).map(|&(_, b)| b)
}

impl Lexer {
    /// Tokenize an integer literal. A leading zero does not select octal.
    pub(crate) fn tokenize_integer(&mut self) -> Token {
        while let Some(Unit::Char('0'..='9')) = self.current() {
            self.position += 1;
        }
        self.emit(TokenKind::IntLiteral)
    }

    /// Tokenize a character literal; the opening quote is already consumed.
    ///
    /// On any error the lexer resumes directly after the opening quote.
    pub(crate) fn tokenize_char_literal(&mut self) -> Token {
        let quote_pos = self.offset_of(self.start);
        let resume = self.position;
        let char_index = self.position;

        let value = match self.current() {
            None | Some(Unit::Char('\n')) => {
                return self.unterminated_char_literal(quote_pos, resume);
            }
            Some(Unit::Illegal(_)) => {
                let pos = self.offset_of(char_index);
                self.position = resume;
                return self.error_at(pos, "illegal UTF-8 encoding");
            }
            Some(Unit::Char('\\')) => {
                let backslash_pos = self.offset_of(self.position);
                self.position += 1;
                match self.current() {
                    None | Some(Unit::Char('\n')) => {
                        return self.unterminated_char_literal(quote_pos, resume);
                    }
                    Some(unit) => match escape_value(unit.as_char()) {
                        Some(value) => {
                            self.position += 1;
                            char::from(value)
                        }
                        None => {
                            self.position = resume;
                            return self.error_at(
                                backslash_pos,
                                format!("unknown escape sequence '\\{}'", unit.as_char()),
                            );
                        }
                    },
                }
            }
            Some(Unit::Char(ch)) => {
                self.position += 1;
                ch
            }
        };

        if value as u32 > 0xFF {
            let pos = self.offset_of(char_index);
            self.position = resume;
            return self.error_at(
                pos,
                format!(
                    "character {} too large for enclosing character literal type",
                    describe_char(value)
                ),
            );
        }

        if !self.accept('\'') {
            return self.unterminated_char_literal(quote_pos, resume);
        }
        self.emit(TokenKind::CharLiteral)
    }

    fn unterminated_char_literal(&mut self, quote_pos: usize, resume: usize) -> Token {
        self.position = resume;
        self.error_at(quote_pos, "unterminated character literal")
    }
}

/// Decode the value of a well-formed character literal lexeme such as
/// `'a'` or `'\n'`.
pub fn decode_char_literal(lexeme: &str) -> Option<u8> {
    let inner = lexeme.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let value = match chars.next()? {
        '\\' => escape_value(chars.next()?)?,
        ch => u8::try_from(u32::from(ch)).ok()?,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_char_literals() {
        let tokens = Lexer::new(r"'c' '\n' '\'' ' '").tokenize();
        assert_eq!(tokens[0], Token::new(TokenKind::CharLiteral, "'c'", 0));
        assert_eq!(tokens[1], Token::new(TokenKind::CharLiteral, r"'\n'", 4));
        assert_eq!(tokens[2], Token::new(TokenKind::CharLiteral, r"'\''", 9));
        assert_eq!(tokens[3], Token::new(TokenKind::CharLiteral, "' '", 14));
    }

    #[test]
    fn test_unterminated_char_literal_resumes_after_quote() {
        // c = 'cc';
        let tokens = Lexer::new("c = 'cc';\n").tokenize();
        assert_eq!(tokens[2], Token::new(TokenKind::Error, "unterminated character literal", 4));
        assert_eq!(tokens[3], Token::new(TokenKind::Identifier, "cc", 5));
        assert_eq!(tokens[4], Token::new(TokenKind::Error, "unterminated character literal", 7));
        assert_eq!(tokens[5], Token::new(TokenKind::Semicolon, ";", 8));
        assert!(tokens[6].is_eof());
    }

    #[test]
    fn test_char_literal_at_end_of_line() {
        let tokens = Lexer::new("'\nx").tokenize();
        assert_eq!(tokens[0], Token::new(TokenKind::Error, "unterminated character literal", 0));
        assert_eq!(tokens[1], Token::new(TokenKind::Identifier, "x", 2));
    }

    #[test]
    fn test_unknown_escape_sequence() {
        let tokens = Lexer::new("c = '\\q';\n").tokenize();
        assert_eq!(tokens[2], Token::new(TokenKind::Error, r"unknown escape sequence '\q'", 5));
        assert_eq!(tokens[3], Token::new(TokenKind::Error, r"unexpected U+005C '\'", 5));
        assert_eq!(tokens[4], Token::new(TokenKind::Identifier, "q", 6));
        assert_eq!(tokens[5], Token::new(TokenKind::Error, "unterminated character literal", 7));
        assert_eq!(tokens[6], Token::new(TokenKind::Semicolon, ";", 8));
    }

    #[test]
    fn test_char_literal_too_large() {
        // 'µ' is two bytes long in UTF-8.
        let tokens = Lexer::new("c = 'µ';\n").tokenize();
        assert_eq!(
            tokens[2],
            Token::new(
                TokenKind::Error,
                "character U+00B5 'µ' too large for enclosing character literal type",
                5
            )
        );
        assert_eq!(tokens[3], Token::new(TokenKind::Error, "unexpected U+00B5 'µ'", 5));
        assert_eq!(tokens[4], Token::new(TokenKind::Error, "unterminated character literal", 7));
        assert_eq!(tokens[5], Token::new(TokenKind::Semicolon, ";", 8));
    }

    #[test]
    fn test_latin1_char_literal_is_accepted() {
        // U+00E5 fits in a char.
        let tokens = Lexer::new("'å'").tokenize();
        assert_eq!(tokens[0], Token::new(TokenKind::CharLiteral, "'å'", 0));
    }

    #[test]
    fn test_illegal_utf8_in_char_literal() {
        let tokens = Lexer::from_bytes(b"'\xE5';\n").tokenize();
        assert_eq!(tokens[0], Token::new(TokenKind::Error, "illegal UTF-8 encoding", 1));
        assert_eq!(tokens[1], Token::new(TokenKind::Error, "illegal UTF-8 encoding", 1));
        assert_eq!(tokens[2], Token::new(TokenKind::Error, "unterminated character literal", 2));
        assert_eq!(tokens[3], Token::new(TokenKind::Semicolon, ";", 3));
    }

    #[test]
    fn test_decode_char_literal() {
        assert_eq!(decode_char_literal("'a'"), Some(b'a'));
        assert_eq!(decode_char_literal(r"'\n'"), Some(b'\n'));
        assert_eq!(decode_char_literal(r"'\0'"), Some(0));
        assert_eq!(decode_char_literal("'å'"), Some(0xE5));
        assert_eq!(decode_char_literal("'ab'"), None);
        assert_eq!(decode_char_literal(r"'\q'"), None);
        assert_eq!(decode_char_literal("a"), None);
    }
}
