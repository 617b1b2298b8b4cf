//! µC Lexer
//!
//! Tokenizes µC source into a stream of tokens. The lexer never stops on
//! malformed input: every problem becomes an error token carrying the
//! message, and scanning resumes right after it. Comments are returned as
//! tokens; dropping them is up to the caller.

pub mod literals;
pub mod operators;
pub mod token;

pub use literals::decode_char_literal;
pub use token::{Token, TokenKind};

use crate::encoding::{self, Encoding, Scalar, Unit};
use log::{debug, trace};
use std::collections::HashMap;

/// White-space characters: space, horizontal tab, line feed, vertical tab,
/// form feed and carriage return.
const WHITESPACE: &[char] = &[' ', '\t', '\n', '\x0B', '\x0C', '\r'];

/// µC Lexer
pub struct Lexer {
    pub(crate) scalars: Vec<Scalar>,
    /// Index of the next unread scalar
    pub(crate) position: usize,
    /// Index of the first scalar of the token being lexed
    pub(crate) start: usize,
    /// Byte offset reported for the end of input
    pub(crate) eof: usize,
    /// Whether the final line terminator was synthesized
    pub(crate) appended_newline: bool,
    encoding: Encoding,
    finished: bool,
    keywords: HashMap<&'static str, TokenKind>,
}

impl Lexer {
    /// Create a new lexer over UTF-8 text
    pub fn new(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Create a new lexer over raw input bytes of any supported encoding
    pub fn from_bytes(input: &[u8]) -> Self {
        let decoded = encoding::decode(input);
        let mut scalars = decoded.scalars;
        let mut eof = decoded.end;

        // Terminate a final line that holds anything but white space.
        let tail = scalars
            .iter()
            .rposition(|s| s.unit.is_char('\n'))
            .map_or(0, |i| i + 1);
        let appended_newline = scalars[tail..]
            .iter()
            .any(|s| !matches!(s.unit, Unit::Char(ch) if WHITESPACE.contains(&ch)));
        if appended_newline {
            scalars.push(Scalar {
                unit: Unit::Char('\n'),
                pos: eof,
                len: 1,
            });
            eof += 1;
        }
        debug!(
            "lexer ready: {} scalars, eof at {}, newline appended: {}",
            scalars.len(),
            eof,
            appended_newline
        );

        let mut lexer = Self {
            scalars,
            position: 0,
            start: 0,
            eof,
            appended_newline,
            encoding: decoded.encoding,
            finished: false,
            keywords: HashMap::new(),
        };
        lexer.initialize_keywords();
        lexer
    }

    /// Initialize keyword map
    fn initialize_keywords(&mut self) {
        let keywords = [
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("return", TokenKind::Return),
        ];

        for (keyword, kind) in keywords {
            self.keywords.insert(keyword, kind);
        }
    }

    /// Encoding detected for the input
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte offset of the end-of-file token
    pub fn eof_pos(&self) -> usize {
        self.eof
    }

    /// Get the current unit without consuming it
    pub(crate) fn current(&self) -> Option<Unit> {
        self.scalars.get(self.position).map(|s| s.unit)
    }

    /// Check whether the current unit is the given character
    pub(crate) fn current_is(&self, expected: char) -> bool {
        self.current().is_some_and(|unit| unit.is_char(expected))
    }

    /// Advance to the next unit
    pub(crate) fn advance(&mut self) -> Option<Unit> {
        let unit = self.current()?;
        self.position += 1;
        Some(unit)
    }

    /// Consume the current unit if it is the given character
    pub(crate) fn accept(&mut self, expected: char) -> bool {
        if self.current_is(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Byte offset of the scalar at the given index
    pub(crate) fn offset_of(&self, index: usize) -> usize {
        self.scalars.get(index).map_or(self.eof, |s| s.pos)
    }

    /// Text of the scalars in `from..to`, reading illegal bytes as ISO-8859-1
    pub(crate) fn text(&self, from: usize, to: usize) -> String {
        self.scalars[from..to].iter().map(|s| s.unit.as_char()).collect()
    }

    /// Build a token of the given kind from the current lexeme
    pub(crate) fn emit(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.text(self.start, self.position), self.offset_of(self.start))
    }

    /// Build an error token at the given byte offset
    pub(crate) fn error_at(&self, pos: usize, message: impl Into<String>) -> Token {
        Token::new(TokenKind::Error, message, pos)
    }

    /// Skip white space, line terminators included
    fn skip_whitespace(&mut self) {
        while let Some(Unit::Char(ch)) = self.current() {
            if WHITESPACE.contains(&ch) {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Tokenize an identifier or keyword
    fn tokenize_identifier(&mut self) -> Token {
        while let Some(Unit::Char(ch)) = self.current() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.position += 1;
            } else {
                break;
            }
        }

        let mut token = self.emit(TokenKind::Identifier);
        if let Some(&kind) = self.keywords.get(token.lexeme.as_str()) {
            token.kind = kind;
        }
        token
    }

    /// Get next token. Once the end of input is reached every call returns
    /// an EOF token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.position;
        let pos = self.offset_of(self.start);

        let token = match self.advance() {
            None => Token::eof(self.eof),
            Some(Unit::Illegal(_)) => self.error_at(pos, "illegal UTF-8 encoding"),
            Some(Unit::Char(ch)) => match ch {
                '/' => self.tokenize_slash(),
                '\'' => self.tokenize_char_literal(),
                '0'..='9' => self.tokenize_integer(),
                'a'..='z' | 'A'..='Z' | '_' => self.tokenize_identifier(),
                _ => match self.tokenize_operator(ch) {
                    Some(token) => token,
                    None => self.error_at(pos, format!("unexpected {}", describe_char(ch))),
                },
            },
        };

        trace!("{}", token);
        token
    }

    /// Tokenize entire input into a vector of tokens, ending with EOF
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_eof();
        Some(token)
    }
}

/// Describe a character as `U+XXXX`, followed by the character in quotes
/// when it is printable.
pub(crate) fn describe_char(ch: char) -> String {
    if is_printable(ch) {
        format!("U+{:04X} '{}'", ch as u32, ch)
    } else {
        format!("U+{:04X}", ch as u32)
    }
}

fn is_printable(ch: char) -> bool {
    ch == ' '
        || !(ch.is_control() || ch.is_whitespace() || is_format(ch) || is_private_use(ch))
}

/// Format characters (general category Cf), which have no visible glyph
fn is_format(ch: char) -> bool {
    matches!(
        ch,
        '\u{AD}'
            | '\u{600}'..='\u{605}'
            | '\u{61C}'
            | '\u{6DD}'
            | '\u{70F}'
            | '\u{890}'..='\u{891}'
            | '\u{8E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_private_use(ch: char) -> bool {
    matches!(ch, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{10FFFF}')
}
