//! Input encoding detection and decoding
//!
//! Raw input bytes are turned into a stream of scalar values. UTF-16 input
//! must carry a byte-order mark; everything else is read as UTF-8, and bytes
//! that do not form valid UTF-8 are kept one by one so the lexer can report
//! them (or, inside comments, show them as their ISO-8859-1 code points).
//!
//! Positions are byte offsets into the normalized text: the input without
//! its signature, re-encoded as UTF-8, with every illegal byte kept as is.
//! The same program therefore has the same positions in every encoding.

use log::debug;
use serde::{Deserialize, Serialize};

/// Input encoding detected from the leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Utf8,
    /// UTF-8 with the EF BB BF signature
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    /// Detect the encoding and return it with the length of its signature
    pub fn sniff(input: &[u8]) -> (Encoding, usize) {
        match input {
            [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8Bom, 3),
            [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
            _ => (Encoding::Utf8, 0),
        }
    }
}

/// One decoded unit of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Char(char),
    /// A byte that is not part of any valid UTF-8 sequence
    Illegal(u8),
}

impl Unit {
    /// The scalar value, reading illegal bytes as ISO-8859-1
    pub fn as_char(self) -> char {
        match self {
            Unit::Char(ch) => ch,
            Unit::Illegal(b) => char::from(b),
        }
    }

    pub fn is_char(self, expected: char) -> bool {
        self == Unit::Char(expected)
    }
}

/// A decoded unit and the byte range it occupies in the normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    pub unit: Unit,
    pub pos: usize,
    pub len: usize,
}

/// Decoded input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub encoding: Encoding,
    pub scalars: Vec<Scalar>,
    /// The normalized text all positions refer to
    pub text: Vec<u8>,
    /// Byte length of the normalized text
    pub end: usize,
}

impl Decoded {
    fn push(&mut self, unit: Unit) {
        let pos = self.text.len();
        match unit {
            Unit::Char(ch) => {
                let mut buf = [0; 4];
                self.text.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            Unit::Illegal(b) => self.text.push(b),
        }
        self.scalars.push(Scalar {
            unit,
            pos,
            len: self.text.len() - pos,
        });
    }
}

/// Decode raw input bytes. Never fails.
pub fn decode(input: &[u8]) -> Decoded {
    let (encoding, skip) = Encoding::sniff(input);
    debug!("decoding {} bytes as {:?}", input.len(), encoding);

    let body = &input[skip..];
    let mut decoded = Decoded {
        encoding,
        scalars: Vec::with_capacity(body.len()),
        text: Vec::with_capacity(body.len()),
        end: 0,
    };
    match encoding {
        Encoding::Utf8 | Encoding::Utf8Bom => decode_utf8(body, &mut decoded),
        Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes, &mut decoded),
        Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes, &mut decoded),
    }
    decoded.end = decoded.text.len();
    decoded
}

/// The normalized text of raw input, as used for positions
pub fn normalize(input: &[u8]) -> Vec<u8> {
    decode(input).text
}

fn decode_utf8(bytes: &[u8], out: &mut Decoded) {
    let mut i = 0;
    while i < bytes.len() {
        let width = utf8_width(bytes[i]);
        let decoded = bytes
            .get(i..i + width)
            .and_then(|seq| std::str::from_utf8(seq).ok())
            .and_then(|s| s.chars().next());
        match decoded {
            Some(ch) => {
                out.push(Unit::Char(ch));
                i += width;
            }
            None => {
                out.push(Unit::Illegal(bytes[i]));
                i += 1;
            }
        }
    }
}

/// Sequence length announced by a UTF-8 lead byte, 0 if it cannot lead
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn decode_utf16(bytes: &[u8], word: fn([u8; 2]) -> u16, out: &mut Decoded) {
    let words = bytes.chunks_exact(2).map(|pair| word([pair[0], pair[1]]));
    for decoded in char::decode_utf16(words) {
        // Unpaired surrogates become U+FFFD.
        out.push(Unit::Char(decoded.unwrap_or(char::REPLACEMENT_CHARACTER)));
    }

    // A dangling odd byte cannot be decoded.
    if bytes.len() % 2 == 1 {
        out.push(Unit::Illegal(bytes[bytes.len() - 1]));
    }
}
