//! Nameless terms and the Binary Lambda Calculus (BLC) encoding
//!
//! BLC encoding (bits, MSB first when packed into bytes):
//!   00 = λ (abstraction)
//!   01 = application
//!   1^n 0 = de Bruijn variable n (n ones followed by zero, n >= 1)

use std::fmt;

use crate::error::{EncodingErrorKind, Error, Result, SyntaxErrorKind};
use crate::parser::MAX_NESTING;

/// Term with de Bruijn indices in place of names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Variable with 1-based de Bruijn index (1 = innermost binder).
    /// Index 0 is representable but refused by the encoders.
    Var(usize),
    /// Lambda abstraction
    Abs(Box<Term>),
    /// Application
    App(Box<Term>, Box<Term>),
}

impl Term {
    pub fn abs(body: Term) -> Self {
        Term::Abs(Box::new(body))
    }

    pub fn app(func: Term, arg: Term) -> Self {
        Term::App(Box::new(func), Box::new(arg))
    }

    /// Number of bits in the BLC encoding
    pub fn bit_len(&self) -> usize {
        match self {
            Term::Var(i) => i.saturating_add(1),
            Term::Abs(body) => body.bit_len().saturating_add(2),
            Term::App(func, arg) => func.bit_len().saturating_add(arg.bit_len()).saturating_add(2),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(i) => write!(f, "{}", i),
            Term::Abs(body) => write!(f, "λ.{}", body),
            Term::App(func, arg) => write!(f, "({} {})", func, arg),
        }
    }
}

/// Source of bits for the decoder
trait BitSource {
    fn read_bit(&mut self) -> Option<bool>;

    /// Number of bits consumed so far
    fn bits_read(&self) -> usize;
}

/// Bit reader over a string of '0' and '1' characters
struct BitStr<'a> {
    chars: std::str::Chars<'a>,
    pos: usize,
    invalid: Option<(char, usize)>,
}

impl<'a> BitStr<'a> {
    fn new(bits: &'a str) -> Self {
        Self {
            chars: bits.chars(),
            pos: 0,
            invalid: None,
        }
    }
}

impl BitSource for BitStr<'_> {
    fn read_bit(&mut self) -> Option<bool> {
        let bit = match self.chars.next()? {
            '0' => false,
            '1' => true,
            c => {
                self.invalid = Some((c, self.pos));
                return None;
            }
        };
        self.pos += 1;
        Some(bit)
    }

    fn bits_read(&self) -> usize {
        self.pos
    }
}

/// Bit reader for parsing packed BLC
struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }
}

impl BitSource for BitReader<'_> {
    fn read_bit(&mut self) -> Option<bool> {
        if self.byte_pos >= self.data.len() {
            return None;
        }
        let bit = (self.data[self.byte_pos] >> (7 - self.bit_pos)) & 1;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        Some(bit == 1)
    }

    fn bits_read(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }
}

/// Sink of bits for the encoder
trait BitSink {
    fn write_bit(&mut self, bit: bool);

    /// Number of bits written so far
    fn bits_written(&self) -> usize;
}

impl BitSink for String {
    fn write_bit(&mut self, bit: bool) {
        self.push(if bit { '1' } else { '0' });
    }

    fn bits_written(&self) -> usize {
        self.len()
    }
}

/// Bit writer for encoding BLC
struct BitWriter {
    data: Vec<u8>,
    bit_pos: u8,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            data: vec![0],
            bit_pos: 0,
        }
    }

    fn finish(mut self) -> Vec<u8> {
        // remove trailing zero byte if we're byte-aligned
        if self.bit_pos == 0 && !self.data.is_empty() {
            self.data.pop();
        }
        self.data
    }
}

impl BitSink for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        if bit {
            let idx = self.data.len() - 1;
            self.data[idx] |= 1 << (7 - self.bit_pos);
        }
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.data.push(0);
        }
    }

    fn bits_written(&self) -> usize {
        (self.data.len() - 1) * 8 + self.bit_pos as usize
    }
}

/// Encode a term as a string of '0'/'1' characters. Fails on index 0.
pub fn to_binary(term: &Term) -> Result<String> {
    let mut bits = String::new();
    emit(term, &mut bits)?;
    Ok(bits)
}

/// Encode a term to packed bytes, zero padded to a byte boundary. Fails on
/// index 0.
pub fn encode_blc(term: &Term) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    emit(term, &mut writer)?;
    Ok(writer.finish())
}

fn emit(term: &Term, out: &mut impl BitSink) -> Result<()> {
    match term {
        Term::Abs(body) => {
            out.write_bit(false);
            out.write_bit(false);
            emit(body, out)
        }
        Term::App(func, arg) => {
            out.write_bit(false);
            out.write_bit(true);
            emit(func, out)?;
            emit(arg, out)
        }
        Term::Var(0) => Err(Error::Encoding {
            kind: EncodingErrorKind::ZeroIndex,
            position: out.bits_written(),
        }),
        Term::Var(index) => {
            for _ in 0..*index {
                out.write_bit(true);
            }
            out.write_bit(false);
            Ok(())
        }
    }
}

/// Decode a complete bit string; every bit must belong to the term
pub fn from_binary(bits: &str) -> Result<Term> {
    let mut reader = BitStr::new(bits);
    let term = parse_term(&mut reader, 0).map_err(|e| match reader.invalid {
        Some((c, position)) => Error::Encoding {
            kind: EncodingErrorKind::InvalidBit(c),
            position,
        },
        None => e,
    })?;

    let consumed = reader.bits_read();
    match (reader.read_bit(), reader.invalid) {
        (None, None) => Ok(term),
        (None, Some((c, position))) => Err(Error::Encoding {
            kind: EncodingErrorKind::InvalidBit(c),
            position,
        }),
        (Some(_), _) => Err(Error::Encoding {
            kind: EncodingErrorKind::TrailingBits,
            position: consumed,
        }),
    }
}

/// Parse a BLC term from packed bytes; padding after the term is ignored
pub fn parse_blc(data: &[u8]) -> Result<Term> {
    let mut reader = BitReader::new(data);
    parse_term(&mut reader, 0)
}

/// Parse packed BLC given as hex, with or without a `0x` prefix
pub fn parse_blc_hex(text: &str) -> Result<Term> {
    let text = text.trim();
    let hex_str = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(hex_str)?;
    parse_blc(&bytes)
}

fn parse_term(reader: &mut impl BitSource, depth: usize) -> Result<Term> {
    if !next_bit(reader)? {
        let is_app = next_bit(reader)?;
        if depth == MAX_NESTING {
            return Err(Error::Encoding {
                kind: EncodingErrorKind::NestingTooDeep { limit: MAX_NESTING },
                position: reader.bits_read() - 2,
            });
        }
        if !is_app {
            // 00 = abstraction
            let body = parse_term(reader, depth + 1)?;
            Ok(Term::abs(body))
        } else {
            // 01 = application
            let func = parse_term(reader, depth + 1)?;
            let arg = parse_term(reader, depth + 1)?;
            Ok(Term::app(func, arg))
        }
    } else {
        // 1...0 = variable
        let mut index = 1;
        while next_bit(reader)? {
            index += 1;
        }
        Ok(Term::Var(index))
    }
}

fn next_bit(reader: &mut impl BitSource) -> Result<bool> {
    reader.read_bit().ok_or(Error::Encoding {
        kind: EncodingErrorKind::UnexpectedEnd,
        position: reader.bits_read(),
    })
}

/// Parse the textual De Bruijn notation produced by `Display`:
/// `λ.1`, `(λ.1 λ.1)`. A name after `λ` or a `\` lambda is accepted and
/// ignored, whitespace is skipped.
pub fn parse_bruijn_text(text: &str) -> Result<Term> {
    let mut reader = TextReader {
        chars: text.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let term = reader.term()?;
    reader.skip_whitespace();
    if reader.pos < reader.chars.len() {
        return Err(reader.error(SyntaxErrorKind::TrailingTokens));
    }
    Ok(term)
}

struct TextReader {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl TextReader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, kind: SyntaxErrorKind) -> Error {
        Error::Syntax {
            kind,
            position: self.pos,
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(self.error(SyntaxErrorKind::UnexpectedCharacter { found, expected })),
            None => Err(self.error(SyntaxErrorKind::UnexpectedEnd { expected })),
        }
    }

    /// Enter one level of nesting at the current character
    fn descend(&mut self) -> Result<()> {
        if self.depth == MAX_NESTING {
            return Err(self.error(SyntaxErrorKind::NestingTooDeep { limit: MAX_NESTING }));
        }
        self.depth += 1;
        self.pos += 1;
        Ok(())
    }

    fn term(&mut self) -> Result<Term> {
        self.skip_whitespace();
        match self.peek() {
            Some('λ') | Some('\\') => {
                self.descend()?;
                // skip variable name if present
                while self.peek().is_some_and(|c| c.is_alphanumeric() && !c.is_ascii_digit()) {
                    self.pos += 1;
                }
                self.expect('.', "'.'")?;
                let body = self.term()?;
                self.depth -= 1;
                Ok(Term::abs(body))
            }
            Some('(') => {
                self.descend()?;
                let func = self.term()?;
                let arg = self.term()?;
                self.expect(')', "')'")?;
                self.depth -= 1;
                Ok(Term::app(func, arg))
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                let mut index: usize = 0;
                while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
                    index = index
                        .checked_mul(10)
                        .and_then(|i| i.checked_add(digit as usize))
                        .ok_or(Error::Syntax {
                            kind: SyntaxErrorKind::IndexOverflow,
                            position: start,
                        })?;
                    self.pos += 1;
                }
                if index == 0 {
                    return Err(Error::Syntax {
                        kind: SyntaxErrorKind::ZeroIndex,
                        position: start,
                    });
                }
                Ok(Term::Var(index))
            }
            Some(found) => Err(self.error(SyntaxErrorKind::UnexpectedCharacter {
                found,
                expected: "a De Bruijn term",
            })),
            None => Err(self.error(SyntaxErrorKind::UnexpectedEnd {
                expected: "a De Bruijn term",
            })),
        }
    }
}
