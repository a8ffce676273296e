//! Lexical alphabet of the term language and the lexer
//!
//! One token per character:
//!   (  )  λ  .  and single lowercase letters

use std::fmt;

use crate::error::{Error, Result};

/// Token of the core term language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    Lambda,
    Dot,
    /// Single-letter identifier
    Letter(char),
}

impl Token {
    /// The character this token was lexed from
    pub fn as_char(self) -> char {
        match self {
            Token::LeftParen => '(',
            Token::RightParen => ')',
            Token::Lambda => 'λ',
            Token::Dot => '.',
            Token::Letter(c) => c,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Identifier characters: anything lowercase except the lambda sign itself.
pub fn is_identifier(c: char) -> bool {
    c != 'λ' && c.is_lowercase()
}

/// Convert source text into tokens
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    text.chars()
        .enumerate()
        .map(|(position, c)| match c {
            '(' => Ok(Token::LeftParen),
            ')' => Ok(Token::RightParen),
            'λ' => Ok(Token::Lambda),
            '.' => Ok(Token::Dot),
            c if is_identifier(c) => Ok(Token::Letter(c)),
            c => Err(Error::InvalidCharacter { character: c, position }),
        })
        .collect()
}

/// Reconstruct source text from tokens
pub fn untokenize(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.as_char()).collect()
}
