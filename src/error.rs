//! Error types shared by every stage of the pipeline

use thiserror::Error;

use crate::token::Token;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("syntax error at position {position}: {kind}")]
    Syntax { kind: SyntaxErrorKind, position: usize },
    #[error("unbound variable '{name}' (term is not closed)")]
    UnboundReference { name: char },
    #[error("index {index} escapes its {depth} enclosing binder(s)")]
    UnboundIndex { index: usize, depth: usize },
    #[error("no single-letter name left for a binder at depth {depth}")]
    NamesExhausted { depth: usize },
    #[error("no unused lowercase letter left to rename '{variable}'")]
    FreshNamesExhausted { variable: char },
    #[error("unknown term '{name}'")]
    UnknownTerm { name: String },
    #[error("malformed bit string at bit {position}: {kind}")]
    Encoding { kind: EncodingErrorKind, position: usize },
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl Error {
    /// Stable short name of the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidCharacter { .. } => "LexError",
            Error::Syntax { .. } => "SyntaxError",
            Error::UnboundReference { .. } | Error::UnboundIndex { .. } => "UnboundReferenceError",
            Error::NamesExhausted { .. } | Error::FreshNamesExhausted { .. } => "NamingError",
            Error::UnknownTerm { .. } => "UnknownTermError",
            Error::Encoding { .. } => "EncodingError",
            Error::Hex(_) => "HexError",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken { found: Token, expected: &'static str },
    #[error("expected {expected}, found '{found}'")]
    UnexpectedCharacter { found: char, expected: &'static str },
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },
    #[error("unconsumed trailing input")]
    TrailingTokens,
    #[error("De Bruijn index must be at least 1")]
    ZeroIndex,
    #[error("De Bruijn index does not fit in a machine word")]
    IndexOverflow,
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingErrorKind {
    #[error("unexpected character '{0}' (expected 0 or 1)")]
    InvalidBit(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("trailing bits after a complete term")]
    TrailingBits,
    #[error("De Bruijn index 0 has no encoding")]
    ZeroIndex,
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}
