//! Untyped lambda calculus: parsing, normal-order reduction, de Bruijn
//! conversion and BLC (Binary Lambda Calculus) encoding
//!
//! This crate provides:
//! - a lexer, parser and unparser for the fully parenthesized term syntax
//!   (`λx.λy.x`, `(fa)`)
//! - capture-avoiding substitution and a step-bounded reduction driver
//! - de Bruijn conversion and BLC bit strings / packed bytes

pub mod blc;
pub mod bruijn;
pub mod error;
pub mod evaluator;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod prelude;
pub mod token;

pub use blc::{encode_blc, from_binary, parse_blc, parse_blc_hex, parse_bruijn_text, to_binary, Term};
pub use bruijn::{from_bruijn, to_bruijn, FreeVariables};
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use expr::{Expression, Variable};
pub use interpreter::{interpret, reduce, substitute, Reduction, DEFAULT_MAX_STEPS};
pub use parser::{parse, parse_text, unparse};
pub use token::{tokenize, untokenize, Token};
