//! Recursive descent parser and unparser for the core term language
//!
//! Grammar:
//!   term  = var | abs | app
//!   var   = letter
//!   abs   = 'λ' var '.' term
//!   app   = '(' term term ')'
//!
//! Abstractions nest to the right (`λx.λy.b`), applications take exactly
//! two terms and always carry their parentheses. Each token decides the
//! next production, so no backtracking is needed.

use crate::error::{Error, Result, SyntaxErrorKind};
use crate::expr::{Expression, Variable};
use crate::token::{tokenize, Token};

/// Deepest nesting of abstractions and applications the parsers accept;
/// every later stage recurses on depth.
pub const MAX_NESTING: usize = 1000;

/// Token cursor; `pos` is the index of the next unread token
struct TokenReader<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> TokenReader<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Enter one level of nesting at the token just consumed
    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(Error::Syntax {
                kind: SyntaxErrorKind::NestingTooDeep { limit: MAX_NESTING },
                position: self.pos - 1,
            });
        }
        Ok(())
    }

    fn next(&mut self, expected: &'static str) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(Error::Syntax {
                kind: SyntaxErrorKind::UnexpectedEnd { expected },
                position: self.pos,
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> Result<()> {
        match self.next(expected)? {
            token if token == wanted => Ok(()),
            found => Err(self.unexpected(found, expected)),
        }
    }

    /// Error for the token just consumed
    fn unexpected(&self, found: Token, expected: &'static str) -> Error {
        Error::Syntax {
            kind: SyntaxErrorKind::UnexpectedToken { found, expected },
            position: self.pos - 1,
        }
    }

    /// Tokens not consumed yet
    fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }
}

/// Parse a complete token sequence into a term
pub fn parse(tokens: &[Token]) -> Result<Expression> {
    let mut reader = TokenReader::new(tokens);
    let expr = parse_term(&mut reader)?;
    if !reader.rest().is_empty() {
        return Err(Error::Syntax {
            kind: SyntaxErrorKind::TrailingTokens,
            position: reader.pos,
        });
    }
    Ok(expr)
}

/// Lex and parse source text. Terms nested deeper than [`MAX_NESTING`]
/// are a syntax error.
pub fn parse_text(text: &str) -> Result<Expression> {
    parse(&tokenize(text)?)
}

fn parse_term(reader: &mut TokenReader) -> Result<Expression> {
    match reader.next("a term")? {
        Token::Letter(c) => Ok(Expression::var(c)),
        Token::Lambda => {
            reader.descend()?;
            let parameter = parse_variable(reader)?;
            reader.expect(Token::Dot, "'.'")?;
            let body = parse_term(reader)?;
            reader.depth -= 1;
            Ok(Expression::function(parameter, body))
        }
        Token::LeftParen => {
            reader.descend()?;
            let function = parse_term(reader)?;
            let argument = parse_term(reader)?;
            reader.expect(Token::RightParen, "')'")?;
            reader.depth -= 1;
            Ok(Expression::apply(function, argument))
        }
        found => Err(reader.unexpected(found, "a term")),
    }
}

fn parse_variable(reader: &mut TokenReader) -> Result<Variable> {
    match reader.next("a parameter letter")? {
        Token::Letter(c) => Ok(Variable(c)),
        found => Err(reader.unexpected(found, "a parameter letter")),
    }
}

/// Turn a term back into the token sequence it parses from
pub fn unparse(expr: &Expression) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(expr.size() * 2);
    unparse_into(expr, &mut tokens);
    tokens
}

fn unparse_into(expr: &Expression, tokens: &mut Vec<Token>) {
    match expr {
        Expression::Variable { name } => tokens.push(Token::Letter(name.name())),
        Expression::Function { parameter, body } => {
            tokens.push(Token::Lambda);
            tokens.push(Token::Letter(parameter.name()));
            tokens.push(Token::Dot);
            unparse_into(body, tokens);
        }
        Expression::Application { function, argument } => {
            tokens.push(Token::LeftParen);
            unparse_into(function, tokens);
            unparse_into(argument, tokens);
            tokens.push(Token::RightParen);
        }
    }
}
