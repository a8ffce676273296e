//! Named lambda terms
//!
//! Terms are plain immutable values: every transformation builds a new
//! tree and nothing keeps a pointer back to its parent.

use std::fmt;

use serde::Serialize;

use crate::parser::unparse;
use crate::token::untokenize;

/// Single-letter variable; equality is name equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Variable(pub char);

impl Variable {
    pub fn name(self) -> char {
        self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Untyped lambda calculus term with named variables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Expression {
    Variable { name: Variable },
    /// Abstraction binding `parameter` within `body`
    Function { parameter: Variable, body: Box<Expression> },
    Application { function: Box<Expression>, argument: Box<Expression> },
}

impl Expression {
    pub fn var(name: char) -> Self {
        Expression::Variable { name: Variable(name) }
    }

    pub fn function(parameter: Variable, body: Expression) -> Self {
        Expression::Function { parameter, body: Box::new(body) }
    }

    /// Curried abstraction over several parameters, outermost first
    pub fn lambda(parameters: &str, body: Expression) -> Self {
        parameters
            .chars()
            .rev()
            .fold(body, |body, p| Expression::function(Variable(p), body))
    }

    pub fn apply(function: Expression, argument: Expression) -> Self {
        Expression::Application {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    /// Left-nested application `((f a) b) ...`
    pub fn apply_all(function: Expression, arguments: impl IntoIterator<Item = Expression>) -> Self {
        arguments.into_iter().fold(function, Expression::apply)
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            Expression::Variable { .. } => 1,
            Expression::Function { body, .. } => 1 + body.size(),
            Expression::Application { function, argument } => 1 + function.size() + argument.size(),
        }
    }
}

impl From<Variable> for Expression {
    fn from(name: Variable) -> Self {
        Expression::Variable { name }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", untokenize(&unparse(self)))
    }
}
