//! Common lambda terms: booleans, pairs and Church numerals

use crate::error::{Error, Result};
use crate::expr::Expression;

/// Names accepted by [`lookup`]
pub const NAMES: &[&str] = &[
    "identity", "true", "false", "and", "or", "not", "pair", "first", "second", "succ", "add",
    "mult", "pow", "pred", "sub", "s", "k", "omega",
];

fn v(name: char) -> Expression {
    Expression::var(name)
}

fn ap(function: Expression, argument: Expression) -> Expression {
    Expression::apply(function, argument)
}

/// Look up a combinator by name; a decimal name gives that Church numeral
pub fn lookup(name: &str) -> Option<Expression> {
    let term = match name {
        "identity" | "id" | "i" => identity(),
        "true" | "k" => church_true(),
        "false" => church_false(),
        "and" => and(),
        "or" => or(),
        "not" => not(),
        "pair" => pair(),
        "first" => first(),
        "second" => second(),
        "succ" | "suc" => succ(),
        "add" => add(),
        "mult" => mult(),
        "pow" => pow(),
        "pred" => pred(),
        "sub" => sub(),
        "s" => s(),
        "omega" => omega(),
        n => church(n.parse().ok()?),
    };
    Some(term)
}

/// Like [`lookup`], but an unknown name is an [`Error::UnknownTerm`]
pub fn resolve(name: &str) -> Result<Expression> {
    lookup(name).ok_or_else(|| Error::UnknownTerm { name: name.to_string() })
}

/// Identity: λx.x
pub fn identity() -> Expression {
    Expression::lambda("x", v('x'))
}

/// Church TRUE (K combinator): λx.λy.x
pub fn church_true() -> Expression {
    Expression::lambda("xy", v('x'))
}

/// Church FALSE: λx.λy.y
pub fn church_false() -> Expression {
    Expression::lambda("xy", v('y'))
}

/// λa.λb.((ab)a)
pub fn and() -> Expression {
    Expression::lambda("ab", ap(ap(v('a'), v('b')), v('a')))
}

/// λa.λb.((aa)b)
pub fn or() -> Expression {
    Expression::lambda("ab", ap(ap(v('a'), v('a')), v('b')))
}

/// λa.((a false) true)
pub fn not() -> Expression {
    Expression::lambda("a", ap(ap(v('a'), church_false()), church_true()))
}

/// λa.λb.λf.((fa)b)
pub fn pair() -> Expression {
    Expression::lambda("abf", ap(ap(v('f'), v('a')), v('b')))
}

/// λp.(p true)
pub fn first() -> Expression {
    Expression::lambda("p", ap(v('p'), church_true()))
}

/// λp.(p false)
pub fn second() -> Expression {
    Expression::lambda("p", ap(v('p'), church_false()))
}

/// Church numeral n: λf.λa.(f (f ... (f a)))
pub fn church(n: usize) -> Expression {
    let body = (0..n).fold(v('a'), |acc, _| ap(v('f'), acc));
    Expression::lambda("fa", body)
}

/// Successor: λn.λf.λa.(f((nf)a))
pub fn succ() -> Expression {
    Expression::lambda("nfa", ap(v('f'), ap(ap(v('n'), v('f')), v('a'))))
}

/// Addition: λm.λn.λf.λa.((mf)((nf)a))
pub fn add() -> Expression {
    Expression::lambda(
        "mnfa",
        ap(ap(v('m'), v('f')), ap(ap(v('n'), v('f')), v('a'))),
    )
}

/// Multiplication: λm.λn.λf.(m(nf))
pub fn mult() -> Expression {
    Expression::lambda("mnf", ap(v('m'), ap(v('n'), v('f'))))
}

/// Exponentiation m^n: λm.λn.(nm)
pub fn pow() -> Expression {
    Expression::lambda("mn", ap(v('n'), v('m')))
}

/// Predecessor: λn.λf.λa.(((nλg.λh.(h(gf)))λu.a)λu.u)
pub fn pred() -> Expression {
    let step = Expression::lambda("gh", ap(v('h'), ap(v('g'), v('f'))));
    let body = ap(
        ap(ap(v('n'), step), Expression::lambda("u", v('a'))),
        Expression::lambda("u", v('u')),
    );
    Expression::lambda("nfa", body)
}

/// Subtraction m - n: λm.λn.((n pred) m)
pub fn sub() -> Expression {
    Expression::lambda("mn", ap(ap(v('n'), pred()), v('m')))
}

/// S combinator: λx.λy.λz.((xz)(yz))
pub fn s() -> Expression {
    Expression::lambda("xyz", ap(ap(v('x'), v('z')), ap(v('y'), v('z'))))
}

/// Self application of λx.(xx); has no normal form
pub fn omega() -> Expression {
    let half = Expression::lambda("x", ap(v('x'), v('x')));
    ap(half.clone(), half)
}
