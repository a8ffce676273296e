//! Normal-order beta reduction with capture-avoiding substitution
//!
//! A single `reduce` step contracts the leftmost-outermost redex it finds;
//! `interpret` repeats that until no redex is left or the step bound is
//! reached. Non-normalizing terms (omega) therefore still return a value,
//! it just isn't a normal form.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::expr::{Expression, Variable};
use crate::token::is_identifier;

/// Step bound used by the reference behaviour
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Outcome of running the reduction driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reduction {
    pub term: Expression,
    /// Number of `reduce` steps applied
    pub steps: usize,
    /// False when the step bound stopped reduction early
    pub normal_form: bool,
}

/// Reduce `expr` until it has no redex, or `max_steps` steps were taken.
///
/// Reduction recurses on the nesting depth of the term. Inputs from
/// [`parse_text`](crate::parser::parse_text) are capped at
/// [`MAX_NESTING`](crate::parser::MAX_NESTING), but a reduct can nest deeper
/// than its source, so a large step bound on a term that keeps growing can
/// still exhaust the stack.
pub fn interpret(expr: Expression, max_steps: usize) -> Result<Reduction> {
    let mut term = expr;
    let mut steps = 0;

    while has_beta_redex(&term) {
        if steps == max_steps {
            warn!(max_steps, "step bound reached before normal form");
            return Ok(Reduction { term, steps, normal_form: false });
        }
        term = reduce(&term)?;
        steps += 1;
        trace!(step = steps, term = %term, "reduced");
    }

    debug!(steps, "normal form reached");
    Ok(Reduction { term, steps, normal_form: true })
}

/// True iff some application has an abstraction directly on its left.
pub fn has_beta_redex(expr: &Expression) -> bool {
    match expr {
        Expression::Variable { .. } => false,
        Expression::Function { body, .. } => has_beta_redex(body),
        Expression::Application { function, argument } => match function.as_ref() {
            Expression::Function { .. } => true,
            _ => has_beta_redex(function) || has_beta_redex(argument),
        },
    }
}

/// One normal-order reduction step.
pub fn reduce(expr: &Expression) -> Result<Expression> {
    Ok(match expr {
        Expression::Variable { .. } => expr.clone(),
        Expression::Function { parameter, body } => Expression::function(*parameter, reduce(body)?),
        Expression::Application { function, argument } => match function.as_ref() {
            Expression::Function { parameter, body } => substitute(argument, *parameter, body)?,
            _ => Expression::apply(reduce(function)?, reduce(argument)?),
        },
    })
}

/// Replace the free occurrences of `target` in `body` with `value`.
///
/// A binder that would capture a free variable of `value` is renamed first.
pub fn substitute(value: &Expression, target: Variable, body: &Expression) -> Result<Expression> {
    Ok(match body {
        Expression::Variable { name } => {
            if *name == target {
                value.clone()
            } else {
                body.clone()
            }
        }
        Expression::Function { parameter, body: inner } => {
            if *parameter == target {
                body.clone()
            } else if !occurs_free(*parameter, value) {
                Expression::function(*parameter, substitute(value, target, inner)?)
            } else {
                let renamed = alpha_convert_avoiding(*parameter, inner, |v| {
                    v == target || occurs_free(v, value)
                })?;
                trace!(%parameter, converted = %renamed, "alpha conversion");
                substitute(value, target, &renamed)?
            }
        }
        Expression::Application { function, argument } => Expression::apply(
            substitute(value, target, function)?,
            substitute(value, target, argument)?,
        ),
    })
}

/// True if `variable` occurs free in `expr`.
pub fn occurs_free(variable: Variable, expr: &Expression) -> bool {
    match expr {
        Expression::Variable { name } => *name == variable,
        Expression::Function { parameter, body } => *parameter != variable && occurs_free(variable, body),
        Expression::Application { function, argument } => {
            occurs_free(variable, function) || occurs_free(variable, argument)
        }
    }
}

/// True if `variable` appears anywhere in `expr`, binders included.
pub fn occurs(variable: Variable, expr: &Expression) -> bool {
    match expr {
        Expression::Variable { name } => *name == variable,
        Expression::Function { parameter, body } => *parameter == variable || occurs(variable, body),
        Expression::Application { function, argument } => occurs(variable, function) || occurs(variable, argument),
    }
}

/// Free variables in order of first appearance, left to right.
pub fn free_variables(expr: &Expression) -> Vec<Variable> {
    let mut bound = Vec::new();
    let mut free = Vec::new();
    collect_free(expr, &mut bound, &mut free);
    free
}

fn collect_free(expr: &Expression, bound: &mut Vec<Variable>, free: &mut Vec<Variable>) {
    match expr {
        Expression::Variable { name } => {
            if !bound.contains(name) && !free.contains(name) {
                free.push(*name);
            }
        }
        Expression::Function { parameter, body } => {
            bound.push(*parameter);
            collect_free(body, bound, free);
            bound.pop();
        }
        Expression::Application { function, argument } => {
            collect_free(function, bound, free);
            collect_free(argument, bound, free);
        }
    }
}

/// Rename the binder of `λparameter.body` to a name that doesn't occur in
/// `body`, returning the converted abstraction.
pub fn alpha_convert(parameter: Variable, body: &Expression) -> Result<Expression> {
    alpha_convert_avoiding(parameter, body, |_| false)
}

fn alpha_convert_avoiding(
    parameter: Variable,
    body: &Expression,
    avoid: impl Fn(Variable) -> bool,
) -> Result<Expression> {
    let fresh = fresh_variable(parameter, |v| occurs(v, body) || avoid(v))?;
    Ok(Expression::function(fresh, rename(parameter, fresh, body)))
}

/// Rewrite free occurrences of `from` to `to`. A binder of either name
/// stops the rewrite for its whole subtree.
fn rename(from: Variable, to: Variable, expr: &Expression) -> Expression {
    match expr {
        Expression::Variable { name } => {
            if *name == from {
                to.into()
            } else {
                expr.clone()
            }
        }
        Expression::Function { parameter, body } => {
            if *parameter == from || *parameter == to {
                expr.clone()
            } else {
                Expression::function(*parameter, rename(from, to, body))
            }
        }
        Expression::Application { function, argument } => {
            Expression::apply(rename(from, to, function), rename(from, to, argument))
        }
    }
}

/// Names tried for a fresh variable after `start`: the ASCII letters that
/// follow it alphabetically (wrapping round), then every other lowercase
/// letter from `α` upwards.
pub fn fresh_candidates(start: Variable) -> impl Iterator<Item = Variable> {
    let offset = if start.name().is_ascii_lowercase() {
        (start.name() as u8 - b'a') as usize + 1
    } else {
        0
    };
    let ascii = (0..26).map(move |i| (b'a' + ((offset + i) % 26) as u8) as char);
    let extended = ('α'..=char::MAX).filter(|&c| is_identifier(c) && !c.is_ascii());

    ascii.chain(extended).map(Variable).filter(move |&v| v != start)
}

/// First candidate after `start` not claimed by `taken`. Fails only when
/// every lowercase letter Unicode knows about is taken.
pub fn fresh_variable(start: Variable, taken: impl Fn(Variable) -> bool) -> Result<Variable> {
    fresh_candidates(start)
        .find(|&v| !taken(v))
        .ok_or(Error::FreshNamesExhausted { variable: start.name() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;
    use crate::parser::tests::arb_expression;
    use crate::prelude;
    use proptest::prelude::*;

    fn term(text: &str) -> Expression {
        parse_text(text).unwrap()
    }

    fn var(c: char) -> Expression {
        Expression::var(c)
    }

    #[test]
    fn test_identity_applied_in_one_step() {
        let reduction = interpret(term("(λx.xλy.y)"), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(reduction.term, term("λy.y"));
        assert_eq!(reduction.steps, 1);
        assert!(reduction.normal_form);
    }

    #[test]
    fn test_substitution_renames_capturing_binder() {
        // y for x in λy.x must not become λy.y
        let result = substitute(&var('y'), Variable('x'), &term("λy.x")).unwrap();
        assert_ne!(result, term("λy.y"));
        assert_eq!(result, term("λz.y"));
    }

    #[test]
    fn test_fresh_name_skips_body_and_value() {
        let result = substitute(&term("(yz)"), Variable('x'), &term("λy.(xz)")).unwrap();
        assert_eq!(result, term("λa.((yz)z)"));
    }

    #[test]
    fn test_fresh_name_never_equals_target() {
        // after y the next free letters would be z, then a..; x is the target
        let value = term("((((yz)a)b)c)");
        let body = term("λy.((((((xd)e)f)g)h)((((((ij)k)l)m)n)((((((op)q)r)s)t)((uv)w))))");
        match substitute(&value, Variable('x'), &body).unwrap() {
            Expression::Function { parameter, .. } => assert_ne!(parameter, Variable('x')),
            other => panic!("expected abstraction, got {}", other),
        }
    }

    #[test]
    fn test_fresh_name_leaves_ascii_when_exhausted() {
        let fresh = fresh_variable(Variable('a'), |v| v.name().is_ascii_lowercase()).unwrap();
        assert_eq!(fresh, Variable('α'));
        let fresh = fresh_variable(Variable('κ'), |v| v.name().is_ascii_lowercase() || v.name() < 'λ').unwrap();
        assert_eq!(fresh, Variable('μ'));
    }

    #[test]
    fn test_fresh_name_exhaustion_is_an_error() {
        let err = fresh_variable(Variable('x'), |_| true).unwrap_err();
        assert_eq!(err, Error::FreshNamesExhausted { variable: 'x' });
        assert_eq!(err.code(), "NamingError");
    }

    #[test]
    fn test_beta_with_capture() {
        let reduction = interpret(term("(λx.λy.(xy)y)"), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(reduction.term, term("λz.(yz)"));
        assert_eq!(reduction.steps, 1);
    }

    #[test]
    fn test_shadowing_binder_blocks_substitution() {
        let body = term("λx.x");
        assert_eq!(substitute(&var('q'), Variable('x'), &body).unwrap(), body);
        let reduction = interpret(term("(λx.λx.xq)"), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(reduction.term, term("λx.x"));
    }

    #[test]
    fn test_alpha_convert_stops_at_shadowing() {
        let converted = alpha_convert(Variable('x'), &term("(xλx.x)")).unwrap();
        assert_eq!(converted, term("λy.(yλx.x)"));
    }

    #[test]
    fn test_occurs_free() {
        let e = term("(xλy.(yz))");
        assert!(occurs_free(Variable('x'), &e));
        assert!(occurs_free(Variable('z'), &e));
        assert!(!occurs_free(Variable('y'), &e));
        assert!(occurs(Variable('y'), &e));
        assert_eq!(free_variables(&e), vec![Variable('x'), Variable('z')]);
    }

    #[test]
    fn test_has_beta_redex() {
        assert!(!has_beta_redex(&term("λx.(xx)")));
        assert!(!has_beta_redex(&term("((fa)b)")));
        assert!(has_beta_redex(&term("λz.(z(λx.xy))")));
    }

    #[test]
    fn test_omega_stops_at_bound() {
        let omega = prelude::omega();
        let reduction = interpret(omega.clone(), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(reduction.steps, DEFAULT_MAX_STEPS);
        assert!(!reduction.normal_form);
        assert_eq!(reduction.term, omega);

        let reduction = interpret(omega, 3).unwrap();
        assert_eq!(reduction.steps, 3);
        assert!(!reduction.normal_form);
    }

    #[test]
    fn test_normal_form_is_fixed_point() {
        let s = prelude::s();
        let reduction = interpret(s.clone(), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(reduction.term, s);
        assert_eq!(reduction.steps, 0);
        assert!(reduction.normal_form);

        let again = interpret(reduction.term.clone(), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(again, reduction);
    }

    #[test]
    fn test_zero_bound_on_normal_form() {
        let reduction = interpret(term("λx.x"), 0).unwrap();
        assert!(reduction.normal_form);
        let reduction = interpret(term("(λx.xy)"), 0).unwrap();
        assert!(!reduction.normal_form);
        assert_eq!(reduction.term, term("(λx.xy)"));
    }

    #[test]
    fn test_church_successor() {
        let e = Expression::apply(prelude::succ(), prelude::church(2));
        let reduction = interpret(e, DEFAULT_MAX_STEPS).unwrap();
        assert!(reduction.normal_form);
        assert_eq!(reduction.term, prelude::church(3));
        assert_eq!(reduction.steps, 3);
    }

    #[test]
    fn test_church_addition() {
        let e = Expression::apply_all(prelude::add(), [prelude::church(2), prelude::church(3)]);
        let reduction = interpret(e, DEFAULT_MAX_STEPS).unwrap();
        assert!(reduction.normal_form);
        assert_eq!(reduction.term, prelude::church(5));
    }

    #[test]
    fn test_booleans() {
        let not_true = Expression::apply(prelude::not(), prelude::church_true());
        assert_eq!(interpret(not_true, DEFAULT_MAX_STEPS).unwrap().term, prelude::church_false());

        let and = Expression::apply_all(prelude::and(), [prelude::church_true(), prelude::church_false()]);
        assert_eq!(interpret(and, DEFAULT_MAX_STEPS).unwrap().term, prelude::church_false());
    }

    proptest! {
        #[test]
        fn prop_substitution_keeps_free_variables(
            e in arb_expression(),
            value in arb_expression(),
        ) {
            let target = Variable('x');
            let result = substitute(&value, target, &e).unwrap();
            let mut expected: Vec<Variable> = free_variables(&e)
                .into_iter()
                .filter(|&v| v != target)
                .collect();
            if occurs_free(target, &e) {
                expected.extend(free_variables(&value));
            }
            expected.sort();
            expected.dedup();
            let mut actual = free_variables(&result);
            actual.sort();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_driver_respects_bound(e in arb_expression()) {
            let reduction = interpret(e, 10).unwrap();
            prop_assert!(reduction.steps <= 10);
            prop_assert_eq!(reduction.normal_form, !has_beta_redex(&reduction.term));
        }
    }
}
