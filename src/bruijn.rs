//! Conversion between named terms and de Bruijn indexed terms
//!
//! Scoping is resolved with an explicit context of enclosing binders that
//! is handed down the recursion, innermost binder first.

use tracing::debug;

use crate::blc::Term;
use crate::error::{Error, Result};
use crate::expr::{Expression, Variable};
use crate::interpreter::{free_variables, fresh_candidates};

/// What to do with a variable no enclosing binder captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FreeVariables {
    /// Fail with `UnboundReference`; only closed terms convert
    #[default]
    Reject,
    /// Number free variables 1, 2, ... by first appearance and treat them
    /// as implicit binders around the whole term, the first one innermost.
    /// At binder depth `d` the free variable numbered `k` gets index `d + k`.
    Registry,
}

/// Convert a named term into its de Bruijn form.
pub fn to_bruijn(expr: &Expression, policy: FreeVariables) -> Result<Term> {
    let registry = match policy {
        FreeVariables::Reject => Vec::new(),
        FreeVariables::Registry => free_variables(expr),
    };
    if !registry.is_empty() {
        debug!(free = registry.len(), "numbering free variables after the binders");
    }
    convert(expr, &mut Vec::new(), &registry)
}

/// `context` holds the enclosing binders; the innermost is last.
fn convert(expr: &Expression, context: &mut Vec<Variable>, registry: &[Variable]) -> Result<Term> {
    match expr {
        Expression::Variable { name } => {
            if let Some(distance) = context.iter().rev().position(|binder| binder == name) {
                return Ok(Term::Var(distance + 1));
            }
            registry
                .iter()
                .position(|free| free == name)
                .map(|k| Term::Var(context.len() + k + 1))
                .ok_or(Error::UnboundReference { name: name.name() })
        }
        Expression::Function { parameter, body } => {
            context.push(*parameter);
            let body = convert(body, context, registry);
            context.pop();
            Ok(Term::abs(body?))
        }
        Expression::Application { function, argument } => Ok(Term::app(
            convert(function, context, registry)?,
            convert(argument, context, registry)?,
        )),
    }
}

/// Give names back to a closed de Bruijn term. The binder at depth `d`
/// (0 = outermost) is named with the `d`-th name of the sequence
/// a, b, c, ..., z, α, β, ... so sibling scopes reuse the same letters.
pub fn from_bruijn(term: &Term) -> Result<Expression> {
    let mut names = BinderNames {
        seen: Vec::new(),
        source: std::iter::once(Variable('a')).chain(fresh_candidates(Variable('a'))),
    };
    name_term(term, &mut Vec::new(), &mut names)
}

/// Lazily extended table of binder names by depth
struct BinderNames<I> {
    seen: Vec<Variable>,
    source: I,
}

impl<I: Iterator<Item = Variable>> BinderNames<I> {
    fn at(&mut self, depth: usize) -> Result<Variable> {
        while self.seen.len() <= depth {
            let next = self.source.next().ok_or(Error::NamesExhausted { depth })?;
            self.seen.push(next);
        }
        Ok(self.seen[depth])
    }
}

fn name_term<I: Iterator<Item = Variable>>(
    term: &Term,
    context: &mut Vec<Variable>,
    names: &mut BinderNames<I>,
) -> Result<Expression> {
    match term {
        Term::Var(index) => match index.checked_sub(1).and_then(|i| context.iter().rev().nth(i)) {
            Some(binder) => Ok((*binder).into()),
            None => Err(Error::UnboundIndex {
                index: *index,
                depth: context.len(),
            }),
        },
        Term::Abs(body) => {
            let parameter = names.at(context.len())?;
            context.push(parameter);
            let body = name_term(body, context, names);
            context.pop();
            Ok(Expression::function(parameter, body?))
        }
        Term::App(func, arg) => Ok(Expression::apply(
            name_term(func, context, names)?,
            name_term(arg, context, names)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blc::{from_binary, to_binary};
    use crate::interpreter::{occurs_free, substitute};
    use crate::parser::parse_text;
    use crate::parser::tests::arb_expression;
    use crate::prelude;
    use proptest::prelude::*;

    fn bruijn(text: &str) -> Term {
        to_bruijn(&parse_text(text).unwrap(), FreeVariables::Reject).unwrap()
    }

    #[test]
    fn test_identity() {
        let term = bruijn("λx.x");
        assert_eq!(term, Term::abs(Term::Var(1)));
        assert_eq!(term.to_string(), "λ.1");
        assert_eq!(to_binary(&term).unwrap(), "0010");
        assert_eq!(from_binary("0010").unwrap(), term);
    }

    #[test]
    fn test_innermost_binder_wins() {
        assert_eq!(bruijn("λx.λx.x").to_string(), "λ.λ.1");
        assert_eq!(bruijn("λx.λy.x").to_string(), "λ.λ.2");
    }

    #[test]
    fn test_s_combinator() {
        let term = to_bruijn(&prelude::s(), FreeVariables::Reject).unwrap();
        assert_eq!(term.to_string(), "λ.λ.λ.((3 1) (2 1))");
        assert_eq!(to_binary(&term).unwrap(), "00000001011110100111010");
    }

    #[test]
    fn test_reject_free_variable() {
        let err = to_bruijn(&parse_text("λx.(xy)").unwrap(), FreeVariables::Reject).unwrap_err();
        assert_eq!(err, Error::UnboundReference { name: 'y' });
        assert_eq!(err.code(), "UnboundReferenceError");
    }

    #[test]
    fn test_registry_numbers_free_variables() {
        let e = parse_text("(λx.(xy)(zy))").unwrap();
        let term = to_bruijn(&e, FreeVariables::Registry).unwrap();
        // y is registry 1, z is registry 2
        assert_eq!(term.to_string(), "(λ.(1 2) (2 1))");
    }

    #[test]
    fn test_registry_on_closed_term_is_plain() {
        let k = prelude::church_true();
        assert_eq!(
            to_bruijn(&k, FreeVariables::Registry).unwrap(),
            to_bruijn(&k, FreeVariables::Reject).unwrap()
        );
    }

    #[test]
    fn test_from_bruijn_names_by_depth() {
        let term = from_binary("000000000101111101100101111011010").unwrap();
        let named = from_bruijn(&term).unwrap();
        assert_eq!(named.to_string(), "λa.λb.λc.λd.((ac)((bc)d))");
        assert_eq!(to_bruijn(&named, FreeVariables::Reject).unwrap(), term);
    }

    #[test]
    fn test_from_bruijn_sibling_scopes_reuse_names() {
        let term = Term::app(Term::abs(Term::Var(1)), Term::abs(Term::Var(1)));
        assert_eq!(from_bruijn(&term).unwrap().to_string(), "(λa.aλa.a)");
    }

    #[test]
    fn test_from_bruijn_unbound_index() {
        let term = Term::abs(Term::Var(2));
        assert_eq!(from_bruijn(&term), Err(Error::UnboundIndex { index: 2, depth: 1 }));
        assert!(from_bruijn(&Term::Var(0)).is_err());
    }

    proptest! {
        #[test]
        fn prop_alpha_equivalent_after_noop_substitution(e in arb_expression(), value in arb_expression()) {
            // substituting for a variable that isn't free only renames binders
            let target = Variable('q');
            prop_assume!(!occurs_free(target, &e));
            let result = substitute(&value, target, &e).unwrap();
            prop_assert_eq!(
                to_bruijn(&result, FreeVariables::Registry).unwrap(),
                to_bruijn(&e, FreeVariables::Registry).unwrap()
            );
        }

        #[test]
        fn prop_named_roundtrip(e in arb_expression()) {
            let term = to_bruijn(&e, FreeVariables::Registry).unwrap();
            prop_assume!(free_variables(&e).is_empty());
            prop_assert_eq!(to_bruijn(&from_bruijn(&term).unwrap(), FreeVariables::Reject).unwrap(), term);
        }
    }
}
