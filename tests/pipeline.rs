//! End-to-end checks: text in, reduced text / de Bruijn / BLC bits out.

use lambda_blc::{
    from_binary, interpret, parse_text, prelude, to_binary, to_bruijn, untokenize, unparse,
    Evaluator, Expression, FreeVariables, DEFAULT_MAX_STEPS,
};

fn normalize(expr: Expression) -> Expression {
    let reduction = interpret(expr, DEFAULT_MAX_STEPS).unwrap();
    assert!(reduction.normal_form, "no normal form within {} steps", DEFAULT_MAX_STEPS);
    reduction.term
}

#[test]
fn succ_of_two_is_three() {
    let e = Expression::apply(prelude::succ(), prelude::church(2));
    assert_eq!(normalize(e), prelude::church(3));
}

#[test]
fn add_two_three_is_five() {
    let e = Expression::apply_all(prelude::add(), [prelude::church(2), prelude::church(3)]);
    assert_eq!(normalize(e), prelude::church(5));
}

#[test]
fn mult_two_three_is_six() {
    let e = Expression::apply_all(prelude::mult(), [prelude::church(2), prelude::church(3)]);
    assert_eq!(normalize(e), prelude::church(6));
}

#[test]
fn pred_of_two_is_one() {
    let e = Expression::apply(prelude::pred(), prelude::church(2));
    let reduction = interpret(e, DEFAULT_MAX_STEPS).unwrap();
    assert!(reduction.normal_form);
    assert_eq!(reduction.term, prelude::church(1));
    assert_eq!(reduction.steps, 9);
}

#[test]
fn pair_projections() {
    let pair = Expression::apply_all(prelude::pair(), [Expression::var('x'), Expression::var('y')]);
    let first = Expression::apply(prelude::first(), pair.clone());
    let second = Expression::apply(prelude::second(), pair);
    assert_eq!(normalize(first), Expression::var('x'));
    assert_eq!(normalize(second), Expression::var('y'));
}

#[test]
fn capture_is_avoided_during_reduction() {
    // K applied to a free y must not turn into λy.y
    let reduced = Evaluator::new().evaluate("(λx.λy.xy)").unwrap();
    assert_eq!(reduced, "λz.y");
}

#[test]
fn reduced_result_encodes_to_blc() {
    let evaluator = Evaluator::new();
    let three = evaluator
        .evaluate(&Expression::apply(prelude::succ(), prelude::church(2)).to_string())
        .unwrap();
    assert_eq!(three, "λf.λa.(f(f(fa)))");
    assert_eq!(evaluator.bruijn(&three).unwrap(), "λ.λ.(2 (2 (2 1)))");
    assert_eq!(evaluator.bruijn_binary(&three).unwrap(), "000001110011100111010");
}

#[test]
fn text_roundtrips() {
    for text in ["x", "λx.x", "(λx.xλy.y)", "λx.λy.λz.((xz)(yz))", "((fa)(λb.bc))"] {
        let expr = parse_text(text).unwrap();
        assert_eq!(untokenize(&unparse(&expr)), text);
        assert_eq!(expr.to_string(), text);
    }
}

#[test]
fn blc_bits_decode_to_the_same_index_term() {
    let s = to_bruijn(&prelude::s(), FreeVariables::Reject).unwrap();
    let bits = to_binary(&s).unwrap();
    assert_eq!(from_binary(&bits).unwrap(), s);
}

#[test]
fn omega_is_capped_not_an_error() {
    let reduction = Evaluator::new().reduce("(λx.(xx)λx.(xx))").unwrap();
    assert!(!reduction.normal_form);
    assert_eq!(reduction.steps, DEFAULT_MAX_STEPS);
    assert_eq!(reduction.term, prelude::omega());
}
