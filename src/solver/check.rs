use std::collections::HashMap;

use log::trace;
use num_complex::Complex64;

use crate::eval::evaluate;
use crate::expr::Expr;
use crate::simplify::{as_numer_denom, simplify, substitute};

/// Whether `candidate` satisfies `expr = 0` for `symbol`.
///
/// A candidate that makes a denominator vanish is rejected outright. Otherwise
/// the substituted expression must simplify to zero or evaluate within
/// `tolerance` of zero. Remaining symbols are bound to fixed positive sample
/// values; expressions that cannot be evaluated (applied functions,
/// derivatives) are accepted.
pub fn check_solution(expr: &Expr, symbol: &str, candidate: &Expr, tolerance: f64) -> bool {
    let (_, denom) = as_numer_denom(expr);
    if denom.has_symbol(symbol) {
        let at = simplify(substitute(&denom, symbol, candidate));
        if at.is_zero() {
            trace!("rejecting {candidate}: denominator vanishes");
            return false;
        }
    }

    let substituted = simplify(substitute(expr, symbol, candidate));
    if substituted.is_zero() {
        return true;
    }
    if contains_unevaluable(&substituted) {
        return true;
    }

    let bindings = sample_bindings(&substituted);
    let Some(value) = evaluate(&substituted, &bindings) else {
        trace!("rejecting {candidate}: residual {substituted} cannot be evaluated");
        return false;
    };
    let scale = evaluate(candidate, &bindings).map_or(1.0, |c| 1.0 + c.norm());
    let ok = value.norm() <= tolerance * scale;
    if !ok {
        trace!("rejecting {candidate}: residual {value}");
    }
    ok
}

fn contains_unevaluable(expr: &Expr) -> bool {
    matches!(expr, Expr::Func(_, _) | Expr::Derivative(_, _))
        || expr.children().into_iter().any(contains_unevaluable)
}

fn sample_bindings(expr: &Expr) -> HashMap<String, Complex64> {
    expr.free_symbols()
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, Complex64::new(1.37 + 0.61 * i as f64, 0.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn e(input: &str) -> Expr {
        parse_expr(input).expect("parse")
    }

    #[test]
    fn exact_roots_pass() {
        assert!(check_solution(&e("x^2 - 2"), "x", &e("sqrt(2)"), 1e-9));
        assert!(!check_solution(&e("x^2 - 2"), "x", &e("1"), 1e-9));
    }

    #[test]
    fn poles_are_rejected() {
        assert!(!check_solution(&e("(x^2 - 1)/(x - 1)"), "x", &e("1"), 1e-9));
        assert!(check_solution(&e("(x^2 - 1)/(x - 1)"), "x", &e("-1"), 1e-9));
    }

    #[test]
    fn principal_branches_are_respected() {
        assert!(!check_solution(&e("sqrt(x) + 1"), "x", &e("1"), 1e-9));
    }
}
