//! Rewriting equations as polynomials in a single generator such as
//! `exp(x)`, `sin(x)` or `x^(1/2)`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::expr::{Expr, Rational};
use crate::simplify::{
    flatten_mul, simplify, simplify_exp, simplify_mul, simplify_pow, split_coeff,
};

/// An equation `p(g) = 0` where `g` is `generator` and `p` is the polynomial
/// `substituted` in the fresh symbol `dummy`.
#[derive(Clone, Debug)]
pub struct GeneratorForm {
    pub generator: Expr,
    pub dummy: String,
    pub substituted: Expr,
}

/// Families of terms that are integer powers of one common generator.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Family {
    /// `base^q` for rational `q`.
    Power(Expr),
    /// `base^(q*unit)`; `base` is `None` for the natural exponential.
    Exponential(Option<Expr>, Expr),
}

pub(crate) fn find_generator(expr: &Expr, symbol: &str) -> Option<GeneratorForm> {
    let mut occurrences = Vec::new();
    collect(expr, symbol, &mut occurrences);
    let (family, _) = occurrences.first()?.clone();
    if occurrences.iter().any(|(f, _)| *f != family) {
        return None;
    }

    let unit = occurrences
        .iter()
        .map(|(_, q)| q.clone())
        .reduce(|a, b| rational_gcd(&a, &b))?;
    if unit.is_zero() {
        return None;
    }
    if family == Family::Power(Expr::var(symbol)) && unit.is_one() {
        return None;
    }

    let generator = match &family {
        Family::Power(base) => simplify_pow(base.clone(), Expr::rational(unit.clone())),
        Family::Exponential(None, arg) => {
            simplify_exp(simplify_mul(Expr::rational(unit.clone()), arg.clone()))
        }
        Family::Exponential(Some(base), arg) => simplify_pow(
            base.clone(),
            simplify_mul(Expr::rational(unit.clone()), arg.clone()),
        ),
    };

    let dummy = fresh_symbol(expr);
    let t = Expr::var(dummy.clone());
    let lowest = occurrences
        .iter()
        .map(|(_, q)| q / &unit)
        .min()
        .unwrap_or_else(Rational::zero);
    let mut substituted = simplify(rebuild(expr, symbol, &unit, &t));
    if lowest.is_negative() {
        substituted = simplify(Expr::Mul(
            substituted.boxed(),
            Expr::Pow(t.boxed(), Expr::rational(-lowest).boxed()).boxed(),
        ));
    }
    if substituted.has_symbol(symbol) || !substituted.has_symbol(&dummy) {
        return None;
    }
    Some(GeneratorForm {
        generator,
        dummy,
        substituted,
    })
}

fn collect(expr: &Expr, symbol: &str, out: &mut Vec<(Family, Rational)>) {
    if !expr.has_symbol(symbol) {
        return;
    }
    if let Some(found) = classify_atom(expr, symbol) {
        out.push(found);
        return;
    }
    for child in expr.children() {
        collect(child, symbol, out);
    }
}

/// The generator family of a node, or `None` when the node is an arithmetic
/// combination whose children must be inspected instead.
fn classify_atom(expr: &Expr, symbol: &str) -> Option<(Family, Rational)> {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) | Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_) => {
            None
        }
        Expr::Pow(base, exp) if base.has_symbol(symbol) => match exp.as_rational() {
            Some(q) => Some((Family::Power((**base).clone()), q)),
            None => Some((Family::Power(expr.clone()), Rational::one())),
        },
        Expr::Pow(base, exp) => {
            let (q, unit) = split_coeff(exp);
            Some((Family::Exponential(Some((**base).clone()), unit), q))
        }
        Expr::Exp(arg) => {
            let (q, unit) = split_coeff(arg);
            Some((Family::Exponential(None, unit), q))
        }
        other => Some((Family::Power(other.clone()), Rational::one())),
    }
}

fn rebuild(expr: &Expr, symbol: &str, unit: &Rational, t: &Expr) -> Expr {
    if !expr.has_symbol(symbol) {
        return expr.clone();
    }
    match classify_atom(expr, symbol) {
        Some((_, q)) => Expr::Pow(t.clone().boxed(), Expr::rational(q / unit).boxed()),
        None => expr.map_children(|child| rebuild(child, symbol, unit, t)),
    }
}

/// `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`, always non-negative.
fn rational_gcd(a: &Rational, b: &Rational) -> Rational {
    let numer: BigInt = a.numer().gcd(b.numer());
    let denom: BigInt = a.denom().lcm(b.denom());
    Rational::new(numer.abs(), denom)
}

fn fresh_symbol(expr: &Expr) -> String {
    let used = expr.free_symbols();
    (0..)
        .map(|i| format!("_t{i}"))
        .find(|name| !used.contains(name))
        .unwrap_or_else(|| "_t".to_string())
}

/// Factors of a product that depend on `symbol`, used to detect
/// equations that split into independent factors.
pub(crate) fn dependent_factors(expr: &Expr, symbol: &str) -> Vec<Expr> {
    flatten_mul(expr)
        .into_iter()
        .filter(|f| f.has_symbol(symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn form(input: &str) -> Option<GeneratorForm> {
        find_generator(&simplify(parse_expr(input).expect("parse")), "x")
    }

    #[test]
    fn exponentials_share_a_generator() {
        let g = form("exp(2*x) - 3*exp(x) + 2").expect("generator");
        assert_eq!(g.generator, Expr::Exp(Expr::var("x").boxed()));
        assert_eq!(
            g.substituted,
            simplify(parse_expr("_t0^2 - 3*_t0 + 2").expect("parse"))
        );
    }

    #[test]
    fn fractional_powers_use_the_root() {
        let g = form("x - 3*sqrt(x) + 2").expect("generator");
        assert_eq!(g.generator, Expr::sqrt(Expr::var("x")));
    }

    #[test]
    fn mixed_functions_have_no_generator() {
        assert!(form("sin(x) + cos(x)").is_none());
        assert!(form("x^2 + x").is_none());
    }
}
