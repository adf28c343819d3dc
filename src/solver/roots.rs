//! Closed-form roots of univariate polynomials.

use log::trace;
use num_traits::{One, Signed, Zero};

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational, zero};
use crate::polynomial::{Poly, Polynomial};
use crate::simplify::{
    simplify, simplify_add, simplify_div, simplify_mul, simplify_neg, simplify_pow, split_coeff,
};

/// Distinct roots of a polynomial with rational coefficients.
///
/// Rational roots are peeled off first; what remains must be linear,
/// quadratic, or a polynomial of degree at most two in `x^k`.
pub fn rational_polynomial_roots(poly: &Poly) -> Result<Vec<Expr>> {
    let mut roots = Vec::new();
    let mut current = poly.clone();
    if let Some(k) = current.trailing_degree() {
        if k > 0 {
            roots.push(zero());
            current = current.shift_down(k);
        }
    }
    for (factor, multiplicity) in current.square_free_decomposition() {
        trace!(
            "square-free factor of multiplicity {multiplicity}: degree {:?}",
            factor.degree()
        );
        roots.extend(square_free_roots(&factor)?);
    }
    Ok(roots)
}

fn square_free_roots(poly: &Poly) -> Result<Vec<Expr>> {
    let mut roots = Vec::new();
    let mut rest = poly.clone();
    for root in poly.rational_roots() {
        let divisor = Polynomial::from_terms([(1, <Rational as One>::one()), (0, -root.clone())]);
        if let Some(quotient) = rest.div_exact(&divisor) {
            rest = quotient;
        }
        roots.push(Expr::rational(root));
    }

    match rest.degree() {
        None | Some(0) => Ok(roots),
        Some(1) => {
            roots.push(linear(&rest.coeff(1), &rest.coeff(0)));
            Ok(roots)
        }
        Some(2) => {
            roots.extend(quadratic(&rest.coeff(2), &rest.coeff(1), &rest.coeff(0)));
            Ok(roots)
        }
        Some(degree) => {
            let k = rest.exponent_gcd();
            if k > 1 && degree / k <= 2 {
                let reduced = rest.compress(k);
                for inner in square_free_roots(&reduced)? {
                    roots.extend(kth_roots(&inner, k));
                }
                Ok(roots)
            } else {
                Err(CasError::Unsupported(format!(
                    "no closed form for the roots of an irreducible polynomial of degree {degree}"
                )))
            }
        }
    }
}

/// Roots of a polynomial whose coefficients are expressions free of the
/// unknown. Degrees above two are only handled after removing zero roots.
pub fn symbolic_polynomial_roots(poly: &Polynomial<Expr>) -> Result<Vec<Expr>> {
    let mut roots = Vec::new();
    let mut current = poly.clone();
    if let Some(k) = current.trailing_degree() {
        if k > 0 {
            roots.push(zero());
            current = current.shift_down(k);
        }
    }
    match current.degree() {
        None | Some(0) => {}
        Some(1) => roots.push(symbolic_linear(&current.coeff(1), &current.coeff(0))),
        Some(2) => roots.extend(symbolic_quadratic(
            &current.coeff(2),
            &current.coeff(1),
            &current.coeff(0),
        )),
        Some(degree) => {
            return Err(CasError::Unsupported(format!(
                "symbolic polynomial of degree {degree}"
            )));
        }
    }
    Ok(roots)
}

fn linear(a: &Rational, b: &Rational) -> Expr {
    Expr::rational(-b / a)
}

/// `(-b ± sqrt(b^2 - 4ac)) / 2a` with exact radical extraction.
fn quadratic(a: &Rational, b: &Rational, c: &Rational) -> Vec<Expr> {
    let disc = b * b - Rational::from_integer(4.into()) * a * c;
    let two_a = a * Rational::from_integer(2.into());
    let root = simplify_pow(Expr::rational(disc), Expr::constant(1, 2));
    let centre = Expr::rational(-b / &two_a);
    let spread = simplify_mul(Expr::rational(<Rational as One>::one() / &two_a), root);
    if spread.is_zero() {
        return vec![centre];
    }
    vec![
        simplify_add(centre.clone(), simplify_neg(spread.clone())),
        simplify_add(centre, spread),
    ]
}

fn symbolic_linear(a: &Expr, b: &Expr) -> Expr {
    simplify(simplify_neg(simplify_div(b.clone(), a.clone())))
}

fn symbolic_quadratic(a: &Expr, b: &Expr, c: &Expr) -> Vec<Expr> {
    let four = Expr::integer(4);
    let disc = simplify_add(
        simplify_pow(b.clone(), Expr::integer(2)),
        simplify_neg(simplify_mul(four, simplify_mul(a.clone(), c.clone()))),
    );
    let root = square_root(disc);
    let two_a = simplify_mul(Expr::integer(2), a.clone());
    let minus_b = simplify_neg(b.clone());
    if root.is_zero() {
        return vec![simplify_div(minus_b, two_a)];
    }
    vec![
        simplify_div(simplify_add(minus_b.clone(), simplify_neg(root.clone())), two_a.clone()),
        simplify_div(simplify_add(minus_b, root), two_a),
    ]
}

/// A square root of `disc` with its rational factor taken outside. Roots come
/// in `±` pairs, so which branch this picks does not matter.
fn square_root(disc: Expr) -> Expr {
    let (coeff, rest) = split_coeff(&disc);
    if rest.is_one() || coeff.is_zero() {
        return simplify_pow(disc, Expr::constant(1, 2));
    }
    let outer = simplify_pow(Expr::rational(coeff.abs()), Expr::constant(1, 2));
    let root = simplify_mul(outer, simplify_pow(rest, Expr::constant(1, 2)));
    if coeff.is_negative() {
        simplify_mul(Expr::I, root)
    } else {
        root
    }
}

/// All `k`-th roots of `value`: the principal root times each root of unity.
fn kth_roots(value: &Expr, k: usize) -> Vec<Expr> {
    let principal = simplify_pow(value.clone(), Expr::constant(1, k as i64));
    if principal.is_zero() {
        return vec![principal];
    }
    (0..k)
        .map(|j| simplify_mul(root_of_unity(j, k), principal.clone()))
        .collect()
}

fn root_of_unity(j: usize, k: usize) -> Expr {
    if j == 0 {
        return Expr::integer(1);
    }
    let angle = simplify_mul(Expr::constant(2 * j as i64, k as i64), Expr::Pi);
    simplify(Expr::Add(
        Expr::Cos(angle.clone().boxed()).boxed(),
        Expr::Mul(Expr::I.boxed(), Expr::Sin(angle.boxed()).boxed()).boxed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn poly(input: &str) -> Poly {
        let e = simplify(parse_expr(input).expect("parse"));
        Poly::from_expr(&e, "x").expect("polynomial")
    }

    #[test]
    fn quadratic_with_negative_discriminant() {
        let roots = rational_polynomial_roots(&poly("x^2 + 1")).expect("roots");
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&Expr::I));
        assert!(roots.contains(&Expr::Neg(Expr::I.boxed())));
    }

    #[test]
    fn biquadratic_reduces_through_x_squared() {
        let roots = rational_polynomial_roots(&poly("x^4 - 5*x^2 + 6")).expect("roots");
        assert_eq!(roots.len(), 4);
    }

    #[test]
    fn repeated_roots_appear_once() {
        let roots = rational_polynomial_roots(&poly("(x - 1)^3*x^2")).expect("roots");
        assert_eq!(roots, vec![zero(), Expr::integer(1)]);
    }

    #[test]
    fn irreducible_quintic_is_unsupported() {
        assert!(rational_polynomial_roots(&poly("x^5 - x - 1")).is_err());
    }
}
