//! Linear homogeneous ODEs with constant rational coefficients.

use std::cmp::Ordering;

use log::debug;
use num_traits::Zero;

use crate::calculus::doit;
use crate::error::{CasError, Result};
use crate::eval::evaluate_constant;
use crate::expr::{Equation, Expr, Rational, zero};
use crate::polynomial::Poly;
use crate::simplify::{
    flatten_sum, simplify, simplify_div, simplify_exp, simplify_mul, simplify_pow, simplify_sub,
    simplify_sum, split_coeff, substitute_expr,
};
use crate::solver::rational_polynomial_roots;

const IMAGINARY_TOLERANCE: f64 = 1e-12;

/// General solution of `a_n f^(n) + ... + a_1 f' + a_0 f = 0` for `f(x)`.
///
/// The roots of the characteristic polynomial give the basis: a real root
/// `r` of multiplicity `m` contributes `x^j exp(r x)` for `j < m`, and a
/// conjugate pair `a ± b*I` contributes `x^j exp(a x) cos(b x)` and
/// `x^j exp(a x) sin(b x)`. Integration constants are named `C1, C2, ...`.
pub fn dsolve(equation: &Equation, f: &Expr) -> Result<Equation> {
    let var = function_variable(f)?;
    let residual = simplify(doit(&equation.residual()));
    let characteristic = characteristic_polynomial(&residual, f, &var)?;
    debug!("characteristic polynomial of {residual} = 0: {characteristic:?}");
    if characteristic.degree().unwrap_or(0) == 0 {
        return Err(CasError::Unsupported(format!(
            "{equation} contains no derivative of {f}"
        )));
    }

    let mut roots = Vec::new();
    for (factor, multiplicity) in characteristic.square_free_decomposition() {
        for root in rational_polynomial_roots(&factor)? {
            let value = evaluate_constant(&root).ok_or_else(|| {
                CasError::Unsupported(format!("characteristic root {root} is not numeric"))
            })?;
            roots.push((root, value, multiplicity));
        }
    }
    roots.sort_by(|(_, a, _), (_, b, _)| {
        a.re.partial_cmp(&b.re)
            .unwrap_or(Ordering::Equal)
            .then(b.im.partial_cmp(&a.im).unwrap_or(Ordering::Equal))
    });

    let x = Expr::var(var);
    let mut basis = Vec::new();
    for (root, value, multiplicity) in &roots {
        let pair = split_complex(root);
        for j in 0..*multiplicity {
            let power = simplify_pow(x.clone(), Expr::integer(j as i64));
            if value.im.abs() <= IMAGINARY_TOLERANCE {
                basis.push(simplify_mul(power, growth(root, &x)));
                continue;
            }
            match &pair {
                Some((re, im)) if value.im > 0.0 => {
                    let scale = simplify_mul(power, growth(re, &x));
                    let angle = simplify_mul(im.clone(), x.clone());
                    basis.push(simplify_mul(scale.clone(), Expr::Cos(angle.clone().boxed())));
                    basis.push(simplify_mul(scale, Expr::Sin(angle.boxed())));
                }
                Some(_) => {}
                None => basis.push(simplify_mul(power, growth(root, &x))),
            }
        }
    }

    let solution = simplify_sum(
        basis
            .into_iter()
            .enumerate()
            .map(|(i, term)| simplify(simplify_mul(Expr::var(format!("C{}", i + 1)), term)))
            .collect(),
    );
    Ok(Equation::new(f.clone(), solution))
}

fn function_variable(f: &Expr) -> Result<String> {
    match f {
        Expr::Func(_, args) if args.len() == 1 => match &args[0] {
            Expr::Variable(var) => Ok(var.clone()),
            other => Err(CasError::InvalidArgument(format!(
                "{f} must be applied to a symbol, not {other}"
            ))),
        },
        other => Err(CasError::InvalidArgument(format!(
            "expected a function of one variable, found {other}"
        ))),
    }
}

/// Order of the derivative of `f` that `base` denotes, if any.
fn derivative_order(base: &Expr, f: &Expr, var: &str) -> Option<usize> {
    match base {
        b if b == f => Some(0),
        Expr::Derivative(inner, vars) if **inner == *f && vars.iter().all(|v| v == var) => {
            Some(vars.len())
        }
        _ => None,
    }
}

fn characteristic_polynomial(residual: &Expr, f: &Expr, var: &str) -> Result<Poly> {
    let mut terms: Vec<(usize, Rational)> = Vec::new();
    for term in flatten_sum(residual) {
        let (coeff, base) = split_coeff(&term);
        if coeff.is_zero() {
            continue;
        }
        match derivative_order(&base, f, var) {
            Some(order) => terms.push((order, coeff)),
            None if !base.contains(f) => {
                return Err(CasError::Unsupported(format!(
                    "inhomogeneous term {term} in a differential equation for {f}"
                )));
            }
            None => {
                return Err(CasError::Unsupported(format!(
                    "{term} is not a constant multiple of a derivative of {f}"
                )));
            }
        }
    }
    Ok(Poly::from_terms(terms))
}

/// `exp(rate*x)`.
fn growth(rate: &Expr, x: &Expr) -> Expr {
    simplify_exp(simplify_mul(rate.clone(), x.clone()))
}

/// Real and imaginary parts of `root` when it is linear in `I`.
fn split_complex(root: &Expr) -> Option<(Expr, Expr)> {
    let re = simplify(substitute_expr(root, &Expr::I, &zero()));
    let im = simplify_div(simplify_sub(root.clone(), re.clone()), Expr::I);
    if re.contains(&Expr::I) || im.contains(&Expr::I) || im.is_zero() {
        return None;
    }
    Some((re, im))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_equation, parse_expr};
    use crate::simplify::substitute_function;
    use pretty_assertions::assert_eq;

    fn f() -> Expr {
        parse_expr("f(x)").expect("parse")
    }

    fn general(input: &str) -> Expr {
        dsolve(&parse_equation(input).expect("parse"), &f())
            .expect("solvable")
            .rhs
    }

    fn satisfies(input: &str, solution: &Expr) -> bool {
        let residual = parse_equation(input).expect("parse").residual();
        simplify(doit(&substitute_function(&residual, &f(), solution))).is_zero()
    }

    #[test]
    fn distinct_real_roots() {
        let eq = "Derivative(f(x), x, 2) - f(x)";
        let sol = general(eq);
        assert_eq!(sol, simplify(parse_expr("C1*exp(-x) + C2*exp(x)").expect("parse")));
        assert!(satisfies(eq, &sol));
    }

    #[test]
    fn repeated_root_gains_powers_of_x() {
        let eq = "Derivative(f(x), x, 2) - 2*Derivative(f(x), x) + f(x) = 0";
        let sol = general(eq);
        assert_eq!(sol, simplify(parse_expr("C1*exp(x) + C2*x*exp(x)").expect("parse")));
        assert!(satisfies(eq, &sol));
    }

    #[test]
    fn conjugate_pair_uses_real_form() {
        let sol = general("Derivative(f(x), x, 2) + f(x)");
        assert_eq!(sol, simplify(parse_expr("C1*cos(x) + C2*sin(x)").expect("parse")));
    }

    #[test]
    fn inhomogeneous_equations_are_rejected() {
        let eq = parse_equation("Derivative(f(x), x) = x").expect("parse");
        assert!(matches!(dsolve(&eq, &f()), Err(CasError::Unsupported(_))));
    }

    #[test]
    fn function_must_be_applied_to_a_symbol() {
        let eq = parse_equation("Derivative(f(x), x) - f(x)").expect("parse");
        assert!(matches!(
            dsolve(&eq, &Expr::var("f")),
            Err(CasError::InvalidArgument(_))
        ));
    }
}
