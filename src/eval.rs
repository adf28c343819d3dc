//! Numeric evaluation over the complex numbers.

use std::collections::HashMap;
use std::f64::consts::PI;

use num_complex::Complex64;
use num_traits::ToPrimitive;

use crate::expr::{Expr, Rational};

const REAL_AXIS_TOLERANCE: f64 = 1e-14;

/// Evaluate `expr` with the given symbol bindings.
///
/// Returns `None` for unbound symbols, applied functions, unevaluated
/// derivatives and results that are not finite.
pub fn evaluate(expr: &Expr, bindings: &HashMap<String, Complex64>) -> Option<Complex64> {
    let value = eval_node(expr, bindings)?;
    if value.re.is_finite() && value.im.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Evaluate an expression with no free symbols.
pub fn evaluate_constant(expr: &Expr) -> Option<Complex64> {
    evaluate(expr, &HashMap::new())
}

pub(crate) fn rational_to_f64(r: &Rational) -> Option<f64> {
    let n = r.numer().to_f64()?;
    let d = r.denom().to_f64()?;
    Some(n / d)
}

fn eval_node(expr: &Expr, bindings: &HashMap<String, Complex64>) -> Option<Complex64> {
    Some(match expr {
        Expr::Variable(name) => *bindings.get(name)?,
        Expr::Constant(r) => Complex64::new(rational_to_f64(r)?, 0.0),
        Expr::Pi => Complex64::new(PI, 0.0),
        Expr::I => Complex64::i(),
        Expr::Add(a, b) => eval_node(a, bindings)? + eval_node(b, bindings)?,
        Expr::Sub(a, b) => eval_node(a, bindings)? - eval_node(b, bindings)?,
        Expr::Mul(a, b) => eval_node(a, bindings)? * eval_node(b, bindings)?,
        Expr::Div(a, b) => {
            let d = eval_node(b, bindings)?;
            if d.norm() == 0.0 {
                return None;
            }
            eval_node(a, bindings)? / d
        }
        Expr::Pow(a, b) => power(eval_node(a, bindings)?, b, bindings)?,
        Expr::Neg(a) => negate(eval_node(a, bindings)?),
        Expr::Sin(a) => eval_node(a, bindings)?.sin(),
        Expr::Cos(a) => eval_node(a, bindings)?.cos(),
        Expr::Tan(a) => eval_node(a, bindings)?.tan(),
        Expr::Asin(a) => eval_node(a, bindings)?.asin(),
        Expr::Acos(a) => eval_node(a, bindings)?.acos(),
        Expr::Atan(a) => eval_node(a, bindings)?.atan(),
        Expr::Exp(a) => eval_node(a, bindings)?.exp(),
        Expr::Log(a) => {
            let v = eval_node(a, bindings)?;
            if v.norm() == 0.0 {
                return None;
            }
            v.ln()
        }
        Expr::Abs(a) => Complex64::new(eval_node(a, bindings)?.norm(), 0.0),
        Expr::Func(_, _) | Expr::Derivative(_, _) => return None,
    })
}

/// `-z` without producing a negative zero, which would move a negative real
/// onto the lower side of the branch cut.
fn negate(z: Complex64) -> Complex64 {
    Complex64::new(-z.re, -z.im + 0.0)
}

/// Treat values within rounding of the real axis as real, so that
/// fractional powers of negative numbers take the principal branch.
fn snap_to_real(z: Complex64) -> Complex64 {
    if z.im.abs() <= REAL_AXIS_TOLERANCE * z.norm() {
        Complex64::new(z.re, 0.0)
    } else {
        z
    }
}

fn power(
    base: Complex64,
    exp: &Expr,
    bindings: &HashMap<String, Complex64>,
) -> Option<Complex64> {
    if let Some(r) = exp.as_rational() {
        if r.is_integer() {
            let n = r.to_integer().to_i32()?;
            if n < 0 && base.norm() == 0.0 {
                return None;
            }
            return Some(base.powi(n));
        }
        if base.norm() == 0.0 {
            return if r > Rational::from_integer(0.into()) {
                Some(Complex64::new(0.0, 0.0))
            } else {
                None
            };
        }
        return Some(snap_to_real(base).powf(rational_to_f64(&r)?));
    }
    let e = eval_node(exp, bindings)?;
    if base.norm() == 0.0 {
        return None;
    }
    Some(snap_to_real(base).powc(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use approx::assert_relative_eq;

    #[test]
    fn evaluates_with_bindings() {
        let e = parse_expr("x^2 + 2*x + 1").expect("parse");
        let mut env = HashMap::new();
        env.insert("x".to_string(), Complex64::new(2.0, 0.0));
        let v = evaluate(&e, &env).expect("value");
        assert_relative_eq!(v.re, 9.0);
        assert_relative_eq!(v.im, 0.0);
    }

    #[test]
    fn principal_square_root_of_negative() {
        let e = parse_expr("sqrt(-4)").expect("parse");
        let v = evaluate_constant(&e).expect("value");
        assert_relative_eq!(v.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.im, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn principal_cube_root_of_negative() {
        let e = parse_expr("(-8)^(1/3)").expect("parse");
        let v = evaluate_constant(&e).expect("value");
        assert_relative_eq!(v.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.im, 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn negated_constants_stay_on_the_upper_side() {
        let e = Expr::Pow(
            Expr::Neg(Expr::Pi.boxed()).boxed(),
            Expr::constant(1, 2).boxed(),
        );
        let v = evaluate_constant(&e).expect("value");
        assert_relative_eq!(v.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.im, PI.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn unbound_symbols_and_poles_are_none() {
        assert!(evaluate_constant(&Expr::var("y")).is_none());
        assert!(evaluate_constant(&parse_expr("1/0").expect("parse")).is_none());
        assert!(evaluate_constant(&parse_expr("log(0)").expect("parse")).is_none());
    }
}
