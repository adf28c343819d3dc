//! Isolating the unknown by inverting the operations wrapped around it.

use log::trace;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{CasError, Result};
use crate::expr::{Expr, Rational};
use crate::simplify::{
    expand_multinomial, flatten_mul, flatten_sum, simplify, simplify_add, simplify_div, simplify_mul,
    simplify_neg, simplify_pow, simplify_product, simplify_sub, simplify_sum,
};
use crate::solver::{SolveOptions, solve_inner};

const MAX_ROOT_INDEX: u32 = 4;

/// Solve `lhs = rhs` for `symbol` by peeling operations off `lhs`.
///
/// Inverse trigonometric functions use their principal values, with the
/// second solution in `[0, 2*pi)` for sine and cosine. When `lhs` cannot be
/// peeled further the remaining equation goes back through the dispatcher.
pub(crate) fn isolate(
    lhs: &Expr,
    rhs: Expr,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    let lhs = simplify(lhs.clone());
    let rhs = simplify(rhs);
    trace!("isolating {symbol} in {lhs} = {rhs}");
    if !lhs.has_symbol(symbol) {
        return Ok(Vec::new());
    }

    match &lhs {
        Expr::Variable(name) if name == symbol => Ok(vec![rhs]),
        Expr::Add(_, _) | Expr::Sub(_, _) => {
            let (dependent, rest): (Vec<Expr>, Vec<Expr>) = flatten_sum(&lhs)
                .into_iter()
                .partition(|t| t.has_symbol(symbol));
            match <[Expr; 1]>::try_from(dependent) {
                Ok([term]) => {
                    let moved = simplify_sub(rhs, simplify_sum(rest));
                    isolate(&term, moved, symbol, options, depth)
                }
                Err(_) => redispatch(&lhs, rhs, symbol, options, depth),
            }
        }
        Expr::Mul(_, _) => {
            let (dependent, rest): (Vec<Expr>, Vec<Expr>) = flatten_mul(&lhs)
                .into_iter()
                .partition(|f| f.has_symbol(symbol));
            let coeff = simplify_product(rest);
            match <[Expr; 1]>::try_from(dependent) {
                Ok([factor]) => isolate(&factor, simplify_div(rhs, coeff), symbol, options, depth),
                Err(_) => redispatch(&lhs, rhs, symbol, options, depth),
            }
        }
        Expr::Neg(inner) => isolate(inner, simplify_neg(rhs), symbol, options, depth),
        Expr::Pow(base, exp) => invert_power(base, exp, rhs, symbol, options, depth),
        Expr::Exp(arg) => {
            if rhs.is_zero() {
                return Ok(Vec::new());
            }
            isolate(arg, Expr::Log(rhs.boxed()), symbol, options, depth)
        }
        Expr::Log(arg) => isolate(arg, Expr::Exp(rhs.boxed()), symbol, options, depth),
        Expr::Sin(arg) => {
            let principal = Expr::Asin(rhs.boxed());
            let reflected = simplify_sub(Expr::Pi, principal.clone());
            isolate_each(arg, [principal, reflected], symbol, options, depth)
        }
        Expr::Cos(arg) => {
            let principal = Expr::Acos(rhs.boxed());
            let reflected = simplify_sub(simplify_mul(Expr::integer(2), Expr::Pi), principal.clone());
            isolate_each(arg, [principal, reflected], symbol, options, depth)
        }
        Expr::Tan(arg) => isolate(arg, Expr::Atan(rhs.boxed()), symbol, options, depth),
        Expr::Asin(arg) => isolate(arg, Expr::Sin(rhs.boxed()), symbol, options, depth),
        Expr::Acos(arg) => isolate(arg, Expr::Cos(rhs.boxed()), symbol, options, depth),
        Expr::Atan(arg) => isolate(arg, Expr::Tan(rhs.boxed()), symbol, options, depth),
        Expr::Abs(arg) => {
            let negated = simplify_neg(rhs.clone());
            isolate_each(arg, [rhs, negated], symbol, options, depth)
        }
        Expr::Func(name, _) => Err(CasError::Unsupported(format!(
            "cannot invert the undefined function {name}"
        ))),
        Expr::Derivative(_, _) => Err(CasError::Unsupported(
            "cannot invert an unevaluated derivative".to_string(),
        )),
        _ => redispatch(&lhs, rhs, symbol, options, depth),
    }
}

fn invert_power(
    base: &Expr,
    exp: &Expr,
    rhs: Expr,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    match (base.has_symbol(symbol), exp.has_symbol(symbol)) {
        (true, false) => match exp.as_rational() {
            Some(q) => invert_rational_power(base, &q, rhs, symbol, options, depth),
            None => isolate(
                base,
                simplify_pow(rhs, simplify_div(Expr::integer(1), exp.clone())),
                symbol,
                options,
                depth,
            ),
        },
        (false, true) => {
            if rhs.is_zero() {
                return Ok(Vec::new());
            }
            let exact = base
                .as_rational()
                .zip(rhs.as_rational())
                .and_then(|(b, v)| exact_log(&b, &v));
            let target = match exact {
                Some(k) => Expr::rational(k),
                None => simplify_div(
                    Expr::Log(rhs.boxed()),
                    simplify(Expr::Log(base.clone().boxed())),
                ),
            };
            isolate(exp, target, symbol, options, depth)
        }
        _ => Err(CasError::Unsupported(format!(
            "{symbol} appears in both base and exponent of {}",
            Expr::Pow(base.clone().boxed(), exp.clone().boxed())
        ))),
    }
}

/// `u^(p/q) = c`: take the `p`-th roots of `c` (both signs when `p` is even),
/// then raise each to the `q`-th power.
fn invert_rational_power(
    base: &Expr,
    q: &Rational,
    rhs: Expr,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    if q.is_negative() {
        if rhs.is_zero() {
            return Ok(Vec::new());
        }
        return invert_rational_power(
            base,
            &-q,
            simplify_div(Expr::integer(1), rhs),
            symbol,
            options,
            depth,
        );
    }
    let numer = q.numer().clone();
    let denom = q.denom().clone();
    let p = numer
        .to_i64()
        .ok_or_else(|| CasError::Unsupported(format!("exponent {q} is too large")))?;
    let root = simplify_pow(rhs, Expr::constant(1, p));
    let mut targets = vec![root.clone()];
    if numer.is_even() && !root.is_zero() {
        targets.push(simplify_neg(root));
    }
    let targets: Vec<Expr> = targets
        .into_iter()
        .map(|t| expand_multinomial(&simplify_pow(t, Expr::integer(denom.clone()))))
        .collect();
    isolate_each(base, targets, symbol, options, depth)
}

/// The rational `k` with `base^k == value`, for exponents with a small
/// denominator.
fn exact_log(base: &Rational, value: &Rational) -> Option<Rational> {
    let one = Rational::one();
    if !base.is_positive() || base.is_one() || !value.is_positive() {
        return None;
    }
    if value.is_one() {
        return Some(Rational::zero());
    }
    let growing = *base > one;
    let inverted = growing != (*value > one);
    let value = if inverted { value.recip() } else { value.clone() };
    for q in 1..=MAX_ROOT_INDEX {
        let target = (0..q).fold(one.clone(), |acc, _| acc * &value);
        let mut power = base.clone();
        let mut p: u32 = 1;
        loop {
            if power == target {
                let k = Rational::new(p.into(), q.into());
                return Some(if inverted { -k } else { k });
            }
            if (growing && power > target) || (!growing && power < target) {
                break;
            }
            power *= base.clone();
            p += 1;
        }
    }
    None
}

fn isolate_each(
    lhs: &Expr,
    targets: impl IntoIterator<Item = Expr>,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    let mut out = Vec::new();
    for target in targets {
        out.extend(isolate(lhs, target, symbol, options, depth)?);
    }
    Ok(out)
}

fn redispatch(
    lhs: &Expr,
    rhs: Expr,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    let residual = simplify_add(lhs.clone(), simplify_neg(rhs));
    if residual.is_zero() {
        return Err(CasError::Indeterminate {
            symbol: symbol.to_string(),
        });
    }
    solve_inner(&residual, symbol, options, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n.into(), d.into())
    }

    #[test]
    fn exact_logs_of_rational_powers() {
        assert_eq!(exact_log(&q(2, 1), &q(8, 1)), Some(q(3, 1)));
        assert_eq!(exact_log(&q(4, 1), &q(1, 2)), Some(q(-1, 2)));
        assert_eq!(exact_log(&q(1, 3), &q(9, 1)), Some(q(-2, 1)));
        assert_eq!(exact_log(&q(2, 1), &q(3, 1)), None);
    }
}
