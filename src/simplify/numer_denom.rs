use crate::expr::{Expr, one};
use crate::simplify::rules::{flatten_mul, flatten_sum};
use crate::simplify::{simplify, simplify_add, simplify_mul, simplify_neg, simplify_pow};
use num_traits::{Signed, ToPrimitive};

/// Rewrite `expr` as `numerator / denominator` over a common denominator.
/// Both parts come back simplified; the denominator is `1` for polynomials.
pub fn as_numer_denom(expr: &Expr) -> (Expr, Expr) {
    numer_denom(&simplify(expr.clone()))
}

/// The expression over a common denominator, as an unsimplified quotient.
pub fn together(expr: &Expr) -> Expr {
    let (n, d) = as_numer_denom(expr);
    if d.is_one() {
        n
    } else {
        Expr::Div(n.boxed(), d.boxed())
    }
}

fn numer_denom(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Constant(c) => (
            Expr::integer(c.numer().clone()),
            Expr::integer(c.denom().clone()),
        ),
        Expr::Add(_, _) => {
            let mut acc: Option<(Expr, Expr)> = None;
            for term in flatten_sum(expr) {
                let (n, d) = numer_denom(&term);
                acc = Some(match acc {
                    None => (n, d),
                    Some((an, ad)) if ad == d => (simplify_add(an, n), ad),
                    Some((an, ad)) => (
                        simplify_add(simplify_mul(an, d.clone()), simplify_mul(n, ad.clone())),
                        simplify_mul(ad, d),
                    ),
                });
            }
            acc.unwrap_or_else(|| (Expr::integer(0), one()))
        }
        Expr::Mul(_, _) => {
            let mut num = one();
            let mut den = one();
            for factor in flatten_mul(expr) {
                let (n, d) = numer_denom(&factor);
                num = simplify_mul(num, n);
                den = simplify_mul(den, d);
            }
            (num, den)
        }
        Expr::Neg(inner) => {
            let (n, d) = numer_denom(inner);
            (simplify_neg(n), d)
        }
        Expr::Pow(base, exp) => match exp.as_rational() {
            Some(e) if e.is_negative() => {
                let positive = -e;
                if positive.is_integer() {
                    let k = Expr::rational(positive);
                    let (n, d) = numer_denom(base);
                    (simplify_pow(d, k.clone()), simplify_pow(n, k))
                } else {
                    (one(), simplify_pow((**base).clone(), Expr::rational(positive)))
                }
            }
            Some(e) if e.is_integer() && e.to_integer().to_u32().is_some() => {
                let k = Expr::rational(e);
                let (n, d) = numer_denom(base);
                (simplify_pow(n, k.clone()), simplify_pow(d, k))
            }
            _ => (expr.clone(), one()),
        },
        other => (other.clone(), one()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    #[test]
    fn sums_share_a_denominator() {
        let e = parse_expr("1/x + 1/(x + 1)").expect("parse");
        let (n, d) = as_numer_denom(&e);
        assert_eq!(n, simplify(parse_expr("2*x + 1").expect("parse")));
        assert_eq!(d, simplify(parse_expr("x^2 + x").expect("parse")));
    }

    #[test]
    fn rational_constants_split() {
        let (n, d) = as_numer_denom(&Expr::constant(3, 4));
        assert_eq!(n, Expr::integer(3));
        assert_eq!(d, Expr::integer(4));
    }
}
