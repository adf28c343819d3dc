use crate::expr::{Expr, Rational};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

// Binding strength of each printed form; a child printed in a tighter
// context gets parentheses.
const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const POWER: u8 = 3;
const ATOM: u8 = 4;

pub fn pretty(expr: &Expr) -> String {
    pp(0, expr)
}

fn pp(ctx: u8, expr: &Expr) -> String {
    match expr {
        Expr::Variable(v) => v.clone(),
        Expr::Constant(r) => {
            let body = show_rational(r);
            if r.is_negative() || !r.is_integer() {
                bracket(ctx, PRODUCT, body)
            } else {
                body
            }
        }
        Expr::Pi => "pi".to_string(),
        Expr::I => "I".to_string(),

        Expr::Add(_, _) | Expr::Sub(_, _) => bracket(ctx, SUM, show_sum(expr)),

        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_) => {
            let (neg, body) = signed(expr);
            if neg {
                bracket(ctx, PRODUCT, format!("-{body}"))
            } else {
                bracket(ctx, PRODUCT, body)
            }
        }

        Expr::Pow(base, exp) => match exp.as_rational() {
            Some(e) if e == half() => format!("sqrt({})", pp(0, base)),
            Some(e) if e.is_negative() => bracket(ctx, PRODUCT, signed(expr).1),
            _ => bracket(ctx, POWER, show_power(base, exp)),
        },

        Expr::Sin(a) => format!("sin({})", pp(0, a)),
        Expr::Cos(a) => format!("cos({})", pp(0, a)),
        Expr::Tan(a) => format!("tan({})", pp(0, a)),
        Expr::Asin(a) => format!("asin({})", pp(0, a)),
        Expr::Acos(a) => format!("acos({})", pp(0, a)),
        Expr::Atan(a) => format!("atan({})", pp(0, a)),
        Expr::Exp(a) if a.is_one() => "E".to_string(),
        Expr::Exp(a) => format!("exp({})", pp(0, a)),
        Expr::Log(a) => format!("log({})", pp(0, a)),
        Expr::Abs(a) => format!("abs({})", pp(0, a)),

        Expr::Func(name, args) => {
            let args: Vec<String> = args.iter().map(|a| pp(0, a)).collect();
            format!("{name}({})", args.join(", "))
        }
        Expr::Derivative(inner, vars) => {
            let mut parts = vec![pp(0, inner)];
            let mut i = 0;
            while i < vars.len() {
                let run = vars[i..].iter().take_while(|v| **v == vars[i]).count();
                if run == 1 {
                    parts.push(vars[i].clone());
                } else {
                    parts.push(format!("({}, {run})", vars[i]));
                }
                i += run;
            }
            format!("Derivative({})", parts.join(", "))
        }
    }
}

fn show_sum(expr: &Expr) -> String {
    let mut terms = Vec::new();
    collect_terms(expr, false, &mut terms);
    let mut out = String::new();
    for (i, (neg, term)) in terms.iter().enumerate() {
        let (neg_inner, body) = signed(term);
        let neg = *neg ^ neg_inner;
        match (i, neg) {
            (0, true) => out.push('-'),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&body);
    }
    out
}

fn collect_terms(expr: &Expr, neg: bool, out: &mut Vec<(bool, Expr)>) {
    match expr {
        Expr::Add(a, b) => {
            collect_terms(a, neg, out);
            collect_terms(b, neg, out);
        }
        Expr::Sub(a, b) => {
            collect_terms(a, neg, out);
            collect_terms(b, !neg, out);
        }
        other => out.push((neg, other.clone())),
    }
}

/// Render a term as `(is_negative, magnitude)`, the magnitude safe to place
/// after a `+`/`-` or a unary minus.
fn signed(expr: &Expr) -> (bool, String) {
    match expr {
        Expr::Constant(r) if r.is_negative() => (true, show_rational(&-r)),
        Expr::Neg(inner) => {
            let (neg, body) = signed(inner);
            (!neg, body)
        }
        Expr::Mul(_, _) | Expr::Div(_, _) => show_product(expr),
        Expr::Pow(_, exp) if exp.as_rational().is_some_and(|e| e.is_negative()) => {
            show_product(expr)
        }
        other => (false, pp(PRODUCT, other)),
    }
}

/// Products print as `coeff*numerator/denominator`, with negative powers
/// moved below the line.
fn show_product(expr: &Expr) -> (bool, String) {
    let mut coeff = Rational::one();
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();
    let mut neg = false;
    let mut stack = vec![(expr.clone(), false)];

    while let Some((item, below)) = stack.pop() {
        match item {
            Expr::Mul(a, b) => {
                stack.push((*b, below));
                stack.push((*a, below));
            }
            Expr::Div(a, b) => {
                stack.push((*b, !below));
                stack.push((*a, below));
            }
            Expr::Neg(inner) => {
                neg = !neg;
                stack.push((*inner, below));
            }
            Expr::Constant(c) if below && c.is_zero() => denom.push("0".to_string()),
            Expr::Constant(c) if below => coeff /= c,
            Expr::Constant(c) => coeff *= c,
            Expr::Pow(base, exp) => match exp.as_rational() {
                Some(e) if e.is_negative() => {
                    let flipped = Expr::Pow(base, Expr::rational(-e).boxed());
                    let side = if below { &mut numer } else { &mut denom };
                    side.push(show_factor(&flipped, !below));
                }
                _ => {
                    let side = if below { &mut denom } else { &mut numer };
                    side.push(show_factor(&Expr::Pow(base, exp), below));
                }
            },
            other => {
                let side = if below { &mut denom } else { &mut numer };
                side.push(show_factor(&other, below));
            }
        }
    }

    if coeff.is_negative() {
        neg = !neg;
        coeff = -coeff;
    }
    if !coeff.numer().is_one() || numer.is_empty() {
        numer.insert(0, coeff.numer().to_string());
    }
    if !coeff.denom().is_one() {
        denom.insert(0, coeff.denom().to_string());
    }

    let top = numer.join("*");
    let body = match denom.len() {
        0 => top,
        1 => format!("{top}/{}", denom[0]),
        _ => format!("{top}/({})", denom.join("*")),
    };
    (neg, body)
}

fn show_factor(expr: &Expr, below: bool) -> String {
    match expr {
        Expr::Pow(base, exp) if exp.is_one() => pp(if below { ATOM } else { PRODUCT }, base),
        other => pp(if below { POWER } else { PRODUCT }, other),
    }
}

fn show_power(base: &Expr, exp: &Expr) -> String {
    let exponent = match exp.as_rational() {
        Some(e) if e.is_integer() && !e.is_negative() => show_rational(&e),
        Some(e) => format!("({})", show_rational(&e)),
        None => pp(ATOM, exp),
    };
    format!("{}^{}", pp(ATOM, base), exponent)
}

fn half() -> Rational {
    Rational::new(1.into(), 2.into())
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn show_rational(r: &BigRational) -> String {
    if r.is_integer() {
        format!("{}", r.numer())
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use crate::simplify::simplify;

    fn show(input: &str) -> String {
        pretty(&simplify(parse_expr(input).expect("parse")))
    }

    #[test]
    fn negative_powers_print_as_quotients() {
        assert_eq!(show("x/2"), "x/2");
        assert_eq!(show("3/(x*y)"), "3/(x*y)");
        assert_eq!(show("-1/x"), "-1/x");
    }

    #[test]
    fn half_powers_print_as_roots() {
        assert_eq!(show("sqrt(8)"), "2*sqrt(2)");
        assert_eq!(show("sqrt(-4)"), "2*I");
    }

    #[test]
    fn derivative_orders_are_grouped() {
        assert_eq!(show("Derivative(u(x, t), x, 2)"), "Derivative(u(x, t), (x, 2))");
        assert_eq!(show("Derivative(u(x, t), x, t)"), "Derivative(u(x, t), t, x)");
    }

    #[test]
    fn power_bases_are_parenthesized() {
        assert_eq!(pretty(&parse_expr("(x + 1)^2").expect("parse")), "(x + 1)^2");
        assert_eq!(pretty(&parse_expr("-x^2").expect("parse")), "-x^2");
    }
}
