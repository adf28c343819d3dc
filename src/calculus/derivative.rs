use crate::calculus::differentiate;
use crate::expr::{Expr, zero};
use crate::simplify::simplify;

/// Differentiate repeatedly: `diff(f, &[("x", 2), ("t", 1)])` is `f_xxt`.
pub fn diff(expr: &Expr, vars: &[(&str, usize)]) -> Expr {
    let mut out = expr.clone();
    for (var, order) in vars {
        for _ in 0..*order {
            out = differentiate(var, &out);
        }
    }
    out
}

/// Evaluate unevaluated derivatives wherever the differentiated expression
/// is more than a bare function application.
///
/// `Derivative(X(x)*T(t), x)` becomes `Derivative(X(x), x)*T(t)`, while
/// `Derivative(u(x, t), x)` is already in normal form and stays. A bare
/// application differentiated by a variable it does not take is zero.
pub fn doit(expr: &Expr) -> Expr {
    match expr {
        Expr::Derivative(inner, vars) => {
            let inner = doit(inner);
            if let Expr::Func(_, args) = &inner {
                let depends = vars
                    .iter()
                    .all(|v| args.iter().any(|a| a.has_symbol(v)));
                return if depends {
                    Expr::derivative(inner, vars.iter().cloned())
                } else {
                    zero()
                };
            }
            let mut out = inner;
            for var in vars {
                out = differentiate(var, &out);
            }
            simplify(out)
        }
        other => other.map_children(doit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::mul;

    fn applied(name: &str, args: &[&str]) -> Expr {
        Expr::func(name, args.iter().map(|a| Expr::var(*a)).collect())
    }

    #[test]
    fn doit_applies_product_rule_to_separated_functions() {
        let x = applied("X", &["x"]);
        let t = applied("T", &["t"]);
        let d = Expr::derivative(mul(x.clone(), t.clone()), ["x"]);
        let expected = simplify(mul(Expr::derivative(x, ["x"]), t));
        assert_eq!(doit(&d), expected);
    }

    #[test]
    fn doit_keeps_bare_function_derivatives() {
        let d = Expr::derivative(applied("u", &["x", "t"]), ["x", "x"]);
        assert_eq!(doit(&d), d);
    }

    #[test]
    fn doit_zeroes_independent_variables() {
        let d = Expr::derivative(applied("X", &["x"]), ["t"]);
        assert!(doit(&d).is_zero());
    }

    #[test]
    fn diff_counts_orders() {
        let x = Expr::var("x");
        let cube = Expr::Pow(x.boxed(), Expr::integer(3).boxed());
        assert_eq!(diff(&cube, &[("x", 3)]), Expr::integer(6));
    }
}
