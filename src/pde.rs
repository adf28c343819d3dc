//! Separation of variables for partial differential equations.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::calculus::doit;
use crate::error::{CasError, Result};
use crate::expr::{Equation, Expr, one, zero};
use crate::simplify::{
    flatten_mul, flatten_sum, simplify, simplify_add, simplify_div, simplify_exp,
    simplify_product, simplify_sub, simplify_sum, split_coeff, substitute_function,
};

/// How the unknown function is split into functions of fewer variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeparationStrategy {
    /// `u(x, t) = X(x) + T(t)`
    Add,
    /// `u(x, t) = X(x) * T(t)`
    Mul,
}

impl FromStr for SeparationStrategy {
    type Err = CasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(SeparationStrategy::Add),
            "mul" => Ok(SeparationStrategy::Mul),
            other => Err(CasError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for SeparationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparationStrategy::Add => write!(f, "add"),
            SeparationStrategy::Mul => write!(f, "mul"),
        }
    }
}

/// Separate `eq` by substituting `fun` with the sum or product of `sep`.
///
/// On success the equation is rewritten as `lhs = rhs` where `lhs` depends
/// only on the first argument of the first function in `sep` and `rhs` only
/// on the remaining arguments. `Ok(None)` means the equation does not
/// separate with this strategy.
///
/// ```
/// use eqsolve::{parse_equation, parse_expr, pde_separate_mul};
///
/// let eq = parse_equation("Derivative(u(x, t), x, 2) = Derivative(u(x, t), t, 2)").unwrap();
/// let u = parse_expr("u(x, t)").unwrap();
/// let sep = [parse_expr("X(x)").unwrap(), parse_expr("T(t)").unwrap()];
/// let (lhs, rhs) = pde_separate_mul(&eq, &u, &sep).unwrap().unwrap();
/// assert_eq!(lhs.to_string(), "Derivative(X(x), (x, 2))/X(x)");
/// assert_eq!(rhs.to_string(), "Derivative(T(t), (t, 2))/T(t)");
/// ```
pub fn pde_separate(
    eq: &Equation,
    fun: &Expr,
    sep: &[Expr],
    strategy: SeparationStrategy,
) -> Result<Option<(Expr, Expr)>> {
    let original = applied_symbols(fun)?;
    let mut substituted = Vec::new();
    for function in sep {
        substituted.extend(applied_symbols(function)?);
    }
    if substituted.len() != original.len() {
        return Err(CasError::VariableCountMismatch {
            expected: original.len(),
            found: substituted.len(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(dup) = substituted.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(CasError::DuplicateArguments(dup.clone()));
    }
    let original_set: HashSet<&str> = original.iter().map(String::as_str).collect();
    if seen != original_set {
        return Err(CasError::ArgumentMismatch);
    }

    let functions = match strategy {
        SeparationStrategy::Add => simplify_sum(sep.to_vec()),
        SeparationStrategy::Mul => simplify_product(sep.to_vec()),
    };
    let mut result = simplify(doit(&substitute_function(&eq.residual(), fun, &functions)));
    if strategy == SeparationStrategy::Mul {
        result = simplify_sum(
            flatten_sum(&result)
                .into_iter()
                .map(|term| simplify_div(term, functions.clone()))
                .collect(),
        );
    }
    debug!("separating {result} = 0 with strategy {strategy}");

    let Some((dep, others)) = substituted.split_first() else {
        return Err(CasError::InvalidArgument(
            "no functions to separate into".to_string(),
        ));
    };
    Ok(separate(&result, dep, others))
}

/// [`pde_separate`] with `u = X + T + ...`.
pub fn pde_separate_add(eq: &Equation, fun: &Expr, sep: &[Expr]) -> Result<Option<(Expr, Expr)>> {
    pde_separate(eq, fun, sep, SeparationStrategy::Add)
}

/// [`pde_separate`] with `u = X * T * ...`.
pub fn pde_separate_mul(eq: &Equation, fun: &Expr, sep: &[Expr]) -> Result<Option<(Expr, Expr)>> {
    pde_separate(eq, fun, sep, SeparationStrategy::Mul)
}

/// Argument names of an applied function whose arguments are all symbols.
fn applied_symbols(expr: &Expr) -> Result<Vec<String>> {
    let Expr::Func(name, args) = expr else {
        return Err(CasError::InvalidArgument(format!(
            "expected an applied function, found {expr}"
        )));
    };
    args.iter()
        .map(|arg| {
            arg.as_variable().map(str::to_string).ok_or_else(|| {
                CasError::InvalidArgument(format!("argument {arg} of {name} is not a symbol"))
            })
        })
        .collect()
}

fn separate(eq: &Expr, dep: &str, others: &[String]) -> Option<(Expr, Expr)> {
    let mut eq = eq.clone();

    // Terms carrying a derivative in `dep` alone fix the common divisor.
    let mut divisors: Vec<Expr> = Vec::new();
    for term in flatten_sum(&eq) {
        let anchored = flatten_mul(&split_coeff(&term).1)
            .iter()
            .any(|f| matches!(f, Expr::Derivative(_, _)) && !f.has_any(others));
        if !anchored {
            continue;
        }
        let (ext, sep) = as_independent(&term, dep);
        if sep.has_any(others) {
            return None;
        }
        if !divisors.contains(&ext) {
            divisors.push(ext);
        }
    }
    if !divisors.is_empty() {
        eq = simplify_sum(
            flatten_sum(&eq)
                .into_iter()
                .map(|term| {
                    simplify_sum(
                        divisors
                            .iter()
                            .map(|d| simplify_div(term.clone(), d.clone()))
                            .collect(),
                    )
                })
                .collect(),
        );
    }

    let mut lhs = zero();
    let mut rhs = zero();
    let mut divisors: Vec<Expr> = Vec::new();
    for term in flatten_sum(&eq) {
        if !term.has_any(others) {
            lhs = simplify_add(lhs, term);
            continue;
        }
        let (_, sep) = as_independent(&term, dep);
        if sep.has_any(others) {
            trace!("{term} does not split between {dep} and {others:?}");
            return None;
        }
        if !divisors.contains(&sep) {
            divisors.push(sep);
        }
        rhs = simplify_sub(rhs, term);
    }

    let full = if divisors.is_empty() {
        one()
    } else {
        simplify_sum(divisors)
    };
    debug!("dividing both sides by {full}");
    let lhs = simplify(simplify_div(lhs, full.clone()));
    let rhs = simplify(simplify_div(rhs, full));
    if lhs.has_any(others) || rhs.has_symbol(dep) {
        return None;
    }
    Some((lhs, rhs))
}

/// Split a term into the factor free of `dep` and the factor depending on
/// it. Exponentials of sums are split first, so `exp(X(x) + T(t))` gives
/// `exp(T(t))` and `exp(X(x))`.
fn as_independent(term: &Expr, dep: &str) -> (Expr, Expr) {
    let (coeff, base) = split_coeff(term);
    let mut independent = vec![Expr::rational(coeff)];
    let mut dependent = Vec::new();
    for factor in flatten_mul(&base) {
        if let Expr::Exp(arg) = &factor {
            let (with, without): (Vec<Expr>, Vec<Expr>) =
                flatten_sum(arg).into_iter().partition(|t| t.has_symbol(dep));
            independent.push(simplify_exp(simplify_sum(without)));
            dependent.push(simplify_exp(simplify_sum(with)));
        } else if factor.has_symbol(dep) {
            dependent.push(factor);
        } else {
            independent.push(factor);
        }
    }
    (simplify_product(independent), simplify_product(dependent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_equation, parse_expr};
    use pretty_assertions::assert_eq;

    fn e(input: &str) -> Expr {
        parse_expr(input).expect("parse")
    }

    #[test]
    fn strategies_parse_from_names() {
        assert_eq!("add".parse::<SeparationStrategy>(), Ok(SeparationStrategy::Add));
        assert_eq!("mul".parse::<SeparationStrategy>(), Ok(SeparationStrategy::Mul));
        assert_eq!(
            "div".parse::<SeparationStrategy>(),
            Err(CasError::UnknownStrategy("div".to_string()))
        );
    }

    #[test]
    fn exponentials_of_sums_split() {
        let (ind, dep) = as_independent(&simplify(e("-exp(X(x) + T(t))*D(T(t), t)")), "x");
        assert_eq!(dep, e("exp(X(x))"));
        assert_eq!(ind, simplify(e("-exp(T(t))*D(T(t), t)")));
    }

    #[test]
    fn validation_rejects_bad_arguments() {
        let eq = parse_equation("D(u(x, t), x) = D(u(x, t), t)").expect("parse");
        let u = e("u(x, t)");
        assert_eq!(
            pde_separate_add(&eq, &u, &[e("X(x)")]),
            Err(CasError::VariableCountMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            pde_separate_add(&eq, &u, &[e("X(x)"), e("T(x)")]),
            Err(CasError::DuplicateArguments("x".to_string()))
        );
        assert_eq!(
            pde_separate_add(&eq, &u, &[e("X(x)"), e("Y(y)")]),
            Err(CasError::ArgumentMismatch)
        );
        assert!(matches!(
            pde_separate_add(&eq, &e("x"), &[e("X(x)")]),
            Err(CasError::InvalidArgument(_))
        ));
    }
}
