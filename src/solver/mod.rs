//! Equation solving: univariate roots, linear and substitution-solvable
//! systems, and constant-coefficient ODEs.

mod check;
mod generators;
mod invert;
mod ode;
mod roots;
mod system;

use std::cmp::Ordering;

use log::{debug, trace};

use crate::calculus::doit;
use crate::error::{CasError, Result};
use crate::eval::evaluate_constant;
use crate::expr::{Equation, Expr};
use crate::polynomial::{Poly, Polynomial};
use crate::simplify::{as_numer_denom, simplify, substitute};

pub use check::check_solution;
pub use generators::GeneratorForm;
pub use ode::dsolve;
pub use roots::{rational_polynomial_roots, symbolic_polynomial_roots};
pub use system::{
    LinearDiagnostics, LinearFamily, LinearInconsistent, LinearResult, LinearSolution,
    NonLinearResult, NonLinearStatus, SolveResult, solve_system,
};

/// Nested dispatches beyond this depth give up with `Unsupported`.
const MAX_DEPTH: usize = 12;

/// Knobs for [`solve_with`].
#[derive(Clone, Debug)]
pub struct SolveOptions {
    /// Verify every candidate and drop those that do not satisfy the equation.
    pub check: bool,
    /// Simplify the returned roots.
    pub simplify: bool,
    /// Absolute tolerance for numeric verification, scaled by the size of the root.
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            check: true,
            simplify: true,
            tolerance: 1e-9,
        }
    }
}

/// Shape of a normalized equation, deciding which method solves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquationKind {
    /// The unknown does not occur.
    Independent,
    /// Polynomial with rational coefficients.
    Polynomial { degree: usize },
    /// Polynomial whose coefficients involve other symbols.
    SymbolicPolynomial { degree: usize },
    /// The unknown occurs in a denominator.
    Rational,
    /// A product of several factors that depend on the unknown.
    Product,
    /// Polynomial in a single non-trivial generator.
    Generator { generator: Expr },
    /// The unknown occurs once and can be isolated.
    Invertible,
    Unsupported,
}

/// Classify an already simplified equation `expr = 0`.
pub fn classify(expr: &Expr, symbol: &str) -> EquationKind {
    if !expr.has_symbol(symbol) {
        return EquationKind::Independent;
    }
    if let Some(degree) = Poly::from_expr(expr, symbol).and_then(|p| p.degree()) {
        return EquationKind::Polynomial { degree };
    }
    if let Some(poly) = Polynomial::<Expr>::from_expr(expr, symbol) {
        let poly = poly.simplified();
        if poly.coefficients_free_of(symbol) {
            if let Some(degree) = poly.degree() {
                return EquationKind::SymbolicPolynomial { degree };
            }
        }
    }
    let (_, denom) = as_numer_denom(expr);
    if denom.has_symbol(symbol) {
        return EquationKind::Rational;
    }
    if generators::dependent_factors(expr, symbol).len() > 1 {
        return EquationKind::Product;
    }
    if occurrences(expr, symbol) == 1 {
        return EquationKind::Invertible;
    }
    if let Some(form) = generators::find_generator(expr, symbol) {
        return EquationKind::Generator {
            generator: form.generator,
        };
    }
    EquationKind::Unsupported
}

/// Solve `expr = 0` for `symbol` with default options.
///
/// ```
/// use eqsolve::{parse_expr, solve, Expr};
///
/// let roots = solve(&parse_expr("x^2 - 1").unwrap(), "x").unwrap();
/// assert_eq!(roots, vec![Expr::integer(-1), Expr::integer(1)]);
/// ```
pub fn solve(expr: &Expr, symbol: &str) -> Result<Vec<Expr>> {
    solve_with(expr, symbol, &SolveOptions::default())
}

/// Solve `lhs = rhs` for `symbol`.
pub fn solve_equation(equation: &Equation, symbol: &str) -> Result<Vec<Expr>> {
    solve(&equation.residual(), symbol)
}

/// Solve `expr = 0` for `symbol`.
///
/// Returns the distinct roots: numeric ones first, real before complex and
/// each group in ascending order, then symbolic roots in discovery order.
/// An equation free of `symbol` has no roots unless it is identically zero,
/// which is reported as [`CasError::Indeterminate`].
pub fn solve_with(expr: &Expr, symbol: &str, options: &SolveOptions) -> Result<Vec<Expr>> {
    let evaluated = doit(expr);
    let normalized = simplify(evaluated.clone());
    debug!("solving {normalized} = 0 for {symbol}");
    if !normalized.has_symbol(symbol) {
        return if normalized.is_zero() {
            Err(CasError::Indeterminate {
                symbol: symbol.to_string(),
            })
        } else {
            Ok(Vec::new())
        };
    }

    let mut candidates = match solve_factors(&evaluated, symbol, options)? {
        Some(roots) => roots,
        None => solve_inner(&normalized, symbol, options, 0)?,
    };
    if options.simplify {
        candidates = candidates.into_iter().map(simplify).collect();
    }
    if options.check {
        candidates.retain(|c| {
            let keep = check_solution(&normalized, symbol, c, options.tolerance);
            if !keep {
                trace!("dropping spurious root {c}");
            }
            keep
        });
    }
    Ok(order_roots(candidates, options.tolerance))
}

/// Dispatch on the shape of `expr`. Candidates are not verified here.
pub(crate) fn solve_inner(
    expr: &Expr,
    symbol: &str,
    options: &SolveOptions,
    depth: usize,
) -> Result<Vec<Expr>> {
    if depth > MAX_DEPTH {
        return Err(CasError::Unsupported(format!(
            "gave up isolating {symbol} after {MAX_DEPTH} rewrites"
        )));
    }
    let expr = simplify(expr.clone());
    let kind = classify(&expr, symbol);
    debug!("{expr} = 0 classified as {kind:?}");

    match kind {
        EquationKind::Independent => {
            if expr.is_zero() {
                Err(CasError::Indeterminate {
                    symbol: symbol.to_string(),
                })
            } else {
                Ok(Vec::new())
            }
        }
        EquationKind::Polynomial { .. } => match Poly::from_expr(&expr, symbol) {
            Some(poly) => rational_polynomial_roots(&poly),
            None => Ok(Vec::new()),
        },
        EquationKind::SymbolicPolynomial { .. } => {
            match Polynomial::<Expr>::from_expr(&expr, symbol) {
                Some(poly) => symbolic_polynomial_roots(&poly.simplified()),
                None => Ok(Vec::new()),
            }
        }
        EquationKind::Rational => {
            let (numer, denom) = as_numer_denom(&expr);
            let roots = solve_inner(&numer, symbol, options, depth + 1)?;
            Ok(roots
                .into_iter()
                .filter(|root| {
                    let pole = simplify(substitute(&denom, symbol, root)).is_zero();
                    if pole {
                        trace!("discarding {root}: pole of {denom}");
                    }
                    !pole
                })
                .collect())
        }
        EquationKind::Product => {
            let mut roots = Vec::new();
            for factor in generators::dependent_factors(&expr, symbol) {
                roots.extend(solve_inner(&factor, symbol, options, depth + 1)?);
            }
            Ok(roots)
        }
        EquationKind::Generator { .. } => {
            let Some(form) = generators::find_generator(&expr, symbol) else {
                return Err(unsupported(&expr, symbol));
            };
            debug!("substituting {} = {}", form.dummy, form.generator);
            let values = solve_inner(&form.substituted, &form.dummy, options, depth + 1)?;
            let mut roots = Vec::new();
            for value in values {
                roots.extend(invert::isolate(
                    &form.generator,
                    value,
                    symbol,
                    options,
                    depth + 1,
                )?);
            }
            Ok(roots)
        }
        EquationKind::Invertible => {
            invert::isolate(&expr, Expr::integer(0), symbol, options, depth)
        }
        EquationKind::Unsupported => Err(unsupported(&expr, symbol)),
    }
}

/// Roots of a product, taken factor by factor before simplification
/// multiplies the factors out. Factors no method solves are skipped as long
/// as another factor is solved; `None` when there is nothing to split.
fn solve_factors(expr: &Expr, symbol: &str, options: &SolveOptions) -> Result<Option<Vec<Expr>>> {
    let factors = generators::dependent_factors(expr, symbol);
    if factors.len() < 2 {
        return Ok(None);
    }
    let mut roots = Vec::new();
    let mut solved = false;
    let mut skipped = None;
    for factor in factors {
        match solve_inner(&factor, symbol, options, 1) {
            Ok(found) => {
                solved = true;
                roots.extend(found);
            }
            Err(CasError::Unsupported(reason)) => {
                debug!("skipping factor {factor}: {reason}");
                skipped = Some(CasError::Unsupported(reason));
            }
            Err(err) => return Err(err),
        }
    }
    match skipped {
        Some(err) if !solved => Err(err),
        _ => Ok(Some(roots)),
    }
}

fn unsupported(expr: &Expr, symbol: &str) -> CasError {
    CasError::Unsupported(format!("no method solves {expr} = 0 for {symbol}"))
}

/// Number of times `symbol` appears as a leaf.
fn occurrences(expr: &Expr, symbol: &str) -> usize {
    match expr {
        Expr::Variable(v) => usize::from(v == symbol),
        Expr::Derivative(inner, vars) => {
            occurrences(inner, symbol) + vars.iter().filter(|v| *v == symbol).count()
        }
        other => other
            .children()
            .into_iter()
            .map(|c| occurrences(c, symbol))
            .sum(),
    }
}

/// Remove duplicates and sort: real numeric roots ascending, then complex
/// numeric roots by real and imaginary part, then symbolic roots as found.
fn order_roots(roots: Vec<Expr>, tolerance: f64) -> Vec<Expr> {
    let mut numeric = Vec::new();
    let mut symbolic: Vec<Expr> = Vec::new();
    for root in roots {
        match evaluate_constant(&root) {
            Some(value) => {
                let duplicate = numeric
                    .iter()
                    .any(|(_, v): &(Expr, num_complex::Complex64)| (v - value).norm() <= tolerance);
                if !duplicate {
                    numeric.push((root, value));
                }
            }
            None => {
                if !symbolic.contains(&root) {
                    symbolic.push(root);
                }
            }
        }
    }

    let is_real = |v: &num_complex::Complex64| v.im.abs() <= tolerance;
    numeric.sort_by(|(_, a), (_, b)| {
        is_real(b)
            .cmp(&is_real(a))
            .then(a.re.partial_cmp(&b.re).unwrap_or(Ordering::Equal))
            .then(a.im.partial_cmp(&b.im).unwrap_or(Ordering::Equal))
    });
    numeric
        .into_iter()
        .map(|(root, _)| root)
        .chain(symbolic)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn kind(input: &str) -> EquationKind {
        classify(&simplify(parse_expr(input).expect("parse")), "x")
    }

    #[test]
    fn classification_follows_equation_shape() {
        assert_eq!(kind("x^2 - 1"), EquationKind::Polynomial { degree: 2 });
        assert_eq!(kind("a*x + b"), EquationKind::SymbolicPolynomial { degree: 1 });
        assert_eq!(kind("1/x - 2"), EquationKind::Rational);
        assert_eq!(kind("log(x) - 1"), EquationKind::Invertible);
        assert_eq!(kind("y + 1"), EquationKind::Independent);
        assert_eq!(kind("x*exp(x) - 1"), EquationKind::Unsupported);
        assert!(matches!(kind("exp(2*x) - exp(x)"), EquationKind::Generator { .. }));
    }

    #[test]
    fn ordering_puts_real_roots_first() {
        let roots = vec![Expr::I, Expr::integer(2), Expr::var("a"), Expr::integer(-3)];
        assert_eq!(
            order_roots(roots, 1e-9),
            vec![Expr::integer(-3), Expr::integer(2), Expr::I, Expr::var("a")]
        );
    }
}
