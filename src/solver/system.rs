//! Systems of equations: exact Gauss-Jordan elimination for linear systems
//! and successive substitution for the rest.

use std::collections::HashMap;

use log::{debug, trace};
use num_traits::Zero;

use crate::expr::{Equation, Expr, Rational};
use crate::simplify::{flatten_sum, simplify, split_coeff, substitute};
use crate::solver::{SolveOptions, solve_with};

#[derive(Debug, Clone)]
pub enum SolveResult {
    Linear(LinearResult),
    NonLinear(NonLinearResult),
}

#[derive(Debug, Clone)]
pub enum LinearResult {
    Unique(LinearSolution),
    Infinite(LinearFamily),
    Inconsistent(LinearInconsistent),
}

#[derive(Debug, Clone)]
pub struct LinearSolution {
    pub variables: Vec<String>,
    pub values: Vec<Expr>,
    pub diagnostics: LinearDiagnostics,
}

/// `particular + sum(params[k] * basis[k])`, one entry per variable.
#[derive(Debug, Clone)]
pub struct LinearFamily {
    pub variables: Vec<String>,
    pub particular: Vec<Expr>,
    pub params: Vec<String>,
    pub basis: Vec<Vec<Expr>>,
    pub diagnostics: LinearDiagnostics,
}

#[derive(Debug, Clone)]
pub struct LinearInconsistent {
    pub diagnostics: LinearDiagnostics,
}

/// What elimination learned about the coefficient matrix. The determinant
/// is only tracked for square systems.
#[derive(Debug, Clone, Default)]
pub struct LinearDiagnostics {
    pub rank: usize,
    pub pivot_rows: Vec<usize>,
    pub pivot_columns: Vec<usize>,
    pub free_columns: Vec<usize>,
    pub determinant: Option<Rational>,
    pub inconsistent_row: Option<usize>,
    pub normalized_equations: Vec<Expr>,
}

/// A system with at least one equation that is not linear with rational
/// coefficients. `solutions` holds one value per variable for each solution
/// found by substitution.
#[derive(Debug, Clone)]
pub struct NonLinearResult {
    pub variables: Vec<String>,
    pub normalized_equations: Vec<Expr>,
    pub nonlinear_equations: Vec<usize>,
    pub solutions: Vec<Vec<Expr>>,
    pub status: NonLinearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonLinearStatus {
    /// Every solution branch was resolved; an empty list means no solution.
    Solved,
    /// Some step had no univariate method that applies.
    Unsolved,
}

/// `coeffs . vars = rhs`
#[derive(Debug, Clone)]
struct LinearRow {
    coeffs: Vec<Rational>,
    rhs: Rational,
}

impl LinearRow {
    /// Read `expr = 0` as a row over `variables`. Any term that is not a
    /// rational multiple of one variable or a constant makes it non-linear.
    fn from_residual(expr: &Expr, variables: &[String]) -> Option<Self> {
        let mut row = LinearRow {
            coeffs: vec![Rational::zero(); variables.len()],
            rhs: Rational::zero(),
        };
        for term in flatten_sum(expr) {
            let (coeff, base) = split_coeff(&term);
            if base.is_one() {
                row.rhs -= coeff;
                continue;
            }
            let name = base.as_variable()?;
            let column = variables.iter().position(|v| v == name)?;
            row.coeffs[column] += coeff;
        }
        Some(row)
    }

    fn scale(&mut self, k: &Rational) {
        for c in &mut self.coeffs {
            *c *= k.clone();
        }
        self.rhs *= k.clone();
    }

    /// `self -= factor * other`
    fn eliminate(&mut self, factor: &Rational, other: &LinearRow) {
        for (c, o) in self.coeffs.iter_mut().zip(&other.coeffs) {
            *c -= factor * o;
        }
        self.rhs -= factor * &other.rhs;
    }
}

/// Solve a system of equations for `vars`.
///
/// Systems linear in `vars` with rational coefficients go through exact
/// Gauss-Jordan elimination and report rank, pivots and determinant.
/// Anything else is solved by repeatedly solving one equation for one
/// variable and substituting the result into the others.
pub fn solve_system(vars: Vec<impl Into<String>>, equations: Vec<Equation>) -> SolveResult {
    let variables: Vec<String> = vars.into_iter().map(Into::into).collect();
    let normalized: Vec<Expr> = equations.iter().map(|eq| simplify(eq.residual())).collect();

    let mut rows = Vec::with_capacity(normalized.len());
    let mut nonlinear = Vec::new();
    for (idx, expr) in normalized.iter().enumerate() {
        match LinearRow::from_residual(expr, &variables) {
            Some(row) => rows.push(row),
            None => nonlinear.push(idx),
        }
    }

    if nonlinear.is_empty() {
        return SolveResult::Linear(solve_linear(variables, rows, normalized));
    }

    debug!("non-linear equations {nonlinear:?}; solving by substitution");
    let (solutions, status) = match substitution_solve(&normalized, &variables) {
        Some(assignments) => (
            assignments
                .into_iter()
                .map(|assignment| {
                    variables
                        .iter()
                        .map(|v| assignment.get(v).cloned().unwrap_or_else(|| Expr::var(v.clone())))
                        .collect()
                })
                .collect(),
            NonLinearStatus::Solved,
        ),
        None => (Vec::new(), NonLinearStatus::Unsolved),
    };
    SolveResult::NonLinear(NonLinearResult {
        variables,
        normalized_equations: normalized,
        nonlinear_equations: nonlinear,
        solutions,
        status,
    })
}

fn solve_linear(variables: Vec<String>, mut rows: Vec<LinearRow>, normalized: Vec<Expr>) -> LinearResult {
    let n = variables.len();
    let mut diagnostics = LinearDiagnostics {
        determinant: (rows.len() == n).then(|| Rational::from_integer(1.into())),
        normalized_equations: normalized,
        ..LinearDiagnostics::default()
    };
    reduce(&mut rows, n, &mut diagnostics);
    diagnostics.free_columns = (0..n)
        .filter(|c| !diagnostics.pivot_columns.contains(c))
        .collect();

    if diagnostics.inconsistent_row.is_some() {
        return LinearResult::Inconsistent(LinearInconsistent { diagnostics });
    }

    let mut particular = vec![Expr::integer(0); n];
    for (&row, &col) in diagnostics.pivot_rows.iter().zip(&diagnostics.pivot_columns) {
        particular[col] = Expr::rational(rows[row].rhs.clone());
    }
    if diagnostics.rank == n {
        return LinearResult::Unique(LinearSolution {
            variables,
            values: particular,
            diagnostics,
        });
    }

    let basis = diagnostics
        .free_columns
        .iter()
        .map(|&free| {
            let mut direction = vec![Expr::integer(0); n];
            direction[free] = Expr::integer(1);
            for (&row, &col) in diagnostics.pivot_rows.iter().zip(&diagnostics.pivot_columns) {
                direction[col] = Expr::rational(-rows[row].coeffs[free].clone());
            }
            direction
        })
        .collect();
    let params = (1..=diagnostics.free_columns.len())
        .map(|k| format!("t{k}"))
        .collect();
    LinearResult::Infinite(LinearFamily {
        variables,
        particular,
        params,
        basis,
        diagnostics,
    })
}

/// Gauss-Jordan elimination in place. Pivot rows end up normalized to a
/// leading one with zeros above and below.
fn reduce(rows: &mut [LinearRow], n_vars: usize, diagnostics: &mut LinearDiagnostics) {
    let mut next = 0;
    for col in 0..n_vars {
        if next == rows.len() {
            break;
        }
        let Some(found) = (next..rows.len()).find(|&r| !rows[r].coeffs[col].is_zero()) else {
            continue;
        };
        if found != next {
            rows.swap(found, next);
            if let Some(det) = diagnostics.determinant.as_mut() {
                *det = -det.clone();
            }
        }
        let pivot = rows[next].coeffs[col].clone();
        if let Some(det) = diagnostics.determinant.as_mut() {
            *det *= pivot.clone();
        }
        rows[next].scale(&pivot.recip());

        let pivot_row = rows[next].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            let factor = row.coeffs[col].clone();
            if r != next && !factor.is_zero() {
                row.eliminate(&factor, &pivot_row);
            }
        }
        trace!("pivot {pivot} at row {next}, column {col}");
        diagnostics.pivot_rows.push(next);
        diagnostics.pivot_columns.push(col);
        next += 1;
    }

    diagnostics.rank = next;
    if next < n_vars {
        if let Some(det) = diagnostics.determinant.as_mut() {
            *det = Rational::zero();
        }
    }
    // Rows past the last pivot have no coefficients left.
    diagnostics.inconsistent_row = (next..rows.len()).find(|&r| !rows[r].rhs.is_zero());
}

/// Depth-first substitution: solve the equation with the fewest unknowns
/// for one of its variables and recurse on the rest. Every level removes a
/// variable. Returns `None` when no equation can be solved for any
/// remaining variable.
fn substitution_solve(
    equations: &[Expr],
    variables: &[String],
) -> Option<Vec<HashMap<String, Expr>>> {
    let mut pending = Vec::new();
    for eq in equations {
        let eq = simplify(eq.clone());
        if eq.is_zero() {
            continue;
        }
        if !eq.has_any(variables) {
            // A nonzero equation free of every unknown has no solution.
            return Some(Vec::new());
        }
        pending.push(eq);
    }
    if pending.is_empty() {
        return Some(vec![HashMap::new()]);
    }

    let unknowns = |eq: &Expr| variables.iter().filter(|v| eq.has_symbol(v)).count();
    let mut order: Vec<usize> = (0..pending.len()).collect();
    order.sort_by_key(|&i| unknowns(&pending[i]));

    let options = SolveOptions::default();
    for &i in &order {
        for var in variables.iter().filter(|v| pending[i].has_symbol(v)) {
            let Ok(values) = solve_with(&pending[i], var, &options) else {
                continue;
            };
            let rest_vars: Vec<String> = variables.iter().filter(|v| *v != var).cloned().collect();
            let mut found = Vec::new();
            let mut complete = true;
            for value in values {
                let rest_eqs: Vec<Expr> = pending
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, eq)| substitute(eq, var, &value))
                    .collect();
                match substitution_solve(&rest_eqs, &rest_vars) {
                    Some(branches) => {
                        for mut assignment in branches {
                            let resolved = assignment
                                .iter()
                                .fold(value.clone(), |acc, (name, v)| substitute(&acc, name, v));
                            assignment.insert(var.clone(), simplify(resolved));
                            found.push(assignment);
                        }
                    }
                    None => complete = false,
                }
            }
            if complete {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn row(input: &str, vars: &[&str]) -> Option<LinearRow> {
        let vars: Vec<String> = vars.iter().map(|v| v.to_string()).collect();
        LinearRow::from_residual(&simplify(parse_expr(input).expect("parse")), &vars)
    }

    #[test]
    fn rows_collect_coefficients_and_constants() {
        let r = row("2*x - y/2 + 3", &["x", "y"]).expect("linear");
        assert_eq!(r.coeffs, vec![Rational::from_integer(2.into()), Rational::new((-1).into(), 2.into())]);
        assert_eq!(r.rhs, Rational::from_integer((-3).into()));
    }

    #[test]
    fn products_and_parameters_are_not_linear() {
        assert!(row("x*y - 1", &["x", "y"]).is_none());
        assert!(row("a*x - 1", &["x"]).is_none());
        assert!(row("x^2", &["x"]).is_none());
    }

    #[test]
    fn single_variable_substitution() {
        let solutions = substitution_solve(&[simplify(parse_expr("x^2 - 4").expect("parse"))], &["x".to_string()])
            .expect("solved");
        let values: Vec<Expr> = solutions.iter().map(|a| a["x"].clone()).collect();
        assert_eq!(values, vec![Expr::integer(-2), Expr::integer(2)]);
    }
}
