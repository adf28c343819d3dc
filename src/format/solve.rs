use crate::expr::Expr;
use crate::solver::{LinearDiagnostics, LinearResult, NonLinearStatus, SolveResult};

use super::pretty;

/// One `symbol = root` line per root, or a single line saying there are none.
pub fn pretty_solutions(symbol: &str, roots: &[Expr]) -> Vec<String> {
    if roots.is_empty() {
        return vec![format!("No solutions for {symbol}.")];
    }
    roots
        .iter()
        .map(|root| format!("{symbol} = {}", pretty(root)))
        .collect()
}

/// Render a `SolveResult` into human-readable lines for CLI/demos.
pub fn pretty_solve_result(result: &SolveResult) -> Vec<String> {
    match result {
        SolveResult::Linear(linear) => pretty_linear_result(linear),
        SolveResult::NonLinear(info) => {
            let mut lines = vec!["Non-linear system.".to_string()];
            if !info.nonlinear_equations.is_empty() {
                lines.push(format!(
                    "Non-linear equations (0-based indices): {:?}",
                    info.nonlinear_equations
                ));
            }
            match info.status {
                NonLinearStatus::Solved => {
                    for (i, solution) in info.solutions.iter().enumerate() {
                        let assignments: Vec<String> = info
                            .variables
                            .iter()
                            .zip(solution)
                            .map(|(var, value)| format!("{var} = {}", pretty(value)))
                            .collect();
                        lines.push(format!("Solution {}: {}", i + 1, assignments.join(", ")));
                    }
                }
                NonLinearStatus::Unsolved => {
                    lines.push("Status: Unsolved".to_string());
                }
            }
            lines
        }
    }
}

fn pretty_linear_result(result: &LinearResult) -> Vec<String> {
    match result {
        LinearResult::Unique(sol) => {
            let mut lines = vec!["Unique solution:".to_string()];
            for (var, value) in sol.variables.iter().zip(sol.values.iter()) {
                lines.push(format!("{var} = {}", pretty(value)));
            }
            push_diag(&mut lines, &sol.diagnostics);
            lines
        }
        LinearResult::Infinite(family) => {
            let mut lines = vec![format!(
                "Infinite solutions (params: {}):",
                family.params.join(", ")
            )];
            for (i, var) in family.variables.iter().enumerate() {
                let mut parts = vec![pretty(&family.particular[i])];
                for (param, basis_vec) in family.params.iter().zip(family.basis.iter()) {
                    let coeff = &basis_vec[i];
                    if !coeff.is_zero() {
                        parts.push(format!("{}*{}", pretty(coeff), param));
                    }
                }
                lines.push(format!("{var} = {}", parts.join(" + ")));
            }
            push_diag(&mut lines, &family.diagnostics);
            lines
        }
        LinearResult::Inconsistent(info) => {
            let mut lines = vec!["No solution (inconsistent system).".to_string()];
            if let Some(row) = info.diagnostics.inconsistent_row {
                lines.push(format!("Inconsistent reduced row index: {row}"));
            }
            push_diag(&mut lines, &info.diagnostics);
            lines
        }
    }
}

fn push_diag(lines: &mut Vec<String>, diag: &LinearDiagnostics) {
    lines.push(format!("Rank: {}", diag.rank));
    if let Some(det) = &diag.determinant {
        lines.push(format!("Determinant: {det}"));
    }
    if !diag.pivot_columns.is_empty() {
        lines.push(format!("Pivot columns: {:?}", diag.pivot_columns));
    }
    if !diag.free_columns.is_empty() {
        lines.push(format!("Free columns: {:?}", diag.free_columns));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root_list_says_so() {
        assert_eq!(pretty_solutions("x", &[]), vec!["No solutions for x."]);
    }

    #[test]
    fn roots_print_one_per_line() {
        let lines = pretty_solutions("x", &[Expr::integer(-1), Expr::integer(1)]);
        assert_eq!(lines, vec!["x = -1", "x = 1"]);
    }
}
