//! String-based UI helpers for quick usage and rendering.

use crate::calculus::differentiate as differentiate_expr;
use crate::error::Result;
use crate::expr::{Equation, Expr};
use crate::format::{pretty, pretty_solutions, pretty_solve_result};
use crate::parser::{parse_equation, parse_expr};
use crate::pde::{SeparationStrategy, pde_separate};
use crate::simplify::simplify_fully;
use crate::solver::{
    SolveResult, dsolve as dsolve_expr, solve_equation, solve_system as solve_system_expr,
};

pub fn parse(input: &str) -> Result<Expr> {
    parse_expr(input)
}

pub fn differentiate(input: &str, var: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(differentiate_expr(var, &expr)))
}

pub fn diff(input: &str, var: &str) -> Result<String> {
    Ok(pretty(&differentiate(input, var)?))
}

pub fn simplify(input: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(expr))
}

pub fn simp(input: &str) -> Result<String> {
    Ok(pretty(&simplify(input)?))
}

/// Roots of `input` in `var`; `input` may be an equation `lhs = rhs`.
pub fn roots(input: &str, var: &str) -> Result<Vec<Expr>> {
    solve_equation(&parse_equation(input)?, var)
}

pub fn solve(input: &str, var: &str) -> Result<Vec<String>> {
    Ok(pretty_solutions(var, &roots(input, var)?))
}

pub fn solve_system(vars: &[&str], equations: &[(&str, &str)]) -> Result<SolveResult> {
    let parsed: Vec<Equation> = equations
        .iter()
        .map(|(lhs, rhs)| Ok(Equation::new(parse_expr(lhs)?, parse_expr(rhs)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(solve_system_expr(vars.to_vec(), parsed))
}

pub fn solve_system_eqs(vars: &[&str], equations: &[&str]) -> Result<SolveResult> {
    let parsed: Vec<Equation> = equations
        .iter()
        .map(|eq| parse_equation(eq))
        .collect::<Result<Vec<_>>>()?;

    Ok(solve_system_expr(vars.to_vec(), parsed))
}

pub fn solve_eqs(vars: &[&str], equations: &[&str]) -> Result<Vec<String>> {
    let result = solve_system_eqs(vars, equations)?;
    Ok(pretty_solve_result(&result))
}

/// General solution of an ODE such as `Derivative(f(x), x, 2) + f(x) = 0`.
pub fn dsolve(input: &str, function: &str) -> Result<String> {
    let solution = dsolve_expr(&parse_equation(input)?, &parse_expr(function)?)?;
    Ok(solution.to_string())
}

/// Separate a PDE, e.g. `separate("D(u(x, t), x) = D(u(x, t), t)", "u(x, t)",
/// &["X(x)", "T(t)"], "add")`.
pub fn separate(
    input: &str,
    fun: &str,
    sep: &[&str],
    strategy: &str,
) -> Result<Option<(String, String)>> {
    let strategy: SeparationStrategy = strategy.parse()?;
    let eq = parse_equation(input)?;
    let fun = parse_expr(fun)?;
    let sep: Vec<Expr> = sep
        .iter()
        .map(|s| parse_expr(s))
        .collect::<Result<Vec<_>>>()?;
    Ok(pde_separate(&eq, &fun, &sep, strategy)?.map(|(lhs, rhs)| (pretty(&lhs), pretty(&rhs))))
}
