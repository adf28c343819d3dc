use eqsolve::prelude::{solve_eqs, solve_system_eqs};
use eqsolve::{Expr, LinearResult, NonLinearStatus, Rational, SolveResult};
use pretty_assertions::assert_eq;

fn q(n: i64, d: i64) -> Expr {
    Expr::rational(Rational::new(n.into(), d.into()))
}

#[test]
fn unique_linear_solution() {
    let result = solve_system_eqs(&["x", "y"], &["2*x + 3*y = 7", "x - 4*y = 1"]).expect("parse");
    let SolveResult::Linear(LinearResult::Unique(solution)) = result else {
        panic!("expected a unique solution, got {result:?}");
    };
    assert_eq!(solution.values, vec![q(31, 11), q(5, 11)]);
    assert_eq!(solution.diagnostics.rank, 2);
    assert_eq!(solution.diagnostics.determinant, Some(Rational::from_integer((-11).into())));
}

#[test]
fn underdetermined_system_has_parameters() {
    let result = solve_system_eqs(&["x", "y"], &["x + y = 1", "2*x + 2*y = 2"]).expect("parse");
    let SolveResult::Linear(LinearResult::Infinite(family)) = result else {
        panic!("expected a family, got {result:?}");
    };
    assert_eq!(family.params, vec!["t1".to_string()]);
    assert_eq!(family.diagnostics.free_columns, vec![1]);
}

#[test]
fn contradictory_system_is_inconsistent() {
    let result = solve_system_eqs(&["x", "y"], &["x + y = 1", "x + y = 2"]).expect("parse");
    assert!(matches!(
        result,
        SolveResult::Linear(LinearResult::Inconsistent(_))
    ));
}

#[test]
fn nonlinear_system_by_substitution() {
    let result = solve_system_eqs(&["x", "y"], &["y = x^2", "y = 4"]).expect("parse");
    let SolveResult::NonLinear(info) = result else {
        panic!("expected a non-linear result, got {result:?}");
    };
    assert_eq!(info.status, NonLinearStatus::Solved);
    assert_eq!(info.nonlinear_equations, vec![0]);
    assert_eq!(
        info.solutions,
        vec![
            vec![Expr::integer(-2), Expr::integer(4)],
            vec![Expr::integer(2), Expr::integer(4)],
        ]
    );
}

#[test]
fn single_variable_nonlinear_system() {
    let result = solve_system_eqs(&["x"], &["x^2 = 4"]).expect("parse");
    let SolveResult::NonLinear(info) = result else {
        panic!("expected a non-linear result, got {result:?}");
    };
    assert_eq!(info.status, NonLinearStatus::Solved);
    assert_eq!(info.solutions, vec![vec![Expr::integer(-2)], vec![Expr::integer(2)]]);
}

#[test]
fn unsolvable_step_leaves_system_unsolved() {
    let result = solve_system_eqs(&["x", "y"], &["x*exp(x) + y = 1", "y = 2"]).expect("parse");
    let SolveResult::NonLinear(info) = result else {
        panic!("expected a non-linear result, got {result:?}");
    };
    assert_eq!(info.status, NonLinearStatus::Unsolved);
    assert!(info.solutions.is_empty());
}

#[test]
fn rendered_lines() {
    let lines = solve_eqs(&["x", "y"], &["2*x + 3*y = 7", "x - 4*y = 1"]).expect("parse");
    assert_eq!(lines[0], "Unique solution:");
    assert_eq!(lines[1], "x = 31/11");
    assert_eq!(lines[2], "y = 5/11");
}
