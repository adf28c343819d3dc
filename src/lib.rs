//! Symbolic equation solving: roots of algebraic and transcendental
//! equations, linear and substitution-solvable systems, constant-coefficient
//! ODEs and separation of variables for PDEs.

pub mod calculus;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod parser;
pub mod pde;
pub mod polynomial;
pub mod prelude;
pub mod simplify;
pub mod solver;
pub mod ui;

pub use calculus::{diff, differentiate, doit};
pub use error::{CasError, Result};
pub use eval::{evaluate, evaluate_constant};
pub use expr::{Equation, Expr, Rational, add, div, mul, neg, one, pow, rational, sub, zero};
pub use format::{pretty, pretty_solutions, pretty_solve_result};
pub use parser::{parse_equation, parse_expr};
pub use pde::{SeparationStrategy, pde_separate, pde_separate_add, pde_separate_mul};
pub use polynomial::{Poly, Polynomial};
pub use simplify::{
    ExpandHints, as_numer_denom, count_ops, expand, expand_complex, expand_log, expand_trig,
    simplify, simplify_fully, simplify_with_limit, substitute, substitute_function,
};
pub use solver::{
    EquationKind, LinearDiagnostics, LinearFamily, LinearInconsistent, LinearResult,
    LinearSolution, NonLinearResult, NonLinearStatus, SolveOptions, SolveResult, check_solution,
    classify, dsolve, solve, solve_equation, solve_system, solve_with,
};
