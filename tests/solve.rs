use approx::assert_relative_eq;
use eqsolve::{
    CasError, EquationKind, Expr, SolveOptions, classify, evaluate_constant, parse_equation,
    parse_expr, simplify, solve, solve_equation, solve_with,
};
use pretty_assertions::assert_eq;

fn e(input: &str) -> Expr {
    parse_expr(input).unwrap_or_else(|err| panic!("failed to parse {input}: {err}"))
}

fn roots_of(input: &str) -> Vec<Expr> {
    solve(&e(input), "x").unwrap_or_else(|err| panic!("failed to solve {input}: {err}"))
}

fn assert_roots(input: &str, expected: &[&str]) {
    let expected: Vec<Expr> = expected.iter().map(|s| simplify(e(s))).collect();
    assert_eq!(roots_of(input), expected, "roots of {input}");
}

#[test]
fn difference_of_squares_in_ascending_order() {
    assert_eq!(roots_of("x**2 - 1"), vec![Expr::integer(-1), Expr::integer(1)]);
}

#[test]
fn polynomial_roots() {
    assert_roots("2*x - 3", &["3/2"]);
    assert_roots("x^2 - 2", &["-sqrt(2)", "sqrt(2)"]);
    assert_roots("x^2 + 1", &["-I", "I"]);
    assert_roots("(x - 2)^3", &["2"]);
    assert_roots("x^3 - x", &["-1", "0", "1"]);
    assert_roots("x^4 - 1", &["-1", "1", "-I", "I"]);
}

#[test]
fn cube_roots_through_power_reduction() {
    let roots = roots_of("x^3 - 2");
    assert_eq!(roots.len(), 3);
    let real = evaluate_constant(&roots[0]).expect("numeric root");
    assert_relative_eq!(real.re, 2f64.cbrt(), epsilon = 1e-12);
    assert_relative_eq!(real.im, 0.0, epsilon = 1e-12);
}

#[test]
fn rational_equations_skip_poles() {
    assert_roots("(x^2 - 1)/(x - 1)", &["-1"]);
    assert_roots("1/x - 2", &["1/2"]);
    assert_roots("1/x", &[]);
}

#[test]
fn transcendental_equations_invert() {
    assert_roots("exp(x) - 2", &["log(2)"]);
    assert_roots("log(x) - 1", &["E"]);
    assert_roots("sin(x) - 1/2", &["pi/6", "5*pi/6"]);
    assert_roots("abs(x) - 2", &["-2", "2"]);
    assert_roots("sqrt(x) - 3", &["9"]);
}

#[test]
fn spurious_roots_are_dropped() {
    assert_roots("sqrt(x) + 1", &[]);
    let unchecked = SolveOptions {
        check: false,
        ..SolveOptions::default()
    };
    assert_eq!(
        solve_with(&e("sqrt(x) + 1"), "x", &unchecked).expect("solve"),
        vec![Expr::integer(1)]
    );
}

#[test]
fn generator_substitution() {
    assert_roots("exp(2*x) - 3*exp(x) + 2", &["0", "log(2)"]);
    assert_roots("x - 3*sqrt(x) + 2", &["1", "4"]);
}

#[test]
fn products_split_into_factors() {
    assert_roots("x*sin(x)", &["0", "pi"]);
}

#[test]
fn factored_products_are_solved_before_expansion() {
    assert_roots("(x - 1)*(x + exp(x))", &["1"]);
    assert_roots("(x - 2)*(exp(x) - 1)", &["0", "2"]);
}

#[test]
fn exponentials_with_rational_bases_give_exact_exponents() {
    assert_roots("2^x - 8", &["3"]);
    assert_roots("4^x - 2", &["1/2"]);
    assert_roots("2^x - 3", &["log(3)/log(2)"]);
}

#[test]
fn fractional_powers_respect_the_principal_branch() {
    assert_roots("sqrt(x) - I*sqrt(pi)", &["-pi"]);
    assert_roots("sqrt(x) - 1 - I", &["2*I"]);
    assert_roots("x^(1/3) - 1 + I*sqrt(3)", &[]);
}

#[test]
fn symbolic_coefficients() {
    assert_roots("a*x + b", &["-b/a"]);
    assert_roots("x^2 - a", &["-sqrt(a)", "sqrt(a)"]);
    let roots = roots_of("x^2 + b*x + a");
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|r| r.has_symbol("a") && r.has_symbol("b")));
}

#[test]
fn equations_with_both_sides() {
    let eq = parse_equation("x^2 = 4").expect("parse");
    assert_eq!(
        solve_equation(&eq, "x").expect("solve"),
        vec![Expr::integer(-2), Expr::integer(2)]
    );
}

#[test]
fn independent_equations() {
    assert_roots("y + 1", &[]);
    assert_eq!(
        solve(&e("x - x"), "x"),
        Err(CasError::Indeterminate {
            symbol: "x".to_string()
        })
    );
}

#[test]
fn unsupported_equations_report_an_error() {
    assert!(matches!(
        solve(&e("x*exp(x) - 1"), "x"),
        Err(CasError::Unsupported(_))
    ));
    assert!(matches!(
        solve(&e("x^5 - x - 1"), "x"),
        Err(CasError::Unsupported(_))
    ));
}

#[test]
fn classification_is_public() {
    let expr = simplify(e("x^3 + 1"));
    assert_eq!(classify(&expr, "x"), EquationKind::Polynomial { degree: 3 });
}
