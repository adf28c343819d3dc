use eqsolve::simplify::{as_numer_denom, count_ops, expand, substitute_function, together};
use eqsolve::{
    Expr, doit, expand_complex, expand_log, expand_trig, parse_expr, pretty_solutions, simplify,
    simplify_fully, simplify_with_limit, substitute,
};
use pretty_assertions::assert_eq;

fn e(input: &str) -> Expr {
    parse_expr(input).unwrap_or_else(|err| panic!("failed to parse {input}: {err}"))
}

fn assert_simplifies(input: &str, expected: &str) {
    assert_eq!(
        simplify_fully(e(input)),
        simplify_fully(e(expected)),
        "simplify {input}"
    );
}

#[test]
fn like_terms_and_powers() {
    assert_simplifies("x*(x+1) - x*x", "x");
    assert_simplifies("x + x + 2*y - y", "2*x + y");
    assert_simplifies("x^2*x^3/x", "x^4");
    assert_eq!(simplify(e("x - x")), Expr::integer(0));
}

#[test]
fn radicals_and_imaginary_unit() {
    assert_simplifies("sqrt(12)", "2*sqrt(3)");
    assert_simplifies("sqrt(-9)", "3*I");
    assert_simplifies("I^4 + I^2", "0");
}

#[test]
fn exponentials_and_logarithms() {
    assert_simplifies("exp(x)*exp(-x)", "1");
    assert_simplifies("exp(log(y))", "y");
    assert_simplifies("log(exp(y))", "y");
}

#[test]
fn special_trig_values() {
    assert_simplifies("sin(pi)", "0");
    assert_simplifies("cos(pi/3)", "1/2");
    assert_simplifies("acos(1/2)", "pi/3");
}

#[test]
fn common_denominator() {
    let (numer, denom) = as_numer_denom(&e("1/x + 1/y"));
    assert_eq!(numer, simplify(e("x + y")));
    assert_eq!(denom, simplify(e("x*y")));
    assert_eq!(simplify(together(&e("x/2"))), simplify(e("x/2")));
}

#[test]
fn expansion_and_operation_counts() {
    assert_eq!(expand(&e("(x + y)^2")), simplify(e("x^2 + 2*x*y + y^2")));
    assert_eq!(count_ops(&e("sin(x) + 1")), 2);
}

#[test]
fn substitution_reaches_inside_derivatives() {
    let u = e("u(x, t)");
    let pde = e("Derivative(u(x, t), x) - u(x, t)");
    let replaced = substitute_function(&pde, &u, &e("X(x)*T(t)"));
    assert_eq!(
        simplify(doit(&replaced)),
        simplify(e("T(t)*Derivative(X(x), x) - X(x)*T(t)"))
    );
    assert_eq!(simplify(substitute(&e("x^2 + y"), "x", &e("3"))), simplify(e("9 + y")));
}

#[test]
fn iteration_limit_stops_early() {
    let input = e("x + x");
    assert_eq!(simplify_with_limit(input.clone(), 0), input);
    assert_eq!(simplify_with_limit(input.clone(), 1), simplify_fully(input));
}

#[test]
fn expansion_hints() {
    assert_eq!(expand_log(&e("log(x*y^3)")), simplify(e("log(x) + 3*log(y)")));
    assert_eq!(expand_log(&e("log(x + y)")), simplify(e("log(x + y)")));
    assert_eq!(
        expand_trig(&e("cos(x + y)")),
        simplify(e("cos(x)*cos(y) - sin(x)*sin(y)"))
    );
    assert_eq!(expand_complex(&e("exp(2 + I*y)")), simplify(e("exp(2)*cos(y) + I*exp(2)*sin(y)")));
}

#[test]
fn solution_lines() {
    assert_eq!(
        pretty_solutions("x", &[Expr::integer(-2), Expr::integer(2)]),
        vec!["x = -2".to_string(), "x = 2".to_string()]
    );
    assert_eq!(pretty_solutions("y", &[]), vec!["No solutions for y.".to_string()]);
}
