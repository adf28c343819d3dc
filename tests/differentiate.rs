use eqsolve::{Expr, diff, differentiate, doit, parse_expr, simplify_fully};

fn assert_diff_eq(var: &str, input: &str, expected: &str) {
    let expr = parse_expr(input).expect("parse input");
    let got = simplify_fully(differentiate(var, &expr));
    let expected_expr = simplify_fully(parse_expr(expected).expect("parse expected"));
    assert_eq!(got, expected_expr, "d/d{var} {input}");
}

fn assert_doit_eq(input: &str, expected: &str) {
    let got = simplify_fully(doit(&parse_expr(input).expect("parse input")));
    let expected_expr = simplify_fully(parse_expr(expected).expect("parse expected"));
    assert_eq!(got, expected_expr, "doit {input}");
}

#[test]
fn basic_vars_and_constants() {
    assert_diff_eq("x", "x", "1");
    assert_diff_eq("x", "y", "0");
    assert_diff_eq("x", "5", "0");
    assert_diff_eq("x", "pi*x", "pi");
}

#[test]
fn polynomials_and_products() {
    assert_diff_eq("x", "x^3", "3*x^2");
    assert_diff_eq("x", "x*y", "y");
    assert_diff_eq("x", "2*x^2+3*x", "4*x+3");
}

#[test]
fn trig_and_exponentials() {
    assert_diff_eq("x", "sin(x)", "cos(x)");
    assert_diff_eq("x", "cos(x)", "-sin(x)");
    assert_diff_eq("x", "exp(x^2)", "2*x*exp(x^2)");
    assert_diff_eq("x", "log(x)", "1/x");
}

#[test]
fn applied_functions_stay_unevaluated() {
    assert_diff_eq("x", "u(x, t)", "Derivative(u(x, t), x)");
    assert_diff_eq("x", "T(t)", "0");
    assert_diff_eq("t", "Derivative(u(x, t), x)", "Derivative(u(x, t), x, t)");
    assert_diff_eq("x", "exp(X(x))", "exp(X(x))*Derivative(X(x), x)");
}

#[test]
fn repeated_differentiation() {
    let f = parse_expr("f(x)").expect("parse");
    assert_eq!(
        diff(&f, &[("x", 2)]),
        Expr::derivative(f.clone(), ["x", "x"])
    );
    let cube = parse_expr("x^3*y^2").expect("parse");
    assert_eq!(
        simplify_fully(diff(&cube, &[("x", 2), ("y", 1)])),
        simplify_fully(parse_expr("12*x*y").expect("parse"))
    );
}

#[test]
fn doit_evaluates_through_separated_products() {
    assert_doit_eq("Derivative(X(x)*T(t), x, 2)", "T(t)*Derivative(X(x), x, 2)");
    assert_doit_eq("Derivative(X(x) + T(t), t)", "Derivative(T(t), t)");
    assert_doit_eq("Derivative(x^2, x)", "2*x");
    assert_doit_eq("Derivative(u(x, t), x)", "Derivative(u(x, t), x)");
}
