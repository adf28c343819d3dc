use eqsolve::prelude::separate;
use eqsolve::{
    CasError, Equation, Expr, SeparationStrategy, parse_equation, parse_expr, pde_separate,
    pde_separate_add, pde_separate_mul, simplify,
};
use pretty_assertions::assert_eq;

fn e(input: &str) -> Expr {
    parse_expr(input).unwrap_or_else(|err| panic!("failed to parse {input}: {err}"))
}

fn eq(input: &str) -> Equation {
    parse_equation(input).unwrap_or_else(|err| panic!("failed to parse {input}: {err}"))
}

fn sides(lhs: &str, rhs: &str) -> Option<(Expr, Expr)> {
    Some((simplify(e(lhs)), simplify(e(rhs))))
}

#[test]
fn wave_equation_separates_multiplicatively() {
    let wave = eq("Derivative(u(x, t), x, 2) = Derivative(u(x, t), t, 2)");
    let got = pde_separate_mul(&wave, &e("u(x, t)"), &[e("X(x)"), e("T(t)")]).expect("valid");
    assert_eq!(
        got,
        sides(
            "Derivative(X(x), x, 2)/X(x)",
            "Derivative(T(t), t, 2)/T(t)"
        )
    );
}

#[test]
fn exponential_coupling_separates_additively() {
    let pde = eq("Derivative(u(x, t), x) = exp(u(x, t))*Derivative(u(x, t), t)");
    let got = pde_separate_add(&pde, &e("u(x, t)"), &[e("X(x)"), e("T(t)")]).expect("valid");
    assert_eq!(
        got,
        sides(
            "exp(-X(x))*Derivative(X(x), x)",
            "exp(T(t))*Derivative(T(t), t)"
        )
    );
}

#[test]
fn heat_equation_separates_multiplicatively() {
    let heat = eq("Derivative(u(x, t), t) = k*Derivative(u(x, t), x, 2)");
    let got = pde_separate(
        &heat,
        &e("u(x, t)"),
        &[e("T(t)"), e("X(x)")],
        SeparationStrategy::Mul,
    )
    .expect("valid");
    let (lhs, rhs) = got.expect("separable");
    assert!(!lhs.has_symbol("x"));
    assert!(!rhs.has_symbol("t"));
}

#[test]
fn mixed_derivatives_do_not_separate() {
    let pde = eq("Derivative(u(x, t), x) = x*t*Derivative(u(x, t), t) + u(x, t)");
    let got = pde_separate_add(&pde, &e("u(x, t)"), &[e("X(x)"), e("T(t)")]).expect("valid");
    assert_eq!(got, None);
}

#[test]
fn argument_validation() {
    let pde = eq("Derivative(u(x, t), x) = Derivative(u(x, t), t)");
    let u = e("u(x, t)");
    assert_eq!(
        pde_separate_mul(&pde, &u, &[e("X(x)"), e("T(t)"), e("Y(y)")]),
        Err(CasError::VariableCountMismatch {
            expected: 2,
            found: 3
        })
    );
    assert_eq!(
        pde_separate_mul(&pde, &u, &[e("X(x, t)"), e("T(t)")]).map(|_| ()),
        Err(CasError::VariableCountMismatch {
            expected: 2,
            found: 3
        })
    );
    assert!(matches!(
        pde_separate_mul(&pde, &u, &[e("X(2*x)"), e("T(t)")]),
        Err(CasError::InvalidArgument(_))
    ));
}

#[test]
fn separated_functions_must_cover_each_argument_once() {
    let pde = eq("Derivative(u(x, t), x) = Derivative(u(x, t), t)");
    let u = e("u(x, t)");
    assert_eq!(
        pde_separate_add(&pde, &u, &[e("X(x)"), e("T(x)")]),
        Err(CasError::DuplicateArguments("x".to_string()))
    );
    assert_eq!(
        pde_separate_mul(&pde, &u, &[e("X(x)"), e("Y(y)")]),
        Err(CasError::ArgumentMismatch)
    );
    assert_eq!(
        separate("Derivative(u(x, t), x) = 0", "u(x, t)", &["X(t)", "T(t)"], "add"),
        Err(CasError::DuplicateArguments("t".to_string()))
    );
}

#[test]
fn string_interface() {
    let got = separate(
        "Derivative(u(x, t), x, 2) = Derivative(u(x, t), t, 2)",
        "u(x, t)",
        &["X(x)", "T(t)"],
        "mul",
    )
    .expect("valid");
    assert_eq!(
        got,
        Some((
            "Derivative(X(x), (x, 2))/X(x)".to_string(),
            "Derivative(T(t), (t, 2))/T(t)".to_string()
        ))
    );
    assert_eq!(
        separate("u(x, t)", "u(x, t)", &["X(x)", "T(t)"], "sub"),
        Err(CasError::UnknownStrategy("sub".to_string()))
    );
}
