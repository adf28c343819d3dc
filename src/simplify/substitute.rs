use crate::expr::Expr;

/// Substitute variable `var` with `replacement` throughout `expr`.
///
/// Derivatives taken with respect to `var` are only rewritten when the
/// replacement is itself a symbol; otherwise they are left untouched.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Variable(name) if name == var => replacement.clone(),
        Expr::Derivative(inner, vars) if vars.iter().any(|v| v == var) => {
            match replacement.as_variable() {
                Some(new_name) => Expr::derivative(
                    substitute(inner, var, replacement),
                    vars.iter()
                        .map(|v| if v == var { new_name.to_string() } else { v.clone() }),
                ),
                None => expr.clone(),
            }
        }
        other => other.map_children(|child| substitute(child, var, replacement)),
    }
}

/// Replace every occurrence of the subtree `target` with `replacement`.
pub fn substitute_expr(expr: &Expr, target: &Expr, replacement: &Expr) -> Expr {
    if expr == target {
        return replacement.clone();
    }
    expr.map_children(|child| substitute_expr(child, target, replacement))
}

/// Replace an applied function such as `u(x, t)` with `replacement`. Inside
/// derivatives the replacement becomes the differentiated expression, ready
/// for [`crate::calculus::doit`].
pub fn substitute_function(expr: &Expr, fun: &Expr, replacement: &Expr) -> Expr {
    substitute_expr(expr, fun, replacement)
}
