use crate::expr::Expr;
use crate::simplify::rules::{flatten_mul, flatten_sum, split_coeff};
use crate::simplify::{
    simplify, simplify_add, simplify_div, simplify_mul, simplify_neg, simplify_pow,
    simplify_product, simplify_sub, simplify_sum,
};
use num_traits::{Signed, ToPrimitive};

/// Largest integer multiple `n` for which `sin(n*x)` is rewritten.
const MAX_TRIG_MULTIPLE: u32 = 12;
/// Largest integer power of a complex value multiplied out.
const MAX_COMPLEX_POWER: u32 = 16;

/// Which rewrites [`expand_with`] applies. `complex` and `trig` are off by
/// default, every other hint is on.
#[derive(Clone, Debug)]
pub struct ExpandHints {
    /// Distribute products over sums.
    pub mul: bool,
    /// Expand positive integer powers of sums.
    pub multinomial: bool,
    /// Split powers with a sum in the exponent: `x^(a+b) -> x^a*x^b`.
    pub power_exp: bool,
    /// Split powers of products: `(x*y)^a -> x^a*y^a`.
    pub power_base: bool,
    /// Split logarithms of products and powers.
    pub log: bool,
    /// Split into `re + I*im`, taking every symbol to be real.
    pub complex: bool,
    /// Rewrite `sin` and `cos` of sums and integer multiples.
    pub trig: bool,
}

impl Default for ExpandHints {
    fn default() -> Self {
        Self {
            mul: true,
            multinomial: true,
            power_exp: true,
            power_base: true,
            log: true,
            complex: false,
            trig: false,
        }
    }
}

impl ExpandHints {
    fn only(select: impl FnOnce(&mut ExpandHints)) -> Self {
        let mut hints = ExpandHints {
            mul: false,
            multinomial: false,
            power_exp: false,
            power_base: false,
            log: false,
            complex: false,
            trig: false,
        };
        select(&mut hints);
        hints
    }
}

pub fn expand(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::default())
}

pub fn expand_mul(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.mul = true))
}

pub fn expand_multinomial(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.multinomial = true))
}

pub fn expand_log(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.log = true))
}

pub fn expand_power_exp(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.power_exp = true))
}

/// `exp(I*x) -> cos(x) + I*sin(x)`, `1/(1 + I) -> 1/2 - I/2`.
pub fn expand_complex(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.complex = true))
}

/// `sin(x + y) -> sin(x)*cos(y) + cos(x)*sin(y)`, `sin(2*x) -> 2*sin(x)*cos(x)`.
pub fn expand_trig(expr: &Expr) -> Expr {
    expand_with(expr, &ExpandHints::only(|h| h.trig = true))
}

/// Expand `expr` according to `hints`. Exponentials stay combined, since the
/// canonical product form keeps a single `exp` factor.
///
/// With `complex`, the real and imaginary parts are split first and the
/// other hints then apply to each part. Expressions the split cannot handle,
/// such as `log` of a complex value, are expanded as if `complex` were off.
pub fn expand_with(expr: &Expr, hints: &ExpandHints) -> Expr {
    let simplified = simplify(expr.clone());
    if hints.complex && simplified.contains(&Expr::I) {
        if let Some((re, im)) = real_imag(&simplified) {
            let re = expand_node(&simplify(re), hints);
            let im = expand_node(&simplify(im), hints);
            return simplify_add(re, simplify_mul(Expr::I, im));
        }
    }
    simplify(expand_node(&simplified, hints))
}

fn expand_node(expr: &Expr, hints: &ExpandHints) -> Expr {
    let expr = expr.map_children(|child| expand_node(child, hints));
    match expr {
        Expr::Mul(_, _) if hints.mul => flatten_mul(&expr)
            .into_iter()
            .fold(Expr::integer(1), |acc, factor| distribute(&acc, &factor)),
        Expr::Pow(base, exp) => expand_pow(*base, *exp, hints),
        Expr::Log(arg) if hints.log => expand_log_arg(*arg),
        Expr::Sin(arg) if hints.trig => sin_cos(&arg).0,
        Expr::Cos(arg) if hints.trig => sin_cos(&arg).1,
        other => simplify(other),
    }
}

fn expand_pow(base: Expr, exp: Expr, hints: &ExpandHints) -> Expr {
    if hints.multinomial && matches!(base, Expr::Add(_, _)) {
        if let Some(n) = exp.as_rational().filter(|r| r.is_integer() && r.is_positive()) {
            if let Some(n) = n.to_integer().to_u32() {
                let mut acc = Expr::integer(1);
                for _ in 0..n {
                    acc = distribute(&acc, &base);
                }
                return acc;
            }
        }
    }
    if hints.power_exp && matches!(exp, Expr::Add(_, _)) {
        return simplify_product(
            flatten_sum(&exp)
                .into_iter()
                .map(|term| simplify_pow(base.clone(), term))
                .collect(),
        );
    }
    if hints.power_base && matches!(base, Expr::Mul(_, _)) {
        return simplify_product(
            flatten_mul(&base)
                .into_iter()
                .map(|factor| simplify_pow(factor, exp.clone()))
                .collect(),
        );
    }
    simplify_pow(base, exp)
}

fn expand_log_arg(arg: Expr) -> Expr {
    match arg {
        Expr::Mul(_, _) => simplify_sum(
            flatten_mul(&arg)
                .into_iter()
                .map(expand_log_arg)
                .collect(),
        ),
        Expr::Pow(base, exp) => simplify_mul(*exp, expand_log_arg(*base)),
        other => simplify(Expr::Log(other.boxed())),
    }
}

/// `(sin(arg), cos(arg))` written with `sin` and `cos` of the terms of `arg`
/// and of the base of an integer multiple.
fn sin_cos(arg: &Expr) -> (Expr, Expr) {
    let terms = flatten_sum(arg);
    if let Some((first, rest)) = terms.split_first().filter(|(_, rest)| !rest.is_empty()) {
        let (s1, c1) = sin_cos(first);
        let (s2, c2) = sin_cos(&simplify_sum(rest.to_vec()));
        return (
            simplify_add(distribute(&s1, &c2), distribute(&c1, &s2)),
            simplify_sub(distribute(&c1, &c2), distribute(&s1, &s2)),
        );
    }

    let (coeff, base) = split_coeff(arg);
    if coeff.is_negative() {
        let (s, c) = sin_cos(&simplify_neg(arg.clone()));
        return (simplify_neg(s), c);
    }
    let multiple = coeff
        .is_integer()
        .then(|| coeff.to_integer().to_u32())
        .flatten()
        .filter(|n| (2..=MAX_TRIG_MULTIPLE).contains(n) && !base.is_one());
    let Some(n) = multiple else {
        return (
            simplify(Expr::Sin(arg.clone().boxed())),
            simplify(Expr::Cos(arg.clone().boxed())),
        );
    };
    let (s, c) = sin_cos(&base);
    let (mut sin_k, mut cos_k) = (s.clone(), c.clone());
    for _ in 1..n {
        let next_sin = simplify_add(distribute(&sin_k, &c), distribute(&cos_k, &s));
        cos_k = simplify_sub(distribute(&cos_k, &c), distribute(&sin_k, &s));
        sin_k = next_sin;
    }
    (sin_k, cos_k)
}

type Parts = (Expr, Expr);

/// Real and imaginary parts of `expr`. Symbols are taken to be real, and so
/// is anything free of `I`. `None` when some node has no split here.
fn real_imag(expr: &Expr) -> Option<Parts> {
    if !expr.contains(&Expr::I) {
        return Some((expr.clone(), Expr::integer(0)));
    }
    match expr {
        Expr::I => Some((Expr::integer(0), Expr::integer(1))),
        Expr::Add(a, b) => {
            let (ar, ai) = real_imag(a)?;
            let (br, bi) = real_imag(b)?;
            Some((simplify_add(ar, br), simplify_add(ai, bi)))
        }
        Expr::Sub(a, b) => {
            let (ar, ai) = real_imag(a)?;
            let (br, bi) = real_imag(b)?;
            Some((simplify_sub(ar, br), simplify_sub(ai, bi)))
        }
        Expr::Neg(a) => {
            let (re, im) = real_imag(a)?;
            Some((simplify_neg(re), simplify_neg(im)))
        }
        Expr::Mul(a, b) => Some(complex_mul(&real_imag(a)?, &real_imag(b)?)),
        Expr::Div(a, b) => Some(complex_mul(&real_imag(a)?, &complex_recip(&real_imag(b)?))),
        Expr::Pow(base, exp) => {
            if let Some(n) = exp.as_rational().filter(|r| r.is_integer()) {
                let count = n.to_integer().abs().to_u32().filter(|k| *k <= MAX_COMPLEX_POWER)?;
                let z = real_imag(base)?;
                let z = if n.is_negative() { complex_recip(&z) } else { z };
                let unit = (Expr::integer(1), Expr::integer(0));
                return Some((0..count).fold(unit, |acc, _| complex_mul(&acc, &z)));
            }
            // a^z = exp(z*log(a)) for a positive real base.
            let positive = **base == Expr::Pi || base.as_rational().is_some_and(|r| r.is_positive());
            if positive && !base.contains(&Expr::I) {
                let log = simplify(Expr::Log(base.clone()));
                return real_imag(&Expr::Exp(simplify_mul((**exp).clone(), log).boxed()));
            }
            None
        }
        Expr::Exp(arg) => {
            let (re, im) = real_imag(arg)?;
            let scale = simplify(Expr::Exp(re.boxed()));
            Some((
                simplify_mul(scale.clone(), simplify(Expr::Cos(im.clone().boxed()))),
                simplify_mul(scale, simplify(Expr::Sin(im.boxed()))),
            ))
        }
        Expr::Sin(arg) => {
            let (re, im) = real_imag(arg)?;
            let (cosh, sinh) = cosh_sinh(im);
            Some((
                simplify_mul(simplify(Expr::Sin(re.clone().boxed())), cosh),
                simplify_mul(simplify(Expr::Cos(re.boxed())), sinh),
            ))
        }
        Expr::Cos(arg) => {
            let (re, im) = real_imag(arg)?;
            let (cosh, sinh) = cosh_sinh(im);
            Some((
                simplify_mul(simplify(Expr::Cos(re.clone().boxed())), cosh),
                simplify_neg(simplify_mul(simplify(Expr::Sin(re.boxed())), sinh)),
            ))
        }
        Expr::Abs(arg) => {
            let (re, im) = real_imag(arg)?;
            Some((simplify_pow(norm_squared(&re, &im), Expr::constant(1, 2)), Expr::integer(0)))
        }
        _ => None,
    }
}

fn complex_mul((a, b): &Parts, (c, d): &Parts) -> Parts {
    (
        simplify_sub(simplify_mul(a.clone(), c.clone()), simplify_mul(b.clone(), d.clone())),
        simplify_add(simplify_mul(a.clone(), d.clone()), simplify_mul(b.clone(), c.clone())),
    )
}

/// `1/(a + I*b) = (a - I*b)/(a^2 + b^2)`
fn complex_recip((a, b): &Parts) -> Parts {
    let norm = norm_squared(a, b);
    (
        simplify_div(a.clone(), norm.clone()),
        simplify_neg(simplify_div(b.clone(), norm)),
    )
}

fn norm_squared(a: &Expr, b: &Expr) -> Expr {
    simplify_add(
        simplify_pow(a.clone(), Expr::integer(2)),
        simplify_pow(b.clone(), Expr::integer(2)),
    )
}

/// `(cosh x, sinh x)` in exponentials.
fn cosh_sinh(x: Expr) -> (Expr, Expr) {
    let up = simplify(Expr::Exp(x.clone().boxed()));
    let down = simplify(Expr::Exp(simplify_neg(x).boxed()));
    let half = Expr::constant(1, 2);
    (
        simplify_mul(half.clone(), simplify_add(up.clone(), down.clone())),
        simplify_mul(half, simplify_sub(up, down)),
    )
}

/// Multiply out two expressions term by term, regardless of size.
fn distribute(a: &Expr, b: &Expr) -> Expr {
    let left = flatten_sum(a);
    let right = flatten_sum(b);
    let mut terms = Vec::with_capacity(left.len() * right.len());
    for l in &left {
        for r in &right {
            terms.push(simplify_mul(l.clone(), r.clone()));
        }
    }
    simplify_sum(terms)
}

/// Number of operations in the expression tree: arithmetic nodes, function
/// applications and derivatives each count once.
pub fn count_ops(expr: &Expr) -> usize {
    let own = match expr {
        Expr::Variable(_) | Expr::Constant(_) | Expr::Pi | Expr::I => 0,
        _ => 1,
    };
    own + expr.children().into_iter().map(count_ops).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn parsed(input: &str) -> Expr {
        simplify(parse_expr(input).expect("parse"))
    }

    #[test]
    fn multinomial_expands_squares() {
        let e = parse_expr("(x + 1)^2").expect("parse");
        assert_eq!(expand(&e), parsed("x^2 + 2*x + 1"));
    }

    #[test]
    fn log_splits_products_and_powers() {
        let e = parse_expr("log(x*y^2)").expect("parse");
        assert_eq!(expand_log(&e), parsed("log(x) + 2*log(y)"));
    }

    #[test]
    fn trig_splits_sums_and_multiples() {
        let sum = parse_expr("sin(x + y)").expect("parse");
        assert_eq!(expand_trig(&sum), parsed("sin(x)*cos(y) + cos(x)*sin(y)"));
        let double = parse_expr("sin(2*x)").expect("parse");
        assert_eq!(expand_trig(&double), parsed("2*sin(x)*cos(x)"));
        let cosine = parse_expr("cos(2*x)").expect("parse");
        assert_eq!(expand_trig(&cosine), parsed("cos(x)^2 - sin(x)^2"));
        let odd = parse_expr("sin(-x - y)").expect("parse");
        assert_eq!(expand_trig(&odd), parsed("-sin(x)*cos(y) - cos(x)*sin(y)"));
    }

    #[test]
    fn trig_is_off_by_default() {
        let e = parse_expr("sin(x + y)").expect("parse");
        assert_eq!(expand(&e), parsed("sin(x + y)"));
    }

    #[test]
    fn complex_splits_real_and_imaginary_parts() {
        let euler = parse_expr("exp(I*x)").expect("parse");
        assert_eq!(expand_complex(&euler), parsed("cos(x) + I*sin(x)"));
        let square = parse_expr("(x + I*y)^2").expect("parse");
        assert_eq!(expand_complex(&square), parsed("x^2 - y^2 + 2*I*x*y"));
        let recip = parse_expr("1/(1 + I)").expect("parse");
        assert_eq!(expand_complex(&recip), parsed("1/2 - I/2"));
    }

    #[test]
    fn complex_leaves_unsplittable_nodes() {
        let e = parse_expr("log(x + I)").expect("parse");
        assert_eq!(expand_complex(&e), parsed("log(x + I)"));
    }

    #[test]
    fn count_ops_counts_nodes() {
        let e = parse_expr("x + sin(y)*2").expect("parse");
        assert_eq!(count_ops(&e), 3);
    }
}
