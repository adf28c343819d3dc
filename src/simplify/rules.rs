use std::collections::{BTreeMap, HashMap};

use crate::expr::{Expr, Rational, one, zero};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;
const ROOT_TRIAL_LIMIT: u32 = 10_000;

#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct CanonKey(Vec<Expr>);

pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),
        Expr::Sin(a) => simplify_sin(simplify_cached(*a, cache)),
        Expr::Cos(a) => simplify_cos(simplify_cached(*a, cache)),
        Expr::Tan(a) => simplify_tan(simplify_cached(*a, cache)),
        Expr::Asin(a) => simplify_asin(simplify_cached(*a, cache)),
        Expr::Acos(a) => simplify_acos(simplify_cached(*a, cache)),
        Expr::Atan(a) => simplify_atan(simplify_cached(*a, cache)),
        Expr::Exp(a) => simplify_exp(simplify_cached(*a, cache)),
        Expr::Log(a) => simplify_log(simplify_cached(*a, cache)),
        Expr::Abs(a) => simplify_abs(simplify_cached(*a, cache)),
        Expr::Func(name, args) => Expr::Func(
            name,
            args.into_iter().map(|a| simplify_cached(a, cache)).collect(),
        ),
        Expr::Derivative(inner, vars) => {
            Expr::Derivative(simplify_cached(*inner, cache).boxed(), vars)
        }
        e => e,
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, 64)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_cached(current.clone(), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    rebuild_sum(collect_sum(
        flatten_sum(&x)
            .into_iter()
            .chain(flatten_sum(&y).into_iter()),
    ))
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

/// Sum of an arbitrary list of already simplified terms.
pub fn simplify_sum(terms: Vec<Expr>) -> Expr {
    rebuild_sum(collect_sum(terms.iter().flat_map(flatten_sum)))
}

/// Product of an arbitrary list of already simplified factors.
pub fn simplify_product(factors: Vec<Expr>) -> Expr {
    factors.into_iter().fold(one(), simplify_mul)
}

pub(crate) fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(simplify_neg));
            out
        }
        Expr::Neg(a) => flatten_sum(a).into_iter().map(simplify_neg).collect(),
        other => vec![other.clone()],
    }
}

fn count_sum_terms(expr: &Expr) -> usize {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) => count_sum_terms(a) + count_sum_terms(b),
        Expr::Neg(inner) => count_sum_terms(inner),
        _ => 1,
    }
}

/// Split a term into its rational coefficient and the remaining product.
pub(crate) fn split_coeff(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Constant(c) => (c.clone(), one()),
        Expr::Neg(e) => {
            let (c, b) = split_coeff(e);
            (-c, b)
        }
        Expr::Mul(a, b) => {
            let (ca, ba) = split_coeff(a);
            let (cb, bb) = split_coeff(b);
            (ca * cb, mul_norm(ba, bb))
        }
        other => (Rational::one(), other.clone()),
    }
}

fn canonical_factors(expr: &Expr) -> Vec<Expr> {
    let mut factors = flatten_mul(expr);
    factors.sort();
    factors
}

fn mul_from_sorted_factors(factors: &[Expr]) -> Expr {
    let mut iter = factors.iter().cloned();
    match iter.next() {
        None => one(),
        Some(first) => iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed())),
    }
}

fn mul_norm(a: Expr, b: Expr) -> Expr {
    let mut items: Vec<Expr> = flatten_mul(&a)
        .into_iter()
        .chain(flatten_mul(&b))
        .collect();
    items.sort();
    mul_from_sorted_factors(&items)
}

fn collect_sum<I>(terms: I) -> HashMap<CanonKey, Rational>
where
    I: IntoIterator<Item = Expr>,
{
    let mut map = HashMap::new();
    for term in terms {
        let (c, b) = split_coeff(&term);
        if c.is_zero() {
            continue;
        }
        let factors = canonical_factors(&b);
        map.entry(CanonKey(factors))
            .and_modify(|acc| *acc += &c)
            .or_insert(c);
    }
    map
}

pub(crate) fn flatten_mul(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(a, b) => {
            let mut out = flatten_mul(a);
            out.extend(flatten_mul(b));
            out
        }
        t if is_one(t) => vec![],
        t => vec![t.clone()],
    }
}

fn rebuild_sum(map: HashMap<CanonKey, Rational>) -> Expr {
    let mut map = map;
    let const_term = map
        .remove(&CanonKey(Vec::new()))
        .unwrap_or_else(Rational::zero);
    let mut items: Vec<(CanonKey, Rational)> = map.into_iter().collect();
    items.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut terms: Vec<Expr> = items
        .into_iter()
        .filter_map(|(CanonKey(factors), coef)| {
            if coef.is_zero() {
                None
            } else {
                Some(term_from(&coef, mul_from_sorted_factors(&factors)))
            }
        })
        .collect();

    if !const_term.is_zero() {
        terms.push(Expr::Constant(const_term));
    }

    match terms.len() {
        0 => zero(),
        1 => terms.remove(0),
        _ => mk_add_list(terms),
    }
}

fn term_from(coef: &Rational, base: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }

    if is_one(&base) {
        return Expr::Constant(coef.clone());
    }

    if coef.is_one() {
        return base;
    }

    if coef == &-Rational::one() {
        return Expr::Neg(base.boxed());
    }

    Expr::Mul(Expr::Constant(coef.clone()).boxed(), base.boxed())
}

fn is_sum(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_, _) | Expr::Sub(_, _))
}

/// Whether `other` carries `sum` as a power base, in which case distributing
/// would hide a cancellation.
fn shares_sum_base(sum: &Expr, other: &Expr) -> bool {
    flatten_mul(other).iter().any(|f| match f {
        Expr::Pow(base, _) => **base == *sum,
        g => g == sum,
    })
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Constant(xc), Expr::Constant(yc)) => Expr::Constant(xc * yc),
        (x, y) if is_zero(&x) || is_zero(&y) => zero(),
        (x, y) if is_one(&x) => y,
        (x, y) if is_one(&y) => x,
        (x, t) if is_sum(&x) && !shares_sum_base(&x, &t) => {
            let term_count = count_sum_terms(&x) * count_sum_terms(&t);
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_sum(
                    flatten_sum(&x)
                        .into_iter()
                        .map(|term| simplify_mul(term, t.clone()))
                        .collect(),
                )
            } else {
                collect_product(vec![x, t])
            }
        }
        (t, y) if is_sum(&y) && !shares_sum_base(&y, &t) => {
            let term_count = count_sum_terms(&t) * count_sum_terms(&y);
            if term_count <= DISTRIBUTE_TERM_LIMIT {
                simplify_sum(
                    flatten_sum(&y)
                        .into_iter()
                        .map(|term| simplify_mul(t.clone(), term))
                        .collect(),
                )
            } else {
                collect_product(vec![t, y])
            }
        }
        (x, y) => collect_product(vec![x, y]),
    }
}

/// Merge factors by base, summing rational exponents, folding constants and
/// combining exponentials.
fn collect_product(items: Vec<Expr>) -> Expr {
    let mut coeff = Rational::one();
    let mut powers: BTreeMap<Expr, Rational> = BTreeMap::new();
    let mut exp_args: Vec<Expr> = Vec::new();
    let mut stack = items;

    while let Some(item) = stack.pop() {
        match item {
            Expr::Constant(c) => coeff *= c,
            Expr::Neg(inner) => {
                coeff = -coeff;
                stack.push(*inner);
            }
            Expr::Mul(a, b) => {
                stack.push(*a);
                stack.push(*b);
            }
            Expr::Exp(arg) => exp_args.push(*arg),
            Expr::Pow(base, exp) => match *exp {
                Expr::Constant(e) => {
                    if let Expr::Constant(b) = &*base {
                        let folded = pow_rational(b, &e);
                        let unchanged = matches!(
                            &folded,
                            Expr::Pow(fb, fe)
                                if matches!(&**fb, Expr::Constant(v) if v == b)
                                    && matches!(&**fe, Expr::Constant(v) if *v == e)
                        );
                        if !unchanged {
                            stack.push(folded);
                            continue;
                        }
                    }
                    add_power(&mut powers, *base, e);
                }
                other => add_power(&mut powers, Expr::Pow(base, other.boxed()), Rational::one()),
            },
            other => add_power(&mut powers, other, Rational::one()),
        }
    }

    if coeff.is_zero() {
        return zero();
    }

    let mut factors = Vec::new();
    for (base, e) in powers {
        if e.is_zero() {
            continue;
        }
        let factor = if e.is_one() {
            base
        } else {
            simplify_pow(base, Expr::Constant(e))
        };
        absorb_factor(factor, &mut coeff, &mut factors);
    }

    if !exp_args.is_empty() {
        let arg = simplify_sum(exp_args);
        absorb_factor(simplify_exp(arg), &mut coeff, &mut factors);
    }

    if coeff.is_zero() {
        return zero();
    }
    factors.sort();
    term_from(&coeff, mul_from_sorted_factors(&factors))
}

fn add_power(powers: &mut BTreeMap<Expr, Rational>, base: Expr, exp: Rational) {
    powers
        .entry(base)
        .and_modify(|acc| *acc += &exp)
        .or_insert(exp);
}

fn absorb_factor(factor: Expr, coeff: &mut Rational, factors: &mut Vec<Expr>) {
    match factor {
        Expr::Constant(c) => *coeff *= c,
        Expr::Neg(inner) => {
            *coeff = -coeff.clone();
            absorb_factor(*inner, coeff, factors);
        }
        Expr::Mul(a, b) => {
            absorb_factor(*a, coeff, factors);
            absorb_factor(*b, coeff, factors);
        }
        other => factors.push(other),
    }
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Constant(n), Expr::Constant(d)) if !d.is_zero() => Expr::Constant(n / d),
        (x, _) if is_zero(&x) => zero(),
        (x, y) if is_one(&y) => x,
        (x, y) => simplify_mul(x, simplify_pow(y, Expr::Constant(-Rational::one()))),
    }
}

pub fn simplify_pow(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (_, Expr::Constant(e)) if e.is_zero() => one(),
        (base, Expr::Constant(e)) if e.is_one() => base,
        (Expr::Constant(b), Expr::Constant(e)) => pow_rational(&b, &e),
        (Expr::I, Expr::Constant(e)) if e.is_integer() => i_power(&e.to_integer()),
        (Expr::Pow(inner, inner_exp), Expr::Constant(e)) if e.is_integer() => {
            match *inner_exp {
                Expr::Constant(ie) => simplify_pow(*inner, Expr::Constant(ie * e)),
                other => {
                    let exp = simplify_mul(other, Expr::Constant(e));
                    simplify_pow(*inner, exp)
                }
            }
        }
        (Expr::Neg(inner), Expr::Constant(e)) if e.is_integer() => {
            let magnitude = simplify_pow(*inner, Expr::Constant(e.clone()));
            if e.to_integer().is_even() {
                magnitude
            } else {
                simplify_neg(magnitude)
            }
        }
        (base @ Expr::Mul(_, _), Expr::Constant(e)) if e.is_integer() => simplify_product(
            flatten_mul(&base)
                .into_iter()
                .map(|f| simplify_pow(f, Expr::Constant(e.clone())))
                .collect(),
        ),
        (Expr::Exp(arg), e @ Expr::Constant(_)) => simplify_exp(simplify_mul(e, *arg)),
        (x, y) => Expr::Pow(x.boxed(), y.boxed()),
    }
}

fn i_power(k: &BigInt) -> Expr {
    match k.mod_floor(&BigInt::from(4)).to_u8() {
        Some(1) => Expr::I,
        Some(2) => Expr::Constant(-Rational::one()),
        Some(3) => Expr::Neg(Expr::I.boxed()),
        _ => one(),
    }
}

/// Exact power of a rational. Non-integer exponents extract perfect powers
/// from the radicand: `8^(1/2) -> 2*2^(1/2)`, `(-4)^(1/2) -> 2*I`.
pub(crate) fn pow_rational(b: &Rational, e: &Rational) -> Expr {
    if e.is_integer() {
        let k: BigInt = e.to_integer();
        if let Some(power) = k.abs().to_u32() {
            if k >= BigInt::zero() {
                let num = b.numer().pow(power);
                let den = b.denom().pow(power);
                return Expr::Constant(Rational::new(num, den));
            } else if !b.is_zero() {
                let num = b.denom().pow(power);
                let den = b.numer().pow(power);
                return Expr::Constant(Rational::new(num, den));
            }
        }
        return Expr::Pow(Expr::Constant(b.clone()).boxed(), Expr::Constant(e.clone()).boxed());
    }

    if b.is_zero() {
        return if e.is_positive() {
            zero()
        } else {
            Expr::Pow(Expr::Constant(b.clone()).boxed(), Expr::Constant(e.clone()).boxed())
        };
    }
    if b.is_one() {
        return one();
    }

    if b.is_negative() {
        if *e.denom() == BigInt::from(2) {
            let unit = i_power(e.numer());
            return simplify_mul(unit, pow_rational(&-b.clone(), e));
        }
        return Expr::Pow(Expr::Constant(b.clone()).boxed(), Expr::Constant(e.clone()).boxed());
    }

    let q = match e.denom().to_u32() {
        Some(q) => q,
        None => {
            return Expr::Pow(Expr::Constant(b.clone()).boxed(), Expr::Constant(e.clone()).boxed());
        }
    };
    let whole = e.floor().to_integer();
    let frac_num = (e - Rational::from_integer(whole.clone())) * Rational::from_integer(q.into());
    let r = frac_num.to_integer().to_u32().unwrap_or(1);

    let whole_part = match pow_rational(b, &Rational::from_integer(whole)) {
        Expr::Constant(c) => c,
        _ => Rational::one(),
    };

    // b^(r/q) = (n^r * d^(q-r))^(1/q) / d
    let n = b.numer().pow(r);
    let d = b.denom().clone();
    let radicand = n * d.pow(q - r);
    let (outside, inside) = extract_perfect_power(&radicand, q);
    let coeff = whole_part * Rational::new(outside, d);

    if inside.is_one() {
        return Expr::Constant(coeff);
    }

    let root = Expr::Pow(
        Expr::Constant(Rational::from_integer(inside)).boxed(),
        Expr::Constant(Rational::new(BigInt::one(), BigInt::from(q))).boxed(),
    );
    term_from(&coeff, root)
}

/// Split `n` into `outside^q * inside`.
fn extract_perfect_power(n: &BigInt, q: u32) -> (BigInt, BigInt) {
    let root = n.nth_root(q);
    if root.pow(q) == *n {
        return (root, BigInt::one());
    }

    let mut inside = n.clone();
    let mut outside = BigInt::one();
    let mut d: u32 = 2;
    while d <= ROOT_TRIAL_LIMIT {
        let dq = BigInt::from(d).pow(q);
        if dq > inside {
            break;
        }
        while (&inside % &dq).is_zero() {
            inside /= &dq;
            outside *= d;
        }
        d += 1;
    }
    (outside, inside)
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(x) => Expr::Constant(-x),
        Expr::Neg(x) => *x,
        sum @ (Expr::Add(_, _) | Expr::Sub(_, _)) => simplify_sum(
            flatten_sum(&sum)
                .into_iter()
                .map(simplify_neg)
                .collect(),
        ),
        other => {
            let (c, base) = split_coeff(&other);
            term_from(&-c, base)
        }
    }
}

/// The rational `q` with `expr == q*pi`, if any.
pub(crate) fn pi_multiple(expr: &Expr) -> Option<Rational> {
    match expr {
        Expr::Pi => Some(Rational::one()),
        c if is_zero(c) => Some(Rational::zero()),
        other => {
            let (c, base) = split_coeff(other);
            if base == Expr::Pi { Some(c) } else { None }
        }
    }
}

fn pi_times(q: Rational) -> Expr {
    simplify_mul(Expr::Constant(q), Expr::Pi)
}

fn half_sqrt(n: i64) -> Expr {
    simplify_mul(
        Expr::Constant(Rational::new(1.into(), 2.into())),
        pow_rational(&Rational::from_integer(n.into()), &Rational::new(1.into(), 2.into())),
    )
}

/// `sin(q*pi)` for the angles with closed forms in the first quadrant.
fn sine_of_pi_multiple(q: &Rational) -> Option<Expr> {
    let two = Rational::from_integer(2.into());
    let half = Rational::new(1.into(), 2.into());
    let mut q = q.clone() - (q.clone() / &two).floor() * &two;
    let mut sign = Rational::one();
    if q >= Rational::one() {
        q -= Rational::one();
        sign = -sign;
    }
    if q > half {
        q = Rational::one() - q;
    }
    let value = if q.is_zero() {
        zero()
    } else if q == Rational::new(1.into(), 6.into()) {
        Expr::Constant(half)
    } else if q == Rational::new(1.into(), 4.into()) {
        half_sqrt(2)
    } else if q == Rational::new(1.into(), 3.into()) {
        half_sqrt(3)
    } else if q == half {
        one()
    } else {
        return None;
    };
    Some(simplify_mul(Expr::Constant(sign), value))
}

/// Arcsine of the values produced by `sine_of_pi_multiple` on `[0, 1/2]`.
fn asin_table() -> Vec<(Expr, Rational)> {
    vec![
        (zero(), Rational::zero()),
        (Expr::Constant(Rational::new(1.into(), 2.into())), Rational::new(1.into(), 6.into())),
        (half_sqrt(2), Rational::new(1.into(), 4.into())),
        (half_sqrt(3), Rational::new(1.into(), 3.into())),
        (one(), Rational::new(1.into(), 2.into())),
    ]
}

fn is_negated(expr: &Expr) -> bool {
    match expr {
        Expr::Neg(_) => true,
        Expr::Constant(c) => c.is_negative(),
        Expr::Mul(_, _) => split_coeff(expr).0.is_negative(),
        _ => false,
    }
}

fn simplify_sin(arg: Expr) -> Expr {
    if let Some(value) = pi_multiple(&arg).and_then(|q| sine_of_pi_multiple(&q)) {
        return value;
    }
    match arg {
        Expr::Asin(inner) => *inner,
        a if is_negated(&a) => simplify_neg(Expr::Sin(simplify_neg(a).boxed())),
        a => Expr::Sin(a.boxed()),
    }
}

fn simplify_cos(arg: Expr) -> Expr {
    if let Some(value) = pi_multiple(&arg)
        .and_then(|q| sine_of_pi_multiple(&(q + Rational::new(1.into(), 2.into()))))
    {
        return value;
    }
    match arg {
        Expr::Acos(inner) => *inner,
        a if is_negated(&a) => Expr::Cos(simplify_neg(a).boxed()),
        a => Expr::Cos(a.boxed()),
    }
}

fn simplify_tan(arg: Expr) -> Expr {
    if let Some(q) = pi_multiple(&arg) {
        let shifted = q.clone() - q.floor();
        if shifted != Rational::new(1.into(), 2.into()) {
            if let (Some(s), Some(c)) = (
                sine_of_pi_multiple(&shifted),
                sine_of_pi_multiple(&(shifted.clone() + Rational::new(1.into(), 2.into()))),
            ) {
                return simplify_div(s, c);
            }
        }
    }
    match arg {
        Expr::Atan(inner) => *inner,
        a if is_negated(&a) => simplify_neg(Expr::Tan(simplify_neg(a).boxed())),
        a => Expr::Tan(a.boxed()),
    }
}

fn simplify_asin(arg: Expr) -> Expr {
    if is_negated(&arg) {
        return simplify_neg(simplify_asin(simplify_neg(arg)));
    }
    for (value, q) in asin_table() {
        if value == arg {
            return pi_times(q);
        }
    }
    Expr::Asin(arg.boxed())
}

fn simplify_acos(arg: Expr) -> Expr {
    let lookup = if is_negated(&arg) {
        simplify_neg(arg.clone())
    } else {
        arg.clone()
    };
    for (value, q) in asin_table() {
        if value == lookup {
            // acos(v) = pi/2 - asin(v), acos(-v) = pi/2 + asin(v)
            let half = Rational::new(1.into(), 2.into());
            let angle = if is_negated(&arg) { half + q } else { half - q };
            return pi_times(angle);
        }
    }
    Expr::Acos(arg.boxed())
}

fn simplify_atan(arg: Expr) -> Expr {
    if is_negated(&arg) {
        return simplify_neg(simplify_atan(simplify_neg(arg)));
    }
    let sqrt3 = pow_rational(&Rational::from_integer(3.into()), &Rational::new(1.into(), 2.into()));
    let table = [
        (zero(), Rational::zero()),
        (one(), Rational::new(1.into(), 4.into())),
        (sqrt3.clone(), Rational::new(1.into(), 3.into())),
        (
            simplify_mul(Expr::Constant(Rational::new(1.into(), 3.into())), sqrt3),
            Rational::new(1.into(), 6.into()),
        ),
    ];
    for (value, q) in table {
        if value == arg {
            return pi_times(q);
        }
    }
    Expr::Atan(arg.boxed())
}

pub(crate) fn simplify_exp(arg: Expr) -> Expr {
    match arg {
        x if is_zero(&x) => one(),
        Expr::Log(inner) => *inner,
        x => Expr::Exp(x.boxed()),
    }
}

fn simplify_log(arg: Expr) -> Expr {
    match arg {
        x if is_one(&x) => zero(),
        // log(exp(z)) = z holds on the principal branch only for real z.
        Expr::Exp(inner) if !inner.contains(&Expr::I) => *inner,
        x => Expr::Log(x.boxed()),
    }
}

fn simplify_abs(arg: Expr) -> Expr {
    match arg {
        Expr::Constant(c) => Expr::Constant(c.abs()),
        Expr::Pi => Expr::Pi,
        Expr::I => one(),
        Expr::Abs(inner) => Expr::Abs(inner),
        a if is_negated(&a) => simplify_abs(simplify_neg(a)),
        a => Expr::Abs(a.boxed()),
    }
}

fn is_zero(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r.is_zero())
}

fn is_one(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r.is_one())
}

fn mk_add_list(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter();
    match iter.next() {
        None => zero(),
        Some(first) => iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{add, div, mul, pow, sub};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn like_terms_collect() {
        let e = add(mul(Expr::integer(2), x()), x());
        assert_eq!(simplify(e), mul(Expr::integer(3), x()));
    }

    #[test]
    fn powers_merge_and_cancel() {
        assert_eq!(simplify(mul(x(), x())), pow(x(), Expr::integer(2)));
        assert_eq!(simplify(div(x(), x())), one());
    }

    #[test]
    fn radicals_extract_squares() {
        let e = Expr::sqrt(Expr::integer(8));
        assert_eq!(
            simplify(e),
            mul(Expr::integer(2), Expr::sqrt(Expr::integer(2)))
        );
        assert_eq!(simplify(Expr::sqrt(Expr::integer(-4))), mul(Expr::integer(2), Expr::I));
        assert_eq!(
            simplify(mul(Expr::sqrt(Expr::integer(2)), Expr::sqrt(Expr::integer(2)))),
            Expr::integer(2)
        );
    }

    #[test]
    fn imaginary_unit_cycles() {
        assert_eq!(simplify(mul(Expr::I, Expr::I)), Expr::integer(-1));
        assert_eq!(simplify(pow(Expr::I, Expr::integer(3))), Expr::Neg(Expr::I.boxed()));
    }

    #[test]
    fn exponentials_combine() {
        let e = mul(Expr::Exp(x().boxed()), Expr::Exp(Expr::Neg(x().boxed()).boxed()));
        assert_eq!(simplify(e), one());
    }

    #[test]
    fn log_of_exp_cancels_only_for_real_arguments() {
        assert_eq!(simplify(Expr::Log(Expr::Exp(x().boxed()).boxed())), x());
        let turn = mul(mul(Expr::integer(2), Expr::I), Expr::Pi);
        let e = Expr::Log(Expr::Exp(turn.boxed()).boxed());
        assert!(matches!(simplify(e), Expr::Log(_)));
    }

    #[test]
    fn special_angles() {
        let sixth = mul(Expr::constant(1, 6), Expr::Pi);
        assert_eq!(simplify(Expr::Sin(sixth.boxed())), Expr::constant(1, 2));
        assert_eq!(simplify(Expr::Cos(Expr::Pi.boxed())), Expr::integer(-1));
        assert_eq!(
            simplify(Expr::Asin(Expr::constant(1, 2).boxed())),
            mul(Expr::constant(1, 6), Expr::Pi)
        );
        assert_eq!(simplify(Expr::Acos(Expr::integer(-1).boxed())), Expr::Pi);
    }

    #[test]
    fn simplify_is_idempotent_on_sums() {
        let e = sub(pow(add(x(), Expr::integer(1)), Expr::integer(2)), Expr::sqrt(Expr::integer(12)));
        let once = simplify(e);
        assert_eq!(simplify(once.clone()), once);
    }
}
