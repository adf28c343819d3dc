//! Dense univariate polynomials over the rationals or over expressions free
//! of the variable.

use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive};

use crate::expr::{Expr, Rational};
use crate::simplify::{simplify, simplify_add, simplify_div, simplify_mul, simplify_neg};

/// Ring operations a polynomial needs from its coefficients.
pub trait CoeffOps: Clone + PartialEq {
    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(&self) -> bool;
    fn add(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    /// Coefficient for an expression free of the polynomial variable.
    fn lift(expr: &Expr) -> Option<Self>;
    fn recip(&self) -> Option<Self>;
}

impl CoeffOps for Rational {
    fn zero() -> Self {
        Rational::from_integer(BigInt::from(0))
    }

    fn one() -> Self {
        Rational::from_integer(BigInt::from(1))
    }

    fn is_zero(&self) -> bool {
        self.numer().sign() == num_bigint::Sign::NoSign
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    fn lift(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Constant(c) => Some(c.clone()),
            Expr::Neg(inner) => Self::lift(inner).map(|c| -c),
            _ => None,
        }
    }

    fn recip(&self) -> Option<Self> {
        (!CoeffOps::is_zero(self)).then(|| Rational::recip(self))
    }
}

impl CoeffOps for Expr {
    fn zero() -> Self {
        Expr::integer(0)
    }

    fn one() -> Self {
        Expr::integer(1)
    }

    fn is_zero(&self) -> bool {
        Expr::is_zero(self)
    }

    fn add(&self, other: &Self) -> Self {
        simplify_add(self.clone(), other.clone())
    }

    fn mul(&self, other: &Self) -> Self {
        simplify_mul(self.clone(), other.clone())
    }

    fn neg(&self) -> Self {
        simplify_neg(self.clone())
    }

    fn lift(expr: &Expr) -> Option<Self> {
        Some(simplify(expr.clone()))
    }

    fn recip(&self) -> Option<Self> {
        (!Expr::is_zero(self)).then(|| simplify_div(Expr::integer(1), self.clone()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<C> {
    /// `terms[k]` multiplies `x^k`; the last entry is never zero.
    terms: Vec<C>,
}

pub type Poly = Polynomial<Rational>;

impl<C: CoeffOps> Polynomial<C> {
    pub fn zero() -> Self {
        Polynomial { terms: Vec::new() }
    }

    pub fn from_constant(c: C) -> Self {
        Self::from_dense(vec![c])
    }

    fn from_dense(mut terms: Vec<C>) -> Self {
        while terms.last().is_some_and(|c| c.is_zero()) {
            terms.pop();
        }
        Polynomial { terms }
    }

    /// Sum of `coeff * x^exp` over `terms`; repeated exponents add up.
    pub fn from_terms(terms: impl IntoIterator<Item = (usize, C)>) -> Self {
        let mut dense: Vec<C> = Vec::new();
        for (exp, coeff) in terms {
            if dense.len() <= exp {
                dense.resize(exp + 1, C::zero());
            }
            dense[exp] = dense[exp].add(&coeff);
        }
        Self::from_dense(dense)
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.terms.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn leading_coeff(&self) -> C {
        self.terms.last().cloned().unwrap_or_else(C::zero)
    }

    pub fn coeff(&self, power: usize) -> C {
        self.terms.get(power).cloned().unwrap_or_else(C::zero)
    }

    /// Nonzero coefficients with their exponents, lowest first.
    pub fn coeff_entries(&self) -> impl Iterator<Item = (usize, &C)> + '_ {
        self.terms.iter().enumerate().filter(|(_, c)| !c.is_zero())
    }

    pub fn scale(&self, k: &C) -> Self {
        Self::from_dense(self.terms.iter().map(|c| c.mul(k)).collect())
    }

    pub fn pow(&self, exp: usize) -> Self {
        (0..exp).fold(Self::from_constant(C::one()), |acc, _| &acc * self)
    }

    /// Lowest exponent carrying a nonzero coefficient.
    pub fn trailing_degree(&self) -> Option<usize> {
        self.coeff_entries().next().map(|(k, _)| k)
    }

    /// Divide by `x^k`, dropping any terms below it.
    pub fn shift_down(&self, k: usize) -> Self {
        Self::from_dense(self.terms.iter().skip(k).cloned().collect())
    }

    /// Greatest common divisor of all nonzero exponents, `0` for constants.
    pub fn exponent_gcd(&self) -> usize {
        self.coeff_entries()
            .map(|(k, _)| k)
            .filter(|&k| k > 0)
            .fold(0, |acc, k| acc.gcd(&k))
    }

    /// Substitute `x^k -> x`; every exponent must be a multiple of `k`.
    pub fn compress(&self, k: usize) -> Self {
        Self::from_terms(self.coeff_entries().map(|(e, c)| (e / k, c.clone())))
    }

    /// Read `expr` as a polynomial in `var`, or `None` when `var` occurs
    /// anywhere but in sums, products, constant quotients and
    /// non-negative integer powers.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        if !expr.has_symbol(var) {
            return C::lift(expr).map(Self::from_constant);
        }
        match expr {
            Expr::Variable(_) => Some(Self::from_terms([(1, C::one())])),
            Expr::Add(a, b) => Some(&Self::from_expr(a, var)? + &Self::from_expr(b, var)?),
            Expr::Sub(a, b) => Some(&Self::from_expr(a, var)? - &Self::from_expr(b, var)?),
            Expr::Mul(a, b) => Some(&Self::from_expr(a, var)? * &Self::from_expr(b, var)?),
            Expr::Neg(a) => Some(-&Self::from_expr(a, var)?),
            Expr::Div(a, b) if !b.has_symbol(var) => {
                let inverse = C::lift(b)?.recip()?;
                Some(Self::from_expr(a, var)?.scale(&inverse))
            }
            Expr::Pow(base, exp) => {
                let n = exp.as_rational().filter(|r| r.is_integer() && !r.is_negative())?;
                Some(Self::from_expr(base, var)?.pow(n.to_integer().to_usize()?))
            }
            _ => None,
        }
    }
}

impl<C: CoeffOps> Add for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn add(self, rhs: Self) -> Polynomial<C> {
        let len = self.terms.len().max(rhs.terms.len());
        Polynomial::from_dense((0..len).map(|k| self.coeff(k).add(&rhs.coeff(k))).collect())
    }
}

impl<C: CoeffOps> Neg for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn neg(self) -> Polynomial<C> {
        Polynomial::from_dense(self.terms.iter().map(CoeffOps::neg).collect())
    }
}

impl<C: CoeffOps> Sub for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn sub(self, rhs: Self) -> Polynomial<C> {
        self + &-rhs
    }
}

impl<C: CoeffOps> Mul for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn mul(self, rhs: Self) -> Polynomial<C> {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut out = vec![C::zero(); self.terms.len() + rhs.terms.len() - 1];
        for (i, a) in self.coeff_entries() {
            for (j, b) in rhs.coeff_entries() {
                out[i + j] = out[i + j].add(&a.mul(b));
            }
        }
        Polynomial::from_dense(out)
    }
}

impl Poly {
    pub fn derivative(&self) -> Self {
        Self::from_dense(
            self.terms
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| c * Rational::from_integer(BigInt::from(k)))
                .collect(),
        )
    }

    pub fn monic(&self) -> Self {
        match CoeffOps::recip(&self.leading_coeff()) {
            Some(inverse) => self.scale(&inverse),
            None => self.clone(),
        }
    }

    pub fn evaluate(&self, x: &Rational) -> Rational {
        self.terms
            .iter()
            .rev()
            .fold(<Rational as CoeffOps>::zero(), |acc, c| acc * x + c)
    }

    /// Quotient and remainder of long division. Dividing by zero leaves
    /// everything in the remainder.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let Some(d) = divisor.degree() else {
            return (Poly::zero(), self.clone());
        };
        if self.terms.len() <= d {
            return (Poly::zero(), self.clone());
        }
        let lead = divisor.leading_coeff();
        let mut rem = self.terms.clone();
        let mut quot = vec![<Rational as CoeffOps>::zero(); rem.len() - d];
        for k in (0..quot.len()).rev() {
            let q = &rem[k + d] / &lead;
            if CoeffOps::is_zero(&q) {
                continue;
            }
            for (j, c) in divisor.terms.iter().enumerate() {
                rem[k + j] -= &q * c;
            }
            quot[k] = q;
        }
        rem.truncate(d);
        (Poly::from_dense(quot), Poly::from_dense(rem))
    }

    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(divisor);
        r.is_zero().then_some(q)
    }

    /// Split into a rational content and an integer primitive polynomial
    /// with positive leading coefficient.
    pub fn content_and_primitive_part(&self) -> (Rational, Self) {
        if self.is_zero() {
            return (<Rational as CoeffOps>::zero(), Poly::zero());
        }
        let numer_gcd = self
            .terms
            .iter()
            .fold(BigInt::from(0), |g, c| g.gcd(c.numer()));
        let denom_lcm = self
            .terms
            .iter()
            .fold(BigInt::from(1), |l, c| l.lcm(c.denom()));
        let mut content = Rational::new(numer_gcd, denom_lcm);
        if self.leading_coeff().is_negative() {
            content = -content;
        }
        let primitive = self.scale(&content.recip());
        (content, primitive)
    }

    /// Monic greatest common divisor by the Euclidean algorithm.
    pub fn gcd(a: &Poly, b: &Poly) -> Poly {
        let (mut a, mut b) = (a.clone(), b.clone());
        while !b.is_zero() {
            let r = a.div_rem(&b).1;
            a = b;
            b = r;
        }
        a.monic()
    }

    /// Monic square-free factors with their multiplicities (Yun), in
    /// increasing multiplicity.
    pub fn square_free_decomposition(&self) -> Vec<(Poly, usize)> {
        if self.degree().unwrap_or(0) == 0 {
            return Vec::new();
        }
        let f = self.monic();
        let df = f.derivative();
        let a0 = Poly::gcd(&f, &df);
        let mut b = f.div_rem(&a0).0;
        let mut c = df.div_rem(&a0).0;
        let mut d = &c - &b.derivative();

        let mut factors = Vec::new();
        let mut multiplicity = 1;
        while b.degree().is_some_and(|deg| deg > 0) {
            let a = Poly::gcd(&b, &d);
            b = b.div_rem(&a).0;
            c = d.div_rem(&a).0;
            d = &c - &b.derivative();
            if a.degree().is_some_and(|deg| deg > 0) {
                factors.push((a, multiplicity));
            }
            multiplicity += 1;
        }
        factors
    }

    /// Distinct rational roots in increasing order, by the rational root
    /// theorem on the primitive part.
    pub fn rational_roots(&self) -> Vec<Rational> {
        let Some(low) = self.trailing_degree() else {
            return Vec::new();
        };
        let mut roots = Vec::new();
        if low > 0 {
            roots.push(<Rational as CoeffOps>::zero());
        }
        let (_, primitive) = self.shift_down(low).content_and_primitive_part();
        if primitive.degree().unwrap_or(0) > 0 {
            let constant = primitive.coeff(0).to_integer();
            let leading = primitive.leading_coeff().to_integer();
            for p in divisors(&constant) {
                for q in divisors(&leading) {
                    let candidate = Rational::new(p.clone(), q);
                    for root in [candidate.clone(), -candidate] {
                        if CoeffOps::is_zero(&primitive.evaluate(&root)) {
                            roots.push(root);
                        }
                    }
                }
            }
        }
        roots.sort();
        roots.dedup();
        roots
    }
}

impl Polynomial<Expr> {
    /// Whether every coefficient is free of `symbol`.
    pub fn coefficients_free_of(&self, symbol: &str) -> bool {
        self.terms.iter().all(|c| !c.has_symbol(symbol))
    }

    /// The polynomial with every coefficient simplified.
    pub fn simplified(&self) -> Self {
        Self::from_dense(self.terms.iter().map(|c| simplify(c.clone())).collect())
    }
}

/// Positive divisors of `n`, which must be nonzero.
fn divisors(n: &BigInt) -> Vec<BigInt> {
    let n = n.abs();
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = BigInt::from(1);
    while &d * &d <= n {
        if n.is_multiple_of(&d) {
            let pair = &n / &d;
            if pair != d {
                large.push(pair);
            }
            small.push(d.clone());
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}
