//! Expression tree definitions and helpers.

use std::collections::BTreeSet;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

pub type Rational = BigRational;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Expr {
    Variable(String),
    Constant(Rational),
    Pi,
    I,
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Asin(Box<Expr>),
    Acos(Box<Expr>),
    Atan(Box<Expr>),
    Exp(Box<Expr>),
    Log(Box<Expr>),
    Abs(Box<Expr>),
    /// Applied undefined function, e.g. `u(x, t)`.
    Func(String, Vec<Expr>),
    /// Unevaluated derivative. The variable list is kept sorted; a repeated
    /// name encodes a higher order.
    Derivative(Box<Expr>, Vec<String>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn constant(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::new(num.into(), den.into()))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Expr::Constant(Rational::from_integer(value.into()))
    }

    pub fn rational(value: Rational) -> Self {
        Expr::Constant(value)
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Func(name.into(), args)
    }

    pub fn sqrt(arg: Expr) -> Self {
        Expr::Pow(arg.boxed(), Expr::constant(1, 2).boxed())
    }

    pub fn derivative(inner: Expr, vars: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut vars: Vec<String> = vars.into_iter().map(Into::into).collect();
        vars.sort();
        Expr::Derivative(inner.boxed(), vars)
    }

    pub fn negate(self) -> Self {
        match self {
            Expr::Constant(r) => Expr::Constant(-r),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Constant(r) if r.is_one())
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Expr::Constant(r) => Some(r.clone()),
            Expr::Neg(inner) => inner.as_rational().map(|r| -r),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&str> {
        if let Expr::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Child nodes in evaluation order. `Derivative` exposes its inner expression only.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Variable(_) | Expr::Constant(_) | Expr::Pi | Expr::I => Vec::new(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => vec![&**a, &**b],
            Expr::Neg(a)
            | Expr::Sin(a)
            | Expr::Cos(a)
            | Expr::Tan(a)
            | Expr::Asin(a)
            | Expr::Acos(a)
            | Expr::Atan(a)
            | Expr::Exp(a)
            | Expr::Log(a)
            | Expr::Abs(a) => vec![&**a],
            Expr::Func(_, args) => args.iter().collect(),
            Expr::Derivative(inner, _) => vec![&**inner],
        }
    }

    /// Rebuild this node with every direct child passed through `f`.
    pub fn map_children<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match self {
            Expr::Variable(_) | Expr::Constant(_) | Expr::Pi | Expr::I => self.clone(),
            Expr::Add(a, b) => Expr::Add(f(&**a).boxed(), f(&**b).boxed()),
            Expr::Sub(a, b) => Expr::Sub(f(&**a).boxed(), f(&**b).boxed()),
            Expr::Mul(a, b) => Expr::Mul(f(&**a).boxed(), f(&**b).boxed()),
            Expr::Div(a, b) => Expr::Div(f(&**a).boxed(), f(&**b).boxed()),
            Expr::Pow(a, b) => Expr::Pow(f(&**a).boxed(), f(&**b).boxed()),
            Expr::Neg(a) => Expr::Neg(f(&**a).boxed()),
            Expr::Sin(a) => Expr::Sin(f(&**a).boxed()),
            Expr::Cos(a) => Expr::Cos(f(&**a).boxed()),
            Expr::Tan(a) => Expr::Tan(f(&**a).boxed()),
            Expr::Asin(a) => Expr::Asin(f(&**a).boxed()),
            Expr::Acos(a) => Expr::Acos(f(&**a).boxed()),
            Expr::Atan(a) => Expr::Atan(f(&**a).boxed()),
            Expr::Exp(a) => Expr::Exp(f(&**a).boxed()),
            Expr::Log(a) => Expr::Log(f(&**a).boxed()),
            Expr::Abs(a) => Expr::Abs(f(&**a).boxed()),
            Expr::Func(name, args) => Expr::Func(name.clone(), args.iter().map(f).collect()),
            Expr::Derivative(inner, vars) => Expr::Derivative(f(&**inner).boxed(), vars.clone()),
        }
    }

    /// Names of all symbols appearing in the expression, including the
    /// differentiation variables of unevaluated derivatives.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        collect_symbols(self, &mut out);
        out
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        match self {
            Expr::Variable(v) => v == name,
            Expr::Derivative(inner, vars) => {
                vars.iter().any(|v| v == name) || inner.has_symbol(name)
            }
            other => other.children().into_iter().any(|c| c.has_symbol(name)),
        }
    }

    pub fn has_any(&self, names: &[String]) -> bool {
        names.iter().any(|n| self.has_symbol(n))
    }

    /// Whether `target` occurs as a subtree.
    pub fn contains(&self, target: &Expr) -> bool {
        self == target || self.children().into_iter().any(|c| c.contains(target))
    }
}

fn collect_symbols(expr: &Expr, out: &mut BTreeSet<String>) {
    match expr {
        Expr::Variable(v) => {
            out.insert(v.clone());
        }
        Expr::Derivative(inner, vars) => {
            out.extend(vars.iter().cloned());
            collect_symbols(inner, out);
        }
        other => {
            for child in other.children() {
                collect_symbols(child, out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::pretty(self))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

/// An equation `lhs = rhs`. Plain expressions convert to `expr = 0`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `lhs - rhs`, the expression whose roots are sought.
    pub fn residual(&self) -> Expr {
        if self.rhs.is_zero() {
            self.lhs.clone()
        } else {
            sub(self.lhs.clone(), self.rhs.clone())
        }
    }
}

impl From<Expr> for Equation {
    fn from(expr: Expr) -> Self {
        Equation::new(expr, zero())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

pub fn zero() -> Expr {
    Expr::Constant(Rational::zero())
}

pub fn one() -> Expr {
    Expr::Constant(Rational::one())
}

pub fn rational(num: i64, den: i64) -> Rational {
    Rational::new(num.into(), den.into())
}

pub fn pow(base: Expr, exp: Expr) -> Expr {
    Expr::Pow(base.boxed(), exp.boxed())
}

pub fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(a.boxed(), b.boxed())
}

pub fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(a.boxed(), b.boxed())
}

pub fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(a.boxed(), b.boxed())
}

pub fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(a.boxed(), b.boxed())
}

pub fn neg(a: Expr) -> Expr {
    Expr::Neg(a.boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_variables_are_sorted() {
        let u = Expr::func("u", vec![Expr::var("x"), Expr::var("t")]);
        let a = Expr::derivative(u.clone(), ["x", "t"]);
        let b = Expr::derivative(u, ["t", "x"]);
        assert_eq!(a, b);
    }

    #[test]
    fn free_symbols_include_derivative_variables() {
        let f = Expr::func("f", vec![Expr::var("x")]);
        let d = Expr::derivative(f, ["x"]);
        let syms: Vec<String> = d.free_symbols().into_iter().collect();
        assert_eq!(syms, vec!["x".to_string()]);
        assert!(d.has_symbol("x"));
        assert!(!d.has_symbol("y"));
    }

    #[test]
    fn equation_residual_skips_zero_rhs() {
        let eq = Equation::from(Expr::var("x"));
        assert_eq!(eq.residual(), Expr::var("x"));
        let eq = Equation::new(Expr::var("x"), Expr::integer(2));
        assert_eq!(eq.residual(), sub(Expr::var("x"), Expr::integer(2)));
    }
}
