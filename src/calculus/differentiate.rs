use crate::expr::{Expr, Rational, one};
use crate::simplify::{simplify, simplify_add, simplify_sub};
use num_traits::{One, Zero};

pub fn differentiate(var: &str, expr: &Expr) -> Expr {
    Differentiator { var }.derive(expr)
}

struct Differentiator<'a> {
    var: &'a str,
}

impl<'a> Differentiator<'a> {
    fn derive(&self, expr: &Expr) -> Expr {
        if !expr.has_symbol(self.var) {
            return Expr::Constant(Rational::zero());
        }
        match expr {
            Expr::Variable(_) => Expr::Constant(Rational::one()),
            Expr::Constant(_) | Expr::Pi | Expr::I => Expr::Constant(Rational::zero()),

            Expr::Add(a, b) => simplify_add(self.derive(a), self.derive(b)),
            Expr::Sub(a, b) => simplify_sub(self.derive(a), self.derive(b)),
            Expr::Mul(a, b) => self.product_rule(a, b),
            Expr::Div(a, b) => self.quotient_rule(a, b),
            Expr::Pow(a, b) => self.power_rule(a, b),
            Expr::Neg(a) => simplify(Expr::Neg(self.derive(a).boxed())),

            Expr::Sin(a) => self.chain_rule(a, |inner| Expr::Cos(inner.boxed())),
            Expr::Cos(a) => simplify(Expr::Neg(
                self.chain_rule(a, |inner| Expr::Sin(inner.boxed())).boxed(),
            )),
            Expr::Tan(a) => self.chain_rule(a, |inner| {
                Expr::Pow(
                    Expr::Cos(inner.boxed()).boxed(),
                    Expr::Constant(Rational::from_integer((-2).into())).boxed(),
                )
            }),
            Expr::Asin(a) => self.chain_rule(a, |inner| inverse_sqrt(one_minus_square(inner))),
            Expr::Acos(a) => simplify(Expr::Neg(
                self.chain_rule(a, |inner| inverse_sqrt(one_minus_square(inner)))
                    .boxed(),
            )),
            Expr::Atan(a) => self.chain_rule(a, |inner| {
                Expr::Pow(
                    Expr::Add(
                        one().boxed(),
                        Expr::Pow(inner.boxed(), Expr::integer(2).boxed()).boxed(),
                    )
                    .boxed(),
                    Expr::integer(-1).boxed(),
                )
            }),

            Expr::Exp(a) => simplify(Expr::Mul(
                self.derive(a).boxed(),
                Expr::Exp(a.clone()).boxed(),
            )),
            Expr::Log(a) => simplify(Expr::Div(self.derive(a).boxed(), a.clone().boxed())),
            Expr::Abs(a) => self.chain_rule(a, |inner| {
                Expr::Div(inner.clone().boxed(), Expr::Abs(inner.boxed()).boxed())
            }),

            Expr::Func(_, _) => self.function_rule(expr),
            Expr::Derivative(inner, vars) => {
                let mut vars = vars.clone();
                vars.push(self.var.to_string());
                Expr::derivative((**inner).clone(), vars)
            }
        }
    }

    /// `d/dx f(x, t) = Derivative(f(x, t), x)`. Arguments that are not plain
    /// symbols leave the derivative unevaluated on the whole application.
    fn function_rule(&self, expr: &Expr) -> Expr {
        Expr::derivative(expr.clone(), [self.var])
    }

    fn product_rule(&self, a: &Expr, b: &Expr) -> Expr {
        let da = self.derive(a);
        let db = self.derive(b);
        simplify(Expr::Add(
            Expr::Mul(da.boxed(), b.clone().boxed()).boxed(),
            Expr::Mul(a.clone().boxed(), db.boxed()).boxed(),
        ))
    }

    fn quotient_rule(&self, a: &Expr, b: &Expr) -> Expr {
        simplify(Expr::Div(
            Expr::Sub(
                Expr::Mul(self.derive(a).boxed(), b.clone().boxed()).boxed(),
                Expr::Mul(a.clone().boxed(), self.derive(b).boxed()).boxed(),
            )
            .boxed(),
            Expr::Pow(
                b.clone().boxed(),
                Expr::Constant(Rational::from_integer(2.into())).boxed(),
            )
            .boxed(),
        ))
    }

    fn power_rule(&self, base: &Expr, exp: &Expr) -> Expr {
        if !exp.has_symbol(self.var) {
            let db = self.derive(base);
            return simplify(Expr::Mul(
                Expr::Mul(
                    exp.clone().boxed(),
                    Expr::Pow(
                        base.clone().boxed(),
                        Expr::Sub(exp.clone().boxed(), one().boxed()).boxed(),
                    )
                    .boxed(),
                )
                .boxed(),
                db.boxed(),
            ));
        }
        let f = Expr::Pow(base.clone().boxed(), exp.clone().boxed());
        let da = self.derive(base);
        let db = self.derive(exp);
        simplify(Expr::Mul(
            f.boxed(),
            Expr::Add(
                Expr::Mul(db.boxed(), Expr::Log(base.clone().boxed()).boxed()).boxed(),
                Expr::Div(
                    Expr::Mul(exp.clone().boxed(), da.boxed()).boxed(),
                    base.clone().boxed(),
                )
                .boxed(),
            )
            .boxed(),
        ))
    }

    fn chain_rule<F>(&self, arg: &Expr, outer: F) -> Expr
    where
        F: Fn(Expr) -> Expr,
    {
        let da = self.derive(arg);
        simplify(Expr::Mul(da.boxed(), outer(arg.clone()).boxed()))
    }
}

fn one_minus_square(inner: Expr) -> Expr {
    Expr::Sub(
        one().boxed(),
        Expr::Pow(inner.boxed(), Expr::integer(2).boxed()).boxed(),
    )
}

fn inverse_sqrt(inner: Expr) -> Expr {
    Expr::Pow(inner.boxed(), Expr::constant(-1, 2).boxed())
}
