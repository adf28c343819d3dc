use crate::error::{CasError, Result};
use crate::expr::{Equation, Expr, Rational, one};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, digit1, multispace0, satisfy};
use nom::combinator::{all_consuming, map, not, opt, recognize};
use nom::error::{ErrorKind, ParseError, VerboseError};
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use num_bigint::BigInt;
use num_traits::{Num, One, Signed, ToPrimitive};

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;
type CallResult<'a, O> = std::result::Result<O, nom::Err<VerboseError<&'a str>>>;

pub fn parse_expr(input: &str) -> Result<Expr> {
    match all_consuming(ws(parse_add_sub))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(e) => Err(CasError::Parse(format!("{e:?}"))),
    }
}

/// Parse `lhs = rhs`. Input without `=` is read as `expr = 0`.
pub fn parse_equation(input: &str) -> Result<Equation> {
    let mut sides = input.split('=');
    let lhs = sides.next().unwrap_or_default();
    match (sides.next(), sides.next()) {
        (None, _) => Ok(Equation::from(parse_expr(lhs)?)),
        (Some(rhs), None) => Ok(Equation::new(parse_expr(lhs)?, parse_expr(rhs)?)),
        (Some(_), Some(_)) => Err(CasError::Parse(format!(
            "expected a single '=' in {input:?}"
        ))),
    }
}

fn parse_add_sub(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_mul_div(input)?;
    fold_many0(
        pair(ws(alt((char('+'), char('-')))), parse_mul_div),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::Add(acc.boxed(), rhs.boxed()),
            _ => Expr::Sub(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

fn parse_mul_div(input: &str) -> PResult<'_, Expr> {
    let (rest, init) = parse_unary(input)?;
    fold_many0(
        pair(
            ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
            parse_unary,
        ),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::Mul(acc.boxed(), rhs.boxed()),
            _ => Expr::Div(acc.boxed(), rhs.boxed()),
        },
    )(rest)
}

/// Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`.
fn parse_unary(input: &str) -> PResult<'_, Expr> {
    if let Ok((rest, expr)) = preceded(ws(char('-')), parse_unary)(input) {
        Ok((rest, Expr::Neg(expr.boxed())))
    } else if let Ok((rest, expr)) = preceded(ws(char('+')), parse_unary)(input) {
        Ok((rest, expr))
    } else {
        parse_pow(input)
    }
}

fn parse_pow(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = parse_primary(input)?;
    if let Ok((next, exp)) = preceded(ws(alt((tag("**"), tag("^")))), parse_unary)(rest) {
        Ok((next, Expr::Pow(base.boxed(), exp.boxed())))
    } else {
        Ok((rest, base))
    }
}

fn parse_primary(input: &str) -> PResult<'_, Expr> {
    alt((parse_parens, parse_number, parse_call, parse_identifier))(input)
}

fn parse_parens(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), parse_add_sub, ws(char(')')))(input)
}

/// Integers and decimals, both read exactly.
fn parse_number(input: &str) -> PResult<'_, Expr> {
    let (rest, (int, frac)) = ws(pair(digit1, opt(preceded(char('.'), digit1))))(input)?;
    let whole = parse_bigint(input, int)?;
    let value = match frac {
        None => Rational::from_integer(whole),
        Some(digits) => {
            let scale = num_traits::pow(BigInt::from(10), digits.len());
            let frac = parse_bigint(input, digits)?;
            Rational::new(whole * &scale + frac, scale)
        }
    };
    Ok((rest, Expr::Constant(value)))
}

fn parse_bigint<'a>(input: &'a str, digits: &str) -> CallResult<'a, BigInt> {
    BigInt::from_str_radix(digits, 10)
        .map_err(|_| nom::Err::Failure(VerboseError::from_error_kind(input, ErrorKind::Digit)))
}

fn identifier(input: &str) -> PResult<'_, &str> {
    ws(recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    )))(input)
}

fn parse_identifier(input: &str) -> PResult<'_, Expr> {
    map(identifier, |s: &str| match s {
        "pi" => Expr::Pi,
        "I" => Expr::I,
        "E" => Expr::Exp(one().boxed()),
        _ => Expr::Variable(s.to_string()),
    })(input)
}

/// `name(args)`: a builtin function, a derivative, or an applied undefined function.
fn parse_call(input: &str) -> PResult<'_, Expr> {
    let (rest, (name, args)) = pair(
        identifier,
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), parse_add_sub),
            ws(char(')')),
        ),
    )(input)?;

    if name == "Derivative" || name == "D" {
        return derivative_call(input, args).map(|expr| (rest, expr));
    }

    let expr = match name {
        "sin" => unary_call(input, args, Expr::Sin)?,
        "cos" => unary_call(input, args, Expr::Cos)?,
        "tan" => unary_call(input, args, Expr::Tan)?,
        "asin" | "arcsin" => unary_call(input, args, Expr::Asin)?,
        "acos" | "arccos" => unary_call(input, args, Expr::Acos)?,
        "atan" | "arctan" => unary_call(input, args, Expr::Atan)?,
        "exp" => unary_call(input, args, Expr::Exp)?,
        "log" | "ln" => unary_call(input, args, Expr::Log)?,
        "abs" => unary_call(input, args, Expr::Abs)?,
        "sqrt" => unary_call(input, args, |arg| Expr::sqrt(*arg))?,
        _ => Expr::func(name, args),
    };
    Ok((rest, expr))
}

fn unary_call(input: &str, args: Vec<Expr>, build: fn(Box<Expr>) -> Expr) -> CallResult<'_, Expr> {
    match <[Expr; 1]>::try_from(args) {
        Ok([arg]) => Ok(build(arg.boxed())),
        Err(_) => Err(nom::Err::Failure(VerboseError::from_error_kind(
            input,
            ErrorKind::Verify,
        ))),
    }
}

/// `Derivative(f, x, t)` or `Derivative(f, x, 2)`: an integer after a
/// variable repeats it.
fn derivative_call(input: &str, args: Vec<Expr>) -> CallResult<'_, Expr> {
    let fail = || nom::Err::Failure(VerboseError::from_error_kind(input, ErrorKind::Verify));
    let mut args = args.into_iter();
    let inner = args.next().ok_or_else(fail)?;
    let mut vars: Vec<String> = Vec::new();
    for arg in args {
        match arg {
            Expr::Variable(name) => vars.push(name),
            Expr::Constant(order) if order.is_integer() && order.is_positive() => {
                let last = vars.last().cloned().ok_or_else(fail)?;
                let extra = (order - Rational::one()).to_integer().to_usize().ok_or_else(fail)?;
                vars.extend(std::iter::repeat(last).take(extra));
            }
            _ => return Err(fail()),
        }
    }
    if vars.is_empty() {
        return Err(fail());
    }
    Ok(Expr::derivative(inner, vars))
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}
