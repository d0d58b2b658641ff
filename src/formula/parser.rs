use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize},
    number::complete::recognize_float,
    sequence::{delimited, pair},
    IResult,
};

use crate::error::FormulaError;
use crate::formula::ast::{BinaryOp, Expr, UnaryOp};

/// Parse a formula expression string into an AST.
pub fn parse(input: &str) -> Result<Expr, FormulaError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormulaError::EmptyExpression);
    }

    match parse_expr(input) {
        Ok((remaining, expr)) => {
            let remaining = remaining.trim();
            if remaining.is_empty() {
                Ok(expr)
            } else {
                Err(FormulaError::ParseError {
                    position: input.len() - remaining.len(),
                    message: format!("unexpected characters: '{}'", remaining),
                })
            }
        }
        Err(e) => Err(FormulaError::ParseError {
            position: 0,
            message: format!("parse error: {:?}", e),
        }),
    }
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn parse_expr(input: &str) -> IResult<&str, Expr> {
    parse_additive(input)
}

fn parse_additive(input: &str) -> IResult<&str, Expr> {
    let (input, left) = parse_multiplicative(input)?;
    parse_binary_chain(input, left, parse_additive_op, parse_multiplicative)
}

fn parse_additive_op(input: &str) -> IResult<&str, BinaryOp> {
    ws(alt((
        map(char('+'), |_| BinaryOp::Add),
        map(char('-'), |_| BinaryOp::Sub),
    )))(input)
}

fn parse_multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, left) = parse_power(input)?;
    parse_binary_chain(input, left, parse_multiplicative_op, parse_power)
}

fn parse_multiplicative_op(input: &str) -> IResult<&str, BinaryOp> {
    // `parse_power` consumes `**` chains greedily, so a lone `*` here is
    // always multiplication.
    ws(alt((
        map(char('*'), |_| BinaryOp::Mul),
        map(char('/'), |_| BinaryOp::Div),
    )))(input)
}

// `**` binds tighter than `*`/`/` and associates to the right.
fn parse_power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = parse_unary(input)?;
    let (input, _) = multispace0(input)?;

    if let Ok((input, _)) = tag::<&str, &str, nom::error::Error<&str>>("**")(input) {
        let (input, _) = multispace0(input)?;
        let (input, exponent) = parse_power(input)?;
        Ok((input, Expr::binary(BinaryOp::Pow, base, exponent)))
    } else {
        Ok((input, base))
    }
}

fn parse_binary_chain<'a, F, G>(
    mut input: &'a str,
    mut left: Expr,
    mut op_parser: F,
    mut expr_parser: G,
) -> IResult<&'a str, Expr>
where
    F: FnMut(&'a str) -> IResult<&'a str, BinaryOp>,
    G: FnMut(&'a str) -> IResult<&'a str, Expr>,
{
    loop {
        match op_parser(input) {
            Ok((remaining, op)) => {
                let (remaining, right) = expr_parser(remaining)?;
                left = Expr::binary(op, left, right);
                input = remaining;
            }
            Err(_) => return Ok((input, left)),
        }
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;

    if let Ok((input, _)) = char::<&str, nom::error::Error<&str>>('-')(input) {
        let (input, _) = multispace0(input)?;
        let (input, expr) = parse_unary(input)?;
        return Ok((input, Expr::unary(UnaryOp::Neg, expr)));
    }

    parse_primary(input)
}

fn parse_primary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;

    alt((parse_parenthesized, parse_number, parse_identifier))(input)
}

fn parse_parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(
        pair(char('('), multispace0),
        parse_expr,
        pair(multispace0, char(')')),
    )(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr> {
    map(recognize_float, |s: &str| {
        Expr::Number(s.parse().unwrap_or(0.0))
    })(input)
}

fn parse_identifier(input: &str) -> IResult<&str, Expr> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_alphabetic() || c == '_'),
            opt(take_while1(|c: char| c.is_alphanumeric() || c == '_')),
        )),
        |s: &str| Expr::Identifier(s.to_string()),
    )(input)
}
