use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::char,
    combinator::{map, map_res, opt, value},
    error::context,
    sequence::delimited,
};

use super::token::{ParserResult, Token};
use crate::numeric::unsigned_decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

fn escape_sequence(input: &str) -> ParserResult<&str> {
    alt((
        value("\\", tag("\\")),
        value("\"", tag("\"")),
        value("'", tag("'")),
        value("\n", tag("n")),
        value("\t", tag("t")),
        value("\r", tag("r")),
    ))(input)
}

fn double_quoted(input: &str) -> ParserResult<String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(is_not("\"\\"), '\\', escape_sequence)),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

fn single_quoted(input: &str) -> ParserResult<String> {
    delimited(
        char('\''),
        map(
            opt(escaped_transform(is_not("'\\"), '\\', escape_sequence)),
            Option::unwrap_or_default,
        ),
        char('\''),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_string_literal(input: &str) -> ParserResult<Literal> {
    context(
        "string literal",
        map(alt((double_quoted, single_quoted)), Literal::String),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_number_literal(input: &str) -> ParserResult<Literal> {
    context(
        "number literal",
        map_res(unsigned_decimal, |s: &str| s.parse::<f64>().map(Literal::Number)),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    context(
        "literal",
        map(
            alt((parse_string_literal, parse_number_literal)),
            Token::Literal,
        ),
    )(input)
}
