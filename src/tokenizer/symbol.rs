//! # Symbol Token Handling
//!
//! Formulas only know the four arithmetic operators and grouping
//! parentheses. Unary signs are plain [`Operator::Plus`] / [`Operator::Minus`]
//! tokens; the analyzer decides whether they are unary or binary.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Addition or string concatenation (`+`)
    #[strum(serialize = "+")]
    Plus,
    /// Subtraction or negation (`-`)
    #[strum(serialize = "-")]
    Minus,
    /// Multiplication (`*`)
    #[strum(serialize = "*")]
    Multiply,
    /// Division (`/`)
    #[strum(serialize = "/")]
    Divide,
}

/// Grouping delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    #[strum(serialize = "(")]
    OpenParen,
    #[strum(serialize = ")")]
    CloseParen,
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                value(Operator::Plus, tag("+")),
                value(Operator::Minus, tag("-")),
                value(Operator::Multiply, tag("*")),
                value(Operator::Divide, tag("/")),
            )),
            Token::Operator,
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
            )),
            Token::Delimiter,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_operators() {
        for (input, expected) in [
            ("+", Operator::Plus),
            ("-", Operator::Minus),
            ("*", Operator::Multiply),
            ("/", Operator::Divide),
        ] {
            let (rest, token) = parse_operator(input).unwrap();
            assert_eq!(token, Token::Operator(expected));
            assert_eq!(rest, "");
            assert_eq!(Operator::from_str(input).unwrap(), expected);
            assert_eq!(expected.to_string(), input);
        }
    }

    #[test]
    fn test_delimiters() {
        let (rest, token) = parse_delimiter("(1").unwrap();
        assert_eq!(token, Token::Delimiter(Delimiter::OpenParen));
        assert_eq!(rest, "1");

        let (_, token) = parse_delimiter(")").unwrap();
        assert_eq!(token, Token::Delimiter(Delimiter::CloseParen));
    }

    #[test]
    fn test_unknown_symbol() {
        assert!(parse_operator("%").is_err());
        assert!(parse_delimiter("{").is_err());
    }
}
