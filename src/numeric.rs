//! # Numeric Text Handling
//!
//! Form values arrive as loosely typed text, so the engine needs two different
//! readings of "is this a number":
//!
//! * [`parse_number_text`]: the whole (trimmed) text must be a number. Used by
//!   the validator to reject numbers typed into free-text fields.
//! * [`parse_float_prefix`]: the longest numeric prefix wins (`"12abc"` reads as
//!   `12`). Used by the `sum` derivation.
//!
//! Both accept decimal literals with optional fraction and exponent and the
//! `Infinity` keyword. Whole-text parsing additionally accepts `0x`, `0o` and
//! `0b` integer prefixes.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit0, digit1, hex_digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    error::context,
    sequence::{pair, preceded, tuple},
};

use crate::tokenizer::token::ParserResult;

/// Recognizes an unsigned decimal literal: `12`, `12.`, `12.5`, `.5`, `1e3`.
pub fn unsigned_decimal(input: &str) -> ParserResult<&str> {
    context(
        "decimal",
        recognize(pair(
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        )),
    )(input)
}

fn signed_decimal(input: &str) -> ParserResult<f64> {
    map_res(
        recognize(pair(opt(one_of("+-")), unsigned_decimal)),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn infinity(input: &str) -> ParserResult<f64> {
    map(
        pair(opt(one_of("+-")), tag("Infinity")),
        |(sign, _)| match sign {
            Some('-') => f64::NEG_INFINITY,
            _ => f64::INFINITY,
        },
    )(input)
}

fn radix_integer(input: &str) -> ParserResult<f64> {
    alt((
        map_res(preceded(tag_no_case("0x"), hex_digit1), |s: &str| {
            u128::from_str_radix(s, 16).map(|n| n as f64)
        }),
        map_res(
            preceded(tag_no_case("0o"), recognize(nom::multi::many1(one_of("01234567")))),
            |s: &str| u128::from_str_radix(s, 8).map(|n| n as f64),
        ),
        map_res(
            preceded(tag_no_case("0b"), recognize(nom::multi::many1(one_of("01")))),
            |s: &str| u128::from_str_radix(s, 2).map(|n| n as f64),
        ),
    ))(input)
}

/// Reads the whole text as a number, ignoring surrounding whitespace.
///
/// Returns `None` for blank text and for text with anything after the number.
pub fn parse_number_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    all_consuming(alt((radix_integer, infinity, signed_decimal)))(trimmed)
        .ok()
        .map(|(_, n)| n)
}

/// Reads the longest numeric prefix of the text, after leading whitespace.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    preceded(multispace0, alt((infinity, signed_decimal)))(text)
        .ok()
        .map(|(_, n)| n)
}

/// Renders a number the way form values are displayed and substituted into
/// formulas: integral values without a fractional part, `-0` as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
