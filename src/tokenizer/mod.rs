//! # Formula Tokenizer
//!
//! Lexical analysis for `custom` derivation formulas. After placeholder
//! substitution a formula is plain text such as `12 + 30 / 2` or
//! `"Dr. " + 'Smith'`; the tokenizer turns it into a stream of
//! [`TokenSpan`](token::TokenSpan) values for the [`analyzer`](crate::analyzer).
//!
//! ## Component Structure
//!
//! * [`token`]: Core token types and the [`Tokenizer`](token::Tokenizer)
//! * [`symbol`]: Arithmetic operators and parentheses
//! * [`literal`]: Number, string and boolean literals
//! * [`whitespace`]: Whitespace and newline handling
//!
//! Whitespace is kept as tokens so spans stay exact; the formula pipeline drops
//! them before parsing.

pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
