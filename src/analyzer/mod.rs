//! # Formula Analyzer
//!
//! Turns the token stream produced by the [`tokenizer`](crate::tokenizer) into
//! an [`ast::Expression`]. Parsing is built from small positional parser
//! combinators over token slices ([`combinators`], exposed through
//! [`prelude`]); the formula grammar itself lives in [`parsers`].

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
pub use parsers::parse_formula;

pub use crate::ast;
