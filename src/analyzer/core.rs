use thiserror::Error;

/// A parser over a slice of already-tokenized input.
///
/// Parsers are positional: they receive the whole slice plus the index to
/// start from, and return the index after the consumed input.
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

impl<I, O, P: Parser<I, O> + ?Sized> Parser<I, O> for Box<P> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        (**self).parse(input, pos)
    }
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token '{found}' at position {position}")]
    Unexpected { found: String, position: usize },
    #[error("Unexpected end of formula")]
    UnexpectedEof,
    #[error("No alternative matched")]
    NoAlternative,
    #[error("Unconsumed input starting at position {position}")]
    TrailingInput { position: usize },
    #[error("Empty formula")]
    Empty,
    #[error("Formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("Formula has more than {limit} tokens")]
    TooLong { limit: usize },
    #[error("{message}: {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    /// Innermost error, without the context chain.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::WithContext { inner, .. } => inner.root_cause(),
            other => other,
        }
    }
}
