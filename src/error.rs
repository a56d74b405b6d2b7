use thiserror::Error;

use crate::analyzer::ParseError;
use crate::builder::BuilderError;
use crate::eval::{EvalError, FormulaError};
use crate::preview::PreviewError;
use crate::schema::SchemaError;
use crate::storage::StorageError;
use crate::tokenizer::token::TokenizerError;

#[derive(Error, Debug)]
pub enum Error {
    // formula pipeline
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Builder error: {0}")]
    Builder(#[from] BuilderError),
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
