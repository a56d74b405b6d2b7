//! Compiling and running `custom` derivation formulas.

use thiserror::Error;

use crate::analyzer::{self, ast, ParseError};
use crate::tokenizer::token::{Token, Tokenizer, TokenizerError};

use super::{expression::ExpressionEvaluator, EvalError, Value};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Tokenize error: {0}")]
    Tokenize(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
}

pub type FormulaResult<T> = Result<T, FormulaError>;

/// Replaces each `{label}` placeholder with its bound text. Bindings are
/// applied in order, and the text is inserted raw: a string value becomes
/// bare words in the formula unless the formula quotes the placeholder.
pub fn substitute_placeholders<L, T>(formula: &str, bindings: &[(L, T)]) -> String
where
    L: AsRef<str>,
    T: AsRef<str>,
{
    bindings
        .iter()
        .fold(formula.to_string(), |text, (label, replacement)| {
            text.replace(&format!("{{{}}}", label.as_ref()), replacement.as_ref())
        })
}

/// Tokenizes and parses a formula without evaluating it.
pub fn compile_formula(text: &str) -> FormulaResult<ast::Expression> {
    let tokens: Vec<Token> = Tokenizer::new()
        .tokenize(text)?
        .into_iter()
        .map(|span| span.token)
        .filter(|token| !token.is_trivia())
        .collect();
    Ok(analyzer::parse_formula(&tokens)?)
}

/// Evaluates a fully substituted formula.
#[tracing::instrument(level = "debug")]
pub fn evaluate_formula(text: &str) -> FormulaResult<Value> {
    let expression = compile_formula(text)?;
    tracing::debug!("compiled formula: {}", expression);
    Ok(ExpressionEvaluator::new().eval_expression(&expression)?)
}
