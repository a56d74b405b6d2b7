//! Formula evaluation and derived field computation.

pub mod derive;
pub mod expression;
pub mod formula;

use thiserror::Error;

pub use derive::{calculate_derived_value, calculate_derived_value_at};
pub use expression::{ExpressionEvaluator, Value};
pub use formula::{compile_formula, evaluate_formula, substitute_placeholders, FormulaError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Undefined identifier: {0}")]
    UndefinedIdentifier(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Non-finite result of '{op}': {result}")]
    NonFinite { op: String, result: String },
}

pub type EvalResult<T> = Result<T, EvalError>;
