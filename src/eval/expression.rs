use std::fmt;

use crate::ast::{BinaryOperator, Expression, Literal, UnaryOperator};
use crate::numeric::{format_number, parse_number_text};

use super::{EvalError, EvalResult};

/// Runtime value of a formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    /// Numeric coercion used by `-`, `*`, `/` and unary operators.
    /// Blank strings are 0 and unparseable strings are NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
            Value::String(s) if s.trim().is_empty() => 0.0,
            Value::String(s) => parse_number_text(s).unwrap_or(f64::NAN),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
        }
    }
}

/// Evaluates formula expressions. There is no environment: formulas see only
/// their own literals.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn eval_expression(&self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(Value::from(lit)),
            Expression::Identifier(name) => Err(EvalError::UndefinedIdentifier(name.clone())),
            Expression::Unary { op, operand } => {
                let value = self.eval_expression(operand)?;
                self.eval_unary_op(op, &value)
            }
            Expression::BinaryOp { op, left, right } => {
                let left_val = self.eval_expression(left)?;
                let right_val = self.eval_expression(right)?;
                self.eval_binary_op(op, &left_val, &right_val)
            }
        }
    }

    fn eval_unary_op(&self, op: &UnaryOperator, value: &Value) -> EvalResult<Value> {
        let n = value.to_number();
        let result = match op {
            UnaryOperator::Plus => n,
            UnaryOperator::Negate => -n,
        };
        Self::finite(op.as_ref(), result)
    }

    fn eval_binary_op(&self, op: &BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        match op {
            BinaryOperator::Add => self.eval_add(left, right),
            BinaryOperator::Subtract => self.eval_subtract(left, right),
            BinaryOperator::Multiply => self.eval_multiply(left, right),
            BinaryOperator::Divide => self.eval_divide(left, right),
        }
    }

    fn eval_add(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", left, right)))
            }
            _ => Self::finite("+", left.to_number() + right.to_number()),
        }
    }

    fn eval_subtract(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        Self::finite("-", left.to_number() - right.to_number())
    }

    fn eval_multiply(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        Self::finite("*", left.to_number() * right.to_number())
    }

    fn eval_divide(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        let divisor = right.to_number();
        if divisor == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Self::finite("/", left.to_number() / divisor)
    }

    /// NaN and infinite results count as failed computations, so a derived
    /// field shows `Null` instead of a number no validator would accept.
    fn finite(op: &str, n: f64) -> EvalResult<Value> {
        if n.is_finite() {
            Ok(Value::Number(n))
        } else {
            Err(EvalError::NonFinite {
                op: op.to_string(),
                result: format_number(n),
            })
        }
    }
}
