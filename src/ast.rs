//! Abstract syntax tree for derivation formulas.

use std::fmt;

use strum_macros::{AsRefStr, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum UnaryOperator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Negate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// A bare name. Formulas have no variables, so evaluating one fails.
    Identifier(String),
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn number(n: f64) -> Self {
        Expression::Literal(Literal::Number(n))
    }

    pub fn string<S: Into<String>>(s: S) -> Self {
        Expression::Literal(Literal::String(s.into()))
    }
}

/// Fully parenthesized rendering, handy for checking precedence in tests and
/// for diagnostics.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Literal::Number(n)) => write!(f, "{}", n),
            Expression::Literal(Literal::String(s)) => write!(f, "{:?}", s),
            Expression::Literal(Literal::Boolean(b)) => write!(f, "{}", b),
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::Unary { op, operand } => write!(f, "({}{})", op, operand),
            Expression::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}
