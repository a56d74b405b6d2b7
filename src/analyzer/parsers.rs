//! Formula grammar.
//!
//! ```text
//! formula        := additive EOF
//! additive       := multiplicative (("+" | "-") multiplicative)*
//! multiplicative := unary (("*" | "/") unary)*
//! unary          := ("+" | "-") unary | primary
//! primary        := literal | identifier | "(" additive ")"
//! ```
//!
//! Binary operators are left associative.
//!
//! Parsing and evaluation recurse once per nesting level, so formulas are
//! checked against [`MAX_FORMULA_DEPTH`] and [`MAX_FORMULA_TOKENS`] before the
//! grammar runs.

use crate::tokenizer::{
    literal::Literal,
    symbol::{Delimiter, Operator},
    token::Token,
};

use super::{ast, prelude::*, ParseError, Parser};

/// Deepest allowed nesting of parentheses and unary signs.
pub const MAX_FORMULA_DEPTH: usize = 64;

/// Longest allowed formula, counted in non-trivia tokens.
pub const MAX_FORMULA_TOKENS: usize = 1024;

/// Parses a complete formula. Whitespace tokens must already be removed.
#[tracing::instrument(level = "debug", skip(tokens))]
pub fn parse_formula(tokens: &[Token]) -> Result<ast::Expression, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    if tokens.len() > MAX_FORMULA_TOKENS {
        return Err(ParseError::TooLong {
            limit: MAX_FORMULA_TOKENS,
        });
    }
    if nesting_depth(tokens) > MAX_FORMULA_DEPTH {
        return Err(ParseError::TooDeep {
            limit: MAX_FORMULA_DEPTH,
        });
    }
    let (pos, expression) = parse_expression().parse(tokens, 0)?;
    if pos != tokens.len() {
        return Err(ParseError::TrailingInput { position: pos });
    }
    Ok(expression)
}

/// Upper bound on how deep the grammar will recurse for `tokens`.
///
/// Every open group counts one level, and so does every unary sign still
/// waiting for its operand. A binary operator closes all pending signs of its
/// group, since a unary operand never extends past one.
fn nesting_depth(tokens: &[Token]) -> usize {
    let mut pending_signs = vec![0usize];
    let mut deepest = 0;
    let mut previous: Option<&Token> = None;

    for token in tokens {
        match token {
            Token::Delimiter(Delimiter::OpenParen) => pending_signs.push(0),
            Token::Delimiter(Delimiter::CloseParen) => {
                if pending_signs.len() > 1 {
                    pending_signs.pop();
                }
            }
            Token::Operator(_) => {
                let unary = matches!(
                    previous,
                    None | Some(Token::Operator(_)) | Some(Token::Delimiter(Delimiter::OpenParen))
                );
                if let Some(signs) = pending_signs.last_mut() {
                    if unary {
                        *signs += 1;
                    } else {
                        *signs = 0;
                    }
                }
            }
            _ => {}
        }
        let depth = pending_signs.len() + pending_signs.iter().sum::<usize>();
        deepest = deepest.max(depth);
        previous = Some(token);
    }
    deepest
}

fn parse_expression() -> impl Parser<Token, ast::Expression> {
    with_context(
        choice(vec![Box::new(lazy(parse_additive))]),
        "expression",
    )
}

fn fold_binary(
    (first, rest): (ast::Expression, Vec<(ast::BinaryOperator, ast::Expression)>),
) -> ast::Expression {
    rest.into_iter()
        .fold(first, |left, (op, right)| ast::Expression::binary(op, left, right))
}

fn parse_additive() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            preceded(
                parse_multiplicative(),
                many(preceded(
                    choice(vec![
                        Box::new(parse_operator_add()),
                        Box::new(parse_operator_subtract()),
                    ]),
                    parse_multiplicative(),
                )),
            ),
            fold_binary,
        ),
        "additive",
    )
}

fn parse_multiplicative() -> impl Parser<Token, ast::Expression> {
    with_context(
        map(
            preceded(
                parse_unary(),
                many(preceded(
                    choice(vec![
                        Box::new(parse_operator_multiply()),
                        Box::new(parse_operator_divide()),
                    ]),
                    parse_unary(),
                )),
            ),
            fold_binary,
        ),
        "multiplicative",
    )
}

fn parse_unary() -> impl Parser<Token, ast::Expression> {
    with_context(
        choice(vec![
            Box::new(map(
                preceded(parse_unary_operator(), lazy(parse_nested_unary)),
                |(op, operand)| ast::Expression::unary(op, operand),
            )),
            Box::new(parse_primary()),
        ]),
        "unary",
    )
}

// Boxed so the recursive rule does not name its own return type.
fn parse_nested_unary() -> Box<dyn Parser<Token, ast::Expression>> {
    Box::new(parse_unary())
}

fn parse_unary_operator() -> impl Parser<Token, ast::UnaryOperator> {
    satisfy(|token: &Token| match token {
        Token::Operator(Operator::Plus) => Some(ast::UnaryOperator::Plus),
        Token::Operator(Operator::Minus) => Some(ast::UnaryOperator::Negate),
        _ => None,
    })
}

fn parse_primary() -> impl Parser<Token, ast::Expression> {
    with_context(
        choice(vec![
            Box::new(map(parse_literal(), ast::Expression::Literal)),
            Box::new(map(parse_identifier(), ast::Expression::Identifier)),
            Box::new(parse_group()),
        ]),
        "primary",
    )
}

fn parse_group() -> impl Parser<Token, ast::Expression> {
    with_context(
        delimited(
            as_unit(parse_open_paren()),
            lazy(parse_expression),
            as_unit(parse_close_paren()),
        ),
        "parenthesized expression",
    )
}

fn parse_literal() -> impl Parser<Token, ast::Literal> {
    satisfy(|token: &Token| match token {
        Token::Literal(Literal::Number(n)) => Some(ast::Literal::Number(*n)),
        Token::Literal(Literal::String(s)) => Some(ast::Literal::String(s.clone())),
        Token::Literal(Literal::Boolean(b)) => Some(ast::Literal::Boolean(*b)),
        _ => None,
    })
}

fn parse_identifier() -> impl Parser<Token, String> {
    satisfy(|token: &Token| match token {
        Token::Identifier(name) => Some(name.clone()),
        _ => None,
    })
}

fn parse_operator(
    operator: Operator,
    binary: ast::BinaryOperator,
) -> impl Parser<Token, ast::BinaryOperator> {
    map(equal(Token::Operator(operator)), move |_| binary)
}

fn parse_operator_add() -> impl Parser<Token, ast::BinaryOperator> {
    parse_operator(Operator::Plus, ast::BinaryOperator::Add)
}

fn parse_operator_subtract() -> impl Parser<Token, ast::BinaryOperator> {
    parse_operator(Operator::Minus, ast::BinaryOperator::Subtract)
}

fn parse_operator_multiply() -> impl Parser<Token, ast::BinaryOperator> {
    parse_operator(Operator::Multiply, ast::BinaryOperator::Multiply)
}

fn parse_operator_divide() -> impl Parser<Token, ast::BinaryOperator> {
    parse_operator(Operator::Divide, ast::BinaryOperator::Divide)
}

fn parse_open_paren() -> impl Parser<Token, Token> {
    with_context(equal(Token::Delimiter(Delimiter::OpenParen)), "open paren")
}

fn parse_close_paren() -> impl Parser<Token, Token> {
    with_context(equal(Token::Delimiter(Delimiter::CloseParen)), "close paren")
}
