//! Arithmetic expression parser
//!
//! Parses RMetric formula strings into Expression AST nodes.
//!
//! Supported syntax:
//! - Numeric literals: `0.6`, `42`
//! - Metric references: `VendorDrift`, `TimelineRisk`
//! - Binary operators `+ - * /` with standard precedence,
//!   left-associative within a precedence level
//! - Parentheses for grouping: `(a + b) * c`

use crate::error::{ParseError, Result};
use roidsl_core::ast::{ArithOp, Expr};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(ArithOp),
    LParen,
    RParen,
}

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse a formula string into an expression AST
    pub fn parse(input: &str) -> Result<Expr> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidExpression(
                "empty expression".to_string(),
            ));
        }

        let tokens = tokenize(input)?;
        let mut cursor = Cursor { tokens, pos: 0 };
        let expr = cursor.parse_additive()?;

        if let Some(token) = cursor.peek() {
            return Err(ParseError::InvalidExpression(format!(
                "unexpected trailing token {token:?} in '{input}'"
            )));
        }

        Ok(expr)
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Op(ArithOp::Add));
            }
            '-' => {
                chars.next();
                tokens.push(Token::Op(ArithOp::Sub));
            }
            '*' => {
                chars.next();
                tokens.push(Token::Op(ArithOp::Mul));
            }
            '/' => {
                chars.next();
                tokens.push(Token::Op(ArithOp::Div));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = literal.parse::<f64>().map_err(|_| {
                    ParseError::InvalidExpression(format!("invalid number literal '{literal}'"))
                })?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(ParseError::InvalidExpression(format!(
                    "unexpected character '{other}' in '{input}'"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// additive := multiplicative { ("+" | "-") multiplicative }
    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;

        while let Some(Token::Op(op @ (ArithOp::Add | ArithOp::Sub))) = self.peek().cloned() {
            self.next();
            let right = self.parse_multiplicative()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    /// multiplicative := primary { ("*" | "/") primary }
    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_primary()?;

        while let Some(Token::Op(op @ (ArithOp::Mul | ArithOp::Div))) = self.peek().cloned() {
            self.next();
            let right = self.parse_primary()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    /// primary := number | identifier | "(" additive ")"
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ident(name)) => Ok(Expr::MetricRef(name)),
            Some(Token::LParen) => {
                let inner = self.parse_additive()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ParseError::InvalidExpression(
                        "missing closing parenthesis".to_string(),
                    )),
                }
            }
            Some(token) => Err(ParseError::InvalidExpression(format!(
                "unexpected token {token:?}"
            ))),
            None => Err(ParseError::InvalidExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}
