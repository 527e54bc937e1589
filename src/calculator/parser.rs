//! Recursive-descent parser producing an expression tree.
//!
//! Precedence, lowest first: `+ -`, `* /`, unary sign, `^`. Exponentiation
//! is right-associative and binds tighter than a leading sign, so `-2^2`
//! is `-(2^2)` while `2^-1` is `2^(-1)`.
//!
//! Input size is capped so that parsing, evaluation and dropping the tree
//! never recurse without bound.

use super::error::EvalError;
use super::lexer::{Spanned, Token, tokenize};

/// Deepest allowed nesting of parentheses, brackets, calls and signs.
pub const MAX_DEPTH: usize = 100;

/// Longest accepted expression, in tokens. Also bounds the height of the
/// tree that `eval` walks.
pub const MAX_TOKENS: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// Matrix literal; one inner vec per `;`-separated row.
    Matrix(Vec<Vec<Expr>>),
}

/// Parse a complete expression.
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    if tokens.len() > MAX_TOKENS {
        return Err(EvalError::TooLong(MAX_TOKENS));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;

    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(extra) => Err(EvalError::UnexpectedToken {
            found: extra.token.describe(),
            pos: extra.pos,
        }),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), EvalError> {
        match self.advance() {
            Some(s) if s.token == expected => Ok(()),
            Some(s) => Err(EvalError::UnexpectedToken {
                found: s.token.describe(),
                pos: s.pos,
            }),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn expression(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    /// Every nested sub-expression passes through here, so this is where
    /// depth is counted.
    fn unary(&mut self) -> Result<Expr, EvalError> {
        if self.depth == MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        let Some(next) = self.advance() else {
            return Err(EvalError::UnexpectedEnd);
        };

        match next.token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Ident(name) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Symbol(name))
                }
            }
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => self.matrix(),
            other => Err(EvalError::UnexpectedToken {
                found: other.describe(),
                pos: next.pos,
            }),
        }
    }

    /// Comma-separated call arguments; the opening `(` is already consumed.
    fn arguments(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }

    /// Matrix rows; the opening `[` is already consumed.
    fn matrix(&mut self) -> Result<Expr, EvalError> {
        let mut rows = Vec::new();
        if self.eat(&Token::RBracket) {
            return Ok(Expr::Matrix(rows));
        }

        let mut row = Vec::new();
        loop {
            row.push(self.expression()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::Semicolon) {
                rows.push(std::mem::take(&mut row));
                continue;
            }
            self.expect(Token::RBracket)?;
            rows.push(row);
            return Ok(Expr::Matrix(rows));
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
