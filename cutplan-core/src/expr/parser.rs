//! Recursive descent parser that converts a token stream into an AST.
//!
//! GRAMMAR:
//!   expression     --> ternary
//!   ternary        --> comparison ( "?" expression ":" expression )?
//!   comparison     --> additive ( ("==" | "!=" | "<" | "<=" | ">" | ">=") additive )*
//!   additive       --> multiplicative ( ("+" | "-") multiplicative )*
//!   multiplicative --> unary ( ("*" | "/" | "%") unary )*
//!   unary          --> "-" unary | primary
//!   primary        --> NUMBER | IDENT | IDENT "(" arguments ")" | "(" expression ")"
//!   arguments      --> expression ("," expression)*

use super::ast::{BinaryOp, Expr, Func};
use super::lexer::Lexer;
use super::token::Token;
use super::EvalError;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser positioned at the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Parser { lexer, current }
    }

    /// Parse the entire input and return the AST.
    pub fn parse(mut self) -> Result<Expr, EvalError> {
        if self.current == Token::Eof {
            return Err(EvalError::UnexpectedEnd);
        }
        let expr = self.parse_expression()?;
        if self.current != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, token: Token) -> Result<(), EvalError> {
        if self.current == token {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> EvalError {
        match &self.current {
            Token::Eof => EvalError::UnexpectedEnd,
            Token::Illegal(ch) => EvalError::UnexpectedChar(*ch),
            other => EvalError::UnexpectedToken(other.to_string()),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<Expr, EvalError> {
        let cond = self.parse_comparison()?;
        if self.current != Token::Question {
            return Ok(cond);
        }
        self.advance();
        let then = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let otherwise = self.parse_expression()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_comparison(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.current {
                Token::EqEq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::Ne,
                Token::Lt => BinaryOp::Lt,
                Token::Le => BinaryOp::Le,
                Token::Gt => BinaryOp::Gt,
                Token::Ge => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.current {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if self.current == Token::Minus {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.current.clone() {
            Token::Number(value) => {
                self.advance();
                Ok(Expr::Number(value))
            }
            Token::Ident(name) => {
                self.advance();
                if self.current == Token::LParen {
                    self.parse_call(&name)
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, EvalError> {
        let func =
            Func::from_name(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        self.expect(Token::LParen)?;

        let mut args = Vec::new();
        if self.current != Token::RParen {
            args.push(self.parse_expression()?);
            while self.current == Token::Comma {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }
        self.expect(Token::RParen)?;

        let valid = if func.is_variadic() {
            !args.is_empty()
        } else {
            args.len() == 1
        };
        if !valid {
            return Err(EvalError::WrongArgCount {
                func: func.name(),
                expected: if func.is_variadic() { "at least 1" } else { "exactly 1" },
                got: args.len(),
            });
        }

        Ok(Expr::Call { func, args })
    }
}
