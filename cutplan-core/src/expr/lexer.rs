//! Scans a raw formula string and produces a stream of tokens.
//!
//! Handles whitespace skipping, number parsing, identifiers and the
//! multi-character operators `==`, `!=`, `<=` and `>=`.

use std::iter::Peekable;
use std::str::Chars;

use super::token::Token;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Star,
            Some('/') => Token::Slash,
            Some('%') => Token::Percent,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some(',') => Token::Comma,
            Some('?') => Token::Question,
            Some(':') => Token::Colon,

            // == only; a lone '=' is not an operator in this language
            Some('=') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::EqEq
                } else {
                    Token::Illegal('=')
                }
            }

            Some('!') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::NotEq
                } else {
                    Token::Illegal('!')
                }
            }

            Some('<') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::Le
                } else {
                    Token::Lt
                }
            }

            Some('>') => {
                if self.input.peek() == Some(&'=') {
                    self.input.next();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }

            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),

            Some(ch) if is_ident_start(ch) => self.read_identifier(ch),

            None => Token::Eof,

            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut literal = String::new();
        literal.push(first);
        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                literal.push(ch);
                self.input.next();
            } else {
                break;
            }
        }
        match literal.parse::<f64>() {
            Ok(value) => Token::Number(value),
            Err(_) => Token::Illegal(first),
        }
    }

    fn read_identifier(&mut self, first: char) -> Token {
        let mut name = String::new();
        name.push(first);
        while let Some(&ch) = self.input.peek() {
            if is_ident_continue(ch) {
                name.push(ch);
                self.input.next();
            } else {
                break;
            }
        }
        Token::Ident(name)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
