//! Restricted arithmetic expression evaluator.
//!
//! Piece dimensions and quantities are formulas over named parameters
//! (e.g. `"ANCHO - 2*ESPESOR"`). This module evaluates them with a small
//! recursive-descent parser over a fixed grammar: arithmetic, comparison,
//! ternary conditionals and a whitelisted function set (`ceil`, `floor`,
//! `round`, `min`, `max`, `abs`). There is no host code execution path:
//! an expression can only read the supplied binding.
//!
//! Two entry points implement the two failure policies:
//! [`eval_expr`] is strict (validation paths need to distinguish a
//! broken formula from a legitimate zero), [`eval_expr_or_zero`] is the
//! permissive live-preview mode that coerces failures to 0 with a
//! warning.

mod ast;
mod lexer;
mod parser;
mod token;

pub use ast::{BinaryOp, Expr, Func};
pub use parser::Parser;
pub use token::Token;

use std::collections::BTreeMap;

use thiserror::Error;

/// Expression parse or evaluation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{func}' expects {expected} argument(s), got {got}")]
    WrongArgCount {
        func: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("expression result is not a finite number")]
    NonFinite,
}

/// Parse an expression into its AST without evaluating it.
pub fn parse(expr: &str) -> Result<Expr, EvalError> {
    Parser::new(expr.trim()).parse()
}

/// Evaluate an expression against a variable binding.
///
/// An empty or blank expression evaluates to `0` by convention; that is
/// the only case where `0` and "no formula" coincide. Any other failure
/// (syntax error, unknown variable, NaN/infinite result) is reported as
/// an [`EvalError`] rather than coerced to zero.
pub fn eval_expr(expr: &str, vars: &BTreeMap<String, f64>) -> Result<f64, EvalError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let ast = Parser::new(trimmed).parse()?;
    let value = ast.eval(vars)?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

/// Permissive evaluation: coerce any failure to `0`, logging a warning.
///
/// Matches the live-preview behavior where a half-typed formula should
/// render as a zero-size piece instead of an error.
pub fn eval_expr_or_zero(expr: &str, vars: &BTreeMap<String, f64>) -> f64 {
    match eval_expr(expr, vars) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(expr, %err, "expression error, using 0");
            0.0
        }
    }
}
