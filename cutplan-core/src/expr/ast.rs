//! AST and evaluation for the expression language.

use std::collections::BTreeMap;

use super::EvalError;

/// Binary operators, arithmetic and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Whitelisted functions. Nothing outside this set is callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Ceil,
    Floor,
    Round,
    Min,
    Max,
    Abs,
}

impl Func {
    /// Resolve a function by (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ceil" => Some(Func::Ceil),
            "floor" => Some(Func::Floor),
            "round" => Some(Func::Round),
            "min" => Some(Func::Min),
            "max" => Some(Func::Max),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Func::Ceil => "ceil",
            Func::Floor => "floor",
            Func::Round => "round",
            Func::Min => "min",
            Func::Max => "max",
            Func::Abs => "abs",
        }
    }

    /// Whether this function takes a variable number of arguments.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Func::Min | Func::Max)
    }
}

/// A parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Variable reference, resolved from the binding at evaluation time.
    Var(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary operation. Comparisons yield 1.0 or 0.0.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Conditional: `cond ? then : otherwise`. True iff cond != 0.
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Whitelisted function call; arity is checked at parse time.
    Call { func: Func, args: Vec<Expr> },
}

impl Expr {
    /// Evaluate against a variable binding.
    ///
    /// Pure: no side effects, no host call-outs. The only runtime
    /// failure is an unknown variable; finiteness of the final value is
    /// checked by [`super::eval_expr`].
    pub fn eval(&self, vars: &BTreeMap<String, f64>) -> Result<f64, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Var(name) => vars
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Expr::Neg(inner) => Ok(-inner.eval(vars)?),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(vars)?;
                let b = rhs.eval(vars)?;
                Ok(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Eq => bool_num(a == b),
                    BinaryOp::Ne => bool_num(a != b),
                    BinaryOp::Lt => bool_num(a < b),
                    BinaryOp::Le => bool_num(a <= b),
                    BinaryOp::Gt => bool_num(a > b),
                    BinaryOp::Ge => bool_num(a >= b),
                })
            }
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval(vars)? != 0.0 {
                    then.eval(vars)
                } else {
                    otherwise.eval(vars)
                }
            }
            Expr::Call { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval(vars)?);
                }
                Ok(apply(*func, &values))
            }
        }
    }
}

fn bool_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Apply a whitelisted function. Arity was validated by the parser.
fn apply(func: Func, args: &[f64]) -> f64 {
    match func {
        Func::Ceil => args[0].ceil(),
        Func::Floor => args[0].floor(),
        // Half-away-from-zero, like f64::round
        Func::Round => args[0].round(),
        Func::Abs => args[0].abs(),
        Func::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
        Func::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}
