use crate::error::FormulaError;
use crate::formula::ast::{BinaryOp, Expr, UnaryOp};

/// Trait for supplying identifier values during evaluation.
///
/// Identifier resolution is the only context an evaluation touches; there is
/// no ambient state and no side effect.
pub trait ValueProvider {
    fn get(&self, name: &str) -> Option<f64>;
}

impl<F> ValueProvider for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn get(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// Evaluate an expression with the given value provider.
///
/// Intermediate values may be non-finite (e.g. a division by zero deep in the
/// tree); callers classify the final value with [`finish`].
pub fn evaluate<V: ValueProvider>(expr: &Expr, values: &V) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Identifier(name) => values
            .get(name)
            .ok_or_else(|| FormulaError::UnresolvedReference(name.clone())),
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, values)?;
            let r = evaluate(right, values)?;
            Ok(apply_binary(*op, l, r))
        }
        Expr::Unary { op, expr } => {
            let v = evaluate(expr, values)?;
            Ok(match op {
                UnaryOp::Neg => -v,
            })
        }
    }
}

fn apply_binary(op: BinaryOp, l: f64, r: f64) -> f64 {
    match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Pow => l.powf(r),
    }
}

/// Classify a raw evaluation value and round it for presentation.
///
/// Division by zero and overflow surface here as [`FormulaError::NonFiniteResult`].
/// Rounding happens before classification: scaling to 2 decimal places can
/// itself overflow for magnitudes near `f64::MAX`, and a valid status must
/// always carry a finite number.
pub fn finish(value: f64) -> Result<f64, FormulaError> {
    let rounded = round2(value);
    if rounded.is_finite() {
        Ok(rounded)
    } else {
        Err(FormulaError::NonFiniteResult)
    }
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
