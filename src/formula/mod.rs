//! Formula engine for parameter-derived calculations.
//!
//! This module provides parsing, validation, and evaluation of the textual
//! formulas attached to calculations. Formulas reference parameters and
//! other calculations by identifier.
//!
//! # Supported Grammar
//!
//! - Arithmetic: `+ - * / ( )`
//! - Exponentiation: `**` (right-associative)
//! - Unary negation: `-x`
//! - Numeric literals and identifiers
//!
//! There are no function calls, branches, or loops: evaluation is bounded by
//! the size of the formula text.
//!
//! # Example
//!
//! ```
//! use coolcompare_compute::formula::{validate, compute};
//!
//! // Validate a formula
//! let formula = "maxLoad * 1000 * utilization / 100";
//! validate(formula).expect("Formula should be valid");
//!
//! // Compute with identifier values
//! let values = |name: &str| match name {
//!     "maxLoad" => Some(2.0),
//!     "utilization" => Some(80.0),
//!     _ => None,
//! };
//! let result = compute(formula, &values).expect("Should compute");
//! assert!((result - 1600.0).abs() < f64::EPSILON);
//! ```

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use evaluator::{evaluate, finish, round2, ValueProvider};
pub use parser::parse;

use crate::error::FormulaError;

/// Validate a formula expression without evaluating it.
///
/// This checks that the formula parses correctly but does not validate
/// that all identifiers exist (as that depends on context).
pub fn validate(expression: &str) -> Result<(), FormulaError> {
    parse(expression)?;
    Ok(())
}

/// Validate a formula and check that every referenced identifier is available.
pub fn validate_with_identifiers(
    expression: &str,
    available: &[&str],
) -> Result<(), FormulaError> {
    let ast = parse(expression)?;
    for name in identifiers_of(&ast) {
        if !available.contains(&name.as_str()) {
            return Err(FormulaError::UnresolvedReference(name));
        }
    }
    Ok(())
}

/// Compute a formula's numeric result given a value provider.
///
/// The result is classified (non-finite values are errors) and rounded to
/// 2 decimal places.
pub fn compute<V: ValueProvider>(expression: &str, values: &V) -> Result<f64, FormulaError> {
    let ast = parse(expression)?;
    let raw = evaluate(&ast, values)?;
    finish(raw)
}

/// Identifiers referenced by an expression, in first-occurrence order,
/// without duplicates.
pub fn identifiers_of(expr: &Expr) -> Vec<String> {
    let mut out = Vec::new();
    collect_identifiers(expr, &mut out);
    out
}

fn collect_identifiers(expr: &Expr, out: &mut Vec<String>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Identifier(name) => {
            if !out.iter().any(|n| n == name) {
                out.push(name.clone());
            }
        }
        Expr::Binary { left, right, .. } => {
            collect_identifiers(left, out);
            collect_identifiers(right, out);
        }
        Expr::Unary { expr, .. } => collect_identifiers(expr, out),
    }
}
