use thiserror::Error;

/// Error type for formula parsing and evaluation.
///
/// Evaluation errors are values carried on the owning calculation's status;
/// they never abort a recompute pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    #[error("empty expression")]
    EmptyExpression,

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("non-finite result")]
    NonFiniteResult,

    #[error("circular reference")]
    CircularReference,
}

/// Error type for configuration and session mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown calculation: {0}")]
    UnknownCalculation(String),

    #[error("invalid selection for {parameter}: {message}")]
    InvalidSelection { parameter: String, message: String },

    #[error("variant {0} is not loaded")]
    VariantNotLoaded(String),
}
