//! Error types for engine construction and inference.
//!
//! All validation happens when an engine is built: a `FuzzyEngine` that
//! constructs successfully cannot fail during inference except on an input
//! arity mismatch.

use thiserror::Error;

/// Raised while building a domain, membership function, variable or engine.
///
/// Construction is all-or-nothing: the first invalid piece of configuration
/// aborts the build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid domain: min={min}, max={max}, step={step} (requires max > min, step > 0, finite bounds)")]
    InvalidDomain { min: f64, max: f64, step: f64 },

    #[error("membership function needs at least 2 control points, got {count}")]
    NotEnoughControlPoints { count: usize },

    #[error("membership control points must be non-decreasing in x: {points:?}")]
    ControlPointsNotSorted { points: Vec<f64> },

    #[error("membership degree {degree} outside [0, 1]")]
    DegreeOutOfRange { degree: f64 },

    #[error("variable '{variable}' has no terms")]
    NoTerms { variable: String },

    #[error("variable '{variable}' declares label '{label}' more than once")]
    DuplicateLabel { variable: String, label: String },

    #[error("engine has no input variables")]
    NoInputVariables,

    #[error("variable name '{variable}' used more than once")]
    DuplicateVariable { variable: String },

    #[error("rule {rule} has an empty antecedent")]
    EmptyAntecedent { rule: usize },

    #[error("rule {rule} references unknown variable '{variable}'")]
    UnknownVariable { rule: usize, variable: String },

    #[error("rule {rule} references unknown label '{label}' on variable '{variable}'")]
    UnknownLabel {
        rule: usize,
        variable: String,
        label: String,
    },
}

/// Raised by `FuzzyEngine::evaluate`.
///
/// Out-of-range crisp inputs and all-zero aggregate curves are handled by
/// defined fallback behavior and are never errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("expected {expected} crisp inputs, got {got}")]
    InputArity { expected: usize, got: usize },
}
