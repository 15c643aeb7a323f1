//! Error types for velo-model.
//!
//! Runtime solver outcomes (residuals, iteration counts, degenerate-pivot
//! flags) are reported as data by the solvers themselves; `ModelError` only
//! covers construction-time contract violations, which fail fast.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("evaluator/state dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid dependent index: {0}")]
    InvalidDependentIndex(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
