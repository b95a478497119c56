use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset must have at least one row")]
    EmptyDataset,

    #[error("expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("regularized normal-equations matrix is singular (pivot {pivot:e})")]
    SingularMatrix { pivot: f64 },

    #[error("fold count must be in 2..={rows}, got {folds}")]
    InvalidFoldCount { folds: usize, rows: usize },

    #[error("pipeline not fitted; call fit() first")]
    NotFitted,

    #[error("ridge parameter must be a finite non-negative number, got {0}")]
    InvalidRidge(f64),

    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue { row: usize, column: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
