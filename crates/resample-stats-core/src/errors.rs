use thiserror::Error;

/// Errors that can occur during statistical computations
#[derive(Error, Debug)]
pub enum StatsError {
    // Input validation errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {rows} rows, {cols} features (need rows > features)")]
    InsufficientData { rows: usize, cols: usize },

    #[error("Insufficient data: {0}")]
    InsufficientDataMsg(String),

    #[error("Dimension mismatch: y has {y_len} elements, X has {x_rows} rows")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatchMsg(String),

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    // Numerical errors
    #[error("Matrix is singular or near-singular")]
    SingularMatrix,

    // Execution errors
    #[error("Resampling was cancelled")]
    Cancelled,

    // I/O errors
    #[error("Failed to read {path}: {message}")]
    Csv { path: String, message: String },
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// Shorthand for building an `InvalidInput` error from anything displayable
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StatsError::InvalidInput(msg.into())
    }
}
