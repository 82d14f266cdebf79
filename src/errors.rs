use std::path::PathBuf;
use thiserror::Error;

/// A result type for GP regression algorithm
pub type Result<T> = std::result::Result<T, GpError>;

/// An error when using a [`GaussianProcess`](crate::GaussianProcess) or the
/// [`KernelRegistry`](crate::KernelRegistry)
#[derive(Error, Debug)]
pub enum GpError {
    /// When a sample, label or query vector length disagrees with the model dimension
    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed by the first sample/label
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },
    /// When a fit is attempted with no training data
    #[error("not enough data: no sample/label pairs have been added")]
    NotEnoughData,
    /// When an operation requires a fitted model
    #[error("gaussian process is not initialized")]
    NotInitialized,
    /// When a kernel name has no registry entry
    #[error("kernel not found in registry: {0}")]
    KernelNotFound(String),
    /// When a persisted resource is absent or not a plain readable file
    #[error("missing resource: {0}")]
    MissingResource(PathBuf),
    /// When the parameter file does not parse as the expected token sequence
    #[error("corrupt parameter file: {0}")]
    CorruptParameterFile(String),
    /// When a composite kernel name fails to split into its delimited parts
    #[error("failed to tokenize kernel name: {0}")]
    TokenizationFailure(String),
    /// When a kernel is reconstructed from a bad parameter list
    #[error("invalid kernel parameters: {0}")]
    InvalidKernelParameters(String),
    /// When the kernel matrix admits no pivot during LU inversion
    #[error("singular kernel matrix: {0}")]
    SingularMatrix(String),
    /// When a persisted resource does not parse as a matrix
    #[error("load error: {0}")]
    LoadError(String),
    /// When reading or writing a persisted resource fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
}
