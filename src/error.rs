use std::io;

use thiserror::Error;

/// Rejected input, reported before any pixel is processed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInputError {
    /// The image needs at least one interior pixel, so both dimensions must be 3 or more.
    #[error("image must be at least 3x3, got {width}x{height}")]
    ImageTooSmall {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },
    /// Kernels are 3x3 matrices. `columns` is the length of the first offending row.
    #[error("kernel must be 3x3, got {rows} rows with a row of {columns} entries")]
    KernelShape {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the first row that is not 3 entries long (or of the first row).
        columns: usize,
    },
    /// `alpha` and `beta` must lie in [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Failure to persist a stage snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Encoding or writing the image failed.
    #[error("failed to write snapshot: {0}")]
    Image(#[from] image::ImageError),
    /// The destination could not be prepared.
    #[error("snapshot destination unavailable: {0}")]
    Io(#[from] io::Error),
}

/// Result of operations that validate their input.
pub type Result<T> = std::result::Result<T, InvalidInputError>;
