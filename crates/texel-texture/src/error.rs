use texel_tensor::{DType, TensorError};

use crate::parallel::ParallelError;

/// An error type for the texture module.
///
/// Every variant describes a caller-input problem detected before any histogram is
/// allocated. Numerical degeneracies (empty images, zero variances) are not errors.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TextureError {
    /// The image elements are not integer labels.
    #[error("Invalid input type: expected integer labels, got {0}")]
    InvalidInputType(DType),

    /// The image is neither 2D nor 3D.
    #[error("Unsupported dimensionality: only 2D and 3D images are supported, got rank {0}")]
    UnsupportedDimensionality(usize),

    /// The direction index is out of range for the image rank.
    #[error("Direction index {index} is not in range(0, {num_directions}) for a {rank}D image")]
    InvalidDirectionIndex {
        /// The requested direction index
        index: usize,
        /// The rank of the image
        rank: usize,
        /// The number of directions available for the rank
        num_directions: usize,
    },

    /// The co-occurrence distance is zero, or too large to build a neighbor pattern.
    #[error("Invalid co-occurrence distance {0}: must be > 0 and fit in a neighbor pattern")]
    InvalidDistance(usize),

    /// The neighbor offset pattern is malformed.
    #[error("Invalid offset pattern: {0}")]
    InvalidOffsetPattern(String),

    /// A label is negative.
    #[error("Labels must be non-negative")]
    NegativeLabel,

    /// A label is too large for its co-occurrence matrix to be allocated.
    #[error("Label {0} is too large: a ({0} + 1)² matrix of counts cannot be allocated")]
    LabelTooLarge(u128),

    /// The co-occurrence matrix does not have the required shape.
    #[error("Invalid co-occurrence matrix of shape ({rows}, {cols}): must be square with side >= {required}")]
    InvalidCooccurrenceShape {
        /// Number of rows of the matrix
        rows: usize,
        /// Number of columns of the matrix
        cols: usize,
        /// Minimum side required
        required: usize,
    },

    /// Error from the tensor crate.
    #[error(transparent)]
    TensorError(#[from] TensorError),

    /// Error from the execution layer.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),
}
