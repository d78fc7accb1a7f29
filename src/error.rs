use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdIndexError {
    /// A point or query did not have the number of coordinates the tree was built with.
    #[error("Dimension mismatch: expected {expected} coordinates, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A tree cannot partition points that have no coordinates.
    #[error("Dimension must be at least 1")]
    ZeroDimension,

    /// A coordinate was NaN or infinite.
    #[error("Non-finite coordinate on axis {axis} of item {id}")]
    NonFiniteCoordinate { id: usize, axis: usize },

    /// A query point had a NaN or infinite coordinate.
    #[error("Non-finite query coordinate on axis {axis}")]
    NonFiniteQuery { axis: usize },

    /// Item ids are stored as `u32`.
    #[error("Too many items: {0} exceeds the maximum of u32::MAX")]
    TooManyItems(usize),

    /// A neighbor count below zero.
    #[error("Invalid neighbor count {0}: k must not be negative")]
    InvalidK(i64),
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
