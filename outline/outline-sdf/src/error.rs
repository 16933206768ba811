//! Error types for distance-field generation.

use outline_types::ShapeError;
use thiserror::Error;

use crate::bitmap::ElementType;

/// Result type for distance-field operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur while generating or post-processing a field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SdfError {
    /// The shape failed validation.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] ShapeError),

    /// The shape cannot be fitted into the output frame.
    #[error("cannot fit the shape into a {width}x{height} frame with the requested range")]
    DegenerateFraming {
        /// Output width in pixels.
        width: usize,
        /// Output height in pixels.
        height: usize,
    },

    /// A bitmap has the wrong number of channels for the operation.
    #[error("bitmap has {actual} channels, expected {expected}")]
    MismatchedChannelCount {
        /// Channel count the operation requires.
        expected: usize,
        /// Channel count of the bitmap.
        actual: usize,
    },

    /// A bitmap has the wrong element type for the operation.
    #[error("bitmap holds {actual:?} elements, expected {expected:?}")]
    MismatchedElementType {
        /// Element type the operation requires.
        expected: ElementType,
        /// Element type of the bitmap.
        actual: ElementType,
    },

    /// Two bitmaps that must agree in size do not.
    #[error("bitmap is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    MismatchedBitmap {
        /// Required width.
        expected_width: usize,
        /// Required height.
        expected_height: usize,
        /// Actual width.
        actual_width: usize,
        /// Actual height.
        actual_height: usize,
    },

    /// An argument is outside its supported range.
    #[error("{name} is out of range: {reason}")]
    ArgumentOutOfRange {
        /// Argument name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A required input has not been provided.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// The operation needs a different value encoding.
    #[error("operation requires {expected} encoding")]
    EncodingMismatch {
        /// Encoding the operation requires.
        expected: &'static str,
    },
}

impl SdfError {
    /// Create an argument-out-of-range error.
    #[must_use]
    pub fn out_of_range(name: &'static str, reason: impl Into<String>) -> Self {
        Self::ArgumentOutOfRange {
            name,
            reason: reason.into(),
        }
    }

    /// Create a channel-count mismatch error.
    #[must_use]
    pub fn channel_mismatch(expected: usize, actual: usize) -> Self {
        Self::MismatchedChannelCount { expected, actual }
    }

    /// Check if this error concerns a bitmap's tag or size.
    #[must_use]
    pub fn is_bitmap_mismatch(&self) -> bool {
        matches!(
            self,
            Self::MismatchedChannelCount { .. }
                | Self::MismatchedElementType { .. }
                | Self::MismatchedBitmap { .. }
        )
    }

    /// Check if this error was caused by invalid shape geometry.
    #[must_use]
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_))
    }
}
