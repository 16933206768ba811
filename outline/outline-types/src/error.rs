//! Error types for shape validation.

use thiserror::Error;

/// Result type for shape operations.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Ways a shape can fail validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// The end of one edge does not meet the start of the next.
    #[error("contour {contour} is open after edge {edge}: gap of {gap}")]
    OpenContour {
        /// Contour index.
        contour: usize,
        /// Index of the edge whose end point misses its successor.
        edge: usize,
        /// Distance between the end point and the next start point.
        gap: f64,
    },

    /// An edge has zero length.
    #[error("edge {edge} of contour {contour} is degenerate")]
    DegenerateEdge {
        /// Contour index.
        contour: usize,
        /// Edge index within the contour.
        edge: usize,
    },

    /// A contour contains no edges.
    #[error("contour {contour} has no edges")]
    EmptyContour {
        /// Contour index.
        contour: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("edge {edge} of contour {contour} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Contour index.
        contour: usize,
        /// Edge index within the contour.
        edge: usize,
    },
}

impl ShapeError {
    /// Create an open-contour error.
    #[must_use]
    pub fn open_contour(contour: usize, edge: usize, gap: f64) -> Self {
        Self::OpenContour { contour, edge, gap }
    }

    /// Create a degenerate-edge error.
    #[must_use]
    pub fn degenerate_edge(contour: usize, edge: usize) -> Self {
        Self::DegenerateEdge { contour, edge }
    }

    /// Check if this is an open-contour error.
    #[must_use]
    pub fn is_open_contour(&self) -> bool {
        matches!(self, Self::OpenContour { .. })
    }

    /// Check if this is a degenerate-edge error.
    #[must_use]
    pub fn is_degenerate_edge(&self) -> bool {
        matches!(self, Self::DegenerateEdge { .. })
    }

    /// Index of the contour the problem was found in.
    #[must_use]
    pub fn contour(&self) -> usize {
        match self {
            Self::OpenContour { contour, .. }
            | Self::DegenerateEdge { contour, .. }
            | Self::EmptyContour { contour }
            | Self::NonFiniteCoordinate { contour, .. } => *contour,
        }
    }
}
