//! Core outline geometry for distance-field generation.
//!
//! This crate provides the shape model the field generators read:
//!
//! - [`EdgeSegment`] - Line, quadratic or cubic Bézier piece
//! - [`Edge`] - A segment plus its [`EdgeColor`] channel mask
//! - [`Contour`] - A closed loop of edges
//! - [`Shape`] - Contours, fill rule and Y-axis convention
//! - [`Scanline`] - Edge crossings of one horizontal line, for fill queries
//! - [`SignedDistance`] - Distance with a tie-breaking key
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Coordinate System
//!
//! Shapes live in a Y-up plane. Signed distances computed here are
//! **positive on the right-hand side** of an edge's direction, so clockwise
//! contours enclose positive distance. The field crate converts this into the
//! public "inside is negative" convention.
//!
//! # Example
//!
//! ```
//! use outline_types::{Contour, Point2, Shape};
//!
//! let mut shape = Shape::new();
//! shape.add_contour(Contour::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(2.0, 0.0),
//! ]));
//! shape.normalize();
//!
//! assert!(shape.validate());
//! assert_eq!(shape.edge_count(), 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod color;
mod contour;
mod distance;
mod error;
pub mod math;
mod scanline;
mod segment;
mod shape;

pub use bounds::Bounds;
pub use color::{Channel, EdgeColor};
pub use contour::Contour;
pub use distance::SignedDistance;
pub use error::{ShapeError, ShapeResult};
pub use scanline::{Crossing, FillRule, Scanline};
pub use segment::{Edge, EdgeSegment};
pub use shape::{
    CLOSE_TOLERANCE, DEGENERATE_TOLERANCE, GAP_SNAP_TOLERANCE, NormalizeSummary, Shape,
    ShapeReport,
};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};
