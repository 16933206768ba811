//! Edge coloring for multi-channel distance fields.
//!
//! A multi-channel field keeps corners sharp by letting different channels
//! see different edges. Each edge gets a two-channel color (cyan, magenta or
//! yellow) such that the two edges meeting at a corner never share a color;
//! smooth contours stay white.
//!
//! Two heuristics are provided:
//!
//! - [`color_edges_simple`] - rotate colors at every corner
//! - [`color_edges_ink_trap`] - additionally recognise short notches and
//!   color their corners so they do not create spurious corners
//!
//! [`apply_color_assignment`] overrides the heuristic with an explicit
//! per-edge color string.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use outline_coloring::{ColoringConfig, color_edges};
//! use outline_types::{Contour, Point2, Shape};
//!
//! let mut shape = Shape::from_contours([Contour::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(2.0, 0.0),
//! ])]);
//!
//! let summary = color_edges(&mut shape, &ColoringConfig::default());
//! assert_eq!(summary.corner_count, 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod assignment;
mod config;
pub mod corners;
mod ink_trap;
mod simple;

pub use assignment::apply_color_assignment;
pub use config::{
    ColoringConfig, ColoringStrategy, ColoringSummary, DEFAULT_ANGLE_THRESHOLD, color_edges,
};
pub use ink_trap::color_edges_ink_trap;
pub use simple::color_edges_simple;
