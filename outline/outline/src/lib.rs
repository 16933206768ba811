//! Signed and multi-channel distance fields from vector outlines.
//!
//! This umbrella crate re-exports all outline-* crates and adds the
//! end-to-end [`DistanceFieldJob`] pipeline. All crates are Layer 0 (zero
//! Bevy dependencies) and can be used in CLI tools, WASM, servers, or font
//! atlas builders.
//!
//! # Quick Start
//!
//! ```
//! use outline::prelude::*;
//!
//! // A 1x1 square, wound clockwise
//! let shape = Shape::from_contours([Contour::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 0.0),
//! ])]);
//!
//! // Generate a corrected MTSDF with a 4 pixel range
//! let settings = JobSettings::default().with_range(Range::Pixels(4.0));
//! let mut job = DistanceFieldJob::new(shape, FieldMode::MultiAndTrue, 32, 32)
//!     .unwrap()
//!     .with_settings(settings);
//! job.run().unwrap();
//!
//! // Hand bytes to an image encoder
//! let bytes = job.to_bytes().unwrap();
//! assert_eq!(bytes.channel_count(), 4);
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Geometry model: `EdgeSegment`, `Contour`, `Shape`, `FillRule`
//!
//! ## Core Operations
//! - [`coloring`] - Edge coloring heuristics and explicit color assignment
//! - [`sdf`] - Bitmaps, framing, generators, sign and error correction
//!
//! ## Pipeline
//! - [`DistanceFieldJob`] - Normalize, color, frame, generate and post-process
//! - [`ErrorLog`] - Bounded record of failed operations
//!
//! # Feature Flags
//!
//! - `serde` - Serialize and deserialize data and configuration types

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error_log;
mod job;
mod settings;

pub use error_log::{DEFAULT_CAPACITY, ErrorLog, LoggedError};
pub use job::{DistanceFieldJob, FieldMetrics, JobReport};
pub use settings::{DEFAULT_ERROR_CORRECTION_THRESHOLD, JobSettings, Orientation};

// =============================================================================
// Re-exports
// =============================================================================

/// Geometry model: segments, contours, shapes, fill rules.
pub use outline_types as types;

/// Edge coloring for multi-channel fields.
pub use outline_coloring as coloring;

/// Bitmaps, framing, generation, correction and preview rendering.
pub use outline_sdf as sdf;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for distance-field generation.
///
/// This module re-exports the most commonly used types and functions.
///
/// # Usage
///
/// ```
/// use outline::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use outline_types::{
        Bounds, Contour, EdgeColor, EdgeSegment, FillRule, Point2, Shape, Vector2,
    };

    // Coloring
    pub use outline_coloring::{ColoringConfig, ColoringStrategy, color_edges};

    // Fields
    pub use outline_sdf::{
        AnyBitmap, Bitmap, FieldEncoding, FieldMode, FieldSpace, GeneratorConfig, Range,
        SdfError, SdfResult, generate_field,
    };

    // Pipeline (main use case)
    pub use crate::{DistanceFieldJob, ErrorLog, JobSettings, Orientation};
}

// =============================================================================
// Tests
// =============================================================================
