//! Distance-field generation for outline shapes.
//!
//! This crate provides:
//! - Raster buffers ([`Bitmap`]) and a channel-tagged handle ([`AnyBitmap`])
//! - Shape-to-pixel mapping and value encoding ([`FieldSpace`])
//! - Automatic framing of a shape into a bitmap ([`auto_frame`])
//! - Edge selectors and contour combiners for distance queries
//! - A point sampler ([`distance_at`], [`pseudo_distance_at`], [`true_distance_at`])
//! - Legacy and current field generators for SDF, pseudo-SDF, MSDF and MTSDF
//! - Scanline sign correction ([`correct_signs`])
//! - Multi-channel error correction ([`correct_errors`])
//! - Preview rendering ([`render_sdf`])
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Sign Convention
//!
//! Inside the crate, distances are positive on the filled side. Everything
//! that leaves it follows the usual SDF convention instead: the sampler and
//! [`FieldEncoding::Distance`] report filled points as negative, and
//! [`FieldEncoding::Normalized`] stores values above `0.5` for filled pixels.
//!
//! # Example
//!
//! ```
//! use outline_sdf::{
//!     AnyBitmap, FieldEncoding, FieldMode, FieldSpace, GeneratorConfig, Range, auto_frame,
//!     correct_errors, generate_field,
//! };
//! use outline_types::{Contour, Point2, Shape};
//!
//! let shape = Shape::from_contours([Contour::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 0.0),
//! ])]);
//!
//! let range = Range::Pixels(4.0);
//! let projection = auto_frame(&shape.bounds(), 32, 32, range, 0.0, None).unwrap();
//! let space = FieldSpace::with_range(projection, range, FieldEncoding::Normalized).unwrap();
//!
//! let mut field = AnyBitmap::new_float(32, 32, 3).unwrap();
//! generate_field(&shape, &space, FieldMode::Multi, &GeneratorConfig::default(), &mut field).unwrap();
//! correct_errors(&mut field, &space, 1.001, true).unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bitmap;
pub mod combiner;
mod correction;
mod error;
mod finder;
mod framing;
mod generate;
mod render;
pub mod selector;
mod sign;
mod space;

pub use bitmap::{
    AnyBitmap, Bitmap, BitmapElement, BitmapVariant, ElementType, PixelData, float_to_byte,
};
pub use correction::{ErrorCorrectionSummary, correct_errors};
pub use error::{SdfError, SdfResult};
pub use finder::{
    DistanceSample, ShapeDistanceFinder, distance_at, one_shot_distance, pseudo_distance_at,
    true_distance_at,
};
pub use framing::auto_frame;
pub use generate::{
    Algorithm, CurrentGenerator, FieldGenerator, FieldMode, GeneratorConfig, LegacyGenerator,
    generate_field,
};
pub use render::render_sdf;
pub use selector::EdgeId;
pub use sign::{SignCorrectionSummary, correct_signs};
pub use space::{FieldEncoding, FieldSpace, Projection, Range};
