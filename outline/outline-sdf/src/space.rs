//! Mapping between shape space, pixel space and stored field values.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SdfError, SdfResult};

/// Affine map from shape coordinates to pixel coordinates.
///
/// A shape point `p` lands at pixel position `(p + translate) * scale`
/// (component-wise).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Projection {
    /// Pixels per shape unit, per axis.
    pub scale: Vector2<f64>,
    /// Offset applied in shape units before scaling.
    pub translate: Vector2<f64>,
}

impl Default for Projection {
    fn default() -> Self {
        Self::identity()
    }
}

impl Projection {
    /// Create a projection.
    #[must_use]
    pub const fn new(scale: Vector2<f64>, translate: Vector2<f64>) -> Self {
        Self { scale, translate }
    }

    /// One pixel per shape unit, no offset.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Vector2::new(1.0, 1.0), Vector2::zeros())
    }

    /// Shape point to pixel position.
    #[must_use]
    pub fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        Point2::from((point.coords + self.translate).component_mul(&self.scale))
    }

    /// Pixel position to shape point.
    #[must_use]
    pub fn unproject(&self, point: &Point2<f64>) -> Point2<f64> {
        Point2::from(point.coords.component_div(&self.scale) - self.translate)
    }

    /// Pixel x coordinate to shape x coordinate.
    #[must_use]
    pub fn unproject_x(&self, x: f64) -> f64 {
        x / self.scale.x - self.translate.x
    }

    /// Pixel y coordinate to shape y coordinate.
    #[must_use]
    pub fn unproject_y(&self, y: f64) -> f64 {
        y / self.scale.y - self.translate.y
    }

    /// Shape point sampled by the center of pixel `(x, y)`.
    #[must_use]
    pub fn pixel_center(&self, x: usize, y: usize) -> Point2<f64> {
        self.unproject(&Point2::new(x as f64 + 0.5, y as f64 + 0.5))
    }

    /// Mean of the two axis scales.
    #[must_use]
    pub fn average_scale(&self) -> f64 {
        0.5 * (self.scale.x + self.scale.y)
    }

    fn check(&self) -> SdfResult<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.scale.x) || !valid(self.scale.y) {
            return Err(SdfError::out_of_range(
                "scale",
                format!("({}, {}) must be finite and positive", self.scale.x, self.scale.y),
            ));
        }
        if !self.translate.x.is_finite() || !self.translate.y.is_finite() {
            return Err(SdfError::out_of_range("translate", "must be finite"));
        }
        Ok(())
    }
}

/// Width of the distance band a field can represent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Range {
    /// Range in shape units.
    Units(f64),
    /// Range in output pixels.
    Pixels(f64),
}

impl Default for Range {
    fn default() -> Self {
        Self::Pixels(2.0)
    }
}

impl Range {
    /// The raw range value in its own unit.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Units(v) | Self::Pixels(v) => v,
        }
    }

    /// Range in shape units for the given scale. A pixel range is divided by
    /// the smaller axis scale so it covers at least that many pixels on both
    /// axes.
    #[must_use]
    pub fn to_units(self, scale: &Vector2<f64>) -> f64 {
        match self {
            Self::Units(v) => v,
            Self::Pixels(v) => v / scale.x.min(scale.y),
        }
    }
}

/// How distances are stored in a float bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldEncoding {
    /// `0.5 + distance / range`, filled side above `0.5`.
    #[default]
    Normalized,
    /// Signed distance in shape units, filled side negative.
    Distance,
}

impl FieldEncoding {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normalized => "normalized",
            Self::Distance => "distance",
        }
    }
}

/// Projection, range and encoding of one field.
///
/// Internally distances are positive on the filled side; [`Self::encode`]
/// turns them into stored values.
///
/// # Example
///
/// ```
/// use nalgebra::Vector2;
/// use outline_sdf::{FieldEncoding, FieldSpace, Projection};
///
/// let projection = Projection::new(Vector2::new(4.0, 4.0), Vector2::zeros());
/// let space = FieldSpace::new(projection, 0.5, FieldEncoding::Normalized).unwrap();
///
/// // A quarter of the range inside the shape.
/// assert_eq!(space.encode(0.125), 0.75);
/// assert!(space.is_inside(0.75));
/// assert_eq!(space.reflect(0.75), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSpace {
    /// Shape-to-pixel mapping.
    pub projection: Projection,
    /// Range in shape units.
    pub range: f64,
    /// Stored value encoding.
    pub encoding: FieldEncoding,
}

impl FieldSpace {
    /// Create a field space.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ArgumentOutOfRange`] if the scale or range is not
    /// finite and positive, or the translation is not finite.
    pub fn new(projection: Projection, range: f64, encoding: FieldEncoding) -> SdfResult<Self> {
        projection.check()?;
        if !(range.is_finite() && range > 0.0) {
            return Err(SdfError::out_of_range(
                "range",
                format!("{range} must be finite and positive"),
            ));
        }
        Ok(Self {
            projection,
            range,
            encoding,
        })
    }

    /// Create a field space from a [`Range`] that may be given in pixels.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn with_range(projection: Projection, range: Range, encoding: FieldEncoding) -> SdfResult<Self> {
        projection.check()?;
        Self::new(projection, range.to_units(&projection.scale), encoding)
    }

    /// Stored value for an internal distance (positive on the filled side).
    #[must_use]
    pub fn encode(&self, distance: f64) -> f32 {
        match self.encoding {
            FieldEncoding::Normalized => (0.5 + distance / self.range) as f32,
            FieldEncoding::Distance => (-distance) as f32,
        }
    }

    /// Public signed distance (filled side negative) of a stored value, in
    /// shape units.
    #[must_use]
    pub fn decode(&self, value: f32) -> f64 {
        match self.encoding {
            FieldEncoding::Normalized => (0.5 - f64::from(value)) * self.range,
            FieldEncoding::Distance => f64::from(value),
        }
    }

    /// Stored value on the outline.
    #[must_use]
    pub const fn midpoint(&self) -> f32 {
        match self.encoding {
            FieldEncoding::Normalized => 0.5,
            FieldEncoding::Distance => 0.0,
        }
    }

    /// Whether a stored value reads as filled.
    #[must_use]
    pub fn is_inside(&self, value: f32) -> bool {
        match self.encoding {
            FieldEncoding::Normalized => value > 0.5,
            FieldEncoding::Distance => value < 0.0,
        }
    }

    /// Mirror a stored value about the midpoint, flipping its side.
    #[must_use]
    pub fn reflect(&self, value: f32) -> f32 {
        match self.encoding {
            FieldEncoding::Normalized => 1.0 - value,
            FieldEncoding::Distance => -value,
        }
    }

    /// Per-axis clash threshold in stored units for an error-correction
    /// threshold given in pixels of range.
    #[must_use]
    pub fn error_threshold(&self, threshold: f64) -> Vector2<f64> {
        let scale = self.projection.scale;
        match self.encoding {
            FieldEncoding::Normalized => {
                Vector2::new(threshold / (scale.x * self.range), threshold / (scale.y * self.range))
            }
            FieldEncoding::Distance => Vector2::new(threshold / scale.x, threshold / scale.y),
        }
    }

    /// Width of the distance band in output pixels.
    #[must_use]
    pub fn pixel_range(&self) -> f64 {
        self.projection.average_scale() * self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_round_trip() {
        let projection = Projection::new(Vector2::new(2.0, 4.0), Vector2::new(1.0, -1.0));
        let p = Point2::new(3.0, 5.0);
        let px = projection.project(&p);
        assert_relative_eq!(px, Point2::new(8.0, 16.0));
        assert_relative_eq!(projection.unproject(&px), p);
        assert_relative_eq!(projection.unproject_x(8.0), 3.0);
        assert_relative_eq!(projection.unproject_y(16.0), 5.0);
        assert_relative_eq!(projection.average_scale(), 3.0);
    }

    #[test]
    fn pixel_range_uses_smaller_scale() {
        let scale = Vector2::new(2.0, 4.0);
        assert_relative_eq!(Range::Pixels(4.0).to_units(&scale), 2.0);
        assert_relative_eq!(Range::Units(4.0).to_units(&scale), 4.0);
        assert_eq!(Range::default(), Range::Pixels(2.0));
    }

    #[test]
    fn distance_encoding_is_inside_negative() {
        let space = FieldSpace::new(Projection::identity(), 2.0, FieldEncoding::Distance).unwrap();
        let value = space.encode(1.5);
        assert_relative_eq!(value, -1.5);
        assert!(space.is_inside(value));
        assert_relative_eq!(space.decode(value), -1.5);
        assert_relative_eq!(space.reflect(value), 1.5);
        assert_relative_eq!(space.midpoint(), 0.0);
    }

    #[test]
    fn normalized_decode() {
        let space = FieldSpace::new(Projection::identity(), 2.0, FieldEncoding::Normalized).unwrap();
        assert_relative_eq!(space.decode(space.encode(0.5)), -0.5, epsilon = 1e-6);
        assert!(!space.is_inside(space.midpoint()));
    }

    #[test]
    fn error_threshold_per_axis() {
        let projection = Projection::new(Vector2::new(2.0, 4.0), Vector2::zeros());
        let space = FieldSpace::new(projection, 0.5, FieldEncoding::Normalized).unwrap();
        let t = space.error_threshold(1.0);
        assert_relative_eq!(t.x, 1.0);
        assert_relative_eq!(t.y, 0.5);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(FieldSpace::new(Projection::identity(), 0.0, FieldEncoding::Normalized).is_err());
        assert!(FieldSpace::new(Projection::identity(), f64::NAN, FieldEncoding::Normalized).is_err());
        let flat = Projection::new(Vector2::new(0.0, 1.0), Vector2::zeros());
        assert!(FieldSpace::new(flat, 1.0, FieldEncoding::Normalized).is_err());
    }
}
