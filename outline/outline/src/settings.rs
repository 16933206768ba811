//! Settings for a [`DistanceFieldJob`](crate::DistanceFieldJob).

use std::fmt;

use nalgebra::Vector2;
use outline_coloring::ColoringConfig;
use outline_sdf::{FieldEncoding, GeneratorConfig, Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error correction threshold used when none is given.
pub const DEFAULT_ERROR_CORRECTION_THRESHOLD: f64 = 1.001;

/// What to do with a finished field whose contours may be wound backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Leave the field as generated.
    #[default]
    Keep,
    /// Reflect every value about the midpoint.
    Reverse,
    /// Reflect if a point far outside the shape reads as inside.
    ///
    /// Only the legacy generator without the scanline pass is checked. The
    /// current generator and the scanline pass already take signs from the
    /// fill rule, so both resolve this to [`Orientation::Keep`] without
    /// sampling the shape.
    Guess,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Reverse => "reverse",
            Self::Guess => "guess",
        })
    }
}

/// Everything that controls a job besides the shape and the output size.
///
/// # Example
///
/// ```
/// use outline::{JobSettings, Orientation};
/// use outline::sdf::{FieldEncoding, Range};
///
/// let settings = JobSettings::default()
///     .with_range(Range::Pixels(4.0))
///     .with_orientation(Orientation::Guess)
///     .with_scanline_pass(true);
///
/// assert_eq!(settings.encoding, FieldEncoding::Normalized);
/// assert_eq!(settings.error_correction_threshold, 1.001);
/// assert!(JobSettings::distance_output().encoding == FieldEncoding::Distance);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JobSettings {
    /// Width of the distance band.
    ///
    /// Default: 2 pixels
    pub range: Range,
    /// Fixed shape-to-pixel scale. When unset, auto-framing picks one.
    pub scale: Option<Vector2<f64>>,
    /// Shape-space offset applied before scaling when auto-framing is off.
    pub translate: Vector2<f64>,
    /// Fit the shape into the bitmap, computing translation (and scale when
    /// unset).
    ///
    /// Default: true
    pub auto_frame: bool,
    /// How stored values encode distance.
    pub encoding: FieldEncoding,
    /// Orientation fix applied after generation.
    pub orientation: Orientation,
    /// Constant added to every stored value at the end, in stored units.
    /// Also widens the auto-frame margin.
    ///
    /// Default: 0
    pub distance_shift: f32,
    /// Clash threshold for error correction, in pixels of range. Zero
    /// disables error correction.
    ///
    /// Default: 1.001
    pub error_correction_threshold: f64,
    /// Re-derive every sign from the fill rule after generation.
    ///
    /// Default: false
    pub scanline_pass: bool,
    /// Generator algorithm, overlap support and parallelism.
    pub generator: GeneratorConfig,
    /// Coloring heuristic for multi-channel modes.
    pub coloring: ColoringConfig,
    /// Keep the edge colors the shape already has.
    pub skip_coloring: bool,
    /// Explicit per-edge colors applied after the heuristic, in the
    /// `"cmy,w?"` assignment syntax.
    pub color_assignment: Option<String>,
    /// Repair small gaps and degenerate edges before validating.
    ///
    /// Default: true
    pub normalize: bool,
    /// Round the final values through 8-bit storage.
    pub convert_to_8bit: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            range: Range::default(),
            scale: None,
            translate: Vector2::zeros(),
            auto_frame: true,
            encoding: FieldEncoding::Normalized,
            orientation: Orientation::Keep,
            distance_shift: 0.0,
            error_correction_threshold: DEFAULT_ERROR_CORRECTION_THRESHOLD,
            scanline_pass: false,
            generator: GeneratorConfig::default(),
            coloring: ColoringConfig::default(),
            skip_coloring: false,
            color_assignment: None,
            normalize: true,
            convert_to_8bit: false,
        }
    }
}

impl JobSettings {
    /// Defaults with raw signed distances stored instead of normalized
    /// values.
    #[must_use]
    pub fn distance_output() -> Self {
        Self {
            encoding: FieldEncoding::Distance,
            ..Self::default()
        }
    }

    /// Defaults with the legacy generator, its signs repaired by a scanline
    /// pass.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            generator: GeneratorConfig::legacy(),
            scanline_pass: true,
            ..Self::default()
        }
    }

    /// Set the range.
    #[must_use]
    pub const fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    /// Fix the scale instead of fitting it.
    #[must_use]
    pub const fn with_scale(mut self, scale: Vector2<f64>) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Use an explicit translation and disable auto-framing.
    #[must_use]
    pub const fn with_translate(mut self, translate: Vector2<f64>) -> Self {
        self.translate = translate;
        self.auto_frame = false;
        self
    }

    /// Enable or disable auto-framing.
    #[must_use]
    pub const fn with_auto_frame(mut self, enabled: bool) -> Self {
        self.auto_frame = enabled;
        self
    }

    /// Set the value encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: FieldEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the orientation fix.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the output distance shift.
    #[must_use]
    pub const fn with_distance_shift(mut self, shift: f32) -> Self {
        self.distance_shift = shift;
        self
    }

    /// Set the error correction threshold.
    #[must_use]
    pub const fn with_error_correction_threshold(mut self, threshold: f64) -> Self {
        self.error_correction_threshold = threshold;
        self
    }

    /// Enable or disable the scanline sign pass.
    #[must_use]
    pub const fn with_scanline_pass(mut self, enabled: bool) -> Self {
        self.scanline_pass = enabled;
        self
    }

    /// Set the generator configuration.
    #[must_use]
    pub const fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Set the coloring configuration.
    #[must_use]
    pub const fn with_coloring(mut self, coloring: ColoringConfig) -> Self {
        self.coloring = coloring;
        self
    }

    /// Keep existing edge colors.
    #[must_use]
    pub const fn with_skip_coloring(mut self, skip: bool) -> Self {
        self.skip_coloring = skip;
        self
    }

    /// Override edge colors with an assignment string.
    #[must_use]
    pub fn with_color_assignment(mut self, assignment: impl Into<String>) -> Self {
        self.color_assignment = Some(assignment.into());
        self
    }

    /// Enable or disable shape normalization.
    #[must_use]
    pub const fn with_normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Enable or disable 8-bit rounding.
    #[must_use]
    pub const fn with_8bit(mut self, enabled: bool) -> Self {
        self.convert_to_8bit = enabled;
        self
    }

    /// The framing shift, widening the margin for shifted outputs.
    pub(crate) fn frame_shift(&self) -> f64 {
        match self.encoding {
            FieldEncoding::Normalized => f64::from(self.distance_shift),
            FieldEncoding::Distance => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let settings = JobSettings::default();
        assert_eq!(settings.range, Range::Pixels(2.0));
        assert_eq!(settings.orientation, Orientation::Keep);
        assert!(settings.auto_frame);
        assert!(settings.normalize);
        assert!(!settings.scanline_pass);
        assert!(settings.scale.is_none());
    }

    #[test]
    fn explicit_translate_disables_framing() {
        let settings = JobSettings::default().with_translate(Vector2::new(1.0, 2.0));
        assert!(!settings.auto_frame);
        assert_eq!(settings.translate, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn legacy_preset_runs_scanline_pass() {
        let settings = JobSettings::legacy();
        assert!(settings.scanline_pass);
        assert_eq!(settings.generator, GeneratorConfig::legacy());
    }
}
