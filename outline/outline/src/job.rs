//! End-to-end distance-field generation for one shape.
//!
//! [`DistanceFieldJob`] owns a shape and an output bitmap and runs the
//! pipeline in order:
//!
//! 1. Normalize and validate the shape
//! 2. Color edges (multi-channel modes)
//! 3. Frame the shape into the bitmap
//! 4. Generate the field
//! 5. Fix orientation
//! 6. Scanline sign pass
//! 7. Error correction (multi-channel modes)
//! 8. Output distance shift
//! 9. 8-bit rounding
//!
//! Every stage is also callable on its own for callers that need to
//! interleave their own processing.
//!
//! # Example
//!
//! ```
//! use outline::{DistanceFieldJob, JobSettings};
//! use outline::sdf::{FieldMode, Range};
//! use outline::types::{Contour, Point2, Shape};
//!
//! let shape = Shape::from_contours([Contour::polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 0.0),
//! ])]);
//!
//! let mut job = DistanceFieldJob::new(shape, FieldMode::Multi, 32, 32)
//!     .unwrap()
//!     .with_settings(JobSettings::default().with_range(Range::Pixels(4.0)));
//! let report = job.run().unwrap();
//!
//! assert!(report.coloring.is_some());
//! assert_eq!(job.field().channel_count(), 3);
//! println!("{}", job.metrics().unwrap());
//! ```

use std::fmt;

use nalgebra::Vector2;
use outline_coloring::{ColoringSummary, apply_color_assignment, color_edges};
use outline_sdf::{
    Algorithm, AnyBitmap, ErrorCorrectionSummary, FieldEncoding, FieldMode, FieldSpace,
    Projection, SdfError, SdfResult, SignCorrectionSummary, auto_frame, correct_errors,
    correct_signs, generate_field, one_shot_distance, render_sdf,
};
use outline_types::{Bounds, NormalizeSummary, Point2, Shape};
use tracing::{debug, info};

use crate::settings::{JobSettings, Orientation};

/// What each stage of [`DistanceFieldJob::run`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobReport {
    /// Repairs made while normalizing.
    pub normalize: NormalizeSummary,
    /// Coloring statistics, for multi-channel modes.
    pub coloring: Option<ColoringSummary>,
    /// Edges colored by the explicit assignment.
    pub assigned_edges: usize,
    /// Whether the field was reflected to fix its orientation.
    pub reflected: bool,
    /// Sign pass statistics, when the pass ran.
    pub signs: Option<SignCorrectionSummary>,
    /// Error correction statistics, when correction ran.
    pub errors: Option<ErrorCorrectionSummary>,
}

/// Framing and range of a generated field.
///
/// Displays as one `key = value` line per known item, matching the metrics
/// printout of common MSDF tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMetrics {
    /// Whether rows run top-down.
    pub inverse_y: bool,
    /// Shape bounds, unless the shape is empty.
    pub bounds: Option<Bounds>,
    /// Uniform scale chosen by auto-framing.
    pub scale: Option<f64>,
    /// Translation chosen by auto-framing.
    pub translate: Option<Vector2<f64>>,
    /// Range in shape units.
    pub range: f64,
}

impl fmt::Display for FieldMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse_y {
            writeln!(f, "inverseY = true")?;
        }
        if let Some(b) = &self.bounds {
            writeln!(f, "bounds = {}, {}, {}, {}", b.left, b.bottom, b.right, b.top)?;
        }
        if let Some(scale) = self.scale {
            writeln!(f, "scale = {scale}")?;
        }
        if let Some(t) = &self.translate {
            writeln!(f, "translate = {}, {}", t.x, t.y)?;
        }
        writeln!(f, "range = {}", self.range)
    }
}

/// A shape, an output bitmap and the settings that connect them.
#[derive(Debug, Clone)]
pub struct DistanceFieldJob {
    shape: Shape,
    mode: FieldMode,
    settings: JobSettings,
    space: Option<FieldSpace>,
    field: AnyBitmap,
}

impl DistanceFieldJob {
    /// Create a job with default settings and a zeroed output bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::ArgumentOutOfRange`] if either dimension is zero.
    pub fn new(shape: Shape, mode: FieldMode, width: usize, height: usize) -> SdfResult<Self> {
        if width == 0 || height == 0 {
            return Err(SdfError::out_of_range(
                "dimensions",
                format!("{width}x{height} has no pixels"),
            ));
        }
        Ok(Self {
            shape,
            mode,
            settings: JobSettings::default(),
            space: None,
            field: AnyBitmap::new_float(width, height, mode.channels())?,
        })
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: JobSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the settings in place.
    pub fn set_settings(&mut self, settings: JobSettings) {
        self.settings = settings;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The shape, as modified by the stages run so far.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Field mode.
    #[must_use]
    pub const fn mode(&self) -> FieldMode {
        self.mode
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Projection, range and encoding, once framed.
    #[must_use]
    pub const fn space(&self) -> Option<&FieldSpace> {
        self.space.as_ref()
    }

    /// The output bitmap.
    #[must_use]
    pub const fn field(&self) -> &AnyBitmap {
        &self.field
    }

    /// Consume the job, keeping the output bitmap.
    #[must_use]
    pub fn into_field(self) -> AnyBitmap {
        self.field
    }

    /// Quantize the output into a byte bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EncodingMismatch`] for distance-encoded fields.
    pub fn to_bytes(&self) -> SdfResult<AnyBitmap> {
        self.require_normalized()?;
        self.field.to_bytes()
    }

    /// Framing and range of the field.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MissingInput`] before [`Self::frame`] has run.
    pub fn metrics(&self) -> SdfResult<FieldMetrics> {
        let space = self.require_space()?;
        let bounds = self.shape.bounds();
        let fitted = self.settings.auto_frame;
        Ok(FieldMetrics {
            inverse_y: self.shape.inverse_y_axis,
            bounds: (!bounds.is_empty()).then_some(bounds),
            scale: (fitted && self.settings.scale.is_none())
                .then(|| space.projection.average_scale()),
            translate: fitted.then_some(space.projection.translate),
            range: space.range,
        })
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Run every stage in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing stage and returns its error.
    pub fn run(&mut self) -> SdfResult<JobReport> {
        let normalize = self.prepare_shape()?;
        let (coloring, assigned_edges) = self.color_edges();
        self.frame()?;
        self.generate()?;
        let reflected = self.apply_orientation()?;
        let signs = self.apply_scanline_pass()?;
        let errors = self.correct_errors()?;
        self.apply_distance_shift()?;
        if self.settings.convert_to_8bit {
            self.convert_to_8bit()?;
        }

        info!(
            mode = %self.mode,
            width = self.field.width(),
            height = self.field.height(),
            reflected,
            "Distance field job finished"
        );
        Ok(JobReport {
            normalize,
            coloring,
            assigned_edges,
            reflected,
            signs,
            errors,
        })
    }

    /// Normalize the shape if enabled, then validate it.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidGeometry`] if the shape is still invalid.
    pub fn prepare_shape(&mut self) -> SdfResult<NormalizeSummary> {
        let summary = if self.settings.normalize {
            self.shape.normalize()
        } else {
            NormalizeSummary::default()
        };
        self.shape.check()?;
        Ok(summary)
    }

    /// Color edges for multi-channel modes, then apply the explicit
    /// assignment if one is set.
    ///
    /// Returns the heuristic's statistics (when it ran) and the number of
    /// edges colored by the assignment.
    pub fn color_edges(&mut self) -> (Option<ColoringSummary>, usize) {
        if !self.mode.is_multi_channel() {
            return (None, 0);
        }
        let summary = (!self.settings.skip_coloring)
            .then(|| color_edges(&mut self.shape, &self.settings.coloring));
        let assigned = self
            .settings
            .color_assignment
            .as_deref()
            .map_or(0, |assignment| apply_color_assignment(&mut self.shape, assignment));
        (summary, assigned)
    }

    /// Fix the projection and range.
    ///
    /// With auto-framing the shape is fitted into the bitmap; otherwise the
    /// configured scale (one by default) and translation are used as given.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::DegenerateFraming`] if the range leaves no room,
    /// or [`SdfError::ArgumentOutOfRange`] for a bad scale or range.
    pub fn frame(&mut self) -> SdfResult<FieldSpace> {
        let settings = &self.settings;
        let projection = if settings.auto_frame {
            auto_frame(
                &self.shape.bounds(),
                self.field.width(),
                self.field.height(),
                settings.range,
                settings.frame_shift(),
                settings.scale,
            )?
        } else {
            Projection::new(
                settings.scale.unwrap_or_else(|| Vector2::new(1.0, 1.0)),
                settings.translate,
            )
        };
        let space = FieldSpace::with_range(projection, settings.range, settings.encoding)?;
        self.space = Some(space);
        Ok(space)
    }

    /// Fill the output bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MissingInput`] before [`Self::frame`] has run.
    pub fn generate(&mut self) -> SdfResult<()> {
        let space = self.require_space()?;
        generate_field(&self.shape, &space, self.mode, &self.settings.generator, &mut self.field)
    }

    /// Reflect the field if the orientation setting asks for it. Returns
    /// whether it did.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MissingInput`] before [`Self::frame`] has run.
    pub fn apply_orientation(&mut self) -> SdfResult<bool> {
        let space = self.require_space()?;
        if self.resolve_orientation() != Orientation::Reverse {
            return Ok(false);
        }
        for value in self.field.float_data_mut()? {
            *value = space.reflect(*value);
        }
        debug!(setting = %self.settings.orientation, "Reflected field orientation");
        Ok(true)
    }

    /// Re-derive signs from the fill rule, if the pass is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MissingInput`] before [`Self::frame`] has run.
    pub fn apply_scanline_pass(&mut self) -> SdfResult<Option<SignCorrectionSummary>> {
        if !self.settings.scanline_pass {
            return Ok(None);
        }
        let space = self.require_space()?;
        correct_signs(
            &mut self.field,
            &self.shape,
            &space,
            self.shape.fill_rule,
            self.settings.generator.parallel,
        )
        .map(Some)
    }

    /// Run error correction on multi-channel fields. Single-channel fields
    /// and a zero threshold skip it.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MissingInput`] before [`Self::frame`] has run, or
    /// [`SdfError::ArgumentOutOfRange`] for a negative threshold.
    pub fn correct_errors(&mut self) -> SdfResult<Option<ErrorCorrectionSummary>> {
        let threshold = self.settings.error_correction_threshold;
        if !self.mode.is_multi_channel() || threshold == 0.0 {
            return Ok(None);
        }
        let space = self.require_space()?;
        correct_errors(&mut self.field, &space, threshold, self.settings.generator.parallel)
            .map(Some)
    }

    /// Add the configured distance shift to every stored value.
    ///
    /// # Errors
    ///
    /// Fails only if the output is not a float bitmap.
    pub fn apply_distance_shift(&mut self) -> SdfResult<()> {
        let shift = self.settings.distance_shift;
        if shift == 0.0 {
            return Ok(());
        }
        self.field.shift(shift)
    }

    /// Round every value through 8-bit storage.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EncodingMismatch`] for distance-encoded fields.
    pub fn convert_to_8bit(&mut self) -> SdfResult<()> {
        self.require_normalized()?;
        self.field.simulate_8bit()
    }

    /// Render a preview of the field into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EncodingMismatch`] for distance-encoded fields,
    /// [`SdfError::MissingInput`] before framing, or the renderer's bitmap
    /// errors.
    pub fn test_render(&self, output: &mut AnyBitmap) -> SdfResult<()> {
        self.require_normalized()?;
        let space = self.require_space()?;
        let pixel_range = space.projection.average_scale() * space.range;
        render_sdf(output, &self.field, pixel_range, 0.5 + self.settings.distance_shift)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_space(&self) -> SdfResult<FieldSpace> {
        self.space.ok_or(SdfError::MissingInput("projection"))
    }

    fn require_normalized(&self) -> SdfResult<()> {
        match self.settings.encoding {
            FieldEncoding::Normalized => Ok(()),
            FieldEncoding::Distance => Err(SdfError::EncodingMismatch {
                expected: FieldEncoding::Normalized.name(),
            }),
        }
    }

    /// Settle [`Orientation::Guess`]. Fields whose signs come from the fill
    /// rule never need reflecting; otherwise a point well outside the bounds
    /// reveals whether the contours run backwards.
    fn resolve_orientation(&self) -> Orientation {
        match self.settings.orientation {
            Orientation::Guess => {
                let bounds = self.shape.bounds();
                if self.settings.scanline_pass
                    || self.settings.generator.algorithm == Algorithm::Current
                    || bounds.is_empty()
                {
                    return Orientation::Keep;
                }
                let outside = Point2::new(
                    bounds.left - bounds.width() - 1.0,
                    bounds.bottom - bounds.height() - 1.0,
                );
                if one_shot_distance(&self.shape, &outside) > 0.0 {
                    Orientation::Reverse
                } else {
                    Orientation::Keep
                }
            }
            other => other,
        }
    }
}
