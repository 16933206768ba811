//! Field generators.
//!
//! Both algorithms share one pixel loop: every pixel center is mapped back
//! into shape space, sampled, and the per-channel internal distances are
//! encoded into the output. They differ in how a sample is taken.
//!
//! - [`LegacyGenerator`] tracks the nearest edge per channel and keeps the
//!   sign that edge reports.
//! - [`CurrentGenerator`] runs a [`ShapeDistanceFinder`] with pseudo-distance
//!   selectors, optionally resolving overlapping contours, and settles every
//!   sign against the fill rule along the pixel's scanline.

use std::fmt;

use nalgebra::Point2;
use outline_types::{Edge, EdgeSegment, Scanline, Shape, SignedDistance};
use rayon::prelude::*;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitmap::{AnyBitmap, Bitmap, ElementType};
use crate::combiner::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use crate::error::{SdfError, SdfResult};
use crate::finder::ShapeDistanceFinder;
use crate::selector::{
    EdgeSelector, FieldDistance, MultiAndTrueDistanceSelector, MultiDistanceSelector,
    PseudoDistanceSelector, TrueDistanceSelector,
};
use crate::space::FieldSpace;

/// Kind of distance field to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldMode {
    /// True signed distance, one channel.
    Single,
    /// Pseudo-distance, one channel.
    Pseudo,
    /// Multi-channel pseudo-distance, three channels.
    Multi,
    /// Multi-channel pseudo-distance plus true distance, four channels.
    #[default]
    MultiAndTrue,
}

impl FieldMode {
    /// All modes.
    pub const ALL: [Self; 4] = [Self::Single, Self::Pseudo, Self::Multi, Self::MultiAndTrue];

    /// Channels of the output bitmap.
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            Self::Single | Self::Pseudo => 1,
            Self::Multi => 3,
            Self::MultiAndTrue => 4,
        }
    }

    /// Whether the field has colour channels, so edges need colouring.
    #[must_use]
    pub const fn is_multi_channel(self) -> bool {
        matches!(self, Self::Multi | Self::MultiAndTrue)
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "sdf",
            Self::Pseudo => "psdf",
            Self::Multi => "msdf",
            Self::MultiAndTrue => "mtsdf",
        }
    }

    /// Look up a mode by its [`Self::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Check that `output` is a float bitmap with this mode's channel count.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::MismatchedElementType`] or
    /// [`SdfError::MismatchedChannelCount`].
    pub fn check_output(self, output: &AnyBitmap) -> SdfResult<()> {
        output.check_tag(ElementType::Float, self.channels())
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// Nearest edge per channel, local sign.
    Legacy,
    /// Edge selectors with joint pseudo-distances and fill-rule signs.
    #[default]
    Current,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::Current => "current",
        })
    }
}

/// Configuration for field generation.
///
/// # Example
///
/// ```
/// use outline_sdf::{Algorithm, GeneratorConfig};
///
/// let config = GeneratorConfig::default().with_overlap_support(true);
/// assert_eq!(config.algorithm, Algorithm::Current);
/// assert!(!GeneratorConfig::sequential().parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorConfig {
    /// Which algorithm runs.
    pub algorithm: Algorithm,
    /// Resolve overlapping contours by winding (current algorithm only).
    pub overlap_support: bool,
    /// Whether to use parallel processing (via rayon).
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Current,
            overlap_support: false,
            parallel: true,
        }
    }
}

impl GeneratorConfig {
    /// The legacy algorithm, for output compatible with older consumers.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            algorithm: Algorithm::Legacy,
            ..Self::default()
        }
    }

    /// Shorthand for the current algorithm with overlap support.
    #[must_use]
    pub fn overlapping() -> Self {
        Self::default().with_overlap_support(true)
    }

    /// Single-threaded generation.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_parallel(false)
    }

    /// Set the algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Enable or disable overlap support.
    #[must_use]
    pub const fn with_overlap_support(mut self, enabled: bool) -> Self {
        self.overlap_support = enabled;
        self
    }

    /// Enable or disable parallel processing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The generator this configuration selects.
    #[must_use]
    pub fn generator(&self) -> Box<dyn FieldGenerator> {
        match self.algorithm {
            Algorithm::Legacy => Box::new(LegacyGenerator {
                parallel: self.parallel,
            }),
            Algorithm::Current => Box::new(CurrentGenerator {
                overlap_support: self.overlap_support,
                parallel: self.parallel,
            }),
        }
    }
}

/// Something that can fill a bitmap with a distance field.
pub trait FieldGenerator: Send + Sync {
    /// Algorithm implemented.
    fn algorithm(&self) -> Algorithm;

    /// Fill `output` with the `mode` field of `shape`.
    ///
    /// # Errors
    ///
    /// Returns a bitmap mismatch error if `output` is not a float bitmap with
    /// `mode.channels()` channels; `output` is left untouched in that case.
    fn generate(&self, shape: &Shape, space: &FieldSpace, mode: FieldMode, output: &mut AnyBitmap) -> SdfResult<()>;
}

/// Generate a field with the generator selected by `config`.
///
/// # Errors
///
/// See [`FieldGenerator::generate`].
///
/// # Example
///
/// ```
/// use nalgebra::Vector2;
/// use outline_sdf::{AnyBitmap, FieldEncoding, FieldMode, FieldSpace, GeneratorConfig, Projection, generate_field};
/// use outline_types::{Contour, Point2, Shape};
///
/// let shape = Shape::from_contours([Contour::polygon(&[
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 7.0),
///     Point2::new(7.0, 7.0),
///     Point2::new(7.0, 1.0),
/// ])]);
/// let space = FieldSpace::new(Projection::identity(), 2.0, FieldEncoding::Normalized).unwrap();
///
/// let mut output = AnyBitmap::new_float(8, 8, 1).unwrap();
/// generate_field(&shape, &space, FieldMode::Single, &GeneratorConfig::default(), &mut output).unwrap();
///
/// let data = output.float_data().unwrap();
/// assert!(data[4 * 8 + 4] > 0.5); // inside
/// assert!(data[0] < 0.5); // outside
/// ```
pub fn generate_field(
    shape: &Shape,
    space: &FieldSpace,
    mode: FieldMode,
    config: &GeneratorConfig,
    output: &mut AnyBitmap,
) -> SdfResult<()> {
    config.generator().generate(shape, space, mode, output)
}

/// Samples the internal distances of one pixel.
trait RowSampler<const N: usize> {
    /// Called before the pixels of a row at shape-space height `y`.
    fn begin_row(&mut self, _y: f64) {}

    /// Internal distances at `point`, positive on the filled side.
    fn sample(&mut self, point: &Point2<f64>) -> [f64; N];
}

/// Run the shared pixel loop over `bitmap`.
fn fill_field<const N: usize, R, I>(
    bitmap: &mut Bitmap<f32, N>,
    space: &FieldSpace,
    inverse_y: bool,
    parallel: bool,
    make_sampler: I,
) where
    R: RowSampler<N>,
    I: Fn() -> R + Sync + Send,
{
    let (width, height) = (bitmap.width(), bitmap.height());
    if width == 0 || height == 0 {
        return;
    }
    let projection = space.projection;
    let fill_row = |sampler: &mut R, row: usize, pixels: &mut [[f32; N]]| {
        let y = if inverse_y { height - 1 - row } else { row };
        sampler.begin_row(projection.unproject_y(y as f64 + 0.5));
        for (x, pixel) in pixels.iter_mut().enumerate() {
            let point = projection.pixel_center(x, y);
            let distances = sampler.sample(&point);
            *pixel = distances.map(|d| space.encode(d));
        }
    };

    if parallel {
        bitmap
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each_init(&make_sampler, |sampler, (row, pixels)| fill_row(sampler, row, pixels));
    } else {
        let mut sampler = make_sampler();
        for (row, pixels) in bitmap.pixels_mut().chunks_mut(width).enumerate() {
            fill_row(&mut sampler, row, pixels);
        }
    }
}

fn usable_edges(shape: &Shape) -> Vec<Edge> {
    shape
        .edges()
        .filter(|edge| {
            edge.segment
                .control_points()
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite())
                && !edge.segment.is_degenerate(outline_types::DEGENERATE_TOLERANCE)
        })
        .copied()
        .collect()
}

/// Nearest edge seen by one channel in the legacy algorithm.
#[derive(Debug, Clone, Copy)]
struct NearestEdge {
    distance: SignedDistance,
    near: Option<(EdgeSegment, f64)>,
}

impl NearestEdge {
    const NONE: Self = Self {
        distance: SignedDistance::INFINITE,
        near: None,
    };

    fn offer(&mut self, segment: &EdgeSegment, distance: SignedDistance, param: f64) {
        if distance.is_closer_than(&self.distance) {
            self.distance = distance;
            self.near = Some((*segment, param));
        }
    }

    fn true_distance(&self) -> f64 {
        self.distance.distance
    }

    fn pseudo_distance(&self, point: &Point2<f64>) -> f64 {
        let mut distance = self.distance;
        if let Some((segment, param)) = &self.near {
            segment.distance_to_pseudo_distance(&mut distance, point, *param);
        }
        distance.distance
    }
}

struct LegacySampler<'a> {
    edges: &'a [Edge],
    mode: FieldMode,
}

impl LegacySampler<'_> {
    fn nearest(&self, point: &Point2<f64>) -> (NearestEdge, [NearestEdge; 3]) {
        let mut all = NearestEdge::NONE;
        let mut channels = [NearestEdge::NONE; 3];
        let colored = self.mode.is_multi_channel();
        for edge in self.edges {
            let (distance, param) = edge.segment.signed_distance(point);
            all.offer(&edge.segment, distance, param);
            if colored {
                for channel in outline_types::Channel::ALL {
                    if edge.color.has(channel) {
                        channels[channel.index()].offer(&edge.segment, distance, param);
                    }
                }
            }
        }
        (all, channels)
    }
}

impl<const N: usize> RowSampler<N> for LegacySampler<'_> {
    fn sample(&mut self, point: &Point2<f64>) -> [f64; N] {
        let (all, channels) = self.nearest(point);
        let values = match self.mode {
            FieldMode::Single => [all.true_distance(); 4],
            FieldMode::Pseudo => [all.pseudo_distance(point); 4],
            FieldMode::Multi | FieldMode::MultiAndTrue => [
                channels[0].pseudo_distance(point),
                channels[1].pseudo_distance(point),
                channels[2].pseudo_distance(point),
                all.true_distance(),
            ],
        };
        std::array::from_fn(|i| values[i])
    }
}

/// Per-pixel nearest edge with the sign that edge reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyGenerator {
    /// Whether to use parallel processing (via rayon).
    pub parallel: bool,
}

impl LegacyGenerator {
    fn run<const N: usize>(&self, shape: &Shape, space: &FieldSpace, mode: FieldMode, bitmap: &mut Bitmap<f32, N>) {
        let edges = usable_edges(shape);
        fill_field(bitmap, space, shape.inverse_y_axis, self.parallel, || LegacySampler {
            edges: &edges,
            mode,
        });
    }
}

impl FieldGenerator for LegacyGenerator {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Legacy
    }

    fn generate(&self, shape: &Shape, space: &FieldSpace, mode: FieldMode, output: &mut AnyBitmap) -> SdfResult<()> {
        mode.check_output(output)?;
        debug!(%mode, width = output.width(), height = output.height(), algorithm = "legacy", "Generating field");
        match output {
            AnyBitmap::Float1(b) => self.run(shape, space, mode, b),
            AnyBitmap::Float3(b) => self.run(shape, space, mode, b),
            AnyBitmap::Float4(b) => self.run(shape, space, mode, b),
            other => return Err(SdfError::channel_mismatch(mode.channels(), other.channel_count())),
        }
        debug!(%mode, "Field generated");
        Ok(())
    }
}

struct CurrentSampler<'a, S, C> {
    finder: ShapeDistanceFinder<S, C>,
    shape: &'a Shape,
    scanline: Scanline,
}

impl<S, C, const N: usize> RowSampler<N> for CurrentSampler<'_, S, C>
where
    S: EdgeSelector,
    C: ContourCombiner<S>,
{
    fn begin_row(&mut self, y: f64) {
        self.scanline = self.shape.scanline(y);
    }

    fn sample(&mut self, point: &Point2<f64>) -> [f64; N] {
        let mut distance = self.finder.distance(point);
        distance.reconcile(self.scanline.is_filled(point.x, self.shape.fill_rule));
        std::array::from_fn(|i| distance.channel(i))
    }
}

/// Edge-selector generation with fill-rule signs and optional overlap
/// support.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentGenerator {
    /// Resolve overlapping contours by winding.
    pub overlap_support: bool,
    /// Whether to use parallel processing (via rayon).
    pub parallel: bool,
}

impl CurrentGenerator {
    fn run_with<S, C, const N: usize>(&self, shape: &Shape, space: &FieldSpace, bitmap: &mut Bitmap<f32, N>)
    where
        S: EdgeSelector,
        C: ContourCombiner<S>,
    {
        debug_assert_eq!(S::Distance::CHANNELS, N);
        let template = ShapeDistanceFinder::<S, C>::new(shape);
        fill_field(bitmap, space, shape.inverse_y_axis, self.parallel, || CurrentSampler {
            finder: template.clone(),
            shape,
            scanline: Scanline::default(),
        });
    }

    fn run<S: EdgeSelector, const N: usize>(&self, shape: &Shape, space: &FieldSpace, bitmap: &mut Bitmap<f32, N>) {
        if self.overlap_support {
            self.run_with::<S, OverlappingContourCombiner<S>, N>(shape, space, bitmap);
        } else {
            self.run_with::<S, SimpleContourCombiner<S>, N>(shape, space, bitmap);
        }
    }
}

impl FieldGenerator for CurrentGenerator {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Current
    }

    fn generate(&self, shape: &Shape, space: &FieldSpace, mode: FieldMode, output: &mut AnyBitmap) -> SdfResult<()> {
        mode.check_output(output)?;
        debug!(
            %mode,
            width = output.width(),
            height = output.height(),
            algorithm = "current",
            overlap_support = self.overlap_support,
            "Generating field"
        );
        match (mode, output) {
            (FieldMode::Single, AnyBitmap::Float1(b)) => self.run::<TrueDistanceSelector, 1>(shape, space, b),
            (FieldMode::Pseudo, AnyBitmap::Float1(b)) => self.run::<PseudoDistanceSelector, 1>(shape, space, b),
            (FieldMode::Multi, AnyBitmap::Float3(b)) => self.run::<MultiDistanceSelector, 3>(shape, space, b),
            (FieldMode::MultiAndTrue, AnyBitmap::Float4(b)) => {
                self.run::<MultiAndTrueDistanceSelector, 4>(shape, space, b);
            }
            (mode, other) => return Err(SdfError::channel_mismatch(mode.channels(), other.channel_count())),
        }
        debug!(%mode, "Field generated");
        Ok(())
    }
}
