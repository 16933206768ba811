//! Multi-channel error correction.
//!
//! Interpolating between two pixels whose channels disagree strongly can
//! produce a median that crosses the midpoint where no edge exists. Such
//! clashing pixels are equalized to their median so they behave like a
//! single-channel field locally.

use nalgebra::Vector2;
use outline_types::math::median;
use rayon::prelude::*;
use tracing::debug;

use crate::bitmap::{AnyBitmap, Bitmap};
use crate::error::{SdfError, SdfResult};
use crate::space::FieldSpace;

/// Counts from one error correction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCorrectionSummary {
    /// Colour channels pulled back to the true distance channel.
    pub channels_replaced: usize,
    /// Pixels equalized after clashing with an orthogonal neighbour.
    pub clashes: usize,
    /// Pixels equalized after clashing with a diagonal neighbour.
    pub diagonal_clashes: usize,
}

impl ErrorCorrectionSummary {
    /// Whether the pass changed anything.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.channels_replaced + self.clashes + self.diagonal_clashes > 0
    }
}

/// Equalize pixels whose colour channels would interpolate into artifacts.
///
/// `threshold` is the minimum channel difference between neighbours, in
/// pixels of distance range, that counts as a clash; it is converted to
/// stored units through `space`. A threshold of zero disables the pass. For
/// four-channel fields, colour channels deviating from the true distance
/// channel by more than the threshold are first replaced by it.
///
/// Applying the pass twice gives the same result as applying it once.
///
/// # Errors
///
/// - [`SdfError::MismatchedChannelCount`] if the field has fewer than three
///   channels.
/// - [`SdfError::MismatchedElementType`] for byte bitmaps.
/// - [`SdfError::ArgumentOutOfRange`] if `threshold` is negative or NaN.
pub fn correct_errors(
    bitmap: &mut AnyBitmap,
    space: &FieldSpace,
    threshold: f64,
    parallel: bool,
) -> SdfResult<ErrorCorrectionSummary> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(SdfError::out_of_range(
            "error_correction_threshold",
            format!("{threshold} must not be negative"),
        ));
    }
    let summary = match bitmap {
        AnyBitmap::Float3(b) => correct_typed(b, space, threshold, parallel),
        AnyBitmap::Float4(b) => correct_typed(b, space, threshold, parallel),
        AnyBitmap::Float1(_) | AnyBitmap::Float2(_) => {
            return Err(SdfError::channel_mismatch(3, bitmap.channel_count()));
        }
        other => {
            return Err(SdfError::MismatchedElementType {
                expected: crate::bitmap::ElementType::Float,
                actual: other.element_type(),
            });
        }
    };
    debug!(
        threshold,
        replaced = summary.channels_replaced,
        clashes = summary.clashes,
        diagonal = summary.diagonal_clashes,
        "Error correction finished"
    );
    Ok(summary)
}

fn correct_typed<const N: usize>(
    bitmap: &mut Bitmap<f32, N>,
    space: &FieldSpace,
    threshold: f64,
    parallel: bool,
) -> ErrorCorrectionSummary {
    let mut summary = ErrorCorrectionSummary::default();
    if threshold == 0.0 || bitmap.is_empty() {
        return summary;
    }
    let tau = space.error_threshold(threshold);
    let mid = space.midpoint();

    if N >= 4 {
        let limit = tau.x.min(tau.y) as f32;
        for pixel in bitmap.pixels_mut() {
            let a = pixel[3];
            if (median(pixel[0], pixel[1], pixel[2]) - a).abs() <= limit {
                continue;
            }
            for value in pixel.iter_mut().take(3) {
                if (*value - a).abs() > limit {
                    *value = a;
                    summary.channels_replaced += 1;
                }
            }
        }
    }

    summary.clashes = equalize(bitmap, &ORTHOGONAL, tau, mid, parallel);
    summary.diagonal_clashes = equalize(bitmap, &DIAGONAL, tau, mid, parallel);
    summary
}

/// Neighbour offsets. The clash threshold sums the per-axis thresholds of
/// the axes an offset moves along.
type Neighbourhood = [(isize, isize); 4];

const ORTHOGONAL: Neighbourhood = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const DIAGONAL: Neighbourhood = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Flag every pixel that clashes with a neighbour, then set the colour
/// channels of the flagged pixels to their median. Detection reads the
/// field as it was before any pixel of this stage changed.
fn equalize<const N: usize>(
    bitmap: &mut Bitmap<f32, N>,
    neighbourhood: &Neighbourhood,
    tau: Vector2<f64>,
    mid: f32,
    parallel: bool,
) -> usize {
    let (width, height) = (bitmap.width(), bitmap.height());
    let field: &Bitmap<f32, N> = bitmap;
    let detect_row = |y: usize| -> Vec<usize> {
        (0..width)
            .filter(|&x| {
                let a = &field.pixels()[y * width + x];
                neighbourhood.iter().any(|&(dx, dy)| {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        return false;
                    }
                    let b = &field.pixels()[ny as usize * width + nx as usize];
                    let threshold = dx.abs() as f64 * tau.x + dy.abs() as f64 * tau.y;
                    detect_clash(a, b, threshold as f32, mid)
                })
            })
            .map(|x| y * width + x)
            .collect()
    };
    let flagged: Vec<usize> = if parallel {
        (0..height).into_par_iter().flat_map_iter(detect_row).collect()
    } else {
        (0..height).flat_map(detect_row).collect()
    };

    let pixels = bitmap.pixels_mut();
    for &i in &flagged {
        let pixel = &mut pixels[i];
        let m = median(pixel[0], pixel[1], pixel[2]);
        pixel[0] = m;
        pixel[1] = m;
        pixel[2] = m;
    }
    flagged.len()
}

/// Whether pixel `a` should be equalized because of its neighbour `b`.
///
/// The channel pairs are ordered by how far apart they are. A clash needs the
/// middle pair to differ by at least `threshold`, a neighbour that has not
/// already been equalized, and `a` to be the one further from the outline in
/// the least differing channel.
fn detect_clash<const N: usize>(a: &[f32; N], b: &[f32; N], threshold: f32, mid: f32) -> bool {
    let mut pairs = [(a[0], b[0]), (a[1], b[1]), (a[2], b[2])];
    pairs.sort_by(|p, q| (q.1 - q.0).abs().total_cmp(&(p.1 - p.0).abs()));
    let [_, (a1, b1), (a2, b2)] = pairs;
    (b1 - a1).abs() >= threshold && !(b[0] == b[1] && b[0] == b[2]) && (a2 - mid).abs() >= (b2 - mid).abs()
}
