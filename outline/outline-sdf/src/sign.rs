//! Scanline sign correction.
//!
//! Each row of a finished field is compared against the shape's fill rule
//! evaluated along that row's scanline. Pixels whose stored value reads as the
//! wrong side are reflected about the midpoint. Multi-channel pixels whose
//! median sits exactly on the midpoint cannot be judged on their own; they
//! follow the majority verdict of their four neighbours.

use outline_types::math::median;
use outline_types::{FillRule, Shape};
use rayon::prelude::*;
use tracing::debug;

use crate::bitmap::{AnyBitmap, Bitmap};
use crate::error::{SdfError, SdfResult};
use crate::space::FieldSpace;

/// Counts from one sign correction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignCorrectionSummary {
    /// Pixels reflected because their sign contradicted the fill rule.
    pub pixels_flipped: usize,
    /// Multi-channel pixels whose median was exactly on the midpoint.
    pub ambiguous_pixels: usize,
    /// Ambiguous pixels reflected to follow their neighbours.
    pub ambiguous_flipped: usize,
}

impl SignCorrectionSummary {
    /// Total reflected pixels.
    #[must_use]
    pub const fn total_flipped(&self) -> usize {
        self.pixels_flipped + self.ambiguous_flipped
    }
}

/// Reflect every pixel of `bitmap` whose sign disagrees with `fill_rule`
/// containment of its center.
///
/// One-, three- and four-channel float bitmaps are supported. For multi-channel
/// pixels the median of the colour channels decides and the colour channels
/// are reflected together; a fourth channel is judged on its own.
///
/// # Errors
///
/// Returns [`SdfError::MismatchedElementType`] for byte bitmaps and
/// [`SdfError::ArgumentOutOfRange`] for two-channel bitmaps.
pub fn correct_signs(
    bitmap: &mut AnyBitmap,
    shape: &Shape,
    space: &FieldSpace,
    fill_rule: FillRule,
    parallel: bool,
) -> SdfResult<SignCorrectionSummary> {
    let summary = match bitmap {
        AnyBitmap::Float1(b) => correct_single(b, shape, space, fill_rule, parallel),
        AnyBitmap::Float3(b) => correct_multi(b, shape, space, fill_rule, parallel),
        AnyBitmap::Float4(b) => correct_multi(b, shape, space, fill_rule, parallel),
        AnyBitmap::Float2(_) => {
            return Err(SdfError::out_of_range(
                "channels",
                "sign correction needs 1, 3 or 4 channels",
            ));
        }
        other => {
            return Err(SdfError::MismatchedElementType {
                expected: crate::bitmap::ElementType::Float,
                actual: other.element_type(),
            });
        }
    };
    debug!(
        flipped = summary.pixels_flipped,
        ambiguous = summary.ambiguous_pixels,
        ambiguous_flipped = summary.ambiguous_flipped,
        "Sign correction finished"
    );
    Ok(summary)
}

/// Shape-space fill verdicts for the pixel centers of storage row `row`.
fn row_verdicts<'a>(
    shape: &'a Shape,
    space: &'a FieldSpace,
    fill_rule: FillRule,
    height: usize,
    row: usize,
) -> impl Fn(usize) -> bool + 'a {
    let y = if shape.inverse_y_axis { height - 1 - row } else { row };
    let projection = space.projection;
    let scanline = shape.scanline(projection.unproject_y(y as f64 + 0.5));
    move |x| scanline.is_filled(projection.unproject_x(x as f64 + 0.5), fill_rule)
}

fn for_rows<T, F>(rows: Vec<T>, parallel: bool, f: F) -> usize
where
    T: Send,
    F: Fn(usize, T) -> usize + Sync + Send,
{
    if parallel {
        rows.into_par_iter().enumerate().map(|(i, row)| f(i, row)).sum()
    } else {
        rows.into_iter().enumerate().map(|(i, row)| f(i, row)).sum()
    }
}

fn correct_single(
    bitmap: &mut Bitmap<f32, 1>,
    shape: &Shape,
    space: &FieldSpace,
    fill_rule: FillRule,
    parallel: bool,
) -> SignCorrectionSummary {
    let height = bitmap.height();
    let rows: Vec<_> = bitmap.rows_mut().collect();
    let pixels_flipped = for_rows(rows, parallel, |row, pixels| {
        let filled = row_verdicts(shape, space, fill_rule, height, row);
        let mut flipped = 0;
        for (x, pixel) in pixels.iter_mut().enumerate() {
            if space.is_inside(pixel[0]) != filled(x) {
                pixel[0] = space.reflect(pixel[0]);
                flipped += 1;
            }
        }
        flipped
    });
    SignCorrectionSummary {
        pixels_flipped,
        ..SignCorrectionSummary::default()
    }
}

fn reflect_colors<const N: usize>(space: &FieldSpace, pixel: &mut [f32; N]) {
    for value in pixel.iter_mut().take(3) {
        *value = space.reflect(*value);
    }
}

fn correct_multi<const N: usize>(
    bitmap: &mut Bitmap<f32, N>,
    shape: &Shape,
    space: &FieldSpace,
    fill_rule: FillRule,
    parallel: bool,
) -> SignCorrectionSummary {
    let (width, height) = (bitmap.width(), bitmap.height());
    if width == 0 || height == 0 {
        return SignCorrectionSummary::default();
    }
    let mid = space.midpoint();
    // 1: agrees, -1: was flipped, 0: ambiguous.
    let mut matches = vec![0i8; width * height];

    let rows: Vec<_> = bitmap.rows_mut().zip(matches.chunks_mut(width)).collect();
    let pixels_flipped = for_rows(rows, parallel, |row, (pixels, row_matches)| {
        let filled = row_verdicts(shape, space, fill_rule, height, row);
        let mut flipped = 0;
        for (x, (pixel, m)) in pixels.iter_mut().zip(row_matches.iter_mut()).enumerate() {
            let fill = filled(x);
            let sd = median(pixel[0], pixel[1], pixel[2]);
            if sd == mid {
                *m = 0;
            } else if space.is_inside(sd) != fill {
                reflect_colors(space, pixel);
                *m = -1;
                flipped += 1;
            } else {
                *m = 1;
            }
            if N >= 4 && space.is_inside(pixel[3]) != fill {
                pixel[3] = space.reflect(pixel[3]);
            }
        }
        flipped
    });

    let mut summary = SignCorrectionSummary {
        pixels_flipped,
        ..SignCorrectionSummary::default()
    };
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if matches[i] != 0 {
                continue;
            }
            summary.ambiguous_pixels += 1;
            let mut neighbours = 0i32;
            if x > 0 {
                neighbours += i32::from(matches[i - 1]);
            }
            if x + 1 < width {
                neighbours += i32::from(matches[i + 1]);
            }
            if y > 0 {
                neighbours += i32::from(matches[i - width]);
            }
            if y + 1 < height {
                neighbours += i32::from(matches[i + width]);
            }
            if neighbours < 0 {
                reflect_colors(space, &mut bitmap.pixels_mut()[i]);
                summary.ambiguous_flipped += 1;
            }
        }
    }
    summary
}
