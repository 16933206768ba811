//! Preview rendering of a distance field.

use outline_types::math::median;

use crate::bitmap::{AnyBitmap, Bitmap, ElementType};
use crate::error::{SdfError, SdfResult};

fn dist_val(value: f32, pixel_range: f64, midpoint: f32) -> f32 {
    if pixel_range == 0.0 {
        return if value > midpoint { 1.0 } else { 0.0 };
    }
    ((f64::from(value - midpoint) * pixel_range + 0.5).clamp(0.0, 1.0)) as f32
}

/// Render `field` into `output` as antialiased coverage.
///
/// The field is resampled bilinearly to the output size. `pixel_range` is the
/// width of the distance band in field pixels and is scaled by the resampling
/// ratio; zero renders a hard threshold at `midpoint`. Multi-channel fields
/// rendered to a single channel use the median of their colour channels, and
/// a single-channel field rendered to three channels is replicated as grey.
///
/// Supported combinations (field → output): 1 → 1, 1 → 3, 3 → 1, 3 → 3,
/// 4 → 1, 4 → 4.
///
/// # Errors
///
/// - [`SdfError::MismatchedChannelCount`] for other combinations.
/// - [`SdfError::MismatchedElementType`] if either bitmap holds bytes.
/// - [`SdfError::ArgumentOutOfRange`] if `pixel_range` is negative or not
///   finite.
pub fn render_sdf(output: &mut AnyBitmap, field: &AnyBitmap, pixel_range: f64, midpoint: f32) -> SdfResult<()> {
    if !(pixel_range.is_finite() && pixel_range >= 0.0) {
        return Err(SdfError::out_of_range(
            "pixel_range",
            format!("{pixel_range} must be finite and not negative"),
        ));
    }
    let (sw, sh) = (field.width(), field.height());
    let (ow, oh) = (output.width(), output.height());
    let pixel_range = if sw + sh > 0 {
        pixel_range * (ow + oh) as f64 / (sw + sh) as f64
    } else {
        pixel_range
    };
    let render = Resampler {
        scale: (sw as f64 / ow.max(1) as f64, sh as f64 / oh.max(1) as f64),
        pixel_range,
        midpoint,
    };

    match (output, field) {
        (AnyBitmap::Float1(out), AnyBitmap::Float1(f)) => render.run(out, f, |s| [s[0]]),
        (AnyBitmap::Float3(out), AnyBitmap::Float1(f)) => render.run(out, f, |s| [s[0]; 3]),
        (AnyBitmap::Float1(out), AnyBitmap::Float3(f)) => render.run(out, f, |s| [median(s[0], s[1], s[2])]),
        (AnyBitmap::Float3(out), AnyBitmap::Float3(f)) => render.run(out, f, |s| s),
        (AnyBitmap::Float1(out), AnyBitmap::Float4(f)) => render.run(out, f, |s| [median(s[0], s[1], s[2])]),
        (AnyBitmap::Float4(out), AnyBitmap::Float4(f)) => render.run(out, f, |s| s),
        (out, f) => {
            for bitmap in [&*out, f] {
                if bitmap.element_type() != ElementType::Float {
                    return Err(SdfError::MismatchedElementType {
                        expected: ElementType::Float,
                        actual: bitmap.element_type(),
                    });
                }
            }
            return Err(SdfError::channel_mismatch(f.channel_count(), out.channel_count()));
        }
    }
    Ok(())
}

struct Resampler {
    scale: (f64, f64),
    pixel_range: f64,
    midpoint: f32,
}

impl Resampler {
    fn run<const M: usize, const N: usize>(
        &self,
        output: &mut Bitmap<f32, M>,
        field: &Bitmap<f32, N>,
        select: impl Fn([f32; N]) -> [f32; M],
    ) {
        for (y, row) in output.rows_mut().enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                let sample = field.sample(self.scale.0 * (x as f64 + 0.5), self.scale.1 * (y as f64 + 0.5));
                *pixel = select(sample).map(|v| dist_val(v, self.pixel_range, self.midpoint));
            }
        }
    }
}
