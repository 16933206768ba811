//! Automatic fitting of a shape into an output bitmap.

use nalgebra::Vector2;
use outline_types::Bounds;
use tracing::debug;

use crate::error::{SdfError, SdfResult};
use crate::space::{Projection, Range};

/// Fit `bounds` into a `width × height` bitmap.
///
/// With `scale` unset the shape is scaled uniformly to fill the frame, after
/// reserving a margin for the distance band: `(0.5 + shift) · range` pixels
/// per side for a pixel range, or `(1 + 2·shift) · range` shape units per
/// side for a unit range. With `scale` set only the translation is computed,
/// centering the shape. Empty or flat bounds fall back to the unit square.
///
/// # Errors
///
/// Returns [`SdfError::DegenerateFraming`] if the margins leave no room, and
/// [`SdfError::ArgumentOutOfRange`] for a non-positive explicit scale.
///
/// # Example
///
/// ```
/// use outline_sdf::{Range, auto_frame};
/// use outline_types::Bounds;
///
/// let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
/// let projection = auto_frame(&bounds, 32, 32, Range::Pixels(4.0), 0.0, None).unwrap();
///
/// // 28 usable pixels for 10 units, with a 2 pixel margin.
/// assert!((projection.scale.x - 2.8).abs() < 1e-12);
/// assert!((projection.project(&[0.0, 0.0].into()).x - 2.0).abs() < 1e-12);
/// ```
pub fn auto_frame(
    bounds: &Bounds,
    width: usize,
    height: usize,
    range: Range,
    shift: f64,
    scale: Option<Vector2<f64>>,
) -> SdfResult<Projection> {
    let (mut l, mut b, mut r, mut t) = (bounds.left, bounds.bottom, bounds.right, bounds.top);
    let mut frame = Vector2::new(width as f64, height as f64);
    let margin = 0.5 + shift;

    if let Some(scale) = scale {
        if !(scale.x > 0.0 && scale.y > 0.0 && scale.x.is_finite() && scale.y.is_finite()) {
            return Err(SdfError::out_of_range("scale", "must be finite and positive"));
        }
    } else {
        match range {
            Range::Units(units) => {
                let grow = 2.0 * margin * units;
                l -= grow;
                b -= grow;
                r += grow;
                t += grow;
            }
            Range::Pixels(pixels) => frame -= Vector2::repeat(2.0 * margin * pixels),
        }
    }

    if !(l < r && b < t) {
        debug!(left = l, bottom = b, right = r, top = t, "Degenerate bounds, framing the unit square");
        (l, b, r, t) = (0.0, 0.0, 1.0, 1.0);
    }
    if !(frame.x > 0.0 && frame.y > 0.0) {
        return Err(SdfError::DegenerateFraming { width, height });
    }

    let dims = Vector2::new(r - l, t - b);
    let projection = match scale {
        Some(scale) => {
            let translate =
                (frame.component_div(&scale) - dims) * 0.5 - Vector2::new(l, b);
            Projection::new(scale, translate)
        }
        None => {
            let (translate, uniform) = if dims.x * frame.y < dims.y * frame.x {
                (
                    Vector2::new(0.5 * (frame.x / frame.y * dims.y - dims.x) - l, -b),
                    frame.y / dims.y,
                )
            } else {
                (
                    Vector2::new(-l, 0.5 * (frame.y / frame.x * dims.x - dims.y) - b),
                    frame.x / dims.x,
                )
            };
            let mut translate = translate;
            if let Range::Pixels(pixels) = range {
                translate += Vector2::repeat(margin * pixels / uniform);
            }
            Projection::new(Vector2::repeat(uniform), translate)
        }
    };

    debug!(
        scale_x = projection.scale.x,
        scale_y = projection.scale.y,
        translate_x = projection.translate.x,
        translate_y = projection.translate.y,
        "Auto-framed shape"
    );
    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    #[test]
    fn pixel_range_leaves_margin() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let p = auto_frame(&bounds, 32, 32, Range::Pixels(4.0), 0.0, None).unwrap();
        assert_relative_eq!(p.scale.x, 2.8, epsilon = 1e-12);
        assert_relative_eq!(p.project(&Point2::new(0.0, 0.0)), Point2::new(2.0, 2.0), epsilon = 1e-9);
        assert_relative_eq!(p.project(&Point2::new(10.0, 10.0)), Point2::new(30.0, 30.0), epsilon = 1e-9);
    }

    #[test]
    fn unit_range_grows_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 8.0, 8.0);
        let p = auto_frame(&bounds, 12, 12, Range::Units(1.0), 0.0, None).unwrap();
        // 10 units across 12 pixels.
        assert_relative_eq!(p.scale.x, 1.2, epsilon = 1e-12);
        assert_relative_eq!(p.project(&Point2::new(-1.0, -1.0)), Point2::new(0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn wide_shape_is_centered_vertically() {
        let bounds = Bounds::new(0.0, 0.0, 20.0, 10.0);
        let p = auto_frame(&bounds, 20, 20, Range::Units(0.0), 0.0, None).unwrap();
        assert_relative_eq!(p.scale.x, 1.0);
        assert_relative_eq!(p.project(&Point2::new(0.0, 0.0)), Point2::new(0.0, 5.0), epsilon = 1e-9);
    }

    #[test]
    fn explicit_scale_centers() {
        let bounds = Bounds::new(0.0, 0.0, 4.0, 4.0);
        let p = auto_frame(&bounds, 16, 16, Range::Pixels(2.0), 0.0, Some(Vector2::new(2.0, 2.0))).unwrap();
        assert_relative_eq!(p.project(&Point2::new(2.0, 2.0)), Point2::new(8.0, 8.0), epsilon = 1e-9);
    }

    #[test]
    fn empty_bounds_use_unit_square() {
        let p = auto_frame(&Bounds::empty(), 10, 10, Range::Pixels(0.0), 0.0, None).unwrap();
        assert_relative_eq!(p.scale.x, 10.0);
    }

    #[test]
    fn margin_too_wide_fails() {
        let bounds = Bounds::new(0.0, 0.0, 1.0, 1.0);
        let err = auto_frame(&bounds, 4, 4, Range::Pixels(4.0), 0.0, None).unwrap_err();
        assert_eq!(err, SdfError::DegenerateFraming { width: 4, height: 4 });
    }
}
