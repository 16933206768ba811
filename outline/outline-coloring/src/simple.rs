//! Simple edge coloring: rotate colors at every corner.

use outline_types::{Contour, EdgeColor, Shape};

use crate::corners::{color_teardrop, find_corners, switch_color};
use crate::ColoringSummary;

/// Color every contour of `shape` by cycling through two-channel colors at
/// each corner.
///
/// Smooth contours become white, single-corner contours get the teardrop
/// treatment and the last spline of a contour never repeats the first
/// spline's color.
///
/// # Example
///
/// ```
/// use outline_coloring::color_edges_simple;
/// use outline_types::{Contour, EdgeColor, Point2, Shape};
///
/// let mut shape = Shape::from_contours([Contour::polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 0.0),
/// ])]);
/// color_edges_simple(&mut shape, 3.0, 0);
///
/// let edges = &shape.contours[0].edges;
/// for i in 0..4 {
///     assert_ne!(edges[i].color, edges[(i + 1) % 4].color);
///     assert_ne!(edges[i].color, EdgeColor::White);
/// }
/// ```
pub fn color_edges_simple(shape: &mut Shape, angle_threshold: f64, seed: u64) -> ColoringSummary {
    let cross_threshold = angle_threshold.sin();
    let mut seed = seed;
    let mut summary = ColoringSummary::default();
    for contour in &mut shape.contours {
        let corners = find_corners(contour, cross_threshold);
        summary.record(corners.len());
        match corners.as_slice() {
            [] => contour.set_color(EdgeColor::White),
            [corner] => color_teardrop(contour, *corner, &mut seed),
            _ => color_splines(contour, &corners, &mut seed),
        }
    }
    summary
}

fn color_splines(contour: &mut Contour, corners: &[usize], seed: &mut u64) {
    let corner_count = corners.len();
    let m = contour.edges.len();
    let start = corners[0];
    let mut spline = 0;
    let mut color = EdgeColor::White;
    switch_color(&mut color, seed, EdgeColor::Black);
    let initial = color;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corner_count && corners[spline + 1] == index {
            spline += 1;
            let banned = if spline == corner_count - 1 {
                initial
            } else {
                EdgeColor::Black
            };
            switch_color(&mut color, seed, banned);
        }
        contour.edges[index].color = color;
    }
}
