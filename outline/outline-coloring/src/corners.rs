//! Corner detection and the color rotation shared by all strategies.

use outline_types::math::{cross, normalize_or};
use outline_types::{Contour, Edge, EdgeColor, Vector2};

/// Two-channel colors picked for the first spline of a contour.
const START_COLORS: [EdgeColor; 3] = [EdgeColor::Cyan, EdgeColor::Magenta, EdgeColor::Yellow];

/// Whether the turn from direction `a` into direction `b` is sharp.
///
/// A join is a corner when the tangents point away from each other or when
/// the sine of the angle between them exceeds `cross_threshold`.
#[must_use]
pub fn is_corner(a: &Vector2<f64>, b: &Vector2<f64>, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || cross(a, b).abs() > cross_threshold
}

/// Indices of the edges that start at a corner.
#[must_use]
pub fn find_corners(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let Some(last) = contour.edges.last() else {
        return Vec::new();
    };
    let mut prev_direction = last.segment.direction(1.0);
    let mut corners = Vec::new();
    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(
            &normalize_or(&prev_direction, false),
            &normalize_or(&edge.segment.direction(0.0), false),
            cross_threshold,
        ) {
            corners.push(index);
        }
        prev_direction = edge.segment.direction(1.0);
    }
    corners
}

/// Advance `color` to a different two-channel color, consuming entropy from
/// `seed`, and avoid `banned` where possible.
///
/// From white (or black) one of cyan, magenta or yellow is picked. From a
/// two-channel color the mask is rotated by one or two bits, which always
/// yields a different two-channel color.
pub fn switch_color(color: &mut EdgeColor, seed: &mut u64, banned: EdgeColor) {
    let combined = color.intersect(banned);
    if combined.is_single_channel() {
        *color = combined.complement();
        return;
    }
    if matches!(color, EdgeColor::Black | EdgeColor::White) {
        *color = START_COLORS[(*seed % 3) as usize];
        *seed /= 3;
        return;
    }
    let shifted = color.bits() << (1 + (*seed & 1));
    *color = EdgeColor::from_bits(shifted | (shifted >> 3));
    *seed >>= 1;
}

/// Color a contour with exactly one corner.
///
/// The contour is divided into three runs colored `first`, white and
/// `third` so the corner sees two different colors on either side. Contours
/// with fewer than three edges are split into thirds first.
pub fn color_teardrop(contour: &mut Contour, corner: usize, seed: &mut u64) {
    let mut first = EdgeColor::White;
    switch_color(&mut first, seed, EdgeColor::Black);
    let mut third = first;
    switch_color(&mut third, seed, EdgeColor::Black);
    let colors = [first, EdgeColor::White, third];

    let m = contour.edges.len();
    if m >= 3 {
        for i in 0..m {
            let slot = (3.0 + 2.875 * i as f64 / (m - 1) as f64 - 1.4375 + 0.5) as usize - 2;
            contour.edges[(corner + i) % m].color = colors[slot.min(2)];
        }
        return;
    }
    if m == 0 {
        return;
    }

    let mut pieces: Vec<Edge> = Vec::with_capacity(6);
    // Start splitting from the edge at the corner.
    for offset in 0..m {
        let edge = &contour.edges[(corner + offset) % m];
        pieces.extend(
            edge.segment
                .split_in_thirds()
                .into_iter()
                .map(|segment| Edge::with_color(segment, edge.color)),
        );
    }
    let per_color = pieces.len() / 3;
    for (i, piece) in pieces.iter_mut().enumerate() {
        piece.color = colors[i / per_color];
    }
    contour.edges = pieces;
}
