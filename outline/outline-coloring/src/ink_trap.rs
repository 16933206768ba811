//! Corner-aware ("ink trap") edge coloring.
//!
//! Short splines squeezed between two longer ones typically form the narrow
//! notches of a glyph. The corners in front of them are treated as minor:
//! they take the color that conflicts with neither neighbour instead of
//! consuming a step of the color rotation.

use outline_types::{Contour, EdgeColor, Shape};

use crate::corners::{color_teardrop, find_corners, switch_color};
use crate::ColoringSummary;

#[derive(Debug, Clone, Copy)]
struct Corner {
    index: usize,
    prev_spline_length: f64,
    minor: bool,
    color: EdgeColor,
}

/// Color every contour of `shape`, keeping ink-trap notches from creating
/// false corners in the reconstructed field.
///
/// Behaves like [`crate::color_edges_simple`] for smooth and single-corner
/// contours and for contours with up to three corners.
pub fn color_edges_ink_trap(
    shape: &mut Shape,
    angle_threshold: f64,
    seed: u64,
) -> ColoringSummary {
    let cross_threshold = angle_threshold.sin();
    let mut seed = seed;
    let mut summary = ColoringSummary::default();
    for contour in &mut shape.contours {
        let indices = find_corners(contour, cross_threshold);
        summary.record(indices.len());
        match indices.as_slice() {
            [] => contour.set_color(EdgeColor::White),
            [corner] => color_teardrop(contour, *corner, &mut seed),
            _ => {
                let minor = color_with_minor_corners(contour, &indices, &mut seed);
                summary.minor_corner_count += minor;
            }
        }
    }
    summary
}

fn spline_lengths(contour: &Contour, indices: &[usize]) -> Vec<Corner> {
    let mut corners: Vec<Corner> = indices
        .iter()
        .map(|&index| Corner {
            index,
            prev_spline_length: 0.0,
            minor: false,
            color: EdgeColor::Black,
        })
        .collect();
    // Edges before the first corner belong to the spline wrapping around
    // into it.
    let mut owner = corners.len() - 1;
    let mut next_corner = 0;
    for (index, edge) in contour.edges.iter().enumerate() {
        if next_corner < corners.len() && corners[next_corner].index == index {
            owner = next_corner;
            next_corner += 1;
        }
        let following = (owner + 1) % corners.len();
        corners[following].prev_spline_length += edge.segment.approximate_length();
    }
    corners
}

fn color_with_minor_corners(contour: &mut Contour, indices: &[usize], seed: &mut u64) -> usize {
    let mut corners = spline_lengths(contour, indices);
    let corner_count = corners.len();
    let mut major_count = corner_count;

    if corner_count > 3 {
        for i in 0..corner_count {
            let a = corners[i].prev_spline_length;
            let b = corners[(i + 1) % corner_count].prev_spline_length;
            let c = corners[(i + 2) % corner_count].prev_spline_length;
            if a > b && b < c {
                corners[i].minor = true;
                major_count -= 1;
            }
        }
    }
    let minor_count = corner_count - major_count;

    let mut color = EdgeColor::White;
    let mut initial = EdgeColor::Black;
    let mut remaining = major_count;
    for corner in &mut corners {
        if corner.minor {
            continue;
        }
        remaining -= 1;
        let banned = if remaining == 0 {
            initial
        } else {
            EdgeColor::Black
        };
        switch_color(&mut color, seed, banned);
        corner.color = color;
        if initial == EdgeColor::Black {
            initial = color;
        }
    }

    for i in 0..corner_count {
        if corners[i].minor {
            let next = corners[(i + 1) % corner_count].color;
            corners[i].color = color.intersect(next).complement();
        } else {
            color = corners[i].color;
        }
    }

    let m = contour.edges.len();
    let start = corners[0].index;
    let mut spline = 0;
    let mut color = corners[0].color;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corner_count && corners[spline + 1].index == index {
            spline += 1;
            color = corners[spline].color;
        }
        contour.edges[index].color = color;
    }
    minor_count
}
