//! Closed loops of edges.

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::color::EdgeColor;
use crate::segment::{Edge, EdgeSegment};

/// An ordered loop of edges.
///
/// Edge `i` ends where edge `i + 1` (cyclically) starts once the owning shape
/// has been normalized.
///
/// # Example
///
/// ```
/// use outline_types::{Contour, Point2};
///
/// let square = Contour::polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 0.0),
/// ]);
///
/// assert_eq!(square.len(), 4);
/// assert_eq!(square.winding(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contour {
    /// Edges in traversal order.
    pub edges: Vec<Edge>,
}

impl Contour {
    /// Create an empty contour.
    #[must_use]
    pub const fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Create a contour from a list of edges.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    /// Create a closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Point2<f64>]) -> Self {
        let n = points.len();
        Self::from_edges(
            (0..n).map(|i| Edge::new(EdgeSegment::line(points[i], points[(i + 1) % n]))),
        )
    }

    /// Append a white edge.
    pub fn push(&mut self, segment: EdgeSegment) {
        self.edges.push(Edge::new(segment));
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the contour has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Grow `bounds` to enclose every edge.
    pub fn extend_bounds(&self, bounds: &mut Bounds) {
        for edge in &self.edges {
            edge.segment.extend_bounds(bounds);
        }
    }

    /// Bounding rectangle of the contour.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        self.extend_bounds(&mut bounds);
        bounds
    }

    /// Orientation of the contour: `1` for clockwise, `-1` for
    /// counter-clockwise (Y axis pointing up), `0` when empty or flat.
    ///
    /// Contours with one or two edges are sampled at interior points so
    /// curved lenses still get an orientation.
    #[must_use]
    pub fn winding(&self) -> i32 {
        let total = match self.edges.as_slice() {
            [] => return 0,
            [only] => {
                let s = &only.segment;
                let (a, b, c) = (s.point(0.0), s.point(1.0 / 3.0), s.point(2.0 / 3.0));
                shoelace(&a, &b) + shoelace(&b, &c) + shoelace(&c, &a)
            }
            [first, second] => {
                let (a, b) = (first.segment.point(0.0), first.segment.point(0.5));
                let (c, d) = (second.segment.point(0.0), second.segment.point(0.5));
                shoelace(&a, &b) + shoelace(&b, &c) + shoelace(&c, &d) + shoelace(&d, &a)
            }
            edges => {
                let mut total = 0.0;
                let mut prev = edges[edges.len() - 1].segment.start();
                for edge in edges {
                    let cur = edge.segment.start();
                    total += shoelace(&prev, &cur);
                    prev = cur;
                }
                total
            }
        };
        if total > 0.0 {
            1
        } else if total < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverse the traversal direction, flipping the winding.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.segment.reverse();
        }
    }

    /// Sum of the estimated lengths of all edges.
    #[must_use]
    pub fn approximate_length(&self) -> f64 {
        self.edges
            .iter()
            .map(|e| e.segment.approximate_length())
            .sum()
    }

    /// Largest gap between an edge's end and its successor's start, with the
    /// index of the edge it follows.
    #[must_use]
    pub fn largest_gap(&self) -> Option<(usize, f64)> {
        let n = self.edges.len();
        (0..n)
            .map(|i| {
                let end = self.edges[i].segment.end();
                let next = self.edges[(i + 1) % n].segment.start();
                (i, (next - end).norm())
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Set every edge to `color`.
    pub fn set_color(&mut self, color: EdgeColor) {
        for edge in &mut self.edges {
            edge.color = color;
        }
    }
}

fn shoelace(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn ccw_square() -> Contour {
        Contour::polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
    }

    #[test]
    fn winding_and_reverse() {
        let mut square = ccw_square();
        assert_eq!(square.winding(), -1);
        square.reverse();
        assert_eq!(square.winding(), 1);
        assert_eq!(square.edges[0].segment.start(), p(0.0, 1.0));
        assert_eq!(square.largest_gap().map(|g| g.1), Some(0.0));
    }

    #[test]
    fn winding_of_two_edge_lens() {
        // Upper arch then straight back: clockwise.
        let contour = Contour::from_edges([
            Edge::new(EdgeSegment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0))),
            Edge::new(EdgeSegment::line(p(2.0, 0.0), p(0.0, 0.0))),
        ]);
        assert_eq!(contour.winding(), 1);
    }

    #[test]
    fn empty_contour_has_no_winding() {
        assert_eq!(Contour::new().winding(), 0);
        assert!(Contour::new().largest_gap().is_none());
    }

    #[test]
    fn bounds_and_length() {
        let square = ccw_square();
        assert_eq!(square.bounds(), Bounds::unit());
        assert!((square.approximate_length() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn gap_detection() {
        let contour = Contour::from_edges([
            Edge::new(EdgeSegment::line(p(0.0, 0.0), p(1.0, 0.0))),
            Edge::new(EdgeSegment::line(p(1.0, 0.5), p(0.0, 0.0))),
        ]);
        let (edge, gap) = contour.largest_gap().unwrap_or((9, 0.0));
        assert_eq!(edge, 0);
        assert!((gap - 0.5).abs() < 1e-12);
    }
}
