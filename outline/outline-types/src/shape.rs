//! Shapes: sets of contours with a fill rule, plus validation and repair.

use std::fmt;

use nalgebra::Point2;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::contour::Contour;
use crate::error::{ShapeError, ShapeResult};
use crate::scanline::{FillRule, Scanline};
use crate::segment::{Edge, EdgeSegment};

/// Largest gap between consecutive edges still considered closed.
pub const CLOSE_TOLERANCE: f64 = 1e-9;

/// Control points closer than this to an edge's start make it degenerate.
pub const DEGENERATE_TOLERANCE: f64 = 1e-12;

/// Gaps up to this size are closed by moving the next edge's start point;
/// larger gaps get a bridging line.
pub const GAP_SNAP_TOLERANCE: f64 = 1e-6;

/// A vector outline made of closed contours.
///
/// # Example
///
/// ```
/// use outline_types::{Contour, FillRule, Point2, Shape};
///
/// let mut shape = Shape::new();
/// shape.add_contour(Contour::polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 2.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(2.0, 0.0),
/// ]));
///
/// assert!(shape.validate());
/// assert!(shape.is_filled(&Point2::new(1.0, 1.0)));
/// assert!(!shape.is_filled(&Point2::new(3.0, 1.0)));
/// assert_eq!(shape.fill_rule, FillRule::NonZero);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    /// Contours of the shape.
    pub contours: Vec<Contour>,
    /// Whether rows should be emitted top-down (Y axis pointing down in the
    /// output). Geometry is left untouched; generators read this flag.
    pub inverse_y_axis: bool,
    /// Rule used for every containment query.
    pub fill_rule: FillRule,
}

impl Shape {
    /// Create an empty shape with the non-zero fill rule.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contours: Vec::new(),
            inverse_y_axis: false,
            fill_rule: FillRule::NonZero,
        }
    }

    /// Create a shape from contours.
    #[must_use]
    pub fn from_contours(contours: impl IntoIterator<Item = Contour>) -> Self {
        Self {
            contours: contours.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Set the fill rule.
    #[must_use]
    pub const fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Append a contour.
    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Whether the shape has no edges at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Iterate over every edge of every contour.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.contours.iter().flat_map(|c| c.edges.iter())
    }

    /// Set the Y-axis inversion flag. Coordinates are not modified.
    pub fn flip_y(&mut self, enabled: bool) {
        self.inverse_y_axis = enabled;
    }

    /// Bounding rectangle of all contours; [`Bounds::empty`] for an empty shape.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for contour in &self.contours {
            contour.extend_bounds(&mut bounds);
        }
        bounds
    }

    /// Crossings of every edge with the horizontal line at `y`.
    #[must_use]
    pub fn scanline(&self, y: f64) -> Scanline {
        Scanline::from_crossings(
            self.edges()
                .flat_map(|e| e.segment.scanline_crossings(y))
                .collect(),
        )
    }

    /// Whether `point` is inside the shape under its fill rule.
    #[must_use]
    pub fn is_filled(&self, point: &Point2<f64>) -> bool {
        self.scanline(point.y).is_filled(point.x, self.fill_rule)
    }

    /// Check the closed-loop and degeneracy invariants.
    ///
    /// Returns `false` without modifying the shape if any contour is open,
    /// empty, or contains a zero-length edge.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`Self::validate`], returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the first [`ShapeError`] in contour order.
    pub fn check(&self) -> ShapeResult<()> {
        for (ci, contour) in self.contours.iter().enumerate() {
            if contour.is_empty() {
                return Err(ShapeError::EmptyContour { contour: ci });
            }
            for (ei, edge) in contour.edges.iter().enumerate() {
                if edge
                    .segment
                    .control_points()
                    .iter()
                    .any(|p| !p.x.is_finite() || !p.y.is_finite())
                {
                    return Err(ShapeError::NonFiniteCoordinate {
                        contour: ci,
                        edge: ei,
                    });
                }
                if edge.segment.is_degenerate(DEGENERATE_TOLERANCE) {
                    return Err(ShapeError::degenerate_edge(ci, ei));
                }
            }
            if let Some((edge, gap)) = contour.largest_gap() {
                if gap > CLOSE_TOLERANCE {
                    return Err(ShapeError::open_contour(ci, edge, gap));
                }
            }
        }
        Ok(())
    }

    /// Count every problem in the shape.
    #[must_use]
    pub fn report(&self) -> ShapeReport {
        let mut report = ShapeReport {
            contour_count: self.contours.len(),
            edge_count: self.edge_count(),
            ..ShapeReport::default()
        };
        for contour in &self.contours {
            if contour.is_empty() {
                report.empty_contour_count += 1;
                continue;
            }
            let n = contour.len();
            for (i, edge) in contour.edges.iter().enumerate() {
                let points = edge.segment.control_points();
                if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    report.non_finite_edge_count += 1;
                }
                if edge.segment.is_degenerate(DEGENERATE_TOLERANCE) {
                    report.degenerate_edge_count += 1;
                }
                let gap = (contour.edges[(i + 1) % n].segment.start() - edge.segment.end()).norm();
                if gap > CLOSE_TOLERANCE {
                    report.open_join_count += 1;
                    report.largest_gap = report.largest_gap.max(gap);
                }
            }
        }
        report
    }

    /// Repair the shape so the closed-loop invariant holds exactly.
    ///
    /// Degenerate edges and empty contours are removed, small gaps are closed
    /// by moving the following edge's start point and larger gaps get a
    /// bridging line. Single-edge contours are split into thirds so that each
    /// contour has enough edges to be colored.
    pub fn normalize(&mut self) -> NormalizeSummary {
        let mut summary = NormalizeSummary::default();

        for contour in &mut self.contours {
            let before = contour.edges.len();
            contour
                .edges
                .retain(|e| !e.segment.is_degenerate(DEGENERATE_TOLERANCE));
            summary.degenerate_edges_removed += before - contour.edges.len();
        }
        let before = self.contours.len();
        self.contours.retain(|c| !c.is_empty());
        summary.empty_contours_removed = before - self.contours.len();

        for contour in &mut self.contours {
            close_gaps(contour, &mut summary);
            if let [only] = contour.edges.as_slice() {
                let color = only.color;
                let pieces = only.segment.split_in_thirds();
                contour.edges = pieces
                    .into_iter()
                    .map(|segment| Edge::with_color(segment, color))
                    .collect();
                summary.contours_split += 1;
            }
        }

        if summary.changed() {
            debug!(
                degenerate = summary.degenerate_edges_removed,
                empty = summary.empty_contours_removed,
                snapped = summary.gaps_snapped,
                bridged = summary.gaps_bridged,
                split = summary.contours_split,
                "Normalized shape"
            );
        }
        summary
    }
}

fn close_gaps(contour: &mut Contour, summary: &mut NormalizeSummary) {
    let mut i = 0;
    while i < contour.edges.len() {
        let n = contour.edges.len();
        let end = contour.edges[i].segment.end();
        let next = (i + 1) % n;
        let start = contour.edges[next].segment.start();
        if end != start {
            let gap = (start - end).norm();
            if gap <= GAP_SNAP_TOLERANCE {
                contour.edges[next].segment.move_start_point(end);
                summary.gaps_snapped += 1;
            } else {
                let color = contour.edges[i].color;
                contour.edges.insert(
                    i + 1,
                    Edge::with_color(EdgeSegment::line(end, start), color),
                );
                summary.gaps_bridged += 1;
                i += 1;
            }
        }
        i += 1;
    }
}

/// Changes made by [`Shape::normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Zero-length edges dropped.
    pub degenerate_edges_removed: usize,
    /// Contours dropped because they had no edges left.
    pub empty_contours_removed: usize,
    /// Small gaps closed by moving an endpoint.
    pub gaps_snapped: usize,
    /// Larger gaps closed by inserting a line.
    pub gaps_bridged: usize,
    /// Single-edge contours split into three edges.
    pub contours_split: usize,
}

impl NormalizeSummary {
    /// Whether normalization modified the shape.
    #[must_use]
    pub fn changed(&self) -> bool {
        *self != Self::default()
    }
}

/// Counts of the problems found by [`Shape::report`].
#[derive(Debug, Clone, Default)]
pub struct ShapeReport {
    /// Number of contours.
    pub contour_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Contours without edges.
    pub empty_contour_count: usize,
    /// Edges of zero length.
    pub degenerate_edge_count: usize,
    /// Edges with a NaN or infinite control point.
    pub non_finite_edge_count: usize,
    /// Joins where an edge's end misses the next start.
    pub open_join_count: usize,
    /// Largest such gap.
    pub largest_gap: f64,
}

impl ShapeReport {
    /// Check if the shape has any issues.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// Total number of issues found.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.empty_contour_count
            + self.degenerate_edge_count
            + self.non_finite_edge_count
            + self.open_join_count
    }
}

impl fmt::Display for ShapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shape Report:")?;
        writeln!(f, "  Contours: {}", self.contour_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        if self.has_issues() {
            writeln!(f)?;
            writeln!(f, "  Issues:")?;
            if self.empty_contour_count > 0 {
                writeln!(f, "    Empty contours: {}", self.empty_contour_count)?;
            }
            if self.degenerate_edge_count > 0 {
                writeln!(f, "    Degenerate edges: {}", self.degenerate_edge_count)?;
            }
            if self.non_finite_edge_count > 0 {
                writeln!(f, "    Non-finite edges: {}", self.non_finite_edge_count)?;
            }
            if self.open_join_count > 0 {
                writeln!(
                    f,
                    "    Open joins: {} (largest gap {:e})",
                    self.open_join_count, self.largest_gap
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Contour {
        Contour::polygon(&[
            p(x0, y0),
            p(x0, y0 + size),
            p(x0 + size, y0 + size),
            p(x0 + size, y0),
        ])
    }

    #[test]
    fn valid_square() {
        let shape = Shape::from_contours([square(0.0, 0.0, 1.0)]);
        assert!(shape.validate());
        assert!(!shape.report().has_issues());
    }

    #[test]
    fn open_contour_fails_without_mutation() {
        let mut contour = square(0.0, 0.0, 1.0);
        contour.edges[1].segment = EdgeSegment::line(p(0.0, 1.1), p(1.0, 1.0));
        let shape = Shape::from_contours([contour]);
        let copy = shape.clone();
        assert!(!shape.validate());
        assert!(matches!(shape.check(), Err(ShapeError::OpenContour { edge: 0, .. })));
        assert_eq!(shape, copy);
        assert_eq!(shape.report().open_join_count, 1);
    }

    #[test]
    fn degenerate_edge_fails() {
        let mut contour = square(0.0, 0.0, 1.0);
        contour
            .edges
            .insert(1, Edge::new(EdgeSegment::line(p(0.0, 1.0), p(0.0, 1.0))));
        let shape = Shape::from_contours([contour]);
        assert!(matches!(
            shape.check(),
            Err(ShapeError::DegenerateEdge { contour: 0, edge: 1 })
        ));
        let report = shape.report();
        assert_eq!(report.degenerate_edge_count, 1);
        assert!(report.to_string().contains("Degenerate edges: 1"));
    }

    #[test]
    fn normalize_repairs() {
        let mut contour = square(0.0, 0.0, 1.0);
        contour
            .edges
            .insert(1, Edge::new(EdgeSegment::line(p(0.0, 1.0), p(0.0, 1.0))));
        contour.edges[2].segment = EdgeSegment::line(p(0.0, 1.0 + 1e-8), p(1.0, 1.0));
        contour.edges[4].segment = EdgeSegment::line(p(1.0, 0.0), p(0.5, 0.0));
        let mut shape = Shape::from_contours([contour, Contour::new()]);

        let summary = shape.normalize();
        assert_eq!(summary.degenerate_edges_removed, 1);
        assert_eq!(summary.empty_contours_removed, 1);
        assert_eq!(summary.gaps_snapped, 1);
        assert_eq!(summary.gaps_bridged, 1);
        assert!(shape.validate());
        assert_eq!(shape.edge_count(), 5);
    }

    #[test]
    fn normalize_splits_single_edge_contours() {
        let lens = Contour::from_edges([Edge::new(EdgeSegment::cubic(
            p(0.0, 0.0),
            p(0.0, 2.0),
            p(2.0, 2.0),
            p(0.0, 0.0),
        ))]);
        let mut shape = Shape::from_contours([lens]);
        let summary = shape.normalize();
        assert_eq!(summary.contours_split, 1);
        assert_eq!(shape.contours[0].len(), 3);
        assert!(shape.validate());
    }

    #[test]
    fn nested_contours_with_fill_rules() {
        let outer = square(0.0, 0.0, 4.0);
        let inner = square(1.0, 1.0, 2.0);
        let shape = Shape::from_contours([outer, inner]);
        assert!(shape.is_filled(&p(2.0, 2.0)));
        let odd = shape.clone().with_fill_rule(FillRule::Odd);
        assert!(!odd.is_filled(&p(2.0, 2.0)));
        assert!(odd.is_filled(&p(0.5, 2.0)));
    }

    #[test]
    fn flip_y_only_sets_flag() {
        let mut shape = Shape::from_contours([square(0.0, 0.0, 1.0)]);
        let bounds = shape.bounds();
        shape.flip_y(true);
        assert!(shape.inverse_y_axis);
        assert_eq!(shape.bounds(), bounds);
        assert_relative_eq!(bounds.width(), 1.0);
    }
}
