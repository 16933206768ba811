//! Property-based tests for the shape model.
//!
//! Run with: cargo test -p outline-types -- proptest

use outline_types::{
    CLOSE_TOLERANCE, Contour, Edge, EdgeSegment, FillRule, Point2, Shape,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point2<f64>> {
    prop::array::uniform2(-100.0..100.0f64).prop_map(|[x, y]| Point2::new(x, y))
}

/// A closed polygon with 3 to 12 vertices.
fn arb_polygon() -> impl Strategy<Value = Vec<Point2<f64>>> {
    prop::collection::vec(arb_point(), 3..12)
}

/// A contour of mixed segments whose joins are perturbed by small or large
/// gaps and which may contain zero-length edges.
fn arb_broken_contour() -> impl Strategy<Value = Contour> {
    (
        arb_polygon(),
        prop::collection::vec((0usize..4, -1e-3..1e-3f64, any::<bool>()), 12),
    )
        .prop_map(|(points, tweaks)| {
            let n = points.len();
            let mut contour = Contour::new();
            for i in 0..n {
                let (kind, jitter, degenerate) = tweaks[i];
                let a = points[i] + nalgebra::Vector2::new(jitter, -jitter);
                let b = points[(i + 1) % n];
                let mid = Point2::from((a.coords + b.coords) * 0.5);
                let segment = match kind {
                    0 | 1 => EdgeSegment::line(a, b),
                    2 => EdgeSegment::quadratic(a, mid + nalgebra::Vector2::new(1.0, 2.0), b),
                    _ => EdgeSegment::cubic(
                        a,
                        mid + nalgebra::Vector2::new(-3.0, 1.0),
                        mid + nalgebra::Vector2::new(2.0, -1.0),
                        b,
                    ),
                };
                contour.edges.push(Edge::new(segment));
                if degenerate {
                    contour.push(EdgeSegment::line(b, b));
                }
            }
            contour
        })
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    #[test]
    fn proptest_normalize_closes_every_contour(contour in arb_broken_contour()) {
        let mut shape = Shape::from_contours([contour]);
        shape.normalize();
        prop_assert!(shape.validate());
        for contour in &shape.contours {
            let n = contour.len();
            for i in 0..n {
                let end = contour.edges[i].segment.end();
                let next = contour.edges[(i + 1) % n].segment.start();
                prop_assert!((next - end).norm() <= CLOSE_TOLERANCE);
            }
        }
    }

    #[test]
    fn proptest_normalize_is_stable(contour in arb_broken_contour()) {
        let mut shape = Shape::from_contours([contour]);
        shape.normalize();
        let once = shape.clone();
        let summary = shape.normalize();
        prop_assert!(!summary.changed());
        prop_assert_eq!(shape, once);
    }
}

// =============================================================================
// Orientation and fill
// =============================================================================

proptest! {
    #[test]
    fn proptest_reverse_flips_winding(points in arb_polygon()) {
        let mut contour = Contour::polygon(&points);
        let winding = contour.winding();
        contour.reverse();
        prop_assert_eq!(contour.winding(), -winding);
    }

    #[test]
    fn proptest_closed_contour_winding_vanishes_outside(
        points in arb_polygon(),
        y in -150.0..150.0f64,
    ) {
        let shape = Shape::from_contours([Contour::polygon(&points)]);
        let scanline = shape.scanline(y);
        prop_assert_eq!(scanline.len() % 2, 0);
        prop_assert_eq!(scanline.winding_at(1e9), 0);
        prop_assert!(!scanline.is_filled(-1e9, FillRule::NonZero));
    }

    #[test]
    fn proptest_fill_ignores_orientation_under_nonzero(
        points in arb_polygon(),
        point in arb_point(),
    ) {
        let forward = Shape::from_contours([Contour::polygon(&points)]);
        let mut reversed = forward.clone();
        reversed.contours[0].reverse();
        prop_assert_eq!(forward.is_filled(&point), reversed.is_filled(&point));
    }

    #[test]
    fn proptest_line_distance_is_exact(a in arb_point(), b in arb_point(), q in arb_point()) {
        prop_assume!((b - a).norm() > 1e-3);
        let line = EdgeSegment::line(a, b);
        let (distance, _) = line.signed_distance(&q);
        let sampled = (0..=2000)
            .map(|i| (line.point(f64::from(i) / 2000.0) - q).norm())
            .fold(f64::MAX, f64::min);
        prop_assert!(distance.distance.abs() <= sampled + 1e-9);
        prop_assert!(sampled - distance.distance.abs() <= (b - a).norm() / 2000.0 + 1e-9);
    }
}
