//! Shape distance queries.
//!
//! [`ShapeDistanceFinder`] feeds every usable edge of a shape to a
//! [`ContourCombiner`] for each query point. The free functions at the bottom
//! are the public sampler: one-off queries that report distances with
//! filled points negative, with the sign settled by the shape's fill rule.

use std::marker::PhantomData;

use nalgebra::Point2;
use outline_types::{Contour, DEGENERATE_TOLERANCE, Edge, EdgeColor, Shape};

use crate::combiner::{ContourCombiner, SimpleContourCombiner};
use crate::selector::{
    EdgeId, EdgeSelector, FieldDistance, MultiDistanceSelector, PseudoDistanceSelector,
    TrueDistanceSelector,
};

/// Whether an edge can take part in distance queries. Degenerate or
/// non-finite edges are skipped instead of poisoning the result.
fn is_usable(edge: &Edge) -> bool {
    edge.segment
        .control_points()
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite())
        && !edge.segment.is_degenerate(DEGENERATE_TOLERANCE)
}

/// Reusable distance query over one shape.
///
/// Holds a copy of the usable edges and one combiner; create one per worker
/// thread.
#[derive(Debug, Clone)]
pub struct ShapeDistanceFinder<S, C> {
    contours: Vec<Vec<(EdgeId, Edge)>>,
    combiner: C,
    selector: PhantomData<S>,
}

impl<S: EdgeSelector, C: ContourCombiner<S>> ShapeDistanceFinder<S, C> {
    /// Prepare queries against `shape`.
    #[must_use]
    pub fn new(shape: &Shape) -> Self {
        let windings: Vec<i32> = shape.contours.iter().map(Contour::winding).collect();
        let contours = shape
            .contours
            .iter()
            .enumerate()
            .map(|(ci, contour)| {
                contour
                    .edges
                    .iter()
                    .enumerate()
                    .filter(|(_, edge)| is_usable(edge))
                    .map(|(ei, edge)| (EdgeId::new(ci, ei), *edge))
                    .collect()
            })
            .collect();
        Self {
            contours,
            combiner: C::new(&windings),
            selector: PhantomData,
        }
    }

    /// The resolved selector for `point`.
    pub fn selector_at(&mut self, point: &Point2<f64>) -> S {
        self.combiner.reset(point);
        for (ci, edges) in self.contours.iter().enumerate() {
            let n = edges.len();
            if n == 0 {
                continue;
            }
            let selector = self.combiner.selector_mut(ci);
            let mut prev = if n >= 2 { &edges[n - 2].1 } else { &edges[0].1 };
            let mut cur = &edges[n - 1];
            for next in edges {
                selector.add_edge(prev, &cur.1, &next.1, cur.0);
                prev = &cur.1;
                cur = next;
            }
        }
        self.combiner.resolve()
    }

    /// Distance at `point`, positive on the filled side by local sign.
    pub fn distance(&mut self, point: &Point2<f64>) -> S::Distance {
        self.selector_at(point).distance()
    }
}

/// Run `$body` with `$finder` bound to a finder of the given selector, using
/// the overlapping combiner when `$overlap` is set.
macro_rules! with_finder {
    ($shape:expr, $selector:ty, $overlap:expr, |$finder:ident| $body:expr) => {
        if $overlap {
            let mut $finder = $crate::finder::ShapeDistanceFinder::<
                $selector,
                $crate::combiner::OverlappingContourCombiner<$selector>,
            >::new($shape);
            $body
        } else {
            let mut $finder = $crate::finder::ShapeDistanceFinder::<
                $selector,
                $crate::combiner::SimpleContourCombiner<$selector>,
            >::new($shape);
            $body
        }
    };
}

/// Nearest-edge result for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    /// Signed distance in shape units, negative on the filled side.
    pub distance: f64,
    /// Curve parameter of the nearest point on the contributing edge. May
    /// fall outside `[0, 1]` when the nearest point is an endpoint.
    pub param: f64,
    /// Edge that produced the distance.
    pub edge: EdgeId,
}

/// Per-channel pseudo-distance from `point` to `shape`.
///
/// Each requested channel (a channel whose bit is set in `mask`) considers
/// only edges whose colour includes it; channels with no such edges, and
/// channels outside `mask`, are `None`. The sign comes from the shape's fill
/// rule: the colour channels are negated together whenever their median
/// disagrees with it.
///
/// # Example
///
/// ```
/// use outline_sdf::distance_at;
/// use outline_types::{Contour, EdgeColor, Point2, Shape};
///
/// let shape = Shape::from_contours([Contour::polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(0.0, 4.0),
///     Point2::new(4.0, 4.0),
///     Point2::new(4.0, 0.0),
/// ])]);
///
/// let samples = distance_at(&shape, &Point2::new(1.0, 2.0), EdgeColor::White, false);
/// let red = samples[0].unwrap();
/// assert!((red.distance + 1.0).abs() < 1e-12);
/// assert_eq!(red.edge.edge, 0);
/// ```
#[must_use]
pub fn distance_at(
    shape: &Shape,
    point: &Point2<f64>,
    mask: EdgeColor,
    overlap_support: bool,
) -> [Option<DistanceSample>; 3] {
    let selector: MultiDistanceSelector = with_finder!(shape, MultiDistanceSelector, overlap_support, |finder| {
        finder.selector_at(point)
    });
    let mut distance = selector.distance();
    distance.reconcile(shape.is_filled(point));

    std::array::from_fn(|i| {
        let channel = outline_types::Channel::ALL[i];
        if !mask.has(channel) {
            return None;
        }
        let (edge, param) = selector.channel(channel).near_edge()?;
        Some(DistanceSample {
            distance: -distance.channel(i),
            param,
            edge,
        })
    })
}

/// Single-channel pseudo-distance from `point` to `shape` over all edges,
/// negative on the filled side.
#[must_use]
pub fn pseudo_distance_at(shape: &Shape, point: &Point2<f64>, overlap_support: bool) -> Option<DistanceSample> {
    let selector: PseudoDistanceSelector =
        with_finder!(shape, PseudoDistanceSelector, overlap_support, |finder| {
            finder.selector_at(point)
        });
    let (edge, param) = selector.base().near_edge()?;
    let mut distance = selector.distance();
    distance.reconcile(shape.is_filled(point));
    Some(DistanceSample {
        distance: -distance,
        param,
        edge,
    })
}

/// Euclidean distance from `point` to `shape`, negative on the filled side.
#[must_use]
pub fn true_distance_at(shape: &Shape, point: &Point2<f64>, overlap_support: bool) -> Option<DistanceSample> {
    let selector: TrueDistanceSelector =
        with_finder!(shape, TrueDistanceSelector, overlap_support, |finder| {
            finder.selector_at(point)
        });
    let (edge, param) = selector.near_edge()?;
    let mut distance = selector.distance();
    distance.reconcile(shape.is_filled(point));
    Some(DistanceSample {
        distance: -distance,
        param,
        edge,
    })
}

/// True distance from `point` to the nearest edge with the sign taken from
/// that edge alone: positive to the right of its direction. No fill-rule
/// evaluation is done, so this reveals the orientation the contours were
/// drawn in.
#[must_use]
pub fn one_shot_distance(shape: &Shape, point: &Point2<f64>) -> f64 {
    ShapeDistanceFinder::<TrueDistanceSelector, SimpleContourCombiner<TrueDistanceSelector>>::new(shape)
        .distance(point)
}
