//! Combining per-contour selectors into one shape distance.

use nalgebra::Point2;

use crate::selector::{EdgeSelector, FieldDistance};

/// Decides how the selectors of individual contours form the shape's
/// distance.
pub trait ContourCombiner<S: EdgeSelector>: Clone + Send + Sync {
    /// Create a combiner for contours with the given windings.
    fn new(windings: &[i32]) -> Self;

    /// Start over for a new sample point.
    fn reset(&mut self, point: &Point2<f64>);

    /// Selector that receives the edges of `contour`.
    fn selector_mut(&mut self, contour: usize) -> &mut S;

    /// The selector whose distance is the shape's distance.
    fn resolve(&self) -> S;
}

/// Treat all contours as one edge set: the nearest edge wins.
#[derive(Debug, Clone)]
pub struct SimpleContourCombiner<S> {
    selector: S,
}

impl<S: EdgeSelector> ContourCombiner<S> for SimpleContourCombiner<S> {
    fn new(_windings: &[i32]) -> Self {
        Self {
            selector: S::default(),
        }
    }

    fn reset(&mut self, point: &Point2<f64>) {
        self.selector.reset(point);
    }

    fn selector_mut(&mut self, _contour: usize) -> &mut S {
        &mut self.selector
    }

    fn resolve(&self) -> S {
        self.selector.clone()
    }
}

/// Resolve overlapping contours by their winding.
///
/// The nearest edge of a contour that is itself covered by another contour
/// does not bound the filled region. Distances from clockwise contours that
/// read as inside are merged separately from counter-clockwise contours that
/// read as outside, and the nearer side decides which contour distances may
/// contribute.
#[derive(Debug, Clone)]
pub struct OverlappingContourCombiner<S> {
    point: Point2<f64>,
    windings: Vec<i32>,
    selectors: Vec<S>,
}

impl<S: EdgeSelector> OverlappingContourCombiner<S> {
    fn fresh(&self) -> S {
        let mut selector = S::default();
        selector.reset(&self.point);
        selector
    }
}

impl<S: EdgeSelector> ContourCombiner<S> for OverlappingContourCombiner<S> {
    fn new(windings: &[i32]) -> Self {
        Self {
            point: Point2::origin(),
            windings: windings.to_vec(),
            selectors: vec![S::default(); windings.len()],
        }
    }

    fn reset(&mut self, point: &Point2<f64>) {
        self.point = *point;
        for selector in &mut self.selectors {
            selector.reset(point);
        }
    }

    fn selector_mut(&mut self, contour: usize) -> &mut S {
        &mut self.selectors[contour]
    }

    fn resolve(&self) -> S {
        let mut shape = self.fresh();
        let mut inner = self.fresh();
        let mut outer = self.fresh();
        let distances: Vec<f64> = self
            .selectors
            .iter()
            .map(|s| s.distance().resolve())
            .collect();

        for ((selector, &winding), &d) in self.selectors.iter().zip(&self.windings).zip(&distances) {
            shape.merge(selector);
            if winding > 0 && d >= 0.0 {
                inner.merge(selector);
            }
            if winding < 0 && d <= 0.0 {
                outer.merge(selector);
            }
        }

        let shape_scalar = shape.distance().resolve();
        let inner_scalar = inner.distance().resolve();
        let outer_scalar = outer.distance().resolve();

        let (mut best, mut best_scalar, winding) =
            if inner_scalar >= 0.0 && inner_scalar.abs() <= outer_scalar.abs() {
                let mut best = inner;
                let mut best_scalar = inner_scalar;
                for (i, &d) in distances.iter().enumerate() {
                    if self.windings[i] > 0 && d.abs() < outer_scalar.abs() && d > best_scalar {
                        best = self.selectors[i].clone();
                        best_scalar = d;
                    }
                }
                (best, best_scalar, 1)
            } else if outer_scalar <= 0.0 && outer_scalar.abs() < inner_scalar.abs() {
                let mut best = outer;
                let mut best_scalar = outer_scalar;
                for (i, &d) in distances.iter().enumerate() {
                    if self.windings[i] < 0 && d.abs() < inner_scalar.abs() && d < best_scalar {
                        best = self.selectors[i].clone();
                        best_scalar = d;
                    }
                }
                (best, best_scalar, -1)
            } else {
                return shape;
            };

        for (i, &d) in distances.iter().enumerate() {
            if self.windings[i] != winding && d * best_scalar >= 0.0 && d.abs() < best_scalar.abs() {
                best = self.selectors[i].clone();
                best_scalar = d;
            }
        }

        if best_scalar == shape_scalar {
            return shape;
        }
        best
    }
}
