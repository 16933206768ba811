//! Edge segments: lines, quadratic and cubic Bézier curves.
//!
//! Every segment is parameterized over `t ∈ [0, 1]` and answers the queries
//! the distance kernels need: position, tangent direction, signed distance to
//! a point (with the parameter of the nearest point), conversion of an
//! endpoint distance into a pseudo-distance along the extended tangent, and
//! horizontal scanline crossings for fill-rule evaluation.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::color::EdgeColor;
use crate::distance::SignedDistance;
use crate::math::{
    cross, mix_points, mix_vectors, non_zero_sign, normalize_or, orthonormal, solve_cubic,
    solve_quadratic,
};
use crate::scanline::Crossing;

/// Number of initial guesses for the cubic nearest-point search.
const CUBIC_SEARCH_STARTS: usize = 4;
/// Newton iterations per initial guess.
const CUBIC_SEARCH_STEPS: usize = 4;
/// Subdivisions used when estimating a segment's length.
const LENGTH_PRECISION: usize = 4;

/// A single curve piece of a contour.
///
/// # Example
///
/// ```
/// use outline_types::{EdgeSegment, Point2};
///
/// let line = EdgeSegment::line(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
/// let (distance, param) = line.signed_distance(&Point2::new(1.0, -1.0));
///
/// assert!((distance.distance - 1.0).abs() < 1e-12);
/// assert!((param - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeSegment {
    /// Straight line between two points.
    Linear([Point2<f64>; 2]),
    /// Quadratic Bézier curve.
    Quadratic([Point2<f64>; 3]),
    /// Cubic Bézier curve.
    Cubic([Point2<f64>; 4]),
}

impl EdgeSegment {
    /// Create a line segment.
    #[must_use]
    pub const fn line(p0: Point2<f64>, p1: Point2<f64>) -> Self {
        Self::Linear([p0, p1])
    }

    /// Create a quadratic segment.
    ///
    /// A control point coinciding with an endpoint is moved to the chord
    /// midpoint so the tangent at both ends stays defined.
    #[must_use]
    pub fn quadratic(p0: Point2<f64>, mut p1: Point2<f64>, p2: Point2<f64>) -> Self {
        if p1 == p0 || p1 == p2 {
            p1 = mix_points(&p0, &p2, 0.5);
        }
        Self::Quadratic([p0, p1, p2])
    }

    /// Create a cubic segment.
    ///
    /// When both control points sit on endpoints the curve is a straight line;
    /// the controls are spread along the chord to keep tangents defined.
    #[must_use]
    pub fn cubic(p0: Point2<f64>, mut p1: Point2<f64>, mut p2: Point2<f64>, p3: Point2<f64>) -> Self {
        if (p1 == p0 || p1 == p3) && (p2 == p0 || p2 == p3) {
            p1 = mix_points(&p0, &p3, 1.0 / 3.0);
            p2 = mix_points(&p0, &p3, 2.0 / 3.0);
        }
        Self::Cubic([p0, p1, p2, p3])
    }

    /// Control points, endpoints included.
    #[must_use]
    pub fn control_points(&self) -> &[Point2<f64>] {
        match self {
            Self::Linear(p) => p.as_slice(),
            Self::Quadratic(p) => p.as_slice(),
            Self::Cubic(p) => p.as_slice(),
        }
    }

    fn control_points_mut(&mut self) -> &mut [Point2<f64>] {
        match self {
            Self::Linear(p) => p.as_mut_slice(),
            Self::Quadratic(p) => p.as_mut_slice(),
            Self::Cubic(p) => p.as_mut_slice(),
        }
    }

    /// Point at `t = 0`.
    #[must_use]
    pub fn start(&self) -> Point2<f64> {
        self.control_points()[0]
    }

    /// Point at `t = 1`.
    #[must_use]
    pub fn end(&self) -> Point2<f64> {
        let points = self.control_points();
        points[points.len() - 1]
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn point(&self, t: f64) -> Point2<f64> {
        match self {
            Self::Linear([p0, p1]) => mix_points(p0, p1, t),
            Self::Quadratic([p0, p1, p2]) => {
                mix_points(&mix_points(p0, p1, t), &mix_points(p1, p2, t), t)
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                let p12 = mix_points(p1, p2, t);
                mix_points(
                    &mix_points(&mix_points(p0, p1, t), &p12, t),
                    &mix_points(&p12, &mix_points(p2, p3, t), t),
                    t,
                )
            }
        }
    }

    /// Tangent direction (not normalized) at parameter `t`.
    ///
    /// Where the derivative vanishes at an endpoint the direction towards the
    /// next distinct control point is returned instead.
    #[must_use]
    pub fn direction(&self, t: f64) -> Vector2<f64> {
        match self {
            Self::Linear([p0, p1]) => p1 - p0,
            Self::Quadratic([p0, p1, p2]) => {
                let tangent = mix_vectors(&(p1 - p0), &(p2 - p1), t);
                if tangent == Vector2::zeros() {
                    return p2 - p0;
                }
                tangent
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                let tangent = mix_vectors(
                    &mix_vectors(&(p1 - p0), &(p2 - p1), t),
                    &mix_vectors(&(p2 - p1), &(p3 - p2), t),
                    t,
                );
                if tangent == Vector2::zeros() {
                    if t == 0.0 {
                        return p2 - p0;
                    }
                    if t == 1.0 {
                        return p3 - p1;
                    }
                }
                tangent
            }
        }
    }

    /// Change of the tangent direction at parameter `t`.
    #[must_use]
    pub fn direction_change(&self, t: f64) -> Vector2<f64> {
        match self {
            Self::Linear(_) => Vector2::zeros(),
            Self::Quadratic([p0, p1, p2]) => (p2 - p1) - (p1 - p0),
            Self::Cubic([p0, p1, p2, p3]) => mix_vectors(
                &((p2 - p1) - (p1 - p0)),
                &((p3 - p2) - (p2 - p1)),
                t,
            ),
        }
    }

    /// Signed distance from `origin` to this segment and the parameter of the
    /// nearest point.
    ///
    /// The parameter may fall outside `[0, 1]` when the nearest point is an
    /// endpoint; it then describes the foot of the perpendicular on the
    /// extended tangent, which [`Self::distance_to_pseudo_distance`] uses.
    #[must_use]
    pub fn signed_distance(&self, origin: &Point2<f64>) -> (SignedDistance, f64) {
        match self {
            Self::Linear([p0, p1]) => {
                let aq = origin - p0;
                let ab = p1 - p0;
                let param = aq.dot(&ab) / ab.dot(&ab);
                let eq = (if param > 0.5 { p1 } else { p0 }) - origin;
                let endpoint_distance = eq.norm();
                if param > 0.0 && param < 1.0 {
                    let ortho_distance = orthonormal(&ab, false, false).dot(&aq);
                    if ortho_distance.abs() < endpoint_distance {
                        return (SignedDistance::new(ortho_distance, 0.0), param);
                    }
                }
                let dot = normalize_or(&ab, false)
                    .dot(&normalize_or(&eq, false))
                    .abs();
                (
                    SignedDistance::new(non_zero_sign(cross(&aq, &ab)) * endpoint_distance, dot),
                    param,
                )
            }
            Self::Quadratic([p0, p1, p2]) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = (p2 - p1) - ab;
                let a = br.dot(&br);
                let b = 3.0 * ab.dot(&br);
                let c = 2.0 * ab.dot(&ab) + qa.dot(&br);
                let d = qa.dot(&ab);
                let roots = solve_cubic(a, b, c, d);

                let mut ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(cross(&ep_dir, &qa)) * qa.norm();
                let mut param = -qa.dot(&ep_dir) / ep_dir.dot(&ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    let distance = (p2 - origin).norm();
                    if distance < min_distance.abs() {
                        min_distance = non_zero_sign(cross(&ep_dir, &(p2 - origin))) * distance;
                        param = (origin - p1).dot(&ep_dir) / ep_dir.dot(&ep_dir);
                    }
                }
                for &t in roots.as_slice() {
                    if t > 0.0 && t < 1.0 {
                        let qe = qa + ab * (2.0 * t) + br * (t * t);
                        let distance = qe.norm();
                        if distance <= min_distance.abs() {
                            min_distance = non_zero_sign(cross(&(ab + br * t), &qe)) * distance;
                            param = t;
                        }
                    }
                }
                (self.finish_curve_distance(origin, min_distance, param), param)
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                let qa = p0 - origin;
                let ab = p1 - p0;
                let br = (p2 - p1) - ab;
                let az = ((p3 - p2) - (p2 - p1)) - br;

                let mut ep_dir = self.direction(0.0);
                let mut min_distance = non_zero_sign(cross(&ep_dir, &qa)) * qa.norm();
                let mut param = -qa.dot(&ep_dir) / ep_dir.dot(&ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    let to_end = p3 - origin;
                    let distance = to_end.norm();
                    if distance < min_distance.abs() {
                        min_distance = non_zero_sign(cross(&ep_dir, &to_end)) * distance;
                        param = (ep_dir - to_end).dot(&ep_dir) / ep_dir.dot(&ep_dir);
                    }
                }
                for i in 0..=CUBIC_SEARCH_STARTS {
                    let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
                    let mut qe = qa + ab * (3.0 * t) + br * (3.0 * t * t) + az * (t * t * t);
                    for _ in 0..CUBIC_SEARCH_STEPS {
                        let d1 = ab * 3.0 + br * (6.0 * t) + az * (3.0 * t * t);
                        let d2 = br * 6.0 + az * (6.0 * t);
                        t -= qe.dot(&d1) / (d1.dot(&d1) + qe.dot(&d2));
                        if t <= 0.0 || t >= 1.0 {
                            break;
                        }
                        qe = qa + ab * (3.0 * t) + br * (3.0 * t * t) + az * (t * t * t);
                        let distance = qe.norm();
                        if distance < min_distance.abs() {
                            min_distance = non_zero_sign(cross(&self.direction(t), &qe)) * distance;
                            param = t;
                        }
                    }
                }
                (self.finish_curve_distance(origin, min_distance, param), param)
            }
        }
    }

    fn finish_curve_distance(&self, origin: &Point2<f64>, distance: f64, param: f64) -> SignedDistance {
        if (0.0..=1.0).contains(&param) {
            return SignedDistance::new(distance, 0.0);
        }
        let (t, endpoint) = if param < 0.5 {
            (0.0, self.start())
        } else {
            (1.0, self.end())
        };
        let dot = normalize_or(&self.direction(t), false)
            .dot(&normalize_or(&(endpoint - origin), false))
            .abs();
        SignedDistance::new(distance, dot)
    }

    /// Replace an endpoint distance by the distance to the extended tangent
    /// line when `origin` lies beyond that endpoint.
    pub fn distance_to_pseudo_distance(
        &self,
        distance: &mut SignedDistance,
        origin: &Point2<f64>,
        param: f64,
    ) {
        if param < 0.0 {
            let dir = normalize_or(&self.direction(0.0), false);
            let aq = origin - self.start();
            if aq.dot(&dir) < 0.0 {
                let pseudo_distance = cross(&aq, &dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo_distance, 0.0);
                }
            }
        } else if param > 1.0 {
            let dir = normalize_or(&self.direction(1.0), false);
            let bq = origin - self.end();
            if bq.dot(&dir) > 0.0 {
                let pseudo_distance = cross(&bq, &dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo_distance, 0.0);
                }
            }
        }
    }

    /// Grow `bounds` to enclose this segment.
    pub fn extend_bounds(&self, bounds: &mut Bounds) {
        bounds.include(&self.start());
        bounds.include(&self.end());
        match self {
            Self::Linear(_) => {}
            Self::Quadratic([p0, p1, p2]) => {
                let bot = (p1 - p0) - (p2 - p1);
                for axis in 0..2 {
                    if bot[axis] != 0.0 {
                        let param = (p1[axis] - p0[axis]) / bot[axis];
                        if param > 0.0 && param < 1.0 {
                            bounds.include(&self.point(param));
                        }
                    }
                }
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                let a0 = p1 - p0;
                let a1 = ((p2 - p1) - a0) * 2.0;
                let a2 = p3.coords - p2.coords * 3.0 + p1.coords * 3.0 - p0.coords;
                for axis in 0..2 {
                    for &t in solve_quadratic(a2[axis], a1[axis], a0[axis]).as_slice() {
                        if t > 0.0 && t < 1.0 {
                            bounds.include(&self.point(t));
                        }
                    }
                }
            }
        }
    }

    /// Bounding rectangle of this segment.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        self.extend_bounds(&mut bounds);
        bounds
    }

    /// Polyline estimate of the segment's length.
    #[must_use]
    pub fn approximate_length(&self) -> f64 {
        let mut length = 0.0;
        let mut prev = self.point(0.0);
        for i in 1..=LENGTH_PRECISION {
            let cur = self.point(i as f64 / LENGTH_PRECISION as f64);
            length += (cur - prev).norm();
            prev = cur;
        }
        length
    }

    /// Whether all control points coincide within `tolerance`.
    #[must_use]
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        let start = self.start();
        self.control_points()
            .iter()
            .all(|p| (p - start).norm() <= tolerance)
    }

    /// Reverse the traversal direction.
    pub fn reverse(&mut self) {
        self.control_points_mut().reverse();
    }

    /// Move the start point, adjusting the adjacent control point so the
    /// segment keeps its general shape.
    pub fn move_start_point(&mut self, to: Point2<f64>) {
        match self {
            Self::Linear(p) => p[0] = to,
            Self::Quadratic(p) => {
                let original_dir = p[0] - p[1];
                let original_p1 = p[1];
                let denominator = cross(&(p[0] - p[1]), &(p[2] - p[1]));
                if denominator != 0.0 {
                    let shift = cross(&(p[0] - p[1]), &(to - p[0])) / denominator;
                    p[1] += (p[2] - p[1]) * shift;
                }
                p[0] = to;
                if original_dir.dot(&(p[0] - p[1])) < 0.0 {
                    p[1] = original_p1;
                }
            }
            Self::Cubic(p) => {
                p[1] += to - p[0];
                p[0] = to;
            }
        }
    }

    /// Move the end point, adjusting the adjacent control point so the
    /// segment keeps its general shape.
    pub fn move_end_point(&mut self, to: Point2<f64>) {
        match self {
            Self::Linear(p) => p[1] = to,
            Self::Quadratic(p) => {
                let original_dir = p[2] - p[1];
                let original_p1 = p[1];
                let denominator = cross(&(p[2] - p[1]), &(p[0] - p[1]));
                if denominator != 0.0 {
                    let shift = cross(&(p[2] - p[1]), &(to - p[2])) / denominator;
                    p[1] += (p[0] - p[1]) * shift;
                }
                p[2] = to;
                if original_dir.dot(&(p[2] - p[1])) < 0.0 {
                    p[1] = original_p1;
                }
            }
            Self::Cubic(p) => {
                p[2] += to - p[3];
                p[3] = to;
            }
        }
    }

    /// Split at parameter `t` using de Casteljau's construction.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Linear([p0, p1]) => {
                let m = mix_points(p0, p1, t);
                (Self::Linear([*p0, m]), Self::Linear([m, *p1]))
            }
            Self::Quadratic([p0, p1, p2]) => {
                let p01 = mix_points(p0, p1, t);
                let p12 = mix_points(p1, p2, t);
                let m = mix_points(&p01, &p12, t);
                (Self::Quadratic([*p0, p01, m]), Self::Quadratic([m, p12, *p2]))
            }
            Self::Cubic([p0, p1, p2, p3]) => {
                let p01 = mix_points(p0, p1, t);
                let p12 = mix_points(p1, p2, t);
                let p23 = mix_points(p2, p3, t);
                let p012 = mix_points(&p01, &p12, t);
                let p123 = mix_points(&p12, &p23, t);
                let m = mix_points(&p012, &p123, t);
                (
                    Self::Cubic([*p0, p01, p012, m]),
                    Self::Cubic([m, p123, p23, *p3]),
                )
            }
        }
    }

    /// Split into three pieces of equal parameter span.
    #[must_use]
    pub fn split_in_thirds(&self) -> [Self; 3] {
        let (first, rest) = self.split_at(1.0 / 3.0);
        let (second, third) = rest.split_at(0.5);
        [first, second, third]
    }

    /// Crossings of this segment with the horizontal line at height `y`.
    ///
    /// Each crossing records its x position and whether the segment passes
    /// upward (`+1`) or downward (`-1`). Endpoints are attributed so that a
    /// closed contour produces consistent winding numbers.
    #[must_use]
    pub fn scanline_crossings(&self, y: f64) -> SmallVec<[Crossing; 3]> {
        let mut x = [0.0_f64; 3];
        let mut dy = [0_i32; 3];
        let total = match self {
            Self::Linear([p0, p1]) => {
                if (y >= p0.y && y < p1.y) || (y >= p1.y && y < p0.y) {
                    let param = (y - p0.y) / (p1.y - p0.y);
                    x[0] = p0.x + (p1.x - p0.x) * param;
                    dy[0] = if p1.y > p0.y { 1 } else { -1 };
                    1
                } else {
                    0
                }
            }
            Self::Quadratic(p) => quadratic_crossings(p, y, &mut x, &mut dy),
            Self::Cubic(p) => cubic_crossings(p, y, &mut x, &mut dy),
        };
        (0..total)
            .map(|i| Crossing {
                x: x[i],
                direction: dy[i],
            })
            .collect()
    }
}

fn quadratic_crossings(p: &[Point2<f64>; 3], y: f64, x: &mut [f64; 3], dy: &mut [i32; 3]) -> usize {
    let mut total = 0;
    let mut next_dy = if y > p[0].y { 1 } else { -1 };
    x[total] = p[0].x;
    if p[0].y == y {
        if p[0].y < p[1].y || (p[0].y == p[1].y && p[0].y < p[2].y) {
            dy[total] = 1;
            total += 1;
        } else {
            next_dy = 1;
        }
    }
    {
        let ab = p[1] - p[0];
        let br = (p[2] - p[1]) - ab;
        let roots = solve_quadratic(br.y, 2.0 * ab.y, p[0].y - y).sorted();
        for &t in roots.as_slice() {
            if total >= 2 {
                break;
            }
            if (0.0..=1.0).contains(&t) {
                x[total] = p[0].x + 2.0 * t * ab.x + t * t * br.x;
                if f64::from(next_dy) * (ab.y + t * br.y) >= 0.0 {
                    dy[total] = next_dy;
                    total += 1;
                    next_dy = -next_dy;
                }
            }
        }
    }
    if p[2].y == y {
        if next_dy > 0 && total > 0 {
            total -= 1;
            next_dy = -1;
        }
        if (p[2].y < p[1].y || (p[2].y == p[1].y && p[2].y < p[0].y)) && total < 2 {
            x[total] = p[2].x;
            if next_dy < 0 {
                dy[total] = -1;
                total += 1;
                next_dy = 1;
            }
        }
    }
    if next_dy != if y >= p[2].y { 1 } else { -1 } {
        if total > 0 {
            total -= 1;
        } else {
            if (p[2].y - y).abs() < (p[0].y - y).abs() {
                x[total] = p[2].x;
            }
            dy[total] = next_dy;
            total += 1;
        }
    }
    total
}

fn cubic_crossings(p: &[Point2<f64>; 4], y: f64, x: &mut [f64; 3], dy: &mut [i32; 3]) -> usize {
    let mut total = 0;
    let mut next_dy = if y > p[0].y { 1 } else { -1 };
    x[total] = p[0].x;
    if p[0].y == y {
        if p[0].y < p[1].y
            || (p[0].y == p[1].y && (p[0].y < p[2].y || (p[0].y == p[2].y && p[0].y < p[3].y)))
        {
            dy[total] = 1;
            total += 1;
        } else {
            next_dy = 1;
        }
    }
    {
        let ab = p[1] - p[0];
        let br = (p[2] - p[1]) - ab;
        let az = ((p[3] - p[2]) - (p[2] - p[1])) - br;
        let roots = solve_cubic(az.y, 3.0 * br.y, 3.0 * ab.y, p[0].y - y).sorted();
        for &t in roots.as_slice() {
            if total >= 3 {
                break;
            }
            if (0.0..=1.0).contains(&t) {
                x[total] = p[0].x + 3.0 * t * ab.x + 3.0 * t * t * br.x + t * t * t * az.x;
                if f64::from(next_dy) * (ab.y + 2.0 * t * br.y + t * t * az.y) >= 0.0 {
                    dy[total] = next_dy;
                    total += 1;
                    next_dy = -next_dy;
                }
            }
        }
    }
    if p[3].y == y {
        if next_dy > 0 && total > 0 {
            total -= 1;
            next_dy = -1;
        }
        if (p[3].y < p[2].y
            || (p[3].y == p[2].y && (p[3].y < p[1].y || (p[3].y == p[1].y && p[3].y < p[0].y))))
            && total < 3
        {
            x[total] = p[3].x;
            if next_dy < 0 {
                dy[total] = -1;
                total += 1;
                next_dy = 1;
            }
        }
    }
    if next_dy != if y >= p[3].y { 1 } else { -1 } {
        if total > 0 {
            total -= 1;
        } else {
            if (p[3].y - y).abs() < (p[0].y - y).abs() {
                x[total] = p[3].x;
            }
            dy[total] = next_dy;
            total += 1;
        }
    }
    total
}

/// An edge of a contour: a segment and its channel color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Geometry.
    pub segment: EdgeSegment,
    /// Channels this edge contributes to.
    pub color: EdgeColor,
}

impl Edge {
    /// Create a white edge.
    #[must_use]
    pub const fn new(segment: EdgeSegment) -> Self {
        Self {
            segment,
            color: EdgeColor::White,
        }
    }

    /// Create an edge with an explicit color.
    #[must_use]
    pub const fn with_color(segment: EdgeSegment, color: EdgeColor) -> Self {
        Self { segment, color }
    }
}

impl From<EdgeSegment> for Edge {
    fn from(segment: EdgeSegment) -> Self {
        Self::new(segment)
    }
}
