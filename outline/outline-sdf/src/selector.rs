//! Per-edge distance accumulation.
//!
//! An [`EdgeSelector`] is fed every edge of a contour (with its neighbours)
//! for one sample point and keeps whatever it needs to produce that point's
//! distance: the nearest true distance, the nearest pseudo-distances on each
//! side, or one such set per colour channel.
//!
//! All distances here are internal: positive on the filled side.

use nalgebra::{Point2, Vector2};
use outline_types::math::{cross, median, normalize_or};
use outline_types::{Channel, Edge, EdgeSegment, SignedDistance};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of an edge inside a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeId {
    /// Contour index.
    pub contour: usize,
    /// Edge index within the contour.
    pub edge: usize,
}

impl EdgeId {
    /// Create an edge id.
    #[must_use]
    pub const fn new(contour: usize, edge: usize) -> Self {
        Self { contour, edge }
    }
}

/// Value produced by a selector for one sample point.
pub trait FieldDistance: Copy + Send + Sync + std::fmt::Debug {
    /// Number of stored channels.
    const CHANNELS: usize;

    /// A value farther than any real distance, on the outside.
    fn far() -> Self;

    /// Single scalar used for comparisons (median for multi-channel values).
    fn resolve(&self) -> f64;

    /// Channel `i`, for `i < CHANNELS`.
    fn channel(&self, i: usize) -> f64;

    /// Flip the sign so that it agrees with `filled`, keeping magnitudes.
    /// Colour channels flip together so corners survive.
    fn reconcile(&mut self, filled: bool);
}

fn disagrees(distance: f64, filled: bool) -> bool {
    (filled && distance < 0.0) || (!filled && distance > 0.0)
}

impl FieldDistance for f64 {
    const CHANNELS: usize = 1;

    fn far() -> Self {
        -f64::MAX
    }

    fn resolve(&self) -> f64 {
        *self
    }

    fn channel(&self, _: usize) -> f64 {
        *self
    }

    fn reconcile(&mut self, filled: bool) {
        if disagrees(*self, filled) {
            *self = -*self;
        }
    }
}

/// Three colour-channel distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiDistance {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl FieldDistance for MultiDistance {
    const CHANNELS: usize = 3;

    fn far() -> Self {
        Self {
            r: -f64::MAX,
            g: -f64::MAX,
            b: -f64::MAX,
        }
    }

    fn resolve(&self) -> f64 {
        median(self.r, self.g, self.b)
    }

    fn channel(&self, i: usize) -> f64 {
        match i {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    fn reconcile(&mut self, filled: bool) {
        if disagrees(self.resolve(), filled) {
            self.r = -self.r;
            self.g = -self.g;
            self.b = -self.b;
        }
    }
}

/// Three colour-channel distances plus the true distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiAndTrueDistance {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// True distance over all edges.
    pub a: f64,
}

impl FieldDistance for MultiAndTrueDistance {
    const CHANNELS: usize = 4;

    fn far() -> Self {
        Self {
            r: -f64::MAX,
            g: -f64::MAX,
            b: -f64::MAX,
            a: -f64::MAX,
        }
    }

    fn resolve(&self) -> f64 {
        median(self.r, self.g, self.b)
    }

    fn channel(&self, i: usize) -> f64 {
        match i {
            0 => self.r,
            1 => self.g,
            2 => self.b,
            _ => self.a,
        }
    }

    fn reconcile(&mut self, filled: bool) {
        if disagrees(self.resolve(), filled) {
            self.r = -self.r;
            self.g = -self.g;
            self.b = -self.b;
        }
        if disagrees(self.a, filled) {
            self.a = -self.a;
        }
    }
}

/// Accumulates the distance from one point to a sequence of edges.
pub trait EdgeSelector: Clone + Default + Send + Sync {
    /// Distance type produced.
    type Distance: FieldDistance;

    /// Start over for a new sample point.
    fn reset(&mut self, point: &Point2<f64>);

    /// Account for `edge`, whose neighbours along the contour are `prev` and
    /// `next`.
    fn add_edge(&mut self, prev: &Edge, edge: &Edge, next: &Edge, id: EdgeId);

    /// Fold in another selector reset to the same point.
    fn merge(&mut self, other: &Self);

    /// Resolved distance.
    fn distance(&self) -> Self::Distance;

    /// Nearest true distance seen so far.
    fn true_distance(&self) -> SignedDistance;
}

/// Nearest true distance, ignoring colours.
#[derive(Debug, Clone)]
pub struct TrueDistanceSelector {
    point: Point2<f64>,
    min_distance: SignedDistance,
    near: Option<(EdgeId, f64)>,
}

impl Default for TrueDistanceSelector {
    fn default() -> Self {
        Self {
            point: Point2::origin(),
            min_distance: SignedDistance::INFINITE,
            near: None,
        }
    }
}

impl TrueDistanceSelector {
    /// Edge and parameter of the nearest point, if any edge was added.
    #[must_use]
    pub const fn near_edge(&self) -> Option<(EdgeId, f64)> {
        self.near
    }
}

impl EdgeSelector for TrueDistanceSelector {
    type Distance = f64;

    fn reset(&mut self, point: &Point2<f64>) {
        *self = Self {
            point: *point,
            ..Self::default()
        };
    }

    fn add_edge(&mut self, _prev: &Edge, edge: &Edge, _next: &Edge, id: EdgeId) {
        let (distance, param) = edge.segment.signed_distance(&self.point);
        if distance.is_closer_than(&self.min_distance) {
            self.min_distance = distance;
            self.near = Some((id, param));
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_distance.is_closer_than(&self.min_distance) {
            self.min_distance = other.min_distance;
            self.near = other.near;
        }
    }

    fn distance(&self) -> f64 {
        self.min_distance.distance
    }

    fn true_distance(&self) -> SignedDistance {
        self.min_distance
    }
}

#[derive(Debug, Clone, Copy)]
struct NearEdge {
    id: EdgeId,
    segment: EdgeSegment,
    param: f64,
}

/// Pseudo-distance bookkeeping for one channel.
///
/// Tracks the nearest true distance and its edge, plus the nearest
/// pseudo-distances found on the negative and positive side at edge joints.
#[derive(Debug, Clone)]
pub struct PseudoDistanceBase {
    min_true: SignedDistance,
    min_negative_pseudo: f64,
    min_positive_pseudo: f64,
    near: Option<NearEdge>,
}

impl Default for PseudoDistanceBase {
    fn default() -> Self {
        Self {
            min_true: SignedDistance::INFINITE,
            min_negative_pseudo: -f64::MAX,
            min_positive_pseudo: f64::MAX,
            near: None,
        }
    }
}

/// Distance from a point past an endpoint to the endpoint's tangent line.
/// Replaces `distance` and returns true when that line is nearer.
fn pseudo_distance_past_endpoint(distance: &mut f64, ep: &Vector2<f64>, dir: &Vector2<f64>) -> bool {
    if ep.dot(dir) > 0.0 {
        let pseudo = cross(ep, dir);
        if pseudo.abs() < distance.abs() {
            *distance = pseudo;
            return true;
        }
    }
    false
}

impl PseudoDistanceBase {
    fn add_true_distance(&mut self, id: EdgeId, segment: &EdgeSegment, distance: SignedDistance, param: f64) {
        if distance.is_closer_than(&self.min_true) {
            self.min_true = distance;
            self.near = Some(NearEdge {
                id,
                segment: *segment,
                param,
            });
        }
    }

    fn add_pseudo_distance(&mut self, distance: f64) {
        if distance <= 0.0 && distance > self.min_negative_pseudo {
            self.min_negative_pseudo = distance;
        } else if distance >= 0.0 && distance < self.min_positive_pseudo {
            self.min_positive_pseudo = distance;
        }
    }

    fn merge(&mut self, other: &Self) {
        if other.min_true.is_closer_than(&self.min_true) {
            self.min_true = other.min_true;
            self.near = other.near;
        }
        if other.min_negative_pseudo > self.min_negative_pseudo {
            self.min_negative_pseudo = other.min_negative_pseudo;
        }
        if other.min_positive_pseudo < self.min_positive_pseudo {
            self.min_positive_pseudo = other.min_positive_pseudo;
        }
    }

    /// Pseudo-distance from `point` for this channel.
    #[must_use]
    pub fn compute_distance(&self, point: &Point2<f64>) -> f64 {
        let mut min_distance = if self.min_true.distance < 0.0 {
            self.min_negative_pseudo
        } else {
            self.min_positive_pseudo
        };
        if let Some(near) = &self.near {
            let mut distance = self.min_true;
            near.segment
                .distance_to_pseudo_distance(&mut distance, point, near.param);
            if distance.distance.abs() < min_distance.abs() {
                min_distance = distance.distance;
            }
        }
        min_distance
    }

    /// Nearest true distance for this channel.
    #[must_use]
    pub const fn true_distance(&self) -> SignedDistance {
        self.min_true
    }

    /// Edge and parameter of the nearest point, if any edge was added.
    #[must_use]
    pub fn near_edge(&self) -> Option<(EdgeId, f64)> {
        self.near.map(|near| (near.id, near.param))
    }
}

/// Directions needed to decide whether a point lies past an edge's joints.
struct JointFrame {
    ap: Vector2<f64>,
    bp: Vector2<f64>,
    a_dir: Vector2<f64>,
    b_dir: Vector2<f64>,
    /// Positive when the point is on this edge's side of the start joint's
    /// bisector.
    a_domain: f64,
    /// Positive when the point is on this edge's side of the end joint's
    /// bisector.
    b_domain: f64,
}

impl JointFrame {
    fn new(point: &Point2<f64>, prev: &Edge, edge: &Edge, next: &Edge) -> Self {
        let segment = &edge.segment;
        let ap = point - segment.start();
        let bp = point - segment.end();
        let a_dir = normalize_or(&segment.direction(0.0), true);
        let b_dir = normalize_or(&segment.direction(1.0), true);
        let prev_dir = normalize_or(&prev.segment.direction(1.0), true);
        let next_dir = normalize_or(&next.segment.direction(0.0), true);
        let a_domain = ap.dot(&normalize_or(&(prev_dir + a_dir), true));
        let b_domain = -bp.dot(&normalize_or(&(b_dir + next_dir), true));
        Self {
            ap,
            bp,
            a_dir,
            b_dir,
            a_domain,
            b_domain,
        }
    }

    /// Pseudo-distances past the start and end joints, if any.
    fn pseudo_distances(&self, distance: f64) -> [Option<f64>; 2] {
        let mut out = [None, None];
        if self.a_domain > 0.0 {
            let mut pd = distance;
            if pseudo_distance_past_endpoint(&mut pd, &self.ap, &-self.a_dir) {
                out[0] = Some(-pd);
            }
        }
        if self.b_domain > 0.0 {
            let mut pd = distance;
            if pseudo_distance_past_endpoint(&mut pd, &self.bp, &self.b_dir) {
                out[1] = Some(pd);
            }
        }
        out
    }
}

/// Single-channel pseudo-distance over all edges.
#[derive(Debug, Clone)]
pub struct PseudoDistanceSelector {
    point: Point2<f64>,
    base: PseudoDistanceBase,
}

impl Default for PseudoDistanceSelector {
    fn default() -> Self {
        Self {
            point: Point2::origin(),
            base: PseudoDistanceBase::default(),
        }
    }
}

impl PseudoDistanceSelector {
    /// Accumulated state.
    #[must_use]
    pub const fn base(&self) -> &PseudoDistanceBase {
        &self.base
    }
}

impl EdgeSelector for PseudoDistanceSelector {
    type Distance = f64;

    fn reset(&mut self, point: &Point2<f64>) {
        self.point = *point;
        self.base = PseudoDistanceBase::default();
    }

    fn add_edge(&mut self, prev: &Edge, edge: &Edge, next: &Edge, id: EdgeId) {
        let (distance, param) = edge.segment.signed_distance(&self.point);
        self.base.add_true_distance(id, &edge.segment, distance, param);
        let joints = JointFrame::new(&self.point, prev, edge, next);
        for pd in joints.pseudo_distances(distance.distance).into_iter().flatten() {
            self.base.add_pseudo_distance(pd);
        }
    }

    fn merge(&mut self, other: &Self) {
        self.base.merge(&other.base);
    }

    fn distance(&self) -> f64 {
        self.base.compute_distance(&self.point)
    }

    fn true_distance(&self) -> SignedDistance {
        self.base.min_true
    }
}

/// Per-channel pseudo-distance, each channel seeing only edges whose colour
/// includes it.
#[derive(Debug, Clone)]
pub struct MultiDistanceSelector {
    point: Point2<f64>,
    channels: [PseudoDistanceBase; 3],
}

impl Default for MultiDistanceSelector {
    fn default() -> Self {
        Self {
            point: Point2::origin(),
            channels: Default::default(),
        }
    }
}

impl MultiDistanceSelector {
    /// Accumulated state of one channel.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &PseudoDistanceBase {
        &self.channels[channel.index()]
    }

    fn multi_distance(&self) -> MultiDistance {
        MultiDistance {
            r: self.channels[0].compute_distance(&self.point),
            g: self.channels[1].compute_distance(&self.point),
            b: self.channels[2].compute_distance(&self.point),
        }
    }
}

impl EdgeSelector for MultiDistanceSelector {
    type Distance = MultiDistance;

    fn reset(&mut self, point: &Point2<f64>) {
        self.point = *point;
        self.channels = Default::default();
    }

    fn add_edge(&mut self, prev: &Edge, edge: &Edge, next: &Edge, id: EdgeId) {
        if edge.color.bits() == 0 {
            return;
        }
        let (distance, param) = edge.segment.signed_distance(&self.point);
        let joints = JointFrame::new(&self.point, prev, edge, next);
        let pseudo = joints.pseudo_distances(distance.distance);
        for channel in Channel::ALL {
            if !edge.color.has(channel) {
                continue;
            }
            let base = &mut self.channels[channel.index()];
            base.add_true_distance(id, &edge.segment, distance, param);
            for &pd in pseudo.iter().flatten() {
                base.add_pseudo_distance(pd);
            }
        }
    }

    fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.channels.iter_mut().zip(&other.channels) {
            mine.merge(theirs);
        }
    }

    fn distance(&self) -> MultiDistance {
        self.multi_distance()
    }

    fn true_distance(&self) -> SignedDistance {
        let mut distance = self.channels[0].min_true;
        for channel in &self.channels[1..] {
            if channel.min_true.is_closer_than(&distance) {
                distance = channel.min_true;
            }
        }
        distance
    }
}

/// [`MultiDistanceSelector`] plus the true distance in a fourth channel.
#[derive(Debug, Clone, Default)]
pub struct MultiAndTrueDistanceSelector {
    inner: MultiDistanceSelector,
}

impl MultiAndTrueDistanceSelector {
    /// Accumulated state of one colour channel.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &PseudoDistanceBase {
        self.inner.channel(channel)
    }
}

impl EdgeSelector for MultiAndTrueDistanceSelector {
    type Distance = MultiAndTrueDistance;

    fn reset(&mut self, point: &Point2<f64>) {
        self.inner.reset(point);
    }

    fn add_edge(&mut self, prev: &Edge, edge: &Edge, next: &Edge, id: EdgeId) {
        self.inner.add_edge(prev, edge, next, id);
    }

    fn merge(&mut self, other: &Self) {
        self.inner.merge(&other.inner);
    }

    fn distance(&self) -> MultiAndTrueDistance {
        let multi = self.inner.multi_distance();
        MultiAndTrueDistance {
            r: multi.r,
            g: multi.g,
            b: multi.b,
            a: self.inner.true_distance().distance,
        }
    }

    fn true_distance(&self) -> SignedDistance {
        self.inner.true_distance()
    }
}
