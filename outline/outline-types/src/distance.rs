//! Signed distance with a tie-breaking key.

use std::cmp::Ordering;

/// Signed distance from a point to an edge.
///
/// `distance` is positive on the filled side of the edge (to the right of its
/// direction). `dot` is the absolute cosine between the edge tangent and the
/// direction towards the point at the nearest endpoint; it breaks ties between
/// edges that meet at a shared endpoint, preferring the edge the point lies
/// more squarely in front of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDistance {
    /// Signed distance value.
    pub distance: f64,
    /// Tie-breaking key (lower is closer).
    pub dot: f64,
}

impl SignedDistance {
    /// A distance farther than any real one.
    pub const INFINITE: Self = Self {
        distance: -f64::MAX,
        dot: 1.0,
    };

    /// Create a new signed distance.
    #[must_use]
    pub const fn new(distance: f64, dot: f64) -> Self {
        Self { distance, dot }
    }

    /// Whether `self` is strictly closer than `other`.
    #[must_use]
    pub fn is_closer_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// Order by absolute distance, then by `dot`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let a = self.distance.abs();
        let b = other.distance.abs();
        if a < b || (a == b && self.dot < other.dot) {
            Ordering::Less
        } else if a == b && self.dot == other.dot {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_by_magnitude() {
        let near = SignedDistance::new(-1.0, 0.5);
        let far = SignedDistance::new(2.0, 0.0);
        assert!(near.is_closer_than(&far));
        assert!(!far.is_closer_than(&near));
    }

    #[test]
    fn ties_broken_by_dot() {
        let square = SignedDistance::new(1.0, 0.0);
        let oblique = SignedDistance::new(-1.0, 0.7);
        assert!(square.is_closer_than(&oblique));
    }

    #[test]
    fn infinite_is_farthest() {
        assert!(SignedDistance::new(1e300, 1.0).is_closer_than(&SignedDistance::INFINITE));
    }
}
