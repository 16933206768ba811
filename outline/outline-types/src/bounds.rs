//! Axis-aligned bounding rectangle.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its left, bottom, right and top sides.
///
/// # Example
///
/// ```
/// use outline_types::{Bounds, Point2};
///
/// let mut bounds = Bounds::empty();
/// assert!(bounds.is_empty());
///
/// bounds.include(&Point2::new(1.0, 2.0));
/// bounds.include(&Point2::new(-1.0, 4.0));
/// assert_eq!(bounds.width(), 2.0);
/// assert_eq!(bounds.height(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Smallest x.
    pub left: f64,
    /// Smallest y.
    pub bottom: f64,
    /// Largest x.
    pub right: f64,
    /// Largest y.
    pub top: f64,
}

impl Bounds {
    /// Create bounds from explicit sides.
    #[must_use]
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Inverted bounds that any included point will replace.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            left: f64::MAX,
            bottom: f64::MAX,
            right: -f64::MAX,
            top: -f64::MAX,
        }
    }

    /// The unit square `[0, 1] × [0, 1]`.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Whether no point has been included yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }

    /// Whether the rectangle has zero or negative extent on either axis.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.left >= self.right || self.bottom >= self.top
    }

    /// Grow to include a point.
    pub fn include(&mut self, point: &Point2<f64>) {
        self.left = self.left.min(point.x);
        self.bottom = self.bottom.min(point.y);
        self.right = self.right.max(point.x);
        self.top = self.top.max(point.y);
    }

    /// Grow to include another rectangle.
    pub fn union(&mut self, other: &Self) {
        self.left = self.left.min(other.left);
        self.bottom = self.bottom.min(other.bottom);
        self.right = self.right.max(other.right);
        self.top = self.top.max(other.top);
    }

    /// Grow every side outward by `margin`.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.bottom - margin,
            self.right + margin,
            self.top + margin,
        )
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Extent as a vector.
    #[must_use]
    pub fn size(&self) -> Vector2<f64> {
        Vector2::new(self.width(), self.height())
    }

    /// Lower-left corner.
    #[must_use]
    pub fn min(&self) -> Point2<f64> {
        Point2::new(self.left, self.bottom)
    }

    /// Whether a point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_included() {
        let mut bounds = Bounds::empty();
        assert!(bounds.is_empty());
        bounds.include(&Point2::new(3.0, 3.0));
        assert!(!bounds.is_empty());
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn union_and_expand() {
        let mut a = Bounds::new(0.0, 0.0, 1.0, 1.0);
        a.union(&Bounds::new(-1.0, 0.5, 0.5, 2.0));
        assert_eq!(a, Bounds::new(-1.0, 0.0, 1.0, 2.0));
        let grown = a.expanded(0.5);
        assert_eq!(grown.width(), 3.0);
        assert!(grown.contains(&Point2::new(-1.5, -0.5)));
    }
}
