//! Horizontal scanlines and fill rules.
//!
//! A [`Scanline`] collects every crossing of a shape's edges with one
//! horizontal line and answers inside/outside queries along it, which is the
//! ground truth the sign correction passes compare against.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rule deciding whether a winding number counts as filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FillRule {
    /// Filled where the winding number is non-zero.
    #[default]
    NonZero,
    /// Filled where the winding number is odd (even-odd rule).
    Odd,
    /// Filled where the winding number is positive.
    Positive,
    /// Filled where the winding number is negative.
    Negative,
}

impl FillRule {
    /// Whether `winding` counts as inside.
    #[must_use]
    pub const fn is_filled(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::Odd => winding & 1 != 0,
            Self::Positive => winding > 0,
            Self::Negative => winding < 0,
        }
    }
}

/// A single crossing of an edge with a scanline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Horizontal position of the crossing.
    pub x: f64,
    /// `+1` where the edge passes upward, `-1` where it passes downward.
    pub direction: i32,
}

/// All edge crossings of one horizontal line, sorted by x.
///
/// # Example
///
/// ```
/// use outline_types::{Crossing, FillRule, Scanline};
///
/// let scanline = Scanline::from_crossings(vec![
///     Crossing { x: 1.0, direction: 1 },
///     Crossing { x: 3.0, direction: -1 },
/// ]);
///
/// assert!(!scanline.is_filled(0.5, FillRule::NonZero));
/// assert!(scanline.is_filled(2.0, FillRule::NonZero));
/// assert!(!scanline.is_filled(3.5, FillRule::NonZero));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scanline {
    /// Crossings sorted by x; `direction` holds the running winding sum.
    crossings: Vec<Crossing>,
}

impl Scanline {
    /// Build a scanline from unordered crossings.
    #[must_use]
    pub fn from_crossings(mut crossings: Vec<Crossing>) -> Self {
        crossings.sort_by(|a, b| a.x.total_cmp(&b.x));
        let mut sum = 0;
        for crossing in &mut crossings {
            sum += crossing.direction;
            crossing.direction = sum;
        }
        Self { crossings }
    }

    /// Number of crossings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    /// Whether the line misses the shape entirely.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// Winding number at horizontal position `x`.
    #[must_use]
    pub fn winding_at(&self, x: f64) -> i32 {
        let passed = self.crossings.partition_point(|c| c.x <= x);
        if passed == 0 {
            0
        } else {
            self.crossings[passed - 1].direction
        }
    }

    /// Number of crossings at or left of `x`.
    #[must_use]
    pub fn crossings_before(&self, x: f64) -> usize {
        self.crossings.partition_point(|c| c.x <= x)
    }

    /// Whether `x` is inside the shape under `rule`.
    #[must_use]
    pub fn is_filled(&self, x: f64, rule: FillRule) -> bool {
        rule.is_filled(self.winding_at(x))
    }
}
