//! Coloring configuration and strategy dispatch.

use std::fmt;

use outline_types::Shape;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ink_trap::color_edges_ink_trap;
use crate::simple::color_edges_simple;

/// Default corner angle threshold in radians.
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 3.0;

/// Edge coloring heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColoringStrategy {
    /// Rotate colors at every corner.
    #[default]
    Simple,
    /// Like `Simple`, but corners in front of short notches take a color
    /// compatible with both neighbours.
    InkTrap,
}

impl ColoringStrategy {
    /// Look a strategy up by name (`"simple"`, `"inktrap"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "inktrap" | "ink-trap" | "ink_trap" => Some(Self::InkTrap),
            _ => None,
        }
    }

    /// Canonical name of the strategy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::InkTrap => "inktrap",
        }
    }
}

impl fmt::Display for ColoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for [`color_edges`].
///
/// # Example
///
/// ```
/// use outline_coloring::{ColoringConfig, ColoringStrategy};
///
/// let config = ColoringConfig::ink_trap().with_seed(7);
/// assert_eq!(config.strategy, ColoringStrategy::InkTrap);
/// assert_eq!(config.angle_threshold, 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColoringConfig {
    /// Heuristic to use.
    pub strategy: ColoringStrategy,
    /// Joins turning by more than this angle (radians) are corners.
    ///
    /// Default: 3.0
    pub angle_threshold: f64,
    /// Entropy for choosing among equally valid colors.
    ///
    /// Default: 0
    pub seed: u64,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            strategy: ColoringStrategy::Simple,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            seed: 0,
        }
    }
}

impl ColoringConfig {
    /// Defaults with the ink-trap strategy.
    #[must_use]
    pub fn ink_trap() -> Self {
        Self {
            strategy: ColoringStrategy::InkTrap,
            ..Default::default()
        }
    }

    /// Set the strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ColoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the corner angle threshold in radians.
    #[must_use]
    pub const fn with_angle_threshold(mut self, angle_threshold: f64) -> Self {
        self.angle_threshold = angle_threshold;
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Counts gathered while coloring a shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColoringSummary {
    /// Contours visited.
    pub contour_count: usize,
    /// Corners detected across all contours.
    pub corner_count: usize,
    /// Contours without corners (colored white).
    pub smooth_contours: usize,
    /// Contours with exactly one corner.
    pub teardrop_contours: usize,
    /// Corners treated as ink-trap notches.
    pub minor_corner_count: usize,
}

impl ColoringSummary {
    pub(crate) fn record(&mut self, corners: usize) {
        self.contour_count += 1;
        self.corner_count += corners;
        match corners {
            0 => self.smooth_contours += 1,
            1 => self.teardrop_contours += 1,
            _ => {}
        }
    }
}

/// Color the edges of `shape` with the configured strategy.
pub fn color_edges(shape: &mut Shape, config: &ColoringConfig) -> ColoringSummary {
    let summary = match config.strategy {
        ColoringStrategy::Simple => color_edges_simple(shape, config.angle_threshold, config.seed),
        ColoringStrategy::InkTrap => {
            color_edges_ink_trap(shape, config.angle_threshold, config.seed)
        }
    };
    debug!(
        strategy = %config.strategy,
        contours = summary.contour_count,
        corners = summary.corner_count,
        minor = summary.minor_corner_count,
        "Colored edges"
    );
    summary
}
