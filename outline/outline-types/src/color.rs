//! Edge color labels.
//!
//! Each edge carries a 3-bit mask selecting which of the red, green and blue
//! output channels it contributes to. Regular edges use a two-channel color
//! (cyan, magenta, yellow) or [`EdgeColor::White`] for all three.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three output channels of a multi-channel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// First channel.
    Red,
    /// Second channel.
    Green,
    /// Third channel.
    Blue,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Bit of this channel in an [`EdgeColor`] mask.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 4,
        }
    }

    /// Index of this channel inside a pixel.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// Channel mask assigned to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum EdgeColor {
    /// No channels.
    Black = 0,
    /// Red only.
    Red = 1,
    /// Green only.
    Green = 2,
    /// Red and green.
    Yellow = 3,
    /// Blue only.
    Blue = 4,
    /// Red and blue.
    Magenta = 5,
    /// Green and blue.
    Cyan = 6,
    /// All channels.
    #[default]
    White = 7,
}

impl EdgeColor {
    /// Rebuild a color from its low three bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Self::Black,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Blue,
            5 => Self::Magenta,
            6 => Self::Cyan,
            _ => Self::White,
        }
    }

    /// The raw channel mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Whether this color includes `channel`.
    #[must_use]
    pub const fn has(self, channel: Channel) -> bool {
        self.bits() & channel.bit() != 0
    }

    /// Channels shared with `other`.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self::from_bits(self.bits() & other.bits())
    }

    /// Channels of `self` absent from `other`, plus those of `other` absent
    /// from `self`.
    #[must_use]
    pub const fn symmetric_difference(self, other: Self) -> Self {
        Self::from_bits(self.bits() ^ other.bits())
    }

    /// The channels this color leaves out.
    #[must_use]
    pub const fn complement(self) -> Self {
        self.symmetric_difference(Self::White)
    }

    /// Number of channels in this color.
    #[must_use]
    pub const fn channel_count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Whether exactly one channel is set.
    #[must_use]
    pub const fn is_single_channel(self) -> bool {
        self.channel_count() == 1
    }

    /// Parse a single color letter (`C`, `M`, `Y`, `W`, case-insensitive).
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'C' | 'c' => Some(Self::Cyan),
            'M' | 'm' => Some(Self::Magenta),
            'Y' | 'y' => Some(Self::Yellow),
            'W' | 'w' => Some(Self::White),
            _ => None,
        }
    }
}
