use crate::error::Error;
use std::convert::TryFrom;
use std::ops::Not;

/// Represent a color.  `White` is side (and player) 0, `Black` is side 1.
#[derive(PartialOrd, PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    White,
    Black,
}

/// How many colors are there?
pub const NUM_COLORS: usize = 2;
/// List all colors
pub const ALL_COLORS: [Color; NUM_COLORS] = [Color::White, Color::Black];

impl Color {
    /// Convert the `Color` to a `usize` for table lookups.  This is also the player id.
    #[inline]
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// Convert a player id into a `Color`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Color> {
        match i {
            0 => Some(Color::White),
            1 => Some(Color::Black),
            _ => None,
        }
    }

    /// The rank index my pieces start on.
    #[inline]
    pub fn to_my_backrank(&self) -> u8 {
        match *self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// The rank index my pawns start on.
    #[inline]
    pub fn to_second_rank(&self) -> u8 {
        match *self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Which way is "forward" for my pawns, in ranks.
    #[inline]
    pub fn pawn_direction(&self) -> i8 {
        match *self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The byte a color is saved as: 0 for White, 1 for Black.
    #[inline]
    pub fn to_tag(&self) -> u8 {
        *self as u8
    }
}

impl Not for Color {
    type Output = Color;

    /// Get the other color.
    #[inline]
    fn not(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl TryFrom<u32> for Color {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Color::from_index(id as usize).ok_or(Error::InvalidPlayerId { id })
    }
}
