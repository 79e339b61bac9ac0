//! Map positions and the 8 compass directions around a tile

use serde::{Deserialize, Serialize};

/// A tile position on the map (x, y, floor)
///
/// Ordering is only provided so positions can live in ordered sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position one step away in `direction` on the same floor
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// All 8 surrounding positions, in [`Direction::ALL`] order
    pub fn neighbors(&self) -> [Position; 8] {
        Direction::ALL.map(|d| self.neighbor(d))
    }
}

/// One of the 8 neighbor directions of a tile
///
/// The discriminant is the bit index used in alignment bitmasks:
///   0|1|2
///   3|X|4
///   5|6|7
/// North is `y - 1`, west is `x - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    West = 3,
    East = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
}

impl Direction {
    /// All directions in bit order
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Bit index within an alignment bitmask
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this direction
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Grid offset (dx, dy)
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
