//! Border piece slots (edges, corners, diagonals)

use serde::{Deserialize, Serialize};

/// One of the 12 border piece slots of a border rule set
///
/// Discriminants are the packed piece codes; code 0 means "no piece".
/// Corners are the small pieces used when only a diagonal neighbor differs,
/// diagonals cover two orthogonal neighbors at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    North = 1,
    East = 2,
    South = 3,
    West = 4,
    CornerNorthWest = 5,
    CornerNorthEast = 6,
    CornerSouthWest = 7,
    CornerSouthEast = 8,
    DiagonalNorthWest = 9,
    DiagonalNorthEast = 10,
    DiagonalSouthEast = 11,
    DiagonalSouthWest = 12,
}

impl Edge {
    pub const COUNT: usize = 12;

    /// All edges in code order
    pub const ALL: [Edge; 12] = [
        Edge::North,
        Edge::East,
        Edge::South,
        Edge::West,
        Edge::CornerNorthWest,
        Edge::CornerNorthEast,
        Edge::CornerSouthWest,
        Edge::CornerSouthEast,
        Edge::DiagonalNorthWest,
        Edge::DiagonalNorthEast,
        Edge::DiagonalSouthEast,
        Edge::DiagonalSouthWest,
    ];

    /// Packed piece code (1..=12)
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a packed piece code, `None` for 0 and unknown codes
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=12 => Some(Self::ALL[code as usize - 1]),
            _ => None,
        }
    }

    /// Slot index into a 12-entry piece table
    pub const fn slot(self) -> usize {
        self as usize - 1
    }

    /// Parse a configuration edge name (`n`, `cnw`, `dse`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "n" => Some(Edge::North),
            "e" => Some(Edge::East),
            "s" => Some(Edge::South),
            "w" => Some(Edge::West),
            "cnw" => Some(Edge::CornerNorthWest),
            "cne" => Some(Edge::CornerNorthEast),
            "csw" => Some(Edge::CornerSouthWest),
            "cse" => Some(Edge::CornerSouthEast),
            "dnw" => Some(Edge::DiagonalNorthWest),
            "dne" => Some(Edge::DiagonalNorthEast),
            "dsw" => Some(Edge::DiagonalSouthWest),
            "dse" => Some(Edge::DiagonalSouthEast),
            _ => None,
        }
    }

    /// Configuration name of this edge
    pub fn name(self) -> &'static str {
        match self {
            Edge::North => "n",
            Edge::East => "e",
            Edge::South => "s",
            Edge::West => "w",
            Edge::CornerNorthWest => "cnw",
            Edge::CornerNorthEast => "cne",
            Edge::CornerSouthWest => "csw",
            Edge::CornerSouthEast => "cse",
            Edge::DiagonalNorthWest => "dnw",
            Edge::DiagonalNorthEast => "dne",
            Edge::DiagonalSouthWest => "dsw",
            Edge::DiagonalSouthEast => "dse",
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Edge::DiagonalNorthWest
                | Edge::DiagonalNorthEast
                | Edge::DiagonalSouthEast
                | Edge::DiagonalSouthWest
        )
    }

    /// The two straight edges a diagonal can be built from, in placement order
    pub fn diagonal_parts(self) -> Option<(Edge, Edge)> {
        match self {
            Edge::DiagonalNorthWest => Some((Edge::West, Edge::North)),
            Edge::DiagonalNorthEast => Some((Edge::East, Edge::North)),
            Edge::DiagonalSouthWest => Some((Edge::South, Edge::West)),
            Edge::DiagonalSouthEast => Some((Edge::South, Edge::East)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_slots() {
        for edge in Edge::ALL {
            assert_eq!(Edge::from_code(edge.code()), Some(edge));
            assert_eq!(Edge::ALL[edge.slot()], edge);
            assert_eq!(Edge::from_name(edge.name()), Some(edge));
        }
        assert_eq!(Edge::from_code(0), None);
        assert_eq!(Edge::from_code(13), None);
        assert_eq!(Edge::from_name("north"), None);
    }

    #[test]
    fn test_only_diagonals_have_parts() {
        for edge in Edge::ALL {
            assert_eq!(edge.is_diagonal(), edge.diagonal_parts().is_some());
        }
        assert_eq!(
            Edge::DiagonalNorthWest.diagonal_parts(),
            Some((Edge::West, Edge::North))
        );
    }
}
