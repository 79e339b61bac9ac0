//! Alignment bitmask to border piece lookup table

use groundmap_core::{Direction, Edge};

/// Maps each of the 256 neighbor bitmasks to up to four piece codes
///
/// Each entry packs codes into bytes 0..3; a zero byte ends the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTable {
    entries: [u32; 256],
}

impl PieceTable {
    /// The standard table, derived from the neighbor layout
    ///
    /// - two orthogonals sharing a corner give that diagonal piece
    ///   (order NW, NE, SE, SW)
    /// - remaining orthogonals give straight edges (order N, E, S, W)
    /// - a diagonal neighbor with both adjacent orthogonals clear gives a
    ///   corner piece (order NW, NE, SW, SE)
    pub fn canonical() -> Self {
        let mut entries = [0u32; 256];
        for (mask, entry) in entries.iter_mut().enumerate() {
            *entry = pack(&derive_pieces(mask as u8));
        }
        Self { entries }
    }

    /// Use a prebuilt table
    pub fn from_entries(entries: [u32; 256]) -> Self {
        Self { entries }
    }

    pub fn entry(&self, mask: u8) -> u32 {
        self.entries[mask as usize]
    }

    /// Pieces for a mask, in emission order
    pub fn pieces(&self, mask: u8) -> impl Iterator<Item = Edge> {
        let entry = self.entry(mask);
        (0..4)
            .map(move |i| ((entry >> (8 * i)) & 0xFF) as u8)
            .take_while(|code| *code != 0)
            .filter_map(Edge::from_code)
    }
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::canonical()
    }
}

fn derive_pieces(mask: u8) -> Vec<Edge> {
    let has = |direction: Direction| mask & direction.bit() != 0;
    let (n, e, s, w) = (
        has(Direction::North),
        has(Direction::East),
        has(Direction::South),
        has(Direction::West),
    );

    let mut pieces = Vec::with_capacity(4);
    if n && w {
        pieces.push(Edge::DiagonalNorthWest);
    }
    if n && e {
        pieces.push(Edge::DiagonalNorthEast);
    }
    if s && e {
        pieces.push(Edge::DiagonalSouthEast);
    }
    if s && w {
        pieces.push(Edge::DiagonalSouthWest);
    }

    if n && !w && !e {
        pieces.push(Edge::North);
    }
    if e && !n && !s {
        pieces.push(Edge::East);
    }
    if s && !e && !w {
        pieces.push(Edge::South);
    }
    if w && !s && !n {
        pieces.push(Edge::West);
    }

    if has(Direction::NorthWest) && !n && !w {
        pieces.push(Edge::CornerNorthWest);
    }
    if has(Direction::NorthEast) && !n && !e {
        pieces.push(Edge::CornerNorthEast);
    }
    if has(Direction::SouthWest) && !s && !w {
        pieces.push(Edge::CornerSouthWest);
    }
    if has(Direction::SouthEast) && !s && !e {
        pieces.push(Edge::CornerSouthEast);
    }

    debug_assert!(pieces.len() <= 4, "mask {:#04x} yields {} pieces", mask, pieces.len());
    pieces
}

fn pack(pieces: &[Edge]) -> u32 {
    pieces
        .iter()
        .take(4)
        .enumerate()
        .fold(0, |acc, (i, edge)| acc | (u32::from(edge.code()) << (8 * i)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(directions: &[Direction]) -> u8 {
        directions.iter().fold(0, |acc, d| acc | d.bit())
    }

    #[test]
    fn test_every_mask_is_defined() {
        let table = PieceTable::canonical();
        assert_eq!(table.entry(0), 0);
        for m in 1..=255u8 {
            let pieces: Vec<_> = table.pieces(m).collect();
            assert!(!pieces.is_empty(), "mask {:#04x} has no pieces", m);
            assert!(pieces.len() <= 4);
        }
    }

    #[test]
    fn test_single_neighbors() {
        let table = PieceTable::canonical();
        let single = |d: Direction| table.pieces(d.bit()).collect::<Vec<_>>();

        assert_eq!(single(Direction::North), vec![Edge::North]);
        assert_eq!(single(Direction::East), vec![Edge::East]);
        assert_eq!(single(Direction::South), vec![Edge::South]);
        assert_eq!(single(Direction::West), vec![Edge::West]);
        assert_eq!(single(Direction::NorthWest), vec![Edge::CornerNorthWest]);
        assert_eq!(single(Direction::NorthEast), vec![Edge::CornerNorthEast]);
        assert_eq!(single(Direction::SouthWest), vec![Edge::CornerSouthWest]);
        assert_eq!(single(Direction::SouthEast), vec![Edge::CornerSouthEast]);
    }

    #[test]
    fn test_adjacent_orthogonals_form_diagonal() {
        let table = PieceTable::canonical();
        let pieces: Vec<_> = table
            .pieces(mask(&[Direction::North, Direction::East, Direction::NorthEast]))
            .collect();
        assert_eq!(pieces, vec![Edge::DiagonalNorthEast]);

        let pieces: Vec<_> = table
            .pieces(mask(&[Direction::North, Direction::East, Direction::SouthWest]))
            .collect();
        assert_eq!(pieces, vec![Edge::DiagonalNorthEast, Edge::CornerSouthWest]);
    }

    #[test]
    fn test_surrounded_tile() {
        let table = PieceTable::canonical();
        let pieces: Vec<_> = table.pieces(0xFF).collect();
        assert_eq!(
            pieces,
            vec![
                Edge::DiagonalNorthWest,
                Edge::DiagonalNorthEast,
                Edge::DiagonalSouthEast,
                Edge::DiagonalSouthWest,
            ]
        );
    }

    #[test]
    fn test_opposite_sides() {
        let table = PieceTable::canonical();
        let pieces: Vec<_> = table
            .pieces(mask(&[Direction::North, Direction::South]))
            .collect();
        assert_eq!(pieces, vec![Edge::North, Edge::South]);
    }

    #[test]
    fn test_custom_entries() {
        let mut entries = [0u32; 256];
        entries[1] = u32::from(Edge::South.code()) | (u32::from(Edge::West.code()) << 8);
        let table = PieceTable::from_entries(entries);
        assert_eq!(table.pieces(1).collect::<Vec<_>>(), vec![Edge::South, Edge::West]);
        assert_eq!(table.pieces(2).count(), 0);
    }
}
