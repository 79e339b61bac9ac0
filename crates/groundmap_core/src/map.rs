//! Tile storage and the grid access trait used by the bordering engine

use crate::position::Position;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Highest floor index
pub const MAX_FLOOR: i32 = 15;

/// Read/write access to tiles by position
///
/// `contains` answers whether a position lies inside the map at all, which
/// is different from whether a tile exists there.
pub trait Grid {
    fn tile(&self, position: Position) -> Option<&Tile>;

    fn tile_mut(&mut self, position: Position) -> Option<&mut Tile>;

    fn contains(&self, position: Position) -> bool;
}

/// A sparse, bounded map of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub width: u32,
    pub height: u32,
    tiles: HashMap<Position, Tile>,
}

impl TileMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: HashMap::new(),
        }
    }

    /// Get the tile at `position`, creating an empty one if needed
    ///
    /// Returns `None` when the position is outside the map.
    pub fn get_or_create(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.contains(position) {
            return None;
        }
        Some(
            self.tiles
                .entry(position)
                .or_insert_with(|| Tile::new(position)),
        )
    }

    pub fn remove_tile(&mut self, position: Position) -> Option<Tile> {
        self.tiles.remove(&position)
    }

    /// Positions of every stored tile, sorted
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.tiles.keys().copied().collect();
        positions.sort();
        positions
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl Grid for TileMap {
    fn tile(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
            && (0..=MAX_FLOOR).contains(&position.z)
    }
}
