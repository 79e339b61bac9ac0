//! Classifying the 8 neighbors of a tile

use groundmap_core::{Direction, Grid, ItemDatabase, MaterialId, Position};

/// What the engine sees in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbor {
    /// Ignored entirely: outside the map, or a wall that repels borders
    pub excluded: bool,
    /// Ground material, `None` for empty space
    pub material: Option<MaterialId>,
}

impl Neighbor {
    pub const EXCLUDED: Neighbor = Neighbor {
        excluded: true,
        material: None,
    };

    pub fn material(material: MaterialId) -> Self {
        Self {
            excluded: false,
            material: Some(material),
        }
    }
}

/// Classify the neighbors of `position`, in [`Direction::ALL`] order
pub fn classify_neighbors<G: Grid + ?Sized>(
    grid: &G,
    position: Position,
    items: &ItemDatabase,
    walls_repel_borders: bool,
) -> [Neighbor; 8] {
    Direction::ALL.map(|direction| {
        let at = position.neighbor(direction);
        if !grid.contains(at) {
            return Neighbor::EXCLUDED;
        }
        match grid.tile(at) {
            Some(tile) if walls_repel_borders && tile.has_wall(items) => Neighbor::EXCLUDED,
            Some(tile) => Neighbor {
                excluded: false,
                material: tile.material(items),
            },
            None => Neighbor::default(),
        }
    })
}
