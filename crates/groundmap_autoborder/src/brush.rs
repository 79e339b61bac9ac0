//! Brushes: the drawable materials of the catalog

use crate::rules::GroundMaterial;
use groundmap_core::{GroundItem, Item, ItemDatabase, ItemId, MaterialId, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Restricts which tiles a ground draw may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DrawFilter {
    #[default]
    Any,
    /// Only tiles without a ground material
    Volatile,
    /// Only tiles whose material is exactly this one (`None` = no material)
    OnlyMaterial(Option<MaterialId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    pub filter: DrawFilter,
    /// Carpets stack instead of replacing each other
    pub layer_carpets: bool,
}

/// A brush made of plain stack items (walls, carpets, tables)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackMaterial {
    pub id: MaterialId,
    pub name: String,
    pub items: Vec<ItemId>,
}

impl StackMaterial {
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Brush {
    Ground(GroundMaterial),
    Wall(StackMaterial),
    Carpet(StackMaterial),
    Table(StackMaterial),
}

impl Brush {
    pub fn id(&self) -> MaterialId {
        match self {
            Brush::Ground(ground) => ground.id,
            Brush::Wall(m) | Brush::Carpet(m) | Brush::Table(m) => m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Brush::Ground(ground) => &ground.name,
            Brush::Wall(m) | Brush::Carpet(m) | Brush::Table(m) => &m.name,
        }
    }

    pub fn as_ground(&self) -> Option<&GroundMaterial> {
        match self {
            Brush::Ground(ground) => Some(ground),
            _ => None,
        }
    }

    pub fn as_ground_mut(&mut self) -> Option<&mut GroundMaterial> {
        match self {
            Brush::Ground(ground) => Some(ground),
            _ => None,
        }
    }

    /// Draw this brush onto a tile, returning whether the tile changed
    pub fn draw<R: Rng>(
        &self,
        tile: &mut Tile,
        items: &ItemDatabase,
        options: &DrawOptions,
        rng: &mut R,
    ) -> bool {
        match self {
            Brush::Ground(ground) => draw_ground(ground, tile, items, options.filter, rng),
            Brush::Wall(m) | Brush::Table(m) => draw_stack(m, tile, items, true),
            Brush::Carpet(m) => {
                if !options.layer_carpets {
                    tile.retain_items(|item| {
                        !items.get(item.id()).map_or(false, |it| it.is_carpet)
                    });
                }
                draw_stack(m, tile, items, !options.layer_carpets)
            }
        }
    }

    /// Remove whatever this brush owns from a tile, returning whether it changed
    pub fn undraw(&self, tile: &mut Tile, items: &ItemDatabase) -> bool {
        match self {
            Brush::Ground(ground) => {
                let owned = tile.ground().map_or(false, |g| {
                    items.material_of(g.id()) == Some(ground.id) || ground.has_item(g.id())
                });
                if owned {
                    tile.take_ground();
                }
                owned
            }
            Brush::Wall(m) | Brush::Carpet(m) | Brush::Table(m) => {
                let before = tile.items().len();
                tile.retain_items(|item| !m.has_item(item.id()));
                before != tile.items().len()
            }
        }
    }
}

fn draw_ground<R: Rng>(
    ground: &GroundMaterial,
    tile: &mut Tile,
    items: &ItemDatabase,
    filter: DrawFilter,
    rng: &mut R,
) -> bool {
    let current = tile.material(items);
    match filter {
        DrawFilter::Any => {}
        DrawFilter::Volatile if current.is_some() => return false,
        DrawFilter::Volatile => {}
        DrawFilter::OnlyMaterial(material) if material != current => return false,
        DrawFilter::OnlyMaterial(_) => {}
    }

    let Some(ground_item) = ground
        .pick_item(rng)
        .and_then(|id| GroundItem::new(Item::new(id), items))
    else {
        return false;
    };
    tile.set_ground(ground_item);
    tile.purge_misplaced_ground(items);
    true
}

/// Add the brush's first item unless the tile already holds one of its items
fn draw_stack(material: &StackMaterial, tile: &mut Tile, items: &ItemDatabase, unique: bool) -> bool {
    let Some(&id) = material.items.first() else {
        return false;
    };
    if unique && tile.items().iter().any(|item| material.has_item(item.id())) {
        return false;
    }
    tile.add_item(Item::new(id), items);
    true
}
