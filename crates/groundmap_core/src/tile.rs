//! A single map tile: one ground slot plus an ordered item stack

use crate::item::{Item, ItemDatabase, ItemId, MaterialId};
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// An item proven to be a ground tile
///
/// Only ground items can occupy a tile's ground slot, and `Tile` never lets
/// them into the item stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundItem(Item);

impl GroundItem {
    /// Wrap an item if the database says it is a ground tile
    pub fn new(item: Item, items: &ItemDatabase) -> Option<Self> {
        items.is_ground_tile(item.id()).then_some(Self(item))
    }

    pub fn item(&self) -> &Item {
        &self.0
    }

    pub fn id(&self) -> ItemId {
        self.0.id()
    }
}

/// Where freshly computed border pieces go in the item stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorderPlacement {
    /// Below everything else (replace mode)
    #[default]
    Bottom,
    /// Above everything else (same-ground-type preservation mode)
    Top,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    position: Position,
    ground: Option<GroundItem>,
    /// Bottom to top
    items: Vec<Item>,
    /// Mountain overlays are allowed on this tile
    #[serde(default)]
    optional_border: bool,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ground: None,
            items: Vec::new(),
            optional_border: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn ground(&self) -> Option<&GroundItem> {
        self.ground.as_ref()
    }

    pub fn has_ground(&self) -> bool {
        self.ground.is_some()
    }

    /// Set the ground, returning the replaced one
    pub fn set_ground(&mut self, ground: GroundItem) -> Option<GroundItem> {
        self.ground.replace(ground)
    }

    pub fn take_ground(&mut self) -> Option<GroundItem> {
        self.ground.take()
    }

    /// Stack items, bottom first (the ground is not included)
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Ground plus stack items
    pub fn size(&self) -> usize {
        self.items.len() + usize::from(self.ground.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Material of the ground item, if the ground belongs to one
    pub fn material(&self, items: &ItemDatabase) -> Option<MaterialId> {
        self.ground.and_then(|g| items.material_of(g.id()))
    }

    /// Add an item following the stacking rules
    ///
    /// Ground tiles replace the ground slot. Items with a ground equivalent
    /// replace the ground with that equivalent and go to the very bottom.
    /// Always-on-bottom items are kept below normal items, sorted by
    /// `top_order`. Everything else goes on top.
    pub fn add_item(&mut self, item: Item, items: &ItemDatabase) {
        let Some(item_type) = items.get(item.id()) else {
            self.items.push(item);
            return;
        };

        if item_type.is_ground_tile {
            self.ground = Some(GroundItem(item));
            self.purge_misplaced_ground(items);
            return;
        }

        if let Some(equivalent) = item_type.ground_equivalent {
            self.ground = GroundItem::new(Item::new(equivalent), items);
            self.items.insert(0, item);
            return;
        }

        if item_type.always_on_bottom {
            let top_order = item_type.top_order;
            let index = self
                .items
                .iter()
                .position(|existing| match items.get(existing.id()) {
                    Some(existing_type) if existing_type.always_on_bottom => {
                        top_order < existing_type.top_order
                    }
                    _ => true,
                })
                .unwrap_or(self.items.len());
            self.items.insert(index, item);
        } else {
            self.items.push(item);
        }
    }

    /// Add border pieces as one block, keeping their relative order
    ///
    /// Ground tiles are silently refused.
    pub fn add_border_items<I>(&mut self, pieces: I, placement: BorderPlacement, items: &ItemDatabase)
    where
        I: IntoIterator<Item = Item>,
    {
        let pieces: Vec<Item> = pieces
            .into_iter()
            .filter(|piece| !items.is_ground_tile(piece.id()))
            .collect();
        match placement {
            BorderPlacement::Bottom => {
                self.items.splice(0..0, pieces);
            }
            BorderPlacement::Top => self.items.extend(pieces),
        }
    }

    /// Remove every border item, returning how many were removed
    pub fn clean_borders(&mut self, items: &ItemDatabase) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !items.is_border(item.id()));
        before - self.items.len()
    }

    /// Keep only the stack items for which `keep` returns true
    pub fn retain_items<F>(&mut self, keep: F)
    where
        F: FnMut(&Item) -> bool,
    {
        self.items.retain(keep);
    }

    pub fn remove_item_at(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Change the id of the stack item at `index`; ground ids are refused
    pub fn transform_item_at(&mut self, index: usize, id: ItemId, items: &ItemDatabase) -> bool {
        if items.is_ground_tile(id) {
            return false;
        }
        match self.items.get_mut(index) {
            Some(item) => {
                item.set_id(id);
                true
            }
            None => false,
        }
    }

    /// Drop stack items that should have been grounds
    pub fn purge_misplaced_ground(&mut self, items: &ItemDatabase) {
        self.items.retain(|item| match items.get(item.id()) {
            Some(it) => !it.is_ground_tile && it.ground_equivalent.is_none(),
            None => true,
        });
    }

    pub fn has_wall(&self, items: &ItemDatabase) -> bool {
        self.items.iter().any(|item| items.is_wall(item.id()))
    }

    pub fn has_optional_border(&self) -> bool {
        self.optional_border
    }

    pub fn set_optional_border(&mut self, enabled: bool) {
        self.optional_border = enabled;
    }
}
