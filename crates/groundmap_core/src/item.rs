//! Item instances and the item metadata database

use crate::edge::Edge;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server-side item identifier
pub type ItemId = u16;

/// Identifier of a ground material (brush)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Metadata shared by every instance of an item id
///
/// Border-related fields are written by the rule catalog loader as a side
/// channel and read back during bordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemType {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_ground_tile: bool,
    #[serde(default)]
    pub is_border: bool,
    #[serde(default)]
    pub is_optional_border: bool,
    #[serde(default)]
    pub always_on_bottom: bool,
    #[serde(default)]
    pub is_wall: bool,
    #[serde(default)]
    pub is_carpet: bool,
    #[serde(default)]
    pub is_table: bool,
    /// Stacking order among always-on-bottom items (lower sits deeper)
    #[serde(default)]
    pub top_order: i32,
    /// Ground item this item stands in for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_equivalent: Option<ItemId>,
    /// Border group, 0 = none
    #[serde(default)]
    pub border_group: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_alignment: Option<Edge>,
    /// Material owning this item (ground items and ground-linked borders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialId>,
}

impl ItemType {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Create a ground tile item type
    pub fn ground(id: ItemId) -> Self {
        Self {
            id,
            is_ground_tile: true,
            ..Default::default()
        }
    }

    /// Create a wall item type
    pub fn wall(id: ItemId) -> Self {
        Self {
            id,
            is_wall: true,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Registry of all known item types, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDatabase {
    items: HashMap<ItemId, ItemType>,
}

impl ItemDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item type, replacing any previous definition
    pub fn insert(&mut self, item_type: ItemType) {
        self.items.insert(item_type.id, item_type);
    }

    /// Get the item type for an id (id 0 is never defined)
    pub fn get(&self, id: ItemId) -> Option<&ItemType> {
        if id == 0 {
            return None;
        }
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemType> {
        if id == 0 {
            return None;
        }
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_border(&self, id: ItemId) -> bool {
        self.get(id).map_or(false, |it| it.is_border)
    }

    pub fn is_ground_tile(&self, id: ItemId) -> bool {
        self.get(id).map_or(false, |it| it.is_ground_tile)
    }

    pub fn is_wall(&self, id: ItemId) -> bool {
        self.get(id).map_or(false, |it| it.is_wall)
    }

    pub fn material_of(&self, id: ItemId) -> Option<MaterialId> {
        self.get(id).and_then(|it| it.material)
    }
}

/// An item instance placed on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
}

impl Item {
    pub fn new(id: ItemId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Transform this item into another item id in place
    pub fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }
}
