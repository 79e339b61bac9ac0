//! The rule catalog: item metadata, border rule sets and brushes
//!
//! Built once by the loader (see [`crate::loader`]) and shared read-only by
//! every bordering call afterwards.

use crate::brush::Brush;
use crate::rules::{BorderRuleSet, GroundMaterial, RuleSetRef};
use groundmap_core::{ItemDatabase, ItemId, MaterialId, Tile};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    items: ItemDatabase,
    rule_sets: Vec<BorderRuleSet>,
    rule_sets_by_id: HashMap<u16, RuleSetRef>,
    brushes: HashMap<MaterialId, Brush>,
    brushes_by_name: HashMap<String, MaterialId>,
    next_brush_id: u32,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog around an existing item database
    pub fn with_items(items: ItemDatabase) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &ItemDatabase {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut ItemDatabase {
        &mut self.items
    }

    // ─── Rule sets ───────────────────────────────────────────────────────────

    /// Store a rule set; non-zero ids also become addressable by id
    pub fn add_rule_set(&mut self, rule_set: BorderRuleSet) -> RuleSetRef {
        let handle = RuleSetRef(self.rule_sets.len());
        if rule_set.id != 0 {
            self.rule_sets_by_id.insert(rule_set.id, handle);
        }
        self.rule_sets.push(rule_set);
        handle
    }

    /// Panics only on handles from another catalog
    pub fn rule_set(&self, handle: RuleSetRef) -> &BorderRuleSet {
        &self.rule_sets[handle.0]
    }

    pub fn get_rule_set(&self, handle: RuleSetRef) -> Option<&BorderRuleSet> {
        self.rule_sets.get(handle.0)
    }

    pub fn rule_set_by_id(&self, id: u16) -> Option<RuleSetRef> {
        self.rule_sets_by_id.get(&id).copied()
    }

    pub fn rule_sets(&self) -> impl Iterator<Item = &BorderRuleSet> {
        self.rule_sets.iter()
    }

    /// Whether any rule set in the catalog uses this item as a piece
    pub fn is_rule_set_item(&self, id: ItemId) -> bool {
        self.rule_sets.iter().any(|rs| rs.has_item_id(id))
    }

    // ─── Brushes ─────────────────────────────────────────────────────────────

    /// Reserve an id for a brush name, `None` if the name is taken
    pub(crate) fn reserve_brush_name(&mut self, name: &str) -> Option<MaterialId> {
        if self.brushes_by_name.contains_key(name) {
            return None;
        }
        self.next_brush_id += 1;
        let id = MaterialId(self.next_brush_id);
        self.brushes_by_name.insert(name.to_string(), id);
        Some(id)
    }

    pub(crate) fn release_brush_name(&mut self, name: &str) {
        self.brushes_by_name.remove(name);
    }

    /// Register a brush under its name, returning its id
    ///
    /// Returns `None` if a brush of that name already exists.
    pub fn add_brush<F>(&mut self, name: &str, build: F) -> Option<MaterialId>
    where
        F: FnOnce(MaterialId) -> Brush,
    {
        let id = self.reserve_brush_name(name)?;
        self.brushes.insert(id, build(id));
        Some(id)
    }

    pub(crate) fn insert_brush(&mut self, brush: Brush) {
        self.brushes.insert(brush.id(), brush);
    }

    pub fn brush(&self, id: MaterialId) -> Option<&Brush> {
        self.brushes.get(&id)
    }

    pub fn brush_mut(&mut self, id: MaterialId) -> Option<&mut Brush> {
        self.brushes.get_mut(&id)
    }

    /// Id registered for a brush name (it may still be loading)
    pub fn brush_id(&self, name: &str) -> Option<MaterialId> {
        self.brushes_by_name.get(name).copied()
    }

    pub fn brush_by_name(&self, name: &str) -> Option<&Brush> {
        self.brush_id(name).and_then(|id| self.brush(id))
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn ground(&self, id: MaterialId) -> Option<&GroundMaterial> {
        self.brush(id).and_then(Brush::as_ground)
    }

    pub fn ground_by_name(&self, name: &str) -> Option<&GroundMaterial> {
        self.brush_by_name(name).and_then(Brush::as_ground)
    }

    /// Ground material of a tile's ground item
    pub fn tile_material(&self, tile: &Tile) -> Option<&GroundMaterial> {
        tile.material(&self.items).and_then(|id| self.ground(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::StackMaterial;
    use groundmap_core::{Edge, GroundItem, Item, ItemType, Position};

    #[test]
    fn test_rule_sets_by_id() {
        let mut catalog = RuleCatalog::new();
        let mut rs = BorderRuleSet::new(7);
        rs.set_piece(Edge::North, 500);
        let named = catalog.add_rule_set(rs);
        let inline = catalog.add_rule_set(BorderRuleSet::new(0));

        assert_eq!(catalog.rule_set_by_id(7), Some(named));
        assert_eq!(catalog.rule_set_by_id(0), None);
        assert_ne!(named, inline);
        assert_eq!(catalog.rule_set(named).piece(Edge::North), Some(500));
        assert!(catalog.is_rule_set_item(500));
        assert!(!catalog.is_rule_set_item(501));
        assert_eq!(catalog.rule_sets().count(), 2);
    }

    #[test]
    fn test_brush_registration() {
        let mut catalog = RuleCatalog::new();
        let grass = catalog
            .add_brush("grass", |id| Brush::Ground(GroundMaterial::new(id, "grass")))
            .unwrap();
        let wall = catalog
            .add_brush("wall", |id| Brush::Wall(StackMaterial::new(id, "wall")))
            .unwrap();

        assert!(catalog
            .add_brush("grass", |id| Brush::Ground(GroundMaterial::new(id, "grass")))
            .is_none());
        assert_ne!(grass, wall);
        assert_eq!(catalog.brush_id("grass"), Some(grass));
        assert!(catalog.ground(grass).is_some());
        assert!(catalog.ground(wall).is_none());
        assert_eq!(catalog.ground_by_name("grass").map(|g| g.id), Some(grass));
        assert_eq!(catalog.brush_count(), 2);
    }

    #[test]
    fn test_tile_material() {
        let mut catalog = RuleCatalog::new();
        let grass = catalog
            .add_brush("grass", |id| Brush::Ground(GroundMaterial::new(id, "grass")))
            .unwrap();
        let mut ground = ItemType::ground(100);
        ground.material = Some(grass);
        catalog.items_mut().insert(ground);

        let mut tile = Tile::new(Position::new(0, 0, 7));
        assert!(catalog.tile_material(&tile).is_none());
        tile.set_ground(GroundItem::new(Item::new(100), catalog.items()).unwrap());
        assert_eq!(catalog.tile_material(&tile).map(|g| g.name.as_str()), Some("grass"));
    }
}
