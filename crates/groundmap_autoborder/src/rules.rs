//! Rule model: border rule sets, ground materials and their border blocks.
//!
//! Everything here is built once by the loader and only read while bordering.
//! Rule sets live in the [`RuleCatalog`](crate::RuleCatalog) arena and are
//! referenced by [`RuleSetRef`], so blocks and clusters can share them
//! without owning them.

use groundmap_core::{Edge, ItemId, ItemType, MaterialId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parse an edge name into its piece code, 0 for unknown names
pub fn edge_name_to_id(name: &str) -> u8 {
    Edge::from_name(name).map_or(0, Edge::code)
}

// ─── BorderRuleSet ───────────────────────────────────────────────────────────

/// Index of a rule set inside the catalog arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleSetRef(pub(crate) usize);

impl RuleSetRef {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named table of 12 border pieces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderRuleSet {
    /// Configured id, 0 for sets defined inline by a material
    pub id: u16,
    /// Border group, 0 = none
    #[serde(default)]
    pub group: u16,
    /// Pieces indexed by [`Edge::slot`]
    pub tiles: [Option<ItemId>; Edge::COUNT],
    /// Member items stand in for a ground item
    #[serde(default)]
    pub ground: bool,
    /// Loaded with `type="optional"`
    #[serde(default)]
    pub optional: bool,
}

impl BorderRuleSet {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn piece(&self, edge: Edge) -> Option<ItemId> {
        self.tiles[edge.slot()]
    }

    pub fn set_piece(&mut self, edge: Edge, id: ItemId) {
        self.tiles[edge.slot()] = Some(id);
    }

    /// Whether `id` is one of this set's pieces
    pub fn has_item_id(&self, id: ItemId) -> bool {
        id != 0 && self.tiles.iter().any(|slot| *slot == Some(id))
    }

    /// First defined edge or corner piece, used when a diagonal cannot be built
    pub fn fallback_piece(&self) -> Option<ItemId> {
        self.tiles[..8].iter().find_map(|slot| *slot)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(Option::is_none)
    }
}

// ─── BorderBlock ─────────────────────────────────────────────────────────────

/// Which neighbor a border block applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BorderTarget {
    /// Any other material
    #[default]
    All,
    /// Empty space (no ground)
    Nothing,
    Material(MaterialId),
}

/// A specific-case match predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPredicate {
    Item(ItemId),
    /// A border item of this group placed on this edge
    Group { group: u16, alignment: Option<Edge> },
}

impl MatchPredicate {
    /// Whether a border item satisfies this predicate
    pub fn matches(&self, item: &ItemType) -> bool {
        match *self {
            MatchPredicate::Item(id) => item.id == id,
            MatchPredicate::Group { group, alignment } => {
                group != 0 && item.border_group == group && item.border_alignment == alignment
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecificAction {
    /// Turn the first matching `to_replace` item into `with`
    Replace { to_replace: ItemId, with: ItemId },
    /// Remove every matching border item
    DeleteAll,
}

/// A pattern over already-placed border items plus what to do when it matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificCaseRule {
    pub predicates: Vec<MatchPredicate>,
    pub action: Option<SpecificAction>,
    /// Matching items that are not replaced stay on the tile
    #[serde(default)]
    pub keep_border: bool,
}

impl SpecificCaseRule {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            action: None,
            keep_border: false,
        }
    }
}

impl Default for SpecificCaseRule {
    fn default() -> Self {
        Self::new()
    }
}

/// One border directive of a ground material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderBlock {
    /// `None` is a "zilch" block: it matches but places nothing
    pub rule_set: Option<RuleSetRef>,
    pub to: BorderTarget,
    /// Drawn on the neighbor's side (outer) or on this material (inner)
    pub outer: bool,
    #[serde(default)]
    pub is_super: bool,
    #[serde(default)]
    pub specific_cases: Vec<SpecificCaseRule>,
}

impl BorderBlock {
    pub fn new(rule_set: Option<RuleSetRef>, to: BorderTarget, outer: bool) -> Self {
        Self {
            rule_set,
            to,
            outer,
            is_super: false,
            specific_cases: Vec::new(),
        }
    }

    /// Whether this block applies against a neighbor of `target`
    ///
    /// `All` blocks accept any material but never empty space.
    fn targets(&self, target: Option<MaterialId>) -> bool {
        match (self.to, target) {
            (BorderTarget::All, Some(_)) => true,
            (BorderTarget::Material(id), Some(other)) => id == other,
            (BorderTarget::Nothing, None) => true,
            _ => false,
        }
    }
}

// ─── GroundMaterial ──────────────────────────────────────────────────────────

/// A weighted ground item; `chance` is cumulative over the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChance {
    pub id: ItemId,
    pub chance: u32,
}

/// Entry in a friend/enemy list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FriendRef {
    All,
    Material(MaterialId),
}

/// A terrain type: its ground items plus the rules for bordering it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundMaterial {
    pub id: MaterialId,
    pub name: String,
    pub look_id: ItemId,
    /// Higher z-order materials are drawn over lower ones
    pub z_order: i32,
    pub items: Vec<ItemChance>,
    pub total_chance: u32,
    pub randomize: bool,
    pub borders: Vec<BorderBlock>,
    /// Overlay ("mountain") rule set drawn onto permitting neighbors
    pub optional_border: Option<RuleSetRef>,
    /// The overlay replaces the normal border instead of adding to it
    pub solo_optional: bool,
    pub friends: Vec<FriendRef>,
    /// The friends list is an enemy list
    pub hate_friends: bool,
}

impl GroundMaterial {
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            look_id: 0,
            z_order: 0,
            items: Vec::new(),
            total_chance: 0,
            randomize: true,
            borders: Vec::new(),
            optional_border: None,
            solo_optional: false,
            friends: Vec::new(),
            hate_friends: false,
        }
    }

    /// Append a ground item with a relative chance
    pub fn add_item(&mut self, id: ItemId, chance: u32) {
        self.total_chance = self.total_chance.saturating_add(chance);
        self.items.push(ItemChance {
            id,
            chance: self.total_chance,
        });
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.iter().any(|entry| entry.id == id)
    }

    /// Pick a ground item id by weighted chance
    ///
    /// Without randomization the first item is always used.
    pub fn pick_item<R: Rng>(&self, rng: &mut R) -> Option<ItemId> {
        let first = self.items.first()?;
        if !self.randomize || self.total_chance == 0 {
            return Some(first.id);
        }
        let roll = rng.gen_range(0..self.total_chance);
        Some(
            self.items
                .iter()
                .find(|entry| roll < entry.chance)
                .unwrap_or(first)
                .id,
        )
    }

    pub fn has_outer_border(&self) -> bool {
        self.borders
            .iter()
            .any(|b| b.outer && b.to != BorderTarget::Nothing)
    }

    pub fn has_inner_border(&self) -> bool {
        self.borders
            .iter()
            .any(|b| !b.outer && b.to != BorderTarget::Nothing)
    }

    pub fn has_outer_zilch_border(&self) -> bool {
        self.borders
            .iter()
            .any(|b| b.outer && b.to == BorderTarget::Nothing)
    }

    pub fn has_inner_zilch_border(&self) -> bool {
        self.borders
            .iter()
            .any(|b| !b.outer && b.to == BorderTarget::Nothing)
    }

    pub fn has_optional_border(&self) -> bool {
        self.optional_border.is_some()
    }

    /// Whether `other` counts as a friend (or, with `hate_friends`, is not an enemy)
    pub fn friend_of(&self, other: MaterialId) -> bool {
        let listed = self.friends.iter().any(|friend| match friend {
            FriendRef::All => true,
            FriendRef::Material(id) => *id == other,
        });
        listed != self.hate_friends
    }

    /// First inner block facing `target` (`None` = empty space)
    pub fn inner_block_to(&self, target: Option<MaterialId>) -> Option<&BorderBlock> {
        self.borders
            .iter()
            .find(|b| !b.outer && b.targets(target))
    }

    /// First outer block facing `target` (`None` = empty space)
    pub fn outer_block_to(&self, target: Option<MaterialId>) -> Option<&BorderBlock> {
        self.borders.iter().find(|b| b.outer && b.targets(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_edge_name_to_id() {
        assert_eq!(edge_name_to_id("n"), 1);
        assert_eq!(edge_name_to_id("dsw"), 12);
        assert_eq!(edge_name_to_id("bogus"), 0);
    }

    #[test]
    fn test_rule_set_lookup() {
        let mut rule_set = BorderRuleSet::new(3);
        assert!(rule_set.is_empty());
        assert_eq!(rule_set.fallback_piece(), None);

        rule_set.set_piece(Edge::DiagonalNorthEast, 40);
        assert_eq!(rule_set.fallback_piece(), None);

        rule_set.set_piece(Edge::CornerSouthWest, 41);
        rule_set.set_piece(Edge::East, 42);
        assert_eq!(rule_set.fallback_piece(), Some(42));
        assert!(rule_set.has_item_id(40));
        assert!(!rule_set.has_item_id(0));
        assert!(!rule_set.has_item_id(43));
    }

    #[test]
    fn test_friend_of_with_and_without_hate() {
        let mut grass = GroundMaterial::new(MaterialId(1), "grass");
        assert!(!grass.friend_of(MaterialId(2)));

        grass.friends.push(FriendRef::Material(MaterialId(2)));
        assert!(grass.friend_of(MaterialId(2)));
        assert!(!grass.friend_of(MaterialId(3)));

        // Enemy list: everything not listed is a friend
        grass.hate_friends = true;
        assert!(!grass.friend_of(MaterialId(2)));
        assert!(grass.friend_of(MaterialId(3)));

        grass.friends = vec![FriendRef::All];
        assert!(!grass.friend_of(MaterialId(9)));
    }

    #[test]
    fn test_block_selection_by_target() {
        let mut grass = GroundMaterial::new(MaterialId(1), "grass");
        grass.borders.push(BorderBlock::new(
            Some(RuleSetRef(0)),
            BorderTarget::Material(MaterialId(2)),
            false,
        ));
        grass.borders.push(BorderBlock::new(Some(RuleSetRef(1)), BorderTarget::All, false));
        grass.borders.push(BorderBlock::new(None, BorderTarget::Nothing, true));

        let to_sand = grass.inner_block_to(Some(MaterialId(2))).unwrap();
        assert_eq!(to_sand.rule_set, Some(RuleSetRef(0)));
        let to_other = grass.inner_block_to(Some(MaterialId(5))).unwrap();
        assert_eq!(to_other.rule_set, Some(RuleSetRef(1)));
        assert!(grass.inner_block_to(None).is_none());
        assert_eq!(grass.outer_block_to(None).unwrap().rule_set, None);

        assert!(grass.has_inner_border());
        assert!(!grass.has_outer_border());
        assert!(grass.has_outer_zilch_border());
        assert!(!grass.has_inner_zilch_border());
    }

    #[test]
    fn test_pick_item_weighted() {
        let mut grass = GroundMaterial::new(MaterialId(1), "grass");
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(grass.pick_item(&mut rng), None);

        grass.add_item(100, 0);
        grass.add_item(101, 10);
        assert_eq!(grass.total_chance, 10);
        for _ in 0..50 {
            assert_eq!(grass.pick_item(&mut rng), Some(101));
        }

        grass.randomize = false;
        assert_eq!(grass.pick_item(&mut rng), Some(100));
    }

    #[test]
    fn test_total_chance_saturates() {
        let mut grass = GroundMaterial::new(MaterialId(1), "grass");
        grass.add_item(100, u32::MAX);
        grass.add_item(101, 10);
        assert_eq!(grass.total_chance, u32::MAX);
        assert_eq!(grass.items[1].chance, u32::MAX);

        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(grass.pick_item(&mut rng), Some(100));
    }

    #[test]
    fn test_matches_group_predicate() {
        let mut item = ItemType::new(7);
        item.is_border = true;
        item.border_group = 4;
        item.border_alignment = Some(Edge::North);

        assert!(MatchPredicate::Group {
            group: 4,
            alignment: Some(Edge::North)
        }
        .matches(&item));
        assert!(!MatchPredicate::Group {
            group: 4,
            alignment: Some(Edge::South)
        }
        .matches(&item));
        assert!(MatchPredicate::Item(7).matches(&item));
    }
}
