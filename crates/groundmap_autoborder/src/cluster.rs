//! Grouping neighbor directions into border clusters
//!
//! Every run of directions that share one foreign material becomes a single
//! alignment bitmask, resolved to a rule set through the materials' border
//! blocks. The result is sorted so lower priorities are placed first.

use crate::catalog::RuleCatalog;
use crate::neighbors::Neighbor;
use crate::rules::{BorderBlock, GroundMaterial, RuleSetRef};
use groundmap_core::MaterialId;

/// Priority of a material's border against empty space
pub const ZILCH_PRIORITY: i32 = 5000;

/// Priority of optional overlays, always drawn last
pub const OVERLAY_PRIORITY: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderCluster {
    /// Direction bits this cluster covers
    pub alignment: u8,
    pub priority: i32,
    pub rule_set: RuleSetRef,
}

/// Output of cluster resolution for one tile
#[derive(Debug, Default)]
pub struct Resolution<'c> {
    /// Sorted ascending by priority
    pub clusters: Vec<BorderCluster>,
    /// Blocks whose specific cases run after placement, without duplicates
    pub specific_blocks: Vec<&'c BorderBlock>,
    /// The tile lost its permission for optional overlays
    pub clear_optional: bool,
}

impl<'c> Resolution<'c> {
    /// Add a cluster, merging it into an existing one for the same rule set
    fn add(&mut self, alignment: u8, priority: i32, rule_set: RuleSetRef) {
        if let Some(existing) = self.clusters.iter_mut().find(|c| c.rule_set == rule_set) {
            existing.alignment |= alignment;
            existing.priority = existing.priority.max(priority);
        } else {
            self.clusters.push(BorderCluster {
                alignment,
                priority,
                rule_set,
            });
        }
    }

    fn add_block(&mut self, alignment: u8, priority: i32, block: &'c BorderBlock) {
        if let Some(rule_set) = block.rule_set {
            self.add(alignment, priority, rule_set);
        }
        self.collect_specific(block);
    }

    fn collect_specific(&mut self, block: &'c BorderBlock) {
        if !block.specific_cases.is_empty()
            && !self.specific_blocks.iter().any(|b| std::ptr::eq(*b, block))
        {
            self.specific_blocks.push(block);
        }
    }
}

/// Select the border block between two materials (`None` = empty space)
pub fn brush_to<'c>(
    first: Option<&'c GroundMaterial>,
    second: Option<&'c GroundMaterial>,
) -> Option<&'c BorderBlock> {
    match (first, second) {
        (Some(first), Some(second)) => {
            if first.z_order < second.z_order && second.has_outer_border() {
                if first.has_inner_border() {
                    if let Some(block) = first.inner_block_to(Some(second.id)) {
                        return Some(block);
                    }
                }
                second.outer_block_to(Some(first.id))
            } else if first.has_inner_border() {
                first.inner_block_to(Some(second.id))
            } else {
                None
            }
        }
        (Some(first), None) => first.inner_block_to(None),
        (None, Some(second)) => second.outer_block_to(None),
        (None, None) => None,
    }
}

/// Resolve the border clusters of a tile from its classified neighbors
///
/// `tile_optional` says whether the tile accepts optional overlays.
pub fn resolve_clusters<'c>(
    catalog: &'c RuleCatalog,
    own: Option<MaterialId>,
    neighbors: &[Neighbor; 8],
    tile_optional: bool,
) -> Resolution<'c> {
    let own_ground = own.and_then(|id| catalog.ground(id));
    let material_of = |neighbor: &Neighbor| neighbor.material.and_then(|id| catalog.ground(id));

    let mut resolution = Resolution::default();
    let mut visited = [false; 8];

    for i in 0..8 {
        let neighbor = neighbors[i];
        if visited[i] || neighbor.excluded {
            continue;
        }
        let other = material_of(&neighbor);
        if own_ground.map(|g| g.id) == other.map(|g| g.id) {
            continue;
        }

        let mut alignment = 0u8;
        for j in i..8 {
            let same = material_of(&neighbors[j]).map(|g| g.id) == other.map(|g| g.id);
            if !visited[j] && !neighbors[j].excluded && same {
                visited[j] = true;
                alignment |= 1 << j;
            }
        }

        match (own_ground, other) {
            (Some(own_ground), Some(other)) => {
                if !(other.has_outer_border() || own_ground.has_inner_border()) {
                    continue;
                }

                let mut only_overlay = false;
                if own_ground.friend_of(other.id) || other.friend_of(own_ground.id) {
                    if !other.has_optional_border() {
                        continue;
                    }
                    only_overlay = true;
                }

                if let (Some(overlay), true) = (other.optional_border, tile_optional) {
                    resolution.add(alignment, OVERLAY_PRIORITY, overlay);
                    if other.solo_optional {
                        only_overlay = true;
                    }
                }

                if !only_overlay {
                    if let Some(block) = brush_to(Some(own_ground), Some(other)) {
                        resolution.add_block(alignment, other.z_order, block);
                    }
                }
            }
            (Some(own_ground), None) => {
                if own_ground.has_inner_zilch_border() {
                    if let Some(block) = brush_to(Some(own_ground), None) {
                        resolution.add_block(alignment, ZILCH_PRIORITY, block);
                    }
                }
            }
            (None, Some(other)) => {
                if !other.has_outer_zilch_border() {
                    continue;
                }
                if let Some(block) = brush_to(None, Some(other)) {
                    resolution.add_block(alignment, other.z_order, block);
                }
                match (other.optional_border, tile_optional) {
                    (Some(overlay), true) => resolution.add(alignment, OVERLAY_PRIORITY, overlay),
                    _ => resolution.clear_optional = true,
                }
            }
            (None, None) => {}
        }
    }

    resolution.clusters.sort_by_key(|c| c.priority);
    log::debug!(
        "Resolved {} border clusters ({} with specific cases)",
        resolution.clusters.len(),
        resolution.specific_blocks.len()
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;
    use crate::rules::{BorderRuleSet, BorderTarget, FriendRef, SpecificCaseRule};
    use groundmap_core::Direction;

    struct Fixture {
        catalog: RuleCatalog,
        grass: MaterialId,
        sand: MaterialId,
        sea: MaterialId,
        grass_to_sand: RuleSetRef,
        sand_outer: RuleSetRef,
        sea_coast: RuleSetRef,
        mountain: RuleSetRef,
    }

    fn fixture() -> Fixture {
        let mut catalog = RuleCatalog::new();
        let grass_to_sand = catalog.add_rule_set(BorderRuleSet::new(1));
        let sand_outer = catalog.add_rule_set(BorderRuleSet::new(2));
        let sea_coast = catalog.add_rule_set(BorderRuleSet::new(3));
        let mountain = catalog.add_rule_set(BorderRuleSet::new(4));

        let sand = catalog.reserve_brush_name("sand").unwrap();
        let grass = catalog.reserve_brush_name("grass").unwrap();
        let sea = catalog.reserve_brush_name("sea").unwrap();

        let mut grass_material = GroundMaterial::new(grass, "grass");
        grass_material.z_order = 10;
        let mut block = BorderBlock::new(Some(grass_to_sand), BorderTarget::Material(sand), false);
        block.specific_cases.push(SpecificCaseRule::new());
        grass_material.borders.push(block);
        catalog.insert_brush(Brush::Ground(grass_material));

        let mut sand_material = GroundMaterial::new(sand, "sand");
        sand_material.z_order = 5;
        sand_material
            .borders
            .push(BorderBlock::new(Some(sand_outer), BorderTarget::All, true));
        catalog.insert_brush(Brush::Ground(sand_material));

        let mut sea_material = GroundMaterial::new(sea, "sea");
        sea_material.z_order = 1;
        sea_material
            .borders
            .push(BorderBlock::new(Some(sea_coast), BorderTarget::Nothing, true));
        catalog.insert_brush(Brush::Ground(sea_material));

        Fixture {
            catalog,
            grass,
            sand,
            sea,
            grass_to_sand,
            sand_outer,
            sea_coast,
            mountain,
        }
    }

    fn neighbors_with(fill: Option<MaterialId>, overrides: &[(Direction, Option<MaterialId>)]) -> [Neighbor; 8] {
        let mut neighbors = [Neighbor {
            excluded: false,
            material: fill,
        }; 8];
        for (direction, material) in overrides {
            neighbors[direction.index()].material = *material;
        }
        neighbors
    }

    #[test]
    fn test_same_material_everywhere_has_no_clusters() {
        let f = fixture();
        let neighbors = neighbors_with(Some(f.grass), &[]);
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, false);
        assert!(resolution.clusters.is_empty());
        assert!(resolution.specific_blocks.is_empty());
    }

    #[test]
    fn test_inner_border_of_higher_material() {
        let f = fixture();
        let neighbors = neighbors_with(Some(f.grass), &[(Direction::East, Some(f.sand))]);
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, false);

        assert_eq!(
            resolution.clusters,
            vec![BorderCluster {
                alignment: Direction::East.bit(),
                priority: 5,
                rule_set: f.grass_to_sand,
            }]
        );
        assert_eq!(resolution.specific_blocks.len(), 1);
    }

    #[test]
    fn test_lower_material_uses_outer_border_of_higher() {
        let f = fixture();
        // Sand (z 5) next to grass (z 10): grass has no outer border, so none
        let neighbors = neighbors_with(Some(f.sand), &[(Direction::North, Some(f.grass))]);
        let resolution = resolve_clusters(&f.catalog, Some(f.sand), &neighbors, false);
        assert!(resolution.clusters.is_empty());

        // Sea (z 1) next to sand (z 5): sand's outer block targets all
        let neighbors = neighbors_with(
            Some(f.sea),
            &[(Direction::North, Some(f.sand)), (Direction::NorthEast, Some(f.sand))],
        );
        let resolution = resolve_clusters(&f.catalog, Some(f.sea), &neighbors, false);
        assert_eq!(
            resolution.clusters,
            vec![BorderCluster {
                alignment: Direction::North.bit() | Direction::NorthEast.bit(),
                priority: 5,
                rule_set: f.sand_outer,
            }]
        );
    }

    #[test]
    fn test_empty_tile_next_to_coast() {
        let f = fixture();
        let neighbors = neighbors_with(Some(f.sea), &[]);
        let resolution = resolve_clusters(&f.catalog, None, &neighbors, true);
        assert_eq!(
            resolution.clusters,
            vec![BorderCluster {
                alignment: 0xFF,
                priority: 1,
                rule_set: f.sea_coast,
            }]
        );
        assert!(resolution.clear_optional);
    }

    #[test]
    fn test_empty_tile_ignores_material_without_zilch_border() {
        let mut f = fixture();
        if let Some(Brush::Ground(sand)) = f.catalog.brush_mut(f.sand) {
            sand.optional_border = Some(f.mountain);
        }
        let neighbors = neighbors_with(Some(f.sand), &[]);

        let resolution = resolve_clusters(&f.catalog, None, &neighbors, true);
        assert!(resolution.clusters.is_empty());
        assert!(!resolution.clear_optional);

        let resolution = resolve_clusters(&f.catalog, None, &neighbors, false);
        assert!(resolution.clusters.is_empty());
        assert!(!resolution.clear_optional);
    }

    #[test]
    fn test_coast_overlay_on_permitting_empty_tile() {
        let mut f = fixture();
        if let Some(Brush::Ground(sea)) = f.catalog.brush_mut(f.sea) {
            sea.optional_border = Some(f.mountain);
        }
        let neighbors = neighbors_with(Some(f.sea), &[]);
        let resolution = resolve_clusters(&f.catalog, None, &neighbors, true);
        let order: Vec<_> = resolution.clusters.iter().map(|c| c.rule_set).collect();
        assert_eq!(order, vec![f.sea_coast, f.mountain]);
        assert!(!resolution.clear_optional);
    }

    #[test]
    fn test_excluded_directions_are_skipped() {
        let f = fixture();
        let mut neighbors = neighbors_with(Some(f.sea), &[]);
        neighbors[Direction::West.index()] = Neighbor::EXCLUDED;
        let resolution = resolve_clusters(&f.catalog, None, &neighbors, false);
        assert_eq!(resolution.clusters[0].alignment, 0xFF & !Direction::West.bit());
    }

    #[test]
    fn test_friends_only_get_overlay() {
        let mut f = fixture();
        if let Some(Brush::Ground(sand)) = f.catalog.brush_mut(f.sand) {
            sand.friends.push(FriendRef::Material(f.grass));
        }
        let neighbors = neighbors_with(Some(f.grass), &[(Direction::South, Some(f.sand))]);
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, true);
        assert!(resolution.clusters.is_empty());

        if let Some(Brush::Ground(sand)) = f.catalog.brush_mut(f.sand) {
            sand.optional_border = Some(f.mountain);
        }
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, true);
        assert_eq!(
            resolution.clusters,
            vec![BorderCluster {
                alignment: Direction::South.bit(),
                priority: OVERLAY_PRIORITY,
                rule_set: f.mountain,
            }]
        );

        // Without permission on the tile nothing is drawn
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, false);
        assert!(resolution.clusters.is_empty());
    }

    #[test]
    fn test_overlay_sorts_last_and_solo_suppresses_border() {
        let mut f = fixture();
        if let Some(Brush::Ground(sand)) = f.catalog.brush_mut(f.sand) {
            sand.optional_border = Some(f.mountain);
        }
        let neighbors = neighbors_with(Some(f.grass), &[(Direction::East, Some(f.sand))]);
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, true);
        let order: Vec<_> = resolution.clusters.iter().map(|c| c.rule_set).collect();
        assert_eq!(order, vec![f.grass_to_sand, f.mountain]);

        if let Some(Brush::Ground(sand)) = f.catalog.brush_mut(f.sand) {
            sand.solo_optional = true;
        }
        let resolution = resolve_clusters(&f.catalog, Some(f.grass), &neighbors, true);
        let order: Vec<_> = resolution.clusters.iter().map(|c| c.rule_set).collect();
        assert_eq!(order, vec![f.mountain]);
    }

    #[test]
    fn test_brush_to_prefers_inner_of_lower() {
        let f = fixture();
        let grass = f.catalog.ground(f.grass);
        let sand = f.catalog.ground(f.sand);
        let sea = f.catalog.ground(f.sea);

        assert_eq!(brush_to(grass, sand).and_then(|b| b.rule_set), Some(f.grass_to_sand));
        assert_eq!(brush_to(sea, sand).and_then(|b| b.rule_set), Some(f.sand_outer));
        assert_eq!(brush_to(None, sea).and_then(|b| b.rule_set), Some(f.sea_coast));
        assert!(brush_to(sea, None).is_none());
        assert!(brush_to(None, None).is_none());
    }
}
