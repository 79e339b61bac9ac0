//! Editing operations that draw materials and keep borders up to date

use crate::brush::{DrawFilter, DrawOptions};
use crate::context::BorderingContext;
use crate::engine::BorderEngine;
use groundmap_core::{Grid, MaterialId, Position, TileMap};
use rand::Rng;
use std::collections::BTreeSet;

impl BorderEngine<'_> {
    /// Draw a brush onto a tile, then border it and its neighbors
    ///
    /// Returns whether the tile changed.
    pub fn paint_ground<R: Rng>(
        &self,
        ctx: &mut BorderingContext,
        map: &mut TileMap,
        position: Position,
        brush_id: MaterialId,
        filter: DrawFilter,
        rng: &mut R,
    ) -> bool {
        let Some(brush) = self.catalog().brush(brush_id) else {
            log::warn!("Cannot paint unknown brush {:?}", brush_id);
            return false;
        };
        let options = DrawOptions {
            filter,
            layer_carpets: self.settings().layer_carpets,
        };
        let Some(tile) = map.get_or_create(position) else {
            return false;
        };
        let changed = brush.draw(tile, self.catalog().items(), &options, rng);
        if changed && self.settings().use_automagic {
            self.borderize_around(ctx, map, position);
        }
        drop_if_empty(map, position);
        changed
    }

    /// Remove the ground of a tile
    ///
    /// The neighborhood is re-bordered only when erasing is configured to do so.
    pub fn erase_ground(&self, ctx: &mut BorderingContext, map: &mut TileMap, position: Position) -> bool {
        let items = self.catalog().items();
        let Some(tile) = map.tile_mut(position) else {
            return false;
        };
        let brush = tile.material(items).and_then(|id| self.catalog().brush(id));
        let removed = match brush {
            Some(brush) => brush.undraw(tile, items),
            None => tile.take_ground().is_some(),
        };
        if removed && self.settings().use_automagic && self.settings().borderize_delete {
            self.borderize_around(ctx, map, position);
        }
        drop_if_empty(map, position);
        removed
    }

    /// Border every existing tile in `positions` and around them, once each
    pub fn borderize_selection(&self, ctx: &mut BorderingContext, map: &mut TileMap, positions: &[Position]) {
        if !self.settings().use_automagic {
            return;
        }
        let mut targets = BTreeSet::new();
        for position in positions {
            targets.insert(*position);
            targets.extend(position.neighbors());
        }
        for position in targets {
            if map.tile(position).is_some() {
                self.borderize(ctx, map, position);
            }
        }
    }

    /// Border every tile of the map
    pub fn borderize_map(&self, ctx: &mut BorderingContext, map: &mut TileMap) {
        if !self.settings().use_automagic {
            return;
        }
        let positions = map.positions();
        log::info!("Borderizing {} tiles", positions.len());
        for position in positions {
            self.borderize(ctx, map, position);
        }
    }

    /// Border a tile and its 8 neighbors, creating empty neighbor tiles so
    /// outer borders have somewhere to go
    fn borderize_around(&self, ctx: &mut BorderingContext, map: &mut TileMap, center: Position) {
        let mut targets = vec![center];
        targets.extend(center.neighbors());
        for position in targets {
            if map.get_or_create(position).is_none() {
                continue;
            }
            self.borderize(ctx, map, position);
            drop_if_empty(map, position);
        }
    }
}

fn drop_if_empty(map: &mut TileMap, position: Position) {
    if map.tile(position).map_or(false, |tile| tile.is_empty()) {
        map.remove_tile(position);
    }
}

#[cfg(test)]
mod tests {
    use crate::brush::DrawFilter;
    use crate::context::BorderingContext;
    use crate::engine::tests::{at, catalog, filled, set_ground, stack, GRASS, SAND, SEA};
    use crate::engine::BorderEngine;
    use crate::settings::BorderSettings;
    use groundmap_core::{Grid, TileMap};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_paint_ground_borders_neighbors() {
        let catalog = catalog();
        let settings = BorderSettings::default();
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = filled(&catalog, GRASS);
        let mut rng = SmallRng::seed_from_u64(0);
        let sand = catalog.brush_id("sand").unwrap();

        let mut ctx = BorderingContext::default();
        assert!(engine.paint_ground(&mut ctx, &mut map, at(3, 2), sand, DrawFilter::Any, &mut rng));

        assert_eq!(stack(&map, at(2, 2)), vec![202]);
        assert_eq!(stack(&map, at(4, 2)), vec![204]);
        assert_eq!(stack(&map, at(2, 1)), vec![208]);
        assert!(stack(&map, at(3, 2)).is_empty());
        assert!(!ctx.is_visiting(at(2, 2)));
    }

    #[test]
    fn test_paint_without_automagic_skips_bordering() {
        let catalog = catalog();
        let settings = BorderSettings {
            use_automagic: false,
            ..Default::default()
        };
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = filled(&catalog, GRASS);
        let mut rng = SmallRng::seed_from_u64(0);
        let sand = catalog.brush_id("sand").unwrap();

        let mut ctx = BorderingContext::default();
        engine.paint_ground(&mut ctx, &mut map, at(3, 2), sand, DrawFilter::Any, &mut rng);
        assert_eq!(map.tile(at(3, 2)).and_then(|t| t.material(catalog.items())), Some(sand));
        assert!(stack(&map, at(2, 2)).is_empty());

        engine.borderize_map(&mut ctx, &mut map);
        assert!(stack(&map, at(2, 2)).is_empty());
    }

    #[test]
    fn test_paint_volatile_respects_existing_ground() {
        let catalog = catalog();
        let settings = BorderSettings::default();
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = filled(&catalog, GRASS);
        let mut rng = SmallRng::seed_from_u64(0);
        let sand = catalog.brush_id("sand").unwrap();

        let mut ctx = BorderingContext::default();
        assert!(!engine.paint_ground(&mut ctx, &mut map, at(2, 2), sand, DrawFilter::Volatile, &mut rng));
        assert!(stack(&map, at(1, 2)).is_empty());
    }

    #[test]
    fn test_paint_sea_creates_coast_on_empty_neighbors() {
        let catalog = catalog();
        let settings = BorderSettings::default();
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = TileMap::new(5, 5);
        let mut rng = SmallRng::seed_from_u64(0);
        let sea = catalog.brush_id("sea").unwrap();

        let mut ctx = BorderingContext::default();
        engine.paint_ground(&mut ctx, &mut map, at(2, 2), sea, DrawFilter::Any, &mut rng);

        // The empty tile west of the sea gets the coast facing east; the
        // coast has no corner pieces, so diagonal neighbors stay empty
        assert_eq!(stack(&map, at(1, 2)), vec![302]);
        assert_eq!(stack(&map, at(2, 1)), vec![303]);
        assert_eq!(map.tile_count(), 5);

        assert!(engine.erase_ground(&mut ctx, &mut map, at(2, 2)));
        // Without borderize-on-delete the coast stays behind
        assert_eq!(stack(&map, at(1, 2)), vec![302]);
    }

    #[test]
    fn test_erase_with_borderize_delete() {
        let catalog = catalog();
        let settings = BorderSettings {
            borderize_delete: true,
            ..Default::default()
        };
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = TileMap::new(5, 5);
        let mut rng = SmallRng::seed_from_u64(0);
        let sea = catalog.brush_id("sea").unwrap();

        let mut ctx = BorderingContext::default();
        engine.paint_ground(&mut ctx, &mut map, at(2, 2), sea, DrawFilter::Any, &mut rng);
        assert!(engine.erase_ground(&mut ctx, &mut map, at(2, 2)));
        assert_eq!(map.tile_count(), 0);
        assert!(!engine.erase_ground(&mut ctx, &mut map, at(2, 2)));
    }

    #[test]
    fn test_borderize_selection_and_map() {
        let catalog = catalog();
        let settings = BorderSettings::default();
        let engine = BorderEngine::new(&catalog, &settings);
        let mut map = filled(&catalog, GRASS);
        set_ground(&mut map, &catalog, at(0, 0), SAND);
        set_ground(&mut map, &catalog, at(4, 4), SEA);

        let mut ctx = BorderingContext::default();
        engine.borderize_selection(&mut ctx, &mut map, &[at(0, 0)]);
        assert_eq!(stack(&map, at(1, 0)), vec![204]);
        assert!(stack(&map, at(3, 4)).is_empty());

        engine.borderize_map(&mut ctx, &mut map);
        assert_eq!(stack(&map, at(3, 4)), vec![202]);
        assert_eq!(stack(&map, at(1, 1)), vec![205]);
    }
}
