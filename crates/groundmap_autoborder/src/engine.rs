//! The bordering entry point
//!
//! [`BorderEngine::borderize`] recomputes the border items of one tile from
//! its neighborhood: classify neighbors, resolve clusters, expand pieces,
//! place them, then run specific cases. Custom border mode replaces the
//! cluster step with a single configured rule set.

use crate::catalog::RuleCatalog;
use crate::cluster::resolve_clusters;
use crate::context::BorderingContext;
use crate::neighbors::classify_neighbors;
use crate::pieces::expand_pieces;
use crate::rules::BorderRuleSet;
use crate::settings::BorderSettings;
use crate::specific::apply_specific_cases;
use crate::table::PieceTable;
use groundmap_core::{Direction, Grid, Item, Position};

/// Borders tiles using a loaded catalog and the current settings
#[derive(Debug, Clone, Copy)]
pub struct BorderEngine<'a> {
    catalog: &'a RuleCatalog,
    settings: &'a BorderSettings,
}

impl<'a> BorderEngine<'a> {
    pub fn new(catalog: &'a RuleCatalog, settings: &'a BorderSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &'a RuleCatalog {
        self.catalog
    }

    pub fn settings(&self) -> &'a BorderSettings {
        self.settings
    }

    /// Recompute the border items of the tile at `position`
    ///
    /// Missing tiles are ignored, and a position already being bordered in
    /// `ctx` is left alone.
    pub fn borderize<G: Grid + ?Sized>(&self, ctx: &mut BorderingContext, grid: &mut G, position: Position) {
        if !ctx.enter(position) {
            log::debug!("Refusing to re-enter bordering at {:?}", position);
            return;
        }
        let table = ctx.table().clone();
        if self.settings.custom_border_enabled {
            self.borderize_custom(&table, grid, position);
        } else {
            self.borderize_materials(&table, grid, position);
        }
        ctx.leave(position);
    }

    /// Remove every border item of the tile, then border it again
    pub fn reborderize<G: Grid + ?Sized>(&self, ctx: &mut BorderingContext, grid: &mut G, position: Position) {
        if ctx.is_visiting(position) {
            return;
        }
        if let Some(tile) = grid.tile_mut(position) {
            tile.clean_borders(self.catalog.items());
        }
        self.borderize(ctx, grid, position);
    }

    fn borderize_materials<G: Grid + ?Sized>(&self, table: &PieceTable, grid: &mut G, position: Position) {
        let items = self.catalog.items();
        let Some(tile) = grid.tile(position) else {
            return;
        };
        let own = tile.material(items);
        let tile_optional = tile.has_optional_border();

        let neighbors = classify_neighbors(&*grid, position, items, self.settings.walls_repel_borders);
        let resolution = resolve_clusters(self.catalog, own, &neighbors, tile_optional);
        let rule_sets: Vec<&BorderRuleSet> = resolution
            .clusters
            .iter()
            .map(|cluster| self.catalog.rule_set(cluster.rule_set))
            .collect();
        let pieces: Vec<Item> = resolution
            .clusters
            .iter()
            .zip(&rule_sets)
            .flat_map(|(cluster, rule_set)| expand_pieces(table, cluster.alignment, rule_set))
            .map(Item::new)
            .collect();

        let Some(tile) = grid.tile_mut(position) else {
            return;
        };
        if resolution.clear_optional {
            tile.set_optional_border(false);
        }
        if self.settings.same_ground_type_border {
            tile.retain_items(|item| {
                !(items.is_border(item.id()) && rule_sets.iter().any(|rs| rs.has_item_id(item.id())))
            });
        } else {
            tile.clean_borders(items);
        }
        log::debug!("Placing {} border pieces at {:?}", pieces.len(), position);
        tile.add_border_items(pieces, self.settings.placement(), items);
        apply_specific_cases(tile, &resolution.specific_blocks, items);
    }

    /// Border with the configured custom rule set against anything different
    fn borderize_custom<G: Grid + ?Sized>(&self, table: &PieceTable, grid: &mut G, position: Position) {
        let items = self.catalog.items();
        let custom_id = self.settings.custom_border_id;
        let Some(rule_set) = self.catalog.rule_set_by_id(custom_id).filter(|_| custom_id != 0) else {
            log::debug!("Custom border {} is not defined", custom_id);
            return;
        };
        let rule_set = self.catalog.rule_set(rule_set);
        let Some(tile) = grid.tile(position) else {
            return;
        };
        let own = tile.material(items);

        let mut alignment = 0u8;
        for direction in Direction::ALL {
            let neighbor = grid.tile(position.neighbor(direction));
            if self.settings.walls_repel_borders && neighbor.map_or(false, |t| t.has_wall(items)) {
                continue;
            }
            let needs_border = match neighbor {
                None => true,
                Some(t) if !t.has_ground() => true,
                Some(t) => matches!((own, t.material(items)), (Some(a), Some(b)) if a != b),
            };
            if needs_border {
                alignment |= direction.bit();
            }
        }
        let pieces: Vec<Item> = expand_pieces(table, alignment, rule_set)
            .into_iter()
            .map(Item::new)
            .collect();

        let Some(tile) = grid.tile_mut(position) else {
            return;
        };
        if self.settings.same_ground_type_border {
            tile.retain_items(|item| {
                !(items.is_border(item.id()) && self.catalog.is_rule_set_item(item.id()))
            });
        } else {
            tile.clean_borders(items);
        }
        tile.add_border_items(pieces, self.settings.placement(), items);
    }
}
