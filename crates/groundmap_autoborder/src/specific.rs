//! Specific-case rules: rewriting border pieces after placement

use crate::rules::{BorderBlock, MatchPredicate, SpecificAction, SpecificCaseRule};
use groundmap_core::{ItemDatabase, Tile};

/// Run every specific-case rule of `blocks` against the tile
pub fn apply_specific_cases(tile: &mut Tile, blocks: &[&BorderBlock], items: &ItemDatabase) {
    for block in blocks {
        for rule in &block.specific_cases {
            let matches = count_matches(tile, rule, items);
            if matches >= rule.predicates.len() {
                log::debug!(
                    "Specific case fired at {:?} ({} of {} predicates)",
                    tile.position(),
                    matches,
                    rule.predicates.len()
                );
                apply_action(tile, rule, items);
            }
        }
    }
}

/// Count predicate hits over the bottom run of border items
fn count_matches(tile: &Tile, rule: &SpecificCaseRule, items: &ItemDatabase) -> usize {
    let mut matches = 0;
    for item in tile.items() {
        let Some(item_type) = items.get(item.id()).filter(|it| it.is_border) else {
            break;
        };
        let group_hit = rule.predicates.iter().any(|p| {
            matches!(p, MatchPredicate::Group { .. }) && p.matches(item_type)
        });
        if group_hit {
            matches += 1;
            continue;
        }
        matches += rule
            .predicates
            .iter()
            .filter(|p| matches!(p, MatchPredicate::Item(id) if *id == item.id()))
            .count();
    }
    matches
}

/// Walk the border items acted on by `rule`: only item predicates pick items
/// here, group predicates just count toward the threshold
fn apply_action(tile: &mut Tile, rule: &SpecificCaseRule, items: &ItemDatabase) {
    let (to_replace, delete_all) = match rule.action {
        Some(SpecificAction::Replace { to_replace, with }) => (Some((to_replace, with)), false),
        Some(SpecificAction::DeleteAll) => (None, true),
        None => (None, false),
    };
    let mut replaced = delete_all;
    let max_iterations = tile.items().len() * 2 + 20;
    let mut index = 0;
    let mut iterations = 0;

    while index < tile.items().len() && iterations < max_iterations {
        iterations += 1;
        let id = tile.items()[index].id();
        let matching = items.is_border(id)
            && rule
                .predicates
                .iter()
                .any(|p| matches!(p, MatchPredicate::Item(item_id) if *item_id == id));
        if !matching {
            index += 1;
            continue;
        }

        match to_replace {
            Some((target, with)) if !replaced && id == target => {
                tile.transform_item_at(index, with, items);
                replaced = true;
                index += 1;
            }
            _ if delete_all || !rule.keep_border => {
                tile.remove_item_at(index);
            }
            _ => index += 1,
        }
    }
}
