//! Expanding an alignment bitmask into concrete border item ids

use crate::rules::BorderRuleSet;
use crate::table::PieceTable;
use groundmap_core::ItemId;

/// Item ids for `alignment` under `rule_set`, in placement order
///
/// A diagonal the rule set does not define is built from its two straight
/// edges; if one of those is missing too, the first defined edge or corner
/// piece stands in for it. Undefined edges and corners are left out.
pub fn expand_pieces(table: &PieceTable, alignment: u8, rule_set: &BorderRuleSet) -> Vec<ItemId> {
    let mut pieces = Vec::with_capacity(4);
    for edge in table.pieces(alignment) {
        if let Some(id) = rule_set.piece(edge) {
            pieces.push(id);
            continue;
        }
        let Some((first, second)) = edge.diagonal_parts() else {
            continue;
        };
        match (rule_set.piece(first), rule_set.piece(second)) {
            (Some(a), Some(b)) => {
                pieces.push(a);
                pieces.push(b);
            }
            _ => {
                if let Some(fallback) = rule_set.fallback_piece() {
                    pieces.push(fallback);
                }
            }
        }
    }
    pieces
}
