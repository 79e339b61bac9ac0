//! Per-call-chain bordering state

use crate::table::PieceTable;
use groundmap_core::Position;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared piece table plus the set of positions currently being bordered
///
/// One context belongs to one editing call chain; the table can be shared
/// between contexts and threads.
#[derive(Debug, Clone, Default)]
pub struct BorderingContext {
    table: Arc<PieceTable>,
    visiting: HashSet<Position>,
}

impl BorderingContext {
    pub fn new(table: Arc<PieceTable>) -> Self {
        Self {
            table,
            visiting: HashSet::new(),
        }
    }

    pub fn table(&self) -> &Arc<PieceTable> {
        &self.table
    }

    /// Mark `position` as in progress; `false` if it already is
    pub fn enter(&mut self, position: Position) -> bool {
        self.visiting.insert(position)
    }

    pub fn leave(&mut self, position: Position) {
        self.visiting.remove(&position);
    }

    pub fn is_visiting(&self, position: Position) -> bool {
        self.visiting.contains(&position)
    }
}
