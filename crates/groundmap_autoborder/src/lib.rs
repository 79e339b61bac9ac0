//! Terrain auto-bordering for groundmap
//!
//! Given a tile and its 8 neighbors, the engine works out which transition
//! pieces belong on the tile and writes them into its item stack:
//!
//! 1. Neighbors are classified by ground material ([`neighbors`]).
//! 2. Directions sharing a foreign material are clustered and each cluster
//!    is resolved to a border rule set ([`cluster`]).
//! 3. Each cluster's bitmask is looked up in the [`PieceTable`] and expanded
//!    into item ids, synthesizing missing diagonals ([`pieces`]).
//! 4. Pieces are placed and specific-case rules rewrite them ([`specific`]).
//!
//! Rules come from a [`RuleCatalog`] loaded once from configuration; runtime
//! switches live in [`BorderSettings`].
//!
//! ```ignore
//! let (catalog, report) = RuleCatalog::load_file(Path::new("catalog.json"))?;
//! let settings = BorderSettings::load(Path::new("automagic.toml"))?;
//! let engine = BorderEngine::new(&catalog, &settings);
//! engine.borderize(&mut BorderingContext::default(), &mut map, position);
//! ```

pub mod brush;
pub mod catalog;
pub mod cluster;
pub mod context;
pub mod engine;
pub mod error;
pub mod loader;
pub mod neighbors;
mod ops;
pub mod pieces;
pub mod rules;
pub mod settings;
pub mod specific;
pub mod table;

pub use brush::{Brush, DrawFilter, DrawOptions, StackMaterial};
pub use catalog::RuleCatalog;
pub use cluster::{brush_to, resolve_clusters, BorderCluster, Resolution, OVERLAY_PRIORITY, ZILCH_PRIORITY};
pub use context::BorderingContext;
pub use engine::BorderEngine;
pub use error::{LoadError, SettingsError};
pub use loader::{CatalogConfig, ConfigNode, LoadReport};
pub use neighbors::{classify_neighbors, Neighbor};
pub use pieces::expand_pieces;
pub use rules::{
    edge_name_to_id, BorderBlock, BorderRuleSet, BorderTarget, FriendRef, GroundMaterial, ItemChance,
    MatchPredicate, RuleSetRef, SpecificAction, SpecificCaseRule,
};
pub use settings::BorderSettings;
pub use specific::apply_specific_cases;
pub use table::PieceTable;
