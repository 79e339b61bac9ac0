//! Core data structures for groundmap
//!
//! This crate provides the fundamental types for representing a tile map
//! that the auto-bordering engine reads and edits:
//! - `Position` / `Direction` - Map coordinates and the 8 neighbor directions
//! - `Edge` - The 12 border piece slots
//! - `ItemType` / `ItemDatabase` - Item metadata shared by every instance
//! - `Item` / `Tile` - Placed items, one ground slot plus an ordered stack
//! - `TileMap` / `Grid` - Bounded tile storage and the access trait

mod edge;
mod item;
mod map;
mod position;
mod tile;

pub use edge::Edge;
pub use item::{Item, ItemDatabase, ItemId, ItemType, MaterialId};
pub use map::{Grid, TileMap, MAX_FLOOR};
pub use position::{Direction, Position};
pub use tile::{BorderPlacement, GroundItem, Tile};
