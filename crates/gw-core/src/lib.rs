//! Core types for Grubenwelt: the tile grid, entity model, and world model.
//!
//! This crate is independent of scheduling: gw-simulation drives entities
//! through time, but a [`WorldModel`] can also be constructed and inspected
//! programmatically (e.g. by a renderer reading the occupancy layer).

/// Entity kinds, capability accessors, and background tiles.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// The generic cell grid backing the background and occupancy layers.
pub mod grid;
/// Opaque image handles and the image-store seam.
pub mod images;
/// Integer grid coordinates.
pub mod point;
/// The central world model that owns the grids and the entity registry.
pub mod world;

/// Re-export core entity types.
pub use entity::{Background, Entity, EntityId, EntityKind, KindTag, MinerState};
/// Re-export error types.
pub use error::{GwError, GwResult};
/// Re-export of [`grid::Grid`].
pub use grid::Grid;
/// Re-export image types.
pub use images::{ImageHandle, ImageStore, MemoryImageStore};
/// Re-export of [`point::Point`].
pub use point::Point;
/// Re-export of [`world::WorldModel`].
pub use world::WorldModel;
