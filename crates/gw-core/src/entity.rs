use std::fmt;

use serde::{Deserialize, Serialize};

use crate::images::ImageHandle;
use crate::point::Point;

/// Stable arena identifier for an entity in a world model.
///
/// Ids are assigned when an entity is inserted into a
/// [`crate::world::WorldModel`] and are never reused within that world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder carried by entities that have not been inserted yet.
    pub const UNASSIGNED: EntityId = EntityId(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a miner is still gathering or carrying a full load.
///
/// The state is encoded in the entity's kind: a transition destroys the old
/// entity and constructs a replacement of the other state at the same
/// position, so the machine is exhaustive and checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinerState {
    /// Below its resource limit; seeks ore.
    NotFull,
    /// At its resource limit; seeks a blacksmith.
    Full,
}

/// Field-less discriminant of [`EntityKind`], used for nearest-entity
/// queries and occupant tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    /// Static blocker.
    Obstacle,
    /// Miner in either state.
    Miner,
    /// Ore vein.
    Vein,
    /// Loose ore.
    Ore,
    /// Blacksmith.
    Blacksmith,
    /// Ore blob.
    OreBlob,
    /// Quake effect.
    Quake,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Obstacle => "obstacle",
            Self::Miner => "miner",
            Self::Vein => "vein",
            Self::Ore => "ore",
            Self::Blacksmith => "blacksmith",
            Self::OreBlob => "blob",
            Self::Quake => "quake",
        };
        write!(f, "{name}")
    }
}

/// Kind-specific state of an entity.
///
/// Rates are scheduling cadences in ticks. Kinds with an animation rate
/// cycle their images on a cadence independent of their action cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Static blocker; occupies a cell and never acts.
    Obstacle,
    /// Gathers ore and delivers it to blacksmiths.
    Miner {
        /// Current position in the two-state machine.
        state: MinerState,
        /// Ticks between behavior actions.
        rate: u64,
        /// Ticks between animation frames.
        animation_rate: u64,
        /// Load at which the miner turns full.
        resource_limit: u32,
        /// Ore currently carried.
        resource_count: u32,
    },
    /// Periodically spawns ore on nearby open cells.
    Vein {
        /// Ticks between spawn attempts.
        rate: u64,
        /// Radius of the neighborhood scanned for open cells.
        resource_distance: i32,
    },
    /// Inert mineral; corrupts into an ore blob after its delay.
    Ore {
        /// Ticks until corruption.
        rate: u64,
    },
    /// Resource sink for full miners.
    Blacksmith {
        /// Nominal work cadence; blacksmiths are currently passive.
        rate: u64,
        /// Radius within which the smith interacts.
        resource_distance: i32,
        /// Capacity of the smith's store.
        resource_limit: u32,
        /// Ore delivered so far.
        resource_count: u32,
    },
    /// Hunts veins, consuming any ore it crosses.
    OreBlob {
        /// Ticks between hunt actions.
        rate: u64,
        /// Ticks between animation frames.
        animation_rate: u64,
    },
    /// Transient destructive effect left where a vein was destroyed.
    Quake {
        /// Ticks between animation frames.
        animation_rate: u64,
    },
}

impl EntityKind {
    /// The field-less discriminant of this kind.
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Obstacle => KindTag::Obstacle,
            Self::Miner { .. } => KindTag::Miner,
            Self::Vein { .. } => KindTag::Vein,
            Self::Ore { .. } => KindTag::Ore,
            Self::Blacksmith { .. } => KindTag::Blacksmith,
            Self::OreBlob { .. } => KindTag::OreBlob,
            Self::Quake { .. } => KindTag::Quake,
        }
    }
}

/// A positioned world object.
///
/// Every entity has a name, an image cycle, and a grid position. The
/// remaining capabilities (action cadence, animation cadence, resource
/// counts, interaction radius) depend on the kind and are reached through
/// the accessor methods, which return `None` for kinds lacking them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable id, assigned on insertion into a world model.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Current grid cell, or [`Point::INVALID`] after removal.
    pub position: Point,
    /// Animation frames; the sequence length is the cycle length.
    pub images: Vec<ImageHandle>,
    /// Index of the current frame.
    pub current_frame: usize,
    /// Kind-specific state.
    pub kind: EntityKind,
}

impl Entity {
    /// Create an entity awaiting insertion (its id is
    /// [`EntityId::UNASSIGNED`] until a world model adopts it).
    pub fn new(
        kind: EntityKind,
        name: impl Into<String>,
        position: Point,
        images: Vec<ImageHandle>,
    ) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            position,
            images,
            current_frame: 0,
            kind,
        }
    }

    /// The field-less discriminant of this entity's kind.
    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// The current animation frame, if the entity has any images.
    pub fn image(&self) -> Option<ImageHandle> {
        self.images.get(self.current_frame).copied()
    }

    /// Advance to the next animation frame, wrapping cyclically. No-op for
    /// an empty image sequence.
    pub fn next_image(&mut self) {
        if !self.images.is_empty() {
            self.current_frame = (self.current_frame + 1) % self.images.len();
        }
    }

    /// Ticks between behavior actions, for kinds that act on their own.
    pub fn rate(&self) -> Option<u64> {
        match self.kind {
            EntityKind::Obstacle | EntityKind::Quake { .. } => None,
            EntityKind::Miner { rate, .. }
            | EntityKind::Vein { rate, .. }
            | EntityKind::Ore { rate }
            | EntityKind::Blacksmith { rate, .. }
            | EntityKind::OreBlob { rate, .. } => Some(rate),
        }
    }

    /// Ticks between animation frames, for animated kinds.
    pub fn animation_rate(&self) -> Option<u64> {
        match self.kind {
            EntityKind::Miner { animation_rate, .. }
            | EntityKind::OreBlob { animation_rate, .. }
            | EntityKind::Quake { animation_rate } => Some(animation_rate),
            _ => None,
        }
    }

    /// Whether this kind cycles its images on its own cadence.
    pub fn is_animated(&self) -> bool {
        self.animation_rate().is_some()
    }

    /// Whether this kind owns a set of pending actions. Everything except
    /// static obstacles does; removal must cancel those actions.
    pub fn is_actor(&self) -> bool {
        !matches!(self.kind, EntityKind::Obstacle)
    }

    /// Resources currently held, for kinds that accumulate them.
    pub fn resource_count(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Miner { resource_count, .. }
            | EntityKind::Blacksmith { resource_count, .. } => Some(resource_count),
            _ => None,
        }
    }

    /// Resource capacity, for kinds that accumulate resources.
    pub fn resource_limit(&self) -> Option<u32> {
        match self.kind {
            EntityKind::Miner { resource_limit, .. }
            | EntityKind::Blacksmith { resource_limit, .. } => Some(resource_limit),
            _ => None,
        }
    }

    /// Interaction radius, for kinds that scan their neighborhood.
    pub fn resource_distance(&self) -> Option<i32> {
        match self.kind {
            EntityKind::Vein {
                resource_distance, ..
            }
            | EntityKind::Blacksmith {
                resource_distance, ..
            } => Some(resource_distance),
            _ => None,
        }
    }

    /// Add `amount` to the resource count. No-op for kinds without one.
    pub fn add_resources(&mut self, amount: u32) {
        match &mut self.kind {
            EntityKind::Miner { resource_count, .. }
            | EntityKind::Blacksmith { resource_count, .. } => *resource_count += amount,
            _ => {}
        }
    }

    /// Take the entire resource count, leaving zero. Returns 0 for kinds
    /// without a count.
    pub fn take_resources(&mut self) -> u32 {
        match &mut self.kind {
            EntityKind::Miner { resource_count, .. }
            | EntityKind::Blacksmith { resource_count, .. } => std::mem::take(resource_count),
            _ => 0,
        }
    }
}

/// A background tile.
///
/// One per cell of the background layer; background tiles never enter the
/// occupancy grid or the registry and are never scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    /// Display name.
    pub name: String,
    /// Animation frames.
    pub images: Vec<ImageHandle>,
    /// Index of the current frame.
    pub current_frame: usize,
}

impl Background {
    /// Create a background tile showing its first frame.
    pub fn new(name: impl Into<String>, images: Vec<ImageHandle>) -> Self {
        Self {
            name: name.into(),
            images,
            current_frame: 0,
        }
    }

    /// The current frame, if the tile has any images.
    pub fn image(&self) -> Option<ImageHandle> {
        self.images.get(self.current_frame).copied()
    }
}
