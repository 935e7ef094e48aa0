use gw_core::entity::EntityId;
use gw_core::point::Point;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    /// A vein spawned a new ore on an open cell.
    OreSpawned {
        /// The vein that spawned the ore.
        vein: EntityId,
        /// The newly created ore.
        ore: EntityId,
        /// The cell the ore appeared on.
        at: Point,
    },
    /// An ore reached its corruption delay and became a blob.
    OreCorrupted {
        /// The ore that was replaced.
        ore: EntityId,
        /// The blob that replaced it.
        blob: EntityId,
    },
    /// A blob destroyed a vein.
    VeinDestroyed {
        /// The hunting blob.
        blob: EntityId,
        /// The destroyed vein.
        vein: EntityId,
    },
    /// A quake appeared where a vein was destroyed.
    QuakeSpawned {
        /// The new quake.
        quake: EntityId,
        /// The cell it occupies.
        at: Point,
    },
    /// A miner changed state, and with it identity.
    MinerTransformed {
        /// The entity that was destroyed.
        from: EntityId,
        /// The entity constructed in its place.
        to: EntityId,
        /// Whether the new miner is in the full state.
        full: bool,
    },
    /// A full miner handed its load to a blacksmith.
    OreDelivered {
        /// The delivering miner.
        miner: EntityId,
        /// The receiving blacksmith.
        smith: EntityId,
        /// Resources transferred.
        amount: u32,
    },
    /// An entity left the world.
    EntityRemoved {
        /// The removed entity.
        entity: EntityId,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::OreSpawned { vein, ore, .. } => *vein == id || *ore == id,
            Self::OreCorrupted { ore, blob } => *ore == id || *blob == id,
            Self::VeinDestroyed { blob, vein } => *blob == id || *vein == id,
            Self::QuakeSpawned { quake, .. } => *quake == id,
            Self::MinerTransformed { from, to, .. } => *from == id || *to == id,
            Self::OreDelivered { miner, smith, .. } => *miner == id || *smith == id,
            Self::EntityRemoved { entity } => *entity == id,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
