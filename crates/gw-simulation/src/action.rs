use std::fmt;

use gw_core::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Identifier of a scheduled action, unique within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// What a scheduled action does when it fires.
///
/// Actions are plain data interpreted by the simulation's dispatcher. They
/// capture no state of their own beyond these parameters, which keeps the
/// queue serializable and inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Miner behavior tick; dispatches on the miner's current state.
    Miner,
    /// Vein sweep for an open cell to spawn ore on.
    VeinSpawn,
    /// Ore corruption into an ore blob.
    OreCorrupt,
    /// Blob hunt for the nearest vein.
    BlobHunt,
    /// Advance the entity's animation frame.
    Animate {
        /// Remaining repetitions: 0 repeats forever, 1 runs once and stops.
        remaining: u32,
    },
    /// Remove the entity from the world (quake expiry).
    Death,
}

/// A scheduled unit of behavior bound to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Queue-wide identity, used for cancellation.
    pub id: ActionId,
    /// The entity this action operates on.
    pub entity: EntityId,
    /// What happens when the action fires.
    pub kind: ActionKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_inspectable_as_json() {
        let action = Action {
            id: ActionId(3),
            entity: EntityId(7),
            kind: ActionKind::Animate { remaining: 10 },
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["entity"], 7);
        assert_eq!(json["kind"]["animate"]["remaining"], 10);
    }

    #[test]
    fn unit_kinds_serialize_as_plain_tags() {
        let json = serde_json::to_value(ActionKind::VeinSpawn).unwrap();
        assert_eq!(json, "vein_spawn");
    }
}
