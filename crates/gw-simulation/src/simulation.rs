use std::collections::HashMap;

use gw_core::entity::{Entity, EntityId, EntityKind, MinerState};
use gw_core::images::ImageStore;
use gw_core::point::Point;
use gw_core::world::WorldModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::{Action, ActionId, ActionKind};
use crate::config::{
    BLOB_ANIMATION_RATE_SCALE, QUAKE_ANIMATION_RATE, QUAKE_DURATION, QUAKE_STEPS, SimConfig,
};
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::queue::ActionQueue;
use crate::sprites::SpriteSet;

/// The simulation kernel: a world model plus the action queue driving it.
///
/// Behavior is scheduled, never polled. Every acting entity keeps one or
/// more actions in the queue, and [`Simulation::advance`] drains whatever
/// has come due. The `pending` side table maps each entity to its queued
/// actions so removal can cancel them; an entity that leaves the world must
/// leave the queue in the same breath, or a later tick would dispatch an
/// action against a dangling id.
#[derive(Debug)]
pub struct Simulation {
    pub(crate) world: WorldModel,
    pub(crate) queue: ActionQueue,
    pub(crate) pending: HashMap<EntityId, Vec<ActionId>>,
    pub(crate) events: EventLog,
    pub(crate) rng: StdRng,
    pub(crate) sprites: SpriteSet,
    pub(crate) config: SimConfig,
    pub(crate) next_action_id: u64,
    pub(crate) current_tick: u64,
}

impl Simulation {
    /// Create a simulation over `world`, resolving sprite categories
    /// against `store` once up front.
    pub fn new(world: WorldModel, config: SimConfig, store: &dyn ImageStore) -> Self {
        Self {
            world,
            queue: ActionQueue::new(),
            pending: HashMap::new(),
            events: EventLog::new(config.max_events),
            rng: StdRng::seed_from_u64(config.seed),
            sprites: SpriteSet::load(store),
            config,
            next_action_id: 1,
            current_tick: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Queue `kind` for `entity` at `trigger`, recording it in the entity's
    /// pending set. Returns the action's id for later cancellation.
    pub fn schedule(&mut self, entity: EntityId, kind: ActionKind, trigger: u64) -> ActionId {
        let id = ActionId(self.next_action_id);
        self.next_action_id += 1;
        self.queue.insert(Action { id, entity, kind }, trigger);
        self.pending.entry(entity).or_default().push(id);
        id
    }

    /// Cancel a queued action, dropping it from its entity's pending set.
    /// No-op when the action is absent, since it may already have run.
    pub fn unschedule(&mut self, id: ActionId) {
        if let Some(action) = self.queue.remove(id) {
            self.finish_action(&action);
        }
    }

    /// Drop a popped action from its entity's pending list.
    pub(crate) fn finish_action(&mut self, action: &Action) {
        if let Some(ids) = self.pending.get_mut(&action.entity) {
            ids.retain(|aid| *aid != action.id);
            if ids.is_empty() {
                self.pending.remove(&action.entity);
            }
        }
    }

    /// Cancel every queued action belonging to `id`.
    pub(crate) fn clear_pending(&mut self, id: EntityId) {
        if let Some(ids) = self.pending.remove(&id) {
            for action_id in ids {
                self.queue.remove(action_id);
            }
        }
    }

    /// Schedule an animation cycle for `id` one animation period from `now`.
    ///
    /// `repeat_count` of 0 animates forever; otherwise the animation stops
    /// after that many frames. No-op for unknown or unanimated entities.
    pub fn schedule_animation(&mut self, id: EntityId, repeat_count: u32, now: u64) {
        let rate = self.world.get_entity(id).and_then(Entity::animation_rate);
        if let Some(rate) = rate {
            self.schedule(
                id,
                ActionKind::Animate {
                    remaining: repeat_count,
                },
                now + rate,
            );
        }
    }

    /// Execute every queued action whose trigger time is strictly before
    /// `now`, in trigger order (scheduling order among equal triggers).
    ///
    /// Actions rescheduling themselves land relative to `now`, so nothing
    /// inserted during the drain can come due within the same call. Returns
    /// the dirty cells touched by the drained actions, in execution order
    /// and with duplicates preserved.
    pub fn advance(&mut self, now: u64) -> SimResult<Vec<Point>> {
        let mut tiles = Vec::new();
        while let Some(action) = self.queue.pop_due(now) {
            self.finish_action(&action);
            tiles.extend(self.dispatch(action, now)?);
        }
        self.current_tick = self.current_tick.max(now);
        Ok(tiles)
    }

    // -----------------------------------------------------------------------
    // Entity lifecycle
    // -----------------------------------------------------------------------

    /// Insert a prepared entity without scheduling anything for it.
    ///
    /// Returns `None` for an out-of-bounds position. A displaced previous
    /// occupant has its pending actions cancelled before it is dropped.
    pub fn add_entity(&mut self, entity: Entity) -> Option<EntityId> {
        let (id, displaced) = self.world.insert(entity)?;
        if let Some(displaced) = displaced {
            self.clear_pending(displaced.id);
        }
        Some(id)
    }

    /// Remove an entity, cancelling its pending actions. Returns the dirty
    /// cell it vacated.
    pub fn remove_entity(&mut self, id: EntityId) -> SimResult<Vec<Point>> {
        let pos = self.expect_entity(id)?.position;
        self.despawn(id)?;
        self.emit(
            self.current_tick,
            SimEventKind::EntityRemoved { entity: id },
            format!("{id} removed at {pos}"),
        );
        Ok(vec![pos])
    }

    /// Remove whatever occupies `pt`, cancelling its pending actions.
    /// Returns `None` (a no-op) for an empty or out-of-bounds cell.
    pub fn remove_entity_at(&mut self, pt: Point) -> Option<Entity> {
        let id = self.world.occupant_id(pt)?;
        self.clear_pending(id);
        let entity = self.world.remove_entity(id).ok()?;
        self.emit(
            self.current_tick,
            SimEventKind::EntityRemoved { entity: id },
            format!("{id} removed at {pt}"),
        );
        Some(entity)
    }

    /// Remove `id` from world and queue without logging an event.
    pub(crate) fn despawn(&mut self, id: EntityId) -> SimResult<Entity> {
        self.clear_pending(id);
        Ok(self.world.remove_entity(id)?)
    }

    // -----------------------------------------------------------------------
    // Factories
    // -----------------------------------------------------------------------

    /// Create a not-full miner at `pt`, scheduling its behavior and
    /// animation. Returns `None` for an out-of-bounds position.
    pub fn create_miner(
        &mut self,
        name: impl Into<String>,
        pt: Point,
        rate: u64,
        animation_rate: u64,
        resource_limit: u32,
        now: u64,
    ) -> Option<EntityId> {
        let entity = Entity::new(
            EntityKind::Miner {
                state: MinerState::NotFull,
                rate,
                animation_rate,
                resource_limit,
                resource_count: 0,
            },
            name,
            pt,
            self.sprites.miner.clone(),
        );
        let id = self.add_entity(entity)?;
        self.schedule(id, ActionKind::Miner, now + rate);
        self.schedule_animation(id, 0, now);
        Some(id)
    }

    /// Create a vein at `pt` with a randomized spawn rate, scheduling its
    /// first spawn attempt.
    pub fn create_vein(
        &mut self,
        name: impl Into<String>,
        pt: Point,
        resource_distance: i32,
        now: u64,
    ) -> Option<EntityId> {
        let rate = self
            .rng
            .random_range(self.config.vein_rate_min..=self.config.vein_rate_max);
        let entity = Entity::new(
            EntityKind::Vein {
                rate,
                resource_distance,
            },
            name,
            pt,
            self.sprites.vein.clone(),
        );
        let id = self.add_entity(entity)?;
        self.schedule(id, ActionKind::VeinSpawn, now + rate);
        Some(id)
    }

    /// Create an ore at `pt` with a randomized corruption delay, scheduling
    /// its corruption.
    pub fn create_ore(&mut self, name: impl Into<String>, pt: Point, now: u64) -> Option<EntityId> {
        let rate = self
            .rng
            .random_range(self.config.ore_corrupt_min..=self.config.ore_corrupt_max);
        let entity = Entity::new(EntityKind::Ore { rate }, name, pt, self.sprites.ore.clone());
        let id = self.add_entity(entity)?;
        self.schedule(id, ActionKind::OreCorrupt, now + rate);
        Some(id)
    }

    /// Create an ore blob at `pt` with the given hunt rate and a randomized
    /// animation rate, scheduling its hunt and animation.
    pub fn create_blob(
        &mut self,
        name: impl Into<String>,
        pt: Point,
        rate: u64,
        now: u64,
    ) -> Option<EntityId> {
        let animation_rate = self
            .rng
            .random_range(self.config.blob_animation_min..=self.config.blob_animation_max)
            * BLOB_ANIMATION_RATE_SCALE;
        let entity = Entity::new(
            EntityKind::OreBlob {
                rate,
                animation_rate,
            },
            name,
            pt,
            self.sprites.blob.clone(),
        );
        let id = self.add_entity(entity)?;
        self.schedule(id, ActionKind::BlobHunt, now + rate);
        self.schedule_animation(id, 0, now);
        Some(id)
    }

    /// Create a quake at `pt`, scheduling its finite animation and its
    /// removal one quake duration from `now`.
    pub fn create_quake(&mut self, pt: Point, now: u64) -> Option<EntityId> {
        let entity = Entity::new(
            EntityKind::Quake {
                animation_rate: QUAKE_ANIMATION_RATE,
            },
            "quake",
            pt,
            self.sprites.quake.clone(),
        );
        let id = self.add_entity(entity)?;
        self.schedule_animation(id, QUAKE_STEPS, now);
        self.schedule(id, ActionKind::Death, now + QUAKE_DURATION);
        Some(id)
    }

    /// Create a blacksmith at `pt`. Blacksmiths are passive; nothing is
    /// scheduled for them.
    pub fn create_blacksmith(
        &mut self,
        name: impl Into<String>,
        pt: Point,
        rate: u64,
        resource_limit: u32,
        resource_distance: i32,
    ) -> Option<EntityId> {
        let entity = Entity::new(
            EntityKind::Blacksmith {
                rate,
                resource_distance,
                resource_limit,
                resource_count: 0,
            },
            name,
            pt,
            self.sprites.blacksmith.clone(),
        );
        self.add_entity(entity)
    }

    /// Create an obstacle at `pt`. Obstacles never act.
    pub fn create_obstacle(&mut self, name: impl Into<String>, pt: Point) -> Option<EntityId> {
        let entity = Entity::new(EntityKind::Obstacle, name, pt, self.sprites.obstacle.clone());
        self.add_entity(entity)
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// The underlying world model.
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Mutable access to the underlying world model.
    ///
    /// Mutations bypass pending-action bookkeeping; removing entities
    /// through the world directly leaves their actions queued. Prefer
    /// [`Simulation::remove_entity`].
    pub fn world_mut(&mut self) -> &mut WorldModel {
        &mut self.world
    }

    /// The event log for this run.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The action queue, for inspection.
    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// Ids of the actions currently queued for `id`.
    pub fn pending_actions(&self, id: EntityId) -> &[ActionId] {
        match self.pending.get(&id) {
            Some(ids) => ids,
            None => &[],
        }
    }

    /// The tick most recently passed to [`Simulation::advance`].
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Consume the simulation, yielding its world.
    pub fn into_world(self) -> WorldModel {
        self.world
    }

    // -----------------------------------------------------------------------
    // Internals shared with the behavior rules
    // -----------------------------------------------------------------------

    pub(crate) fn expect_entity(&self, id: EntityId) -> SimResult<&Entity> {
        self.world.get_entity(id).ok_or(SimError::DanglingEntity(id))
    }

    pub(crate) fn expect_entity_mut(&mut self, id: EntityId) -> SimResult<&mut Entity> {
        self.world
            .get_entity_mut(id)
            .ok_or(SimError::DanglingEntity(id))
    }

    pub(crate) fn emit(&mut self, tick: u64, kind: SimEventKind, description: String) {
        self.events.push(SimEvent::new(tick, kind, description));
    }
}
