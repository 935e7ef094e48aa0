//! Behavior rules: what each action kind does when it fires.
//!
//! Actions carry no behavior of their own; everything dispatches through
//! [`Simulation::dispatch`] on the action's kind. Each rule returns the
//! dirty cells it touched and reschedules itself relative to the tick the
//! drain is running at, so self-perpetuating behaviors (miner, vein, blob,
//! animation) never starve the queue within a single advance.

use gw_core::entity::{Entity, EntityId, EntityKind, KindTag, MinerState};
use gw_core::point::Point;

use crate::action::{Action, ActionKind};
use crate::config::BLOB_RATE_SCALE;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::simulation::Simulation;

fn kind_err(entity: EntityId, expected: &'static str) -> SimError {
    SimError::UnexpectedKind { entity, expected }
}

impl Simulation {
    pub(crate) fn dispatch(&mut self, action: Action, now: u64) -> SimResult<Vec<Point>> {
        match action.kind {
            ActionKind::Miner => self.run_miner(action.entity, now),
            ActionKind::VeinSpawn => self.run_vein(action.entity, now),
            ActionKind::OreCorrupt => self.run_ore_corrupt(action.entity, now),
            ActionKind::BlobHunt => self.run_blob(action.entity, now),
            ActionKind::Animate { remaining } => self.run_animate(action.entity, remaining, now),
            ActionKind::Death => self.run_death(action.entity, now),
        }
    }

    // -----------------------------------------------------------------------
    // Miner
    // -----------------------------------------------------------------------

    /// One behavior tick of a miner. Seeks ore or a blacksmith depending on
    /// state, transforms on success, and reschedules for whichever entity
    /// now embodies the miner.
    fn run_miner(&mut self, id: EntityId, now: u64) -> SimResult<Vec<Point>> {
        let miner = self.expect_entity(id)?;
        let EntityKind::Miner { state, rate, .. } = miner.kind else {
            return Err(kind_err(id, "miner"));
        };

        let (tiles, found) = match state {
            MinerState::NotFull => self.miner_seek_ore(id)?,
            MinerState::Full => self.miner_seek_smith(id, now)?,
        };

        let next = if found {
            let to = match state {
                MinerState::NotFull => MinerState::Full,
                MinerState::Full => MinerState::NotFull,
            };
            self.transform_miner(id, to, now)?
        } else {
            id
        };
        self.schedule(next, ActionKind::Miner, now + rate);
        Ok(tiles)
    }

    /// Move toward the nearest ore, or mine it when adjacent. `found` is
    /// whether the miner reached its limit this tick.
    fn miner_seek_ore(&mut self, id: EntityId) -> SimResult<(Vec<Point>, bool)> {
        let pos = self.expect_entity(id)?.position;
        let Some(ore_id) = self.world.find_nearest(pos, KindTag::Ore) else {
            return Ok((Vec::new(), false));
        };
        let ore_pos = self.expect_entity(ore_id)?.position;

        if pos.adjacent(ore_pos) {
            self.despawn(ore_id)?;
            let miner = self.expect_entity_mut(id)?;
            miner.add_resources(1);
            let full = matches!(
                miner.kind,
                EntityKind::Miner {
                    resource_count,
                    resource_limit,
                    ..
                } if resource_count >= resource_limit
            );
            // The vacated ore cell needs a redraw.
            Ok((vec![ore_pos], full))
        } else {
            let step = self.world.next_position(pos, ore_pos);
            let tiles = self.world.move_entity(id, step)?;
            Ok((tiles, false))
        }
    }

    /// Move toward the nearest blacksmith, or hand over the full load when
    /// adjacent. `found` is whether delivery happened this tick.
    fn miner_seek_smith(&mut self, id: EntityId, now: u64) -> SimResult<(Vec<Point>, bool)> {
        let pos = self.expect_entity(id)?.position;
        let Some(smith_id) = self.world.find_nearest(pos, KindTag::Blacksmith) else {
            return Ok((Vec::new(), false));
        };
        let smith_pos = self.expect_entity(smith_id)?.position;

        if pos.adjacent(smith_pos) {
            let amount = self.expect_entity_mut(id)?.take_resources();
            self.expect_entity_mut(smith_id)?.add_resources(amount);
            self.emit(
                now,
                SimEventKind::OreDelivered {
                    miner: id,
                    smith: smith_id,
                    amount,
                },
                format!("{id} delivered {amount} ore to {smith_id}"),
            );
            Ok((Vec::new(), true))
        } else {
            let step = self.world.next_position(pos, smith_pos);
            let tiles = self.world.move_entity(id, step)?;
            Ok((tiles, false))
        }
    }

    /// Replace a miner with one of the other state at the same cell.
    ///
    /// The old entity's remaining actions (its animation) are cancelled
    /// with it; the replacement gets a fresh infinite animation and keeps
    /// name, cadences, limit, and carried load. Returns the new id.
    fn transform_miner(&mut self, id: EntityId, to: MinerState, now: u64) -> SimResult<EntityId> {
        let pos = self.expect_entity(id)?.position;
        let old = self.despawn(id)?;
        let EntityKind::Miner {
            rate,
            animation_rate,
            resource_limit,
            resource_count,
            ..
        } = old.kind
        else {
            return Err(kind_err(id, "miner"));
        };

        let replacement = Entity::new(
            EntityKind::Miner {
                state: to,
                rate,
                animation_rate,
                resource_limit,
                resource_count,
            },
            old.name,
            pos,
            old.images,
        );
        // The vacated cell is in bounds, so reinsertion cannot fail.
        let (new_id, _) = self
            .world
            .insert(replacement)
            .ok_or(SimError::DanglingEntity(id))?;
        self.schedule_animation(new_id, 0, now);
        self.emit(
            now,
            SimEventKind::MinerTransformed {
                from: id,
                to: new_id,
                full: matches!(to, MinerState::Full),
            },
            format!("{id} became {new_id} at {pos}"),
        );
        Ok(new_id)
    }

    // -----------------------------------------------------------------------
    // Vein and ore
    // -----------------------------------------------------------------------

    /// Try to spawn an ore on the first open cell around the vein, then
    /// reschedule.
    fn run_vein(&mut self, id: EntityId, now: u64) -> SimResult<Vec<Point>> {
        let vein = self.expect_entity(id)?;
        let EntityKind::Vein {
            rate,
            resource_distance,
        } = vein.kind
        else {
            return Err(kind_err(id, "vein"));
        };
        let pos = vein.position;
        let name = vein.name.clone();

        let tiles = match self.world.find_open_around(pos, resource_distance) {
            Some(open_pt) => {
                // Position is in bounds by construction, so the factory
                // cannot decline.
                if let Some(ore_id) = self.create_ore(format!("ore - {name} - {now}"), open_pt, now)
                {
                    self.emit(
                        now,
                        SimEventKind::OreSpawned {
                            vein: id,
                            ore: ore_id,
                            at: open_pt,
                        },
                        format!("{id} spawned {ore_id} at {open_pt}"),
                    );
                }
                vec![open_pt]
            }
            None => Vec::new(),
        };

        self.schedule(id, ActionKind::VeinSpawn, now + rate);
        Ok(tiles)
    }

    /// Replace an ore with an ore blob hunting at a quarter of the ore's
    /// corruption delay.
    fn run_ore_corrupt(&mut self, id: EntityId, now: u64) -> SimResult<Vec<Point>> {
        let ore = self.expect_entity(id)?;
        let EntityKind::Ore { rate } = ore.kind else {
            return Err(kind_err(id, "ore"));
        };
        let pos = ore.position;
        let name = ore.name.clone();

        self.despawn(id)?;
        if let Some(blob_id) = self.create_blob(format!("{name} -- blob"), pos, rate / BLOB_RATE_SCALE, now)
        {
            self.emit(
                now,
                SimEventKind::OreCorrupted { ore: id, blob: blob_id },
                format!("{id} corrupted into {blob_id} at {pos}"),
            );
        }
        Ok(vec![pos])
    }

    // -----------------------------------------------------------------------
    // Blob and quake
    // -----------------------------------------------------------------------

    /// Hunt the nearest vein: destroy it when adjacent (leaving a quake),
    /// otherwise take one step toward it, consuming any ore stepped onto.
    fn run_blob(&mut self, id: EntityId, now: u64) -> SimResult<Vec<Point>> {
        let blob = self.expect_entity(id)?;
        let EntityKind::OreBlob { rate, .. } = blob.kind else {
            return Err(kind_err(id, "blob"));
        };
        let pos = blob.position;

        let (tiles, found) = match self.world.find_nearest(pos, KindTag::Vein) {
            None => (Vec::new(), false),
            Some(vein_id) => {
                let vein_pos = self.expect_entity(vein_id)?.position;
                if pos.adjacent(vein_pos) {
                    self.despawn(vein_id)?;
                    self.emit(
                        now,
                        SimEventKind::VeinDestroyed { blob: id, vein: vein_id },
                        format!("{id} destroyed {vein_id} at {vein_pos}"),
                    );
                    (vec![vein_pos], true)
                } else {
                    let step = self.world.next_position_through_ore(pos, vein_pos);
                    if let Some(occupant) = self.world.occupant_id(step) {
                        if self.expect_entity(occupant)?.tag() == KindTag::Ore {
                            self.despawn(occupant)?;
                        }
                    }
                    let tiles = self.world.move_entity(id, step)?;
                    (tiles, false)
                }
            }
        };

        let next_time = if found {
            let quake_pos = tiles[0];
            if let Some(quake_id) = self.create_quake(quake_pos, now) {
                self.emit(
                    now,
                    SimEventKind::QuakeSpawned {
                        quake: quake_id,
                        at: quake_pos,
                    },
                    format!("{quake_id} rumbles at {quake_pos}"),
                );
            }
            now + rate * 2
        } else {
            now + rate
        };
        self.schedule(id, ActionKind::BlobHunt, next_time);
        Ok(tiles)
    }

    // -----------------------------------------------------------------------
    // Animation and death
    // -----------------------------------------------------------------------

    /// Advance one animation frame. `remaining` of 0 repeats forever; a
    /// count of 1 means this was the last frame.
    fn run_animate(&mut self, id: EntityId, remaining: u32, now: u64) -> SimResult<Vec<Point>> {
        let (pos, rate) = {
            let entity = self.expect_entity_mut(id)?;
            entity.next_image();
            (entity.position, entity.animation_rate())
        };
        if remaining != 1 {
            if let Some(rate) = rate {
                self.schedule(
                    id,
                    ActionKind::Animate {
                        remaining: remaining.saturating_sub(1),
                    },
                    now + rate,
                );
            }
        }
        Ok(vec![pos])
    }

    /// Remove the entity outright (quake expiry).
    fn run_death(&mut self, id: EntityId, now: u64) -> SimResult<Vec<Point>> {
        let pos = self.expect_entity(id)?.position;
        self.despawn(id)?;
        self.emit(
            now,
            SimEventKind::EntityRemoved { entity: id },
            format!("{id} expired at {pos}"),
        );
        Ok(vec![pos])
    }
}
