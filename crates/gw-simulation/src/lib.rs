//! The Grubenwelt simulation kernel: a chronological action queue driving
//! entity behavior over a gw-core world model.
//!
//! Entities never poll. Each acting entity keeps scheduled [`action::Action`]
//! records in the queue, and [`Simulation::advance`] drains everything due
//! before a given tick, dispatching each record through the behavior rules.
//! Runs are deterministic for a fixed [`SimConfig`] seed and call sequence.

/// Scheduled action records and their kinds.
pub mod action;
/// Configuration and behavior constants.
pub mod config;
/// Error types surfaced by the simulation.
pub mod error;
/// The simulation event log.
pub mod event;
/// The time-ordered action queue.
pub mod queue;
/// Sprite resolution for entity factories.
pub mod sprites;

mod rules;
mod simulation;

/// Re-export action types.
pub use action::{Action, ActionId, ActionKind};
/// Re-export configuration types.
pub use config::SimConfig;
/// Re-export error types.
pub use error::{SimError, SimResult};
/// Re-export event types.
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`queue::ActionQueue`].
pub use queue::ActionQueue;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`sprites::SpriteSet`].
pub use sprites::SpriteSet;
