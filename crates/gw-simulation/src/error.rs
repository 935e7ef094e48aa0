use gw_core::entity::EntityId;
use gw_core::error::GwError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation.
///
/// These are never expected gameplay conditions: a queued action pointing
/// at an entity the world no longer holds means pending-action bookkeeping
/// broke, and masking it would corrupt all subsequent scheduling.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A queued action referenced an entity missing from the world.
    #[error("action references missing entity {0}")]
    DanglingEntity(EntityId),

    /// An entity did not have the kind its scheduled action requires.
    #[error("entity {entity} is not a {expected}")]
    UnexpectedKind {
        /// The mismatched entity.
        entity: EntityId,
        /// The kind the action expected to operate on.
        expected: &'static str,
    },

    /// An underlying world-model operation failed.
    #[error(transparent)]
    World(#[from] GwError),
}
