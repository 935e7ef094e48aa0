use crate::entity::EntityId;

/// Alias for `Result<T, GwError>`.
pub type GwResult<T> = Result<T, GwError>;

/// Errors that can occur when manipulating a world model.
///
/// Expected edge conditions (out-of-bounds points, empty cells) are silent
/// no-ops, not errors; an error here means a caller held a reference the
/// world no longer knows about.
#[derive(Debug, thiserror::Error)]
pub enum GwError {
    /// The referenced entity id is not in the registry.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}
