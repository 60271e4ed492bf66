//! Error types raised by repository implementations.

use rules_core::{ActorId, ItemId};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("actor repository lock was poisoned")]
    LockPoisoned,

    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("actor {0} already exists")]
    ActorExists(ActorId),

    /// An update referenced an item the actor does not own. Nothing was written.
    #[error("item {item} not found on actor {actor}")]
    ItemNotFound { actor: ActorId, item: ItemId },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
