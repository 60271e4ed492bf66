//! Repository contract for persisted actor documents.

use async_trait::async_trait;
use rules_core::{ActorChanges, ActorId, ActorSource};

use super::error::Result;

/// Persistence of actors and their embedded items.
///
/// Writes are all-or-nothing: [`ActorRepository::apply`] either stores every
/// part of the change set or returns an error and leaves the actor untouched.
#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Load an actor by id.
    async fn load(&self, id: &ActorId) -> Result<ActorSource>;

    /// Insert a new actor.
    async fn create(&self, actor: ActorSource) -> Result<()>;

    /// Replace a stored actor wholesale.
    async fn save(&self, actor: ActorSource) -> Result<()>;

    /// Apply one change set and return the stored result.
    ///
    /// Created items with an empty id are assigned a fresh one.
    async fn apply(&self, id: &ActorId, changes: ActorChanges) -> Result<ActorSource>;

    async fn delete(&self, id: &ActorId) -> Result<()>;

    /// Ids of every stored actor, sorted.
    async fn list(&self) -> Result<Vec<ActorId>>;

    async fn exists(&self, id: &ActorId) -> bool {
        self.load(id).await.is_ok()
    }
}
