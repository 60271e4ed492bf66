use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rules_core::{ActorChanges, ActorId, ActorSource, ItemId};

use super::ActorRepository;
use super::error::{RepositoryError, Result};

/// In-memory implementation of [`ActorRepository`].
pub struct InMemoryActorRepo {
    actors: RwLock<BTreeMap<ActorId, ActorSource>>,
    next_item: AtomicU64,
}

impl InMemoryActorRepo {
    pub fn new() -> Self {
        Self {
            actors: RwLock::new(BTreeMap::new()),
            next_item: AtomicU64::new(1),
        }
    }

    /// Repository seeded with `actors`.
    pub fn with_actors(actors: impl IntoIterator<Item = ActorSource>) -> Self {
        let repo = Self::new();
        if let Ok(mut map) = repo.actors.write() {
            map.extend(actors.into_iter().map(|actor| (actor.id.clone(), actor)));
        }
        repo
    }

    fn fresh_item_id(&self, actor: &ActorSource) -> ItemId {
        loop {
            let n = self.next_item.fetch_add(1, Ordering::Relaxed);
            let id = ItemId::new(format!("item-{n}"));
            if actor.item(&id).is_none() {
                return id;
            }
        }
    }
}

impl Default for InMemoryActorRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorRepository for InMemoryActorRepo {
    async fn load(&self, id: &ActorId) -> Result<ActorSource> {
        let actors = self.actors.read().map_err(|_| RepositoryError::LockPoisoned)?;
        actors
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::ActorNotFound(id.clone()))
    }

    async fn create(&self, actor: ActorSource) -> Result<()> {
        let mut actors = self.actors.write().map_err(|_| RepositoryError::LockPoisoned)?;
        if actors.contains_key(&actor.id) {
            return Err(RepositoryError::ActorExists(actor.id));
        }
        actors.insert(actor.id.clone(), actor);
        Ok(())
    }

    async fn save(&self, actor: ActorSource) -> Result<()> {
        let mut actors = self.actors.write().map_err(|_| RepositoryError::LockPoisoned)?;
        actors.insert(actor.id.clone(), actor);
        Ok(())
    }

    async fn apply(&self, id: &ActorId, mut changes: ActorChanges) -> Result<ActorSource> {
        let mut actors = self.actors.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let stored = actors
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ActorNotFound(id.clone()))?;

        // Validate before touching the stored copy.
        if let Some(missing) = changes
            .update_items
            .iter()
            .find(|update| stored.item(&update.id).is_none())
        {
            return Err(RepositoryError::ItemNotFound {
                actor: id.clone(),
                item: missing.id.clone(),
            });
        }

        let mut updated = stored.clone();
        for item in &mut changes.create_items {
            if item.id.as_str().is_empty() || updated.item(&item.id).is_some() {
                item.id = self.fresh_item_id(&updated);
            }
            updated.items.push(item.clone());
        }
        changes.create_items.clear();
        changes.apply(&mut updated);

        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &ActorId) -> Result<()> {
        let mut actors = self.actors.write().map_err(|_| RepositoryError::LockPoisoned)?;
        actors
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::ActorNotFound(id.clone()))
    }

    async fn list(&self) -> Result<Vec<ActorId>> {
        let actors = self.actors.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(actors.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use rules_core::{ActorDetails, ActorPatch, ItemData, ItemSource};

    use super::*;

    fn actor() -> ActorSource {
        let mut actor = ActorSource::new("a", "Ayla", ActorDetails::Loot);
        actor.items.push(ItemSource::new("torch", "Torch", ItemData::Equipment));
        actor
    }

    #[tokio::test]
    async fn created_items_get_fresh_ids() {
        let repo = InMemoryActorRepo::with_actors([actor()]);
        let changes = ActorChanges {
            create_items: vec![
                ItemSource::new("", "Rope", ItemData::Equipment),
                ItemSource::new("torch", "Second torch", ItemData::Equipment),
            ],
            ..ActorChanges::default()
        };

        let stored = repo.apply(&ActorId::from("a"), changes).await.unwrap();

        assert_eq!(stored.items.len(), 3);
        assert!(stored.items.iter().all(|item| !item.id.as_str().is_empty()));
        assert_eq!(
            stored.items.iter().filter(|i| i.id.as_str() == "torch").count(),
            1
        );
    }

    #[tokio::test]
    async fn failed_apply_writes_nothing() {
        let repo = InMemoryActorRepo::with_actors([actor()]);
        let changes = ActorChanges {
            actor: ActorPatch::hit_points(3),
            update_items: vec![ItemSource::new("ghost", "Ghost", ItemData::Equipment)],
            ..ActorChanges::default()
        };

        let err = repo.apply(&ActorId::from("a"), changes).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ItemNotFound { .. }));
        assert_eq!(repo.load(&ActorId::from("a")).await.unwrap(), actor());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let repo = InMemoryActorRepo::with_actors([actor()]);
        assert!(matches!(
            repo.create(actor()).await,
            Err(RepositoryError::ActorExists(_))
        ));
        assert_eq!(repo.list().await.unwrap(), vec![ActorId::from("a")]);
    }
}
