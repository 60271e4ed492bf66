use std::collections::BTreeMap;

use tracing::{debug, info};

use rules_core::{ActorChanges, ActorId, ItemId};

use crate::api::Result;
use crate::events::{EffectsExpiredEvent, RuntimeEvent};
use crate::repository::RepositoryError;
use crate::runtime::{Runtime, Session};

impl Runtime {
    /// Advances the world clock by `seconds` and refreshes effects.
    ///
    /// The clock is monotonic; negative steps are ignored. Returns the actors
    /// whose effects changed expiry state.
    pub async fn advance_time(&self, seconds: i64) -> Result<Vec<ActorId>> {
        let mut session = self.inner.session.lock().await;
        session.world_time += seconds.max(0);
        self.refresh_locked(&mut session).await
    }

    /// Re-evaluates tracked effects against the current clock and encounter.
    pub async fn refresh_effects(&self) -> Result<Vec<ActorId>> {
        let mut session = self.inner.session.lock().await;
        self.refresh_locked(&mut session).await
    }

    /// Deletes expired effects, of one actor or of everyone.
    ///
    /// Only actors this process is the primary updater for are touched.
    pub async fn remove_expired(&self, actor: Option<&ActorId>) -> Result<Vec<(ActorId, ItemId)>> {
        let mut session = self.inner.session.lock().await;
        self.remove_expired_locked(&mut session, actor).await
    }

    pub(crate) async fn refresh_locked(&self, session: &mut Session) -> Result<Vec<ActorId>> {
        let changed = session
            .tracker
            .refresh(session.world_time, session.encounter.as_ref());
        if changed.is_empty() {
            return Ok(changed);
        }
        debug!(target: "rules::effects", actors = changed.len(), "effect expiry changed");

        for actor in &changed {
            match self.prepare_locked(session, actor).await {
                Ok(_) => {}
                Err(crate::RuntimeError::Repository(RepositoryError::ActorNotFound(_))) => {
                    session.tracker.unregister_actor(actor);
                    continue;
                }
                Err(e) => return Err(e),
            }

            if self.inner.config.rules.remove_expired_effects {
                self.remove_expired_locked(session, Some(actor)).await?;
            } else {
                let items: Vec<ItemId> = session
                    .tracker
                    .expired(Some(actor), session.world_time, session.encounter.as_ref())
                    .into_iter()
                    .map(|(_, item)| item)
                    .collect();
                if !items.is_empty() {
                    self.inner
                        .events
                        .publish(RuntimeEvent::EffectsExpired(EffectsExpiredEvent {
                            actor: actor.clone(),
                            items,
                            removed: false,
                        }));
                }
            }
        }
        Ok(changed)
    }

    pub(crate) async fn remove_expired_locked(
        &self,
        session: &mut Session,
        actor: Option<&ActorId>,
    ) -> Result<Vec<(ActorId, ItemId)>> {
        let expired = session
            .tracker
            .expired(actor, session.world_time, session.encounter.as_ref());

        let mut by_actor: BTreeMap<ActorId, Vec<ItemId>> = BTreeMap::new();
        for (owner, item) in expired {
            by_actor.entry(owner).or_default().push(item);
        }

        let mut removed = Vec::new();
        for (owner, items) in by_actor {
            let source = self.inner.repository.load(&owner).await?;
            if !self.is_primary(session, &source) {
                continue;
            }
            let changes = ActorChanges {
                delete_items: items.clone(),
                ..ActorChanges::default()
            };
            self.persist(session, &owner, changes).await?;
            for item in &items {
                session.tracker.unregister(&owner, item);
            }
            info!(
                target: "rules::effects",
                actor = %owner,
                count = items.len(),
                "expired effects removed"
            );
            self.inner
                .events
                .publish(RuntimeEvent::EffectsExpired(EffectsExpiredEvent {
                    actor: owner.clone(),
                    items: items.clone(),
                    removed: true,
                }));
            removed.extend(items.into_iter().map(|item| (owner.clone(), item)));
        }
        Ok(removed)
    }
}
