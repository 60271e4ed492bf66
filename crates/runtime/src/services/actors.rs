use tracing::debug;

use rules_core::{ActorChanges, ActorId, ActorSource, PreparedActor, ToggleRequest};

use crate::api::Result;
use crate::runtime::Runtime;

impl Runtime {
    /// Stores a new actor and runs its first pass.
    pub async fn create_actor(&self, actor: ActorSource) -> Result<PreparedActor> {
        let mut session = self.inner.session.lock().await;
        self.inner.repository.create(actor.clone()).await?;
        Ok(self.prepare_source(&mut session, &actor))
    }

    /// Persists a change request built by the caller, for instance one of the
    /// spellcasting entry management operations.
    pub async fn update_actor(&self, actor: &ActorId, changes: ActorChanges) -> Result<PreparedActor> {
        let mut session = self.inner.session.lock().await;
        let source = self.inner.repository.load(actor).await?;
        self.ensure_can_update(&session, &source)?;
        self.persist(&mut session, actor, changes).await
    }

    /// Flips (or sets) a toggleable roll option.
    ///
    /// Returns the option's new value, or `None` when nothing matched or the
    /// value was already set.
    pub async fn toggle(&self, actor: &ActorId, request: &ToggleRequest) -> Result<Option<bool>> {
        let mut session = self.inner.session.lock().await;
        let prepared = self.prepare_locked(&mut session, actor).await?;
        self.ensure_can_update(&session, &prepared.source)?;

        let Some(plan) = prepared.toggle(request)? else {
            return Ok(None);
        };
        let value = plan.value();
        debug!(
            target: "rules::prepare",
            actor = %actor,
            domain = %request.domain,
            option = %request.option,
            value,
            "roll option toggled"
        );
        self.persist(&mut session, actor, plan.into_changes()).await?;
        Ok(Some(value))
    }
}
