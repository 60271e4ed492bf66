use tracing::info;

use rules_core::spellcasting::{
    self, CastOptions, CastOutcome, ConsumableCast, ConsumeFailure, cast_consumable,
    cast_consumable_with_trick, recharge, refocus,
};
use rules_core::{ActorChanges, ActorId, EntryId, ItemId, PreparedActor};

use crate::api::{Result, TRICK_SKILLS};
use crate::events::{Notification, RuntimeEvent, SpellCastEvent};
use crate::runtime::Runtime;

fn failure_subject(failure: &ConsumeFailure) -> Option<&str> {
    match failure {
        ConsumeFailure::NotEnoughFocus => None,
        ConsumeFailure::SlotNotFound { spell }
        | ConsumeFailure::SlotExpended { spell }
        | ConsumeFailure::NoUsesRemaining { spell }
        | ConsumeFailure::NotEnoughSlots { spell, .. } => Some(spell.as_str()),
    }
}

impl Runtime {
    /// Casts `spell` through `entry`.
    ///
    /// Returns `false` when the casting resource is exhausted; a
    /// [`Notification`] carries the reason.
    pub async fn cast(
        &self,
        actor: &ActorId,
        entry: &EntryId,
        spell: &ItemId,
        options: CastOptions,
    ) -> Result<bool> {
        let mut session = self.inner.session.lock().await;
        let prepared = self.prepare_locked(&mut session, actor).await?;
        self.ensure_can_update(&session, &prepared.source)?;

        match spellcasting::cast(&prepared, entry, spell, options)? {
            CastOutcome::Blocked(failure) => {
                info!(
                    target: "rules::spellcasting",
                    actor = %actor,
                    entry = %entry,
                    spell = %spell,
                    reason = failure.notice_key(),
                    "cast blocked"
                );
                let mut notice = Notification::new(failure.notice_key()).for_actor(actor);
                if let Some(subject) = failure_subject(&failure) {
                    notice = notice.about(subject);
                }
                self.notify(notice);
                Ok(false)
            }
            CastOutcome::Cast { message, changes } => {
                self.persist(&mut session, actor, changes).await?;
                if let Some(message) = message {
                    info!(
                        target: "rules::spellcasting",
                        actor = %actor,
                        spell = %message.name,
                        level = message.level,
                        "spell cast"
                    );
                    self.inner.events.publish(RuntimeEvent::SpellCast(SpellCastEvent {
                        actor: actor.clone(),
                        message,
                    }));
                }
                Ok(true)
            }
        }
    }

    /// Casts the spell stored in a scroll or wand.
    ///
    /// Without a matching entry, actors with Trick Magic Item are asked for a
    /// skill through the configured [`crate::api::TrickSkillProvider`].
    pub async fn cast_consumable(&self, actor: &ActorId, consumable: &ItemId) -> Result<bool> {
        let mut session = self.inner.session.lock().await;
        let prepared = self.prepare_locked(&mut session, actor).await?;
        self.ensure_can_update(&session, &prepared.source)?;

        let mut outcome = cast_consumable(&prepared, consumable)?;
        if outcome == ConsumableCast::NeedsTrickMagicItem {
            outcome = match self.inner.trick.choose_skill(&prepared, &TRICK_SKILLS).await {
                Some(skill) => cast_consumable_with_trick(&prepared, consumable, skill)?,
                None => return Ok(false),
            };
        }

        let name = item_name(&prepared, consumable);
        match outcome {
            ConsumableCast::Cast { message, changes } => {
                self.persist(&mut session, actor, changes).await?;
                info!(
                    target: "rules::spellcasting",
                    actor = %actor,
                    consumable = %consumable,
                    spell = %message.name,
                    "consumable cast"
                );
                self.inner.events.publish(RuntimeEvent::SpellCast(SpellCastEvent {
                    actor: actor.clone(),
                    message,
                }));
                Ok(true)
            }
            ConsumableCast::Depleted => {
                self.notify(
                    Notification::new("spellcasting.consumable.depleted")
                        .for_actor(actor)
                        .about(name),
                );
                Ok(false)
            }
            ConsumableCast::Incapable | ConsumableCast::NeedsTrickMagicItem => {
                self.notify(
                    Notification::new("spellcasting.consumable.cannot-cast")
                        .for_actor(actor)
                        .about(name),
                );
                Ok(false)
            }
        }
    }

    /// Full rest: refills slots, innate uses and the focus pool.
    pub async fn rest(&self, actor: &ActorId) -> Result<PreparedActor> {
        let mut session = self.inner.session.lock().await;
        let source = self.inner.repository.load(actor).await?;
        self.ensure_can_update(&session, &source)?;
        let changes = recharge(&source).into_changes();
        info!(target: "rules::spellcasting", actor = %actor, "rest");
        self.persist(&mut session, actor, changes).await
    }

    /// Refills the focus pool. Only `all == true` is supported.
    pub async fn refocus(&self, actor: &ActorId, all: bool) -> Result<PreparedActor> {
        let mut session = self.inner.session.lock().await;
        let source = self.inner.repository.load(actor).await?;
        self.ensure_can_update(&session, &source)?;
        let changes = refocus(&source, all)?
            .map(ActorChanges::from_patch)
            .unwrap_or_default();
        self.persist(&mut session, actor, changes).await
    }
}

fn item_name(actor: &PreparedActor, item: &ItemId) -> String {
    actor
        .source
        .item(item)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| item.to_string())
}
