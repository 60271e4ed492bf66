use std::collections::BTreeMap;

use tracing::{debug, info};

use rules_core::effects::{EncounterEndAction, encounter_end_changes};
use rules_core::encounter::{Combatant, Encounter, InitiativeUpdate, TurnChange};
use rules_core::{ActorId, CombatantId};

use crate::api::{Result, RuntimeError};
use crate::events::{EffectsExpiredEvent, RuntimeEvent, TurnEvent};
use crate::hooks::HookContext;
use crate::runtime::{Runtime, Session};

impl Runtime {
    /// Creates the encounter from `combatants`.
    ///
    /// Every actor must be allowed into initiative; tiebreak priorities are
    /// taken from each actor's preparation pass.
    pub async fn create_encounter(&self, combatants: Vec<Combatant>) -> Result<()> {
        let mut session = self.inner.session.lock().await;
        if session.encounter.as_ref().is_some_and(|e| e.started) {
            return Err(RuntimeError::EncounterRunning);
        }

        let mut tiebreaks = BTreeMap::new();
        for combatant in &combatants {
            let source = self.inner.repository.load(&combatant.actor).await?;
            Encounter::can_join(&source)?;
            let prepared = self.prepare_source(&mut session, &source);
            tiebreaks.insert(combatant.actor.clone(), prepared.initiative_tiebreak);
        }

        let mut encounter = Encounter::new(combatants);
        encounter.set_tiebreaks(&tiebreaks);
        info!(
            target: "runtime::encounter",
            combatants = encounter.turns().len(),
            "encounter created"
        );
        session.encounter = Some(encounter);
        Ok(())
    }

    pub async fn add_combatant(&self, combatant: Combatant) -> Result<()> {
        let mut session = self.inner.session.lock().await;
        if session.encounter.is_none() {
            return Err(RuntimeError::NoEncounter);
        }
        let source = self.inner.repository.load(&combatant.actor).await?;
        let tiebreak = self.prepare_source(&mut session, &source).initiative_tiebreak;
        let encounter = session.encounter.as_mut().ok_or(RuntimeError::NoEncounter)?;
        let actor = combatant.actor.clone();
        encounter.add_combatant(combatant, &source)?;
        encounter.set_tiebreaks(&BTreeMap::from([(actor, tiebreak)]));
        Ok(())
    }

    pub async fn remove_combatant(&self, id: &CombatantId) -> Result<Combatant> {
        let mut session = self.inner.session.lock().await;
        let encounter = session.encounter.as_mut().ok_or(RuntimeError::NoEncounter)?;
        Ok(encounter.remove_combatant(id)?)
    }

    /// Sets initiative values (and optional override priorities). The
    /// current combatant keeps its turn.
    pub async fn set_initiatives(&self, updates: &[InitiativeUpdate]) -> Result<()> {
        let mut session = self.inner.session.lock().await;
        let encounter = session.encounter.as_mut().ok_or(RuntimeError::NoEncounter)?;
        encounter.set_initiatives(updates)?;
        Ok(())
    }

    /// Starts round one and runs the first combatant's turn start.
    pub async fn start_encounter(&self) -> Result<TurnChange> {
        let mut session = self.inner.session.lock().await;
        let encounter = session.encounter.as_mut().ok_or(RuntimeError::NoEncounter)?;
        if encounter.turns().is_empty() {
            return Err(rules_core::EncounterError::NoCombatants.into());
        }
        let change = encounter.start();
        self.process_turn_change(&mut session, &change).await?;
        Ok(change)
    }

    /// Ends the current turn and starts the next one.
    pub async fn next_turn(&self) -> Result<TurnChange> {
        let mut session = self.inner.session.lock().await;
        let encounter = session.encounter.as_mut().ok_or(RuntimeError::NoEncounter)?;
        let change = encounter.next_turn()?;
        self.process_turn_change(&mut session, &change).await?;
        Ok(change)
    }

    /// Ends the encounter. Encounter-length effects of participants are
    /// expired or deleted according to the automation settings, each write
    /// performed only by the actor's primary updater.
    pub async fn end_encounter(&self) -> Result<()> {
        let mut session = self.inner.session.lock().await;
        let encounter = session.encounter.take().ok_or(RuntimeError::NoEncounter)?;
        info!(target: "runtime::encounter", round = encounter.round, "encounter ended");

        let action = EncounterEndAction::from_config(&self.inner.config.rules);
        for actor in encounter.participants() {
            let source = match self.inner.repository.load(&actor).await {
                Ok(source) => source,
                Err(e) => {
                    debug!(target: "runtime::encounter", actor = %actor, error = %e, "participant gone");
                    continue;
                }
            };
            let changes = action
                .filter(|_| self.is_primary(&session, &source))
                .and_then(|action| encounter_end_changes(&source, action).map(|c| (action, c)));
            match changes {
                Some((action, changes)) => {
                    let mut items = changes.delete_items.clone();
                    items.extend(changes.update_items.iter().map(|item| item.id.clone()));
                    self.persist(&mut session, &actor, changes).await?;
                    self.inner
                        .events
                        .publish(RuntimeEvent::EffectsExpired(EffectsExpiredEvent {
                            actor,
                            items,
                            removed: action == EncounterEndAction::Delete,
                        }));
                }
                None => {
                    self.prepare_source(&mut session, &source);
                }
            }
        }
        self.refresh_locked(&mut session).await?;
        Ok(())
    }

    async fn process_turn_change(&self, session: &mut Session, change: &TurnChange) -> Result<()> {
        let actor_of = |encounter: &Encounter, id: &Option<CombatantId>| {
            id.as_ref()
                .and_then(|id| encounter.combatant(id))
                .map(|c| (c.id.clone(), c.actor.clone()))
        };
        let Some(encounter) = session.encounter.as_ref() else {
            return Ok(());
        };
        let ended = actor_of(encounter, &change.ended);
        let started = actor_of(encounter, &change.started);

        if let Some((combatant, actor)) = ended {
            self.inner.events.publish(RuntimeEvent::TurnEnded(TurnEvent {
                combatant,
                actor,
                round: change.round,
            }));
        }
        if let Some((combatant, actor)) = started {
            debug!(
                target: "runtime::encounter",
                combatant = %combatant,
                actor = %actor,
                round = change.round,
                "turn started"
            );
            self.inner.events.publish(RuntimeEvent::TurnStarted(TurnEvent {
                combatant,
                actor,
                round: change.round,
            }));
        }

        let first_time = session
            .encounter
            .as_mut()
            .and_then(|encounter| encounter.begin_turn().cloned());
        if let Some(combatant) = first_time {
            self.on_turn_start(session, &combatant, change.round).await?;
        }
        self.refresh_locked(session).await?;
        Ok(())
    }

    /// Start-of-turn processing: rule element updates and other hooks,
    /// persisted only by the actor's primary updater.
    async fn on_turn_start(&self, session: &mut Session, combatant: &Combatant, round: u32) -> Result<()> {
        let source = self.inner.repository.load(&combatant.actor).await?;
        if !self.is_primary(session, &source) {
            debug!(
                target: "runtime::hooks",
                actor = %combatant.actor,
                "not the primary updater, skipping turn start"
            );
            return Ok(());
        }

        let prepared = self.prepare_source(session, &source);
        let changes = self.inner.hooks.execute_hooks(&HookContext {
            actor: &prepared,
            combatant,
            round,
            world_time: session.world_time,
            settings: &self.inner.config.rules,
        })?;
        if let Some(changes) = changes {
            self.persist(session, &combatant.actor, changes).await?;
        }
        Ok(())
    }

    /// Whether `actor` is a participant of the running encounter.
    pub async fn in_encounter(&self, actor: &ActorId) -> bool {
        let session = self.inner.session.lock().await;
        session
            .encounter
            .as_ref()
            .is_some_and(|encounter| encounter.is_participant(actor))
    }
}
