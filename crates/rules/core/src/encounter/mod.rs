//! Encounter turn order.
//!
//! Only ordering and turn bookkeeping live here; storing the encounter is the
//! host's concern. Combatants are kept sorted by [`compare_combatants`] at all
//! times, so `turn` is an index into that order.
mod combatant;
mod error;
mod order;

use std::collections::BTreeMap;

pub use combatant::Combatant;
pub use error::{EncounterError, Exclusion};
pub use order::{compare_combatants, higher_initiative};

use crate::actor::{ActorKind, ActorSource};
use crate::ids::{ActorId, CombatantId};

/// New initiative for one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiativeUpdate {
    pub id: CombatantId,
    pub value: i32,
    pub override_priority: Option<i32>,
}

impl InitiativeUpdate {
    pub fn new(id: impl Into<CombatantId>, value: i32) -> Self {
        Self {
            id: id.into(),
            value,
            override_priority: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.override_priority = Some(priority);
        self
    }
}

/// Result of advancing the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnChange {
    pub ended: Option<CombatantId>,
    pub started: Option<CombatantId>,
    pub round: u32,
    pub new_round: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    combatants: Vec<Combatant>,
    pub round: u32,
    pub turn: usize,
    pub started: bool,
    /// Whether this is the encounter currently being viewed and run.
    pub active: bool,
}

impl Encounter {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        let mut encounter = Self {
            combatants,
            round: 0,
            turn: 0,
            started: false,
            active: true,
        };
        encounter.combatants.sort_by(compare_combatants);
        encounter
    }

    /// Combatants in turn order.
    pub fn turns(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    pub fn combatant_for(&self, actor: &ActorId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.actor == actor)
    }

    /// Combatant whose turn it is.
    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn)
    }

    /// Distinct participating actors in turn order.
    pub fn participants(&self) -> Vec<ActorId> {
        let mut actors: Vec<ActorId> = Vec::new();
        for combatant in &self.combatants {
            if !actors.contains(&combatant.actor) {
                actors.push(combatant.actor.clone());
            }
        }
        actors
    }

    pub fn is_participant(&self, actor: &ActorId) -> bool {
        self.combatant_for(actor).is_some()
    }

    /// Loot actors, minions, and eidolons never roll initiative.
    pub fn can_join(actor: &ActorSource) -> Result<(), EncounterError> {
        let reason = if actor.has_trait("minion") {
            Some(Exclusion::Minion)
        } else if actor.has_trait("eidolon") {
            Some(Exclusion::Eidolon)
        } else if actor.kind() == ActorKind::Loot {
            Some(Exclusion::Loot)
        } else {
            None
        };
        match reason {
            Some(reason) => Err(EncounterError::Excluded {
                actor: actor.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    pub fn add_combatant(
        &mut self,
        combatant: Combatant,
        actor: &ActorSource,
    ) -> Result<(), EncounterError> {
        Self::can_join(actor)?;
        self.resort(|combatants| combatants.push(combatant));
        Ok(())
    }

    pub fn remove_combatant(&mut self, id: &CombatantId) -> Result<Combatant, EncounterError> {
        let index = self
            .combatants
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| EncounterError::CombatantNotFound(id.clone()))?;
        let removed = self.combatants.remove(index);
        if index < self.turn {
            self.turn -= 1;
        }
        if self.turn >= self.combatants.len() {
            self.turn = 0;
        }
        Ok(removed)
    }

    /// Applies several initiatives at once, keeping the current combatant's turn.
    pub fn set_initiatives(&mut self, updates: &[InitiativeUpdate]) -> Result<(), EncounterError> {
        if let Some(missing) = updates.iter().find(|u| self.combatant(&u.id).is_none()) {
            return Err(EncounterError::CombatantNotFound(missing.id.clone()));
        }
        self.resort(|combatants| {
            for update in updates {
                if let Some(combatant) = combatants.iter_mut().find(|c| c.id == update.id) {
                    combatant.initiative = Some(update.value);
                    match update.override_priority {
                        Some(priority) => {
                            combatant.override_priority.insert(update.value, priority);
                        }
                        None => {
                            combatant.override_priority.remove(&update.value);
                        }
                    }
                }
            }
        });
        Ok(())
    }

    /// Records each actor's own tiebreak priority.
    pub fn set_tiebreaks(&mut self, priorities: &BTreeMap<ActorId, Option<i32>>) {
        self.resort(|combatants| {
            for combatant in combatants.iter_mut() {
                if let Some(priority) = priorities.get(&combatant.actor) {
                    combatant.tiebreak_priority = *priority;
                }
            }
        });
    }

    fn resort(&mut self, edit: impl FnOnce(&mut Vec<Combatant>)) {
        let current = self.current().map(|c| c.id.clone());
        edit(&mut self.combatants);
        self.combatants.sort_by(compare_combatants);
        self.turn = current
            .and_then(|id| self.combatants.iter().position(|c| c.id == id))
            .unwrap_or(0);
    }

    pub fn start(&mut self) -> TurnChange {
        self.started = true;
        self.round = 1;
        self.turn = 0;
        TurnChange {
            ended: None,
            started: self.current().map(|c| c.id.clone()),
            round: self.round,
            new_round: true,
        }
    }

    /// Advances to the next combatant, wrapping into a new round.
    pub fn next_turn(&mut self) -> Result<TurnChange, EncounterError> {
        if self.combatants.is_empty() {
            return Err(EncounterError::NoCombatants);
        }
        if !self.started {
            return Ok(self.start());
        }
        let ended = self.current().map(|c| c.id.clone());
        let new_round = self.turn + 1 >= self.combatants.len();
        if new_round {
            self.round += 1;
            self.turn = 0;
        } else {
            self.turn += 1;
        }
        Ok(TurnChange {
            ended,
            started: self.current().map(|c| c.id.clone()),
            round: self.round,
            new_round,
        })
    }

    /// Marks the current combatant as having started its turn this round.
    ///
    /// Returns the combatant only the first time per round, so start-of-turn
    /// processing happens once even if the turn is revisited.
    pub fn begin_turn(&mut self) -> Option<&Combatant> {
        if !self.started {
            return None;
        }
        let round = self.round;
        let combatant = self.combatants.get_mut(self.turn)?;
        if combatant.round_of_last_turn == Some(round) {
            return None;
        }
        combatant.round_of_last_turn = Some(round);
        Some(combatant)
    }

    /// Roll options describing the encounter from `actor`'s point of view.
    ///
    /// Empty unless the encounter has started and the actor has rolled
    /// initiative in it.
    pub fn participant_options(&self, actor: &ActorId) -> BTreeMap<String, bool> {
        let mut options = BTreeMap::new();
        let Some(rank) = self
            .combatants
            .iter()
            .position(|c| &c.actor == actor && c.has_rolled())
        else {
            return options;
        };
        if !self.started {
            return options;
        }
        options.insert(format!("encounter:round:{}", self.round), true);
        options.insert(format!("encounter:turn:{}", self.turn + 1), true);
        let own_turn = self.current().is_some_and(|c| &c.actor == actor);
        options.insert("self:participant:own-turn".to_owned(), own_turn);
        options.insert(format!("self:participant:initiative:rank:{}", rank + 1), true);
        options
    }
}
