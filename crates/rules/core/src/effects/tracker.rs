//! World-level index of time-tracked effects.
use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::actor::{ActorChanges, ActorSource, ItemData, ItemSource};
use crate::config::RulesConfig;
use crate::encounter::Encounter;
use crate::ids::{ActorId, ItemId};

use super::duration::{DurationUnit, EffectSource, ExpiryTiming, RemainingDuration};

/// A timed effect known to the tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedEffect {
    pub actor: ActorId,
    pub item: ItemId,
    pub effect: EffectSource,
    /// Expiry state observed when the effect was last registered or refreshed.
    pub expired: bool,
}

impl TrackedEffect {
    /// Sort key: end time (equivalent to remaining duration), then higher
    /// start initiative, then turn-start before turn-end.
    fn sort_key(&self) -> (i64, Reverse<i32>, ExpiryTiming) {
        (
            self.effect.end_time().unwrap_or(i64::MAX),
            Reverse(self.effect.start.initiative.unwrap_or(0)),
            self.effect.duration.timing().unwrap_or_default(),
        )
    }

    pub fn remaining(&self, world_time: i64, combat: Option<&Encounter>) -> RemainingDuration {
        self.effect.remaining_duration(world_time, combat)
    }

    fn is(&self, actor: &ActorId, item: &ItemId) -> bool {
        &self.actor == actor && &self.item == item
    }
}

/// Effects sorted by remaining duration plus the set of aura-granted effects.
#[derive(Clone, Debug, Default)]
pub struct EffectTracker {
    effects: Vec<TrackedEffect>,
    auras: BTreeSet<(ActorId, ItemId)>,
}

impl EffectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[TrackedEffect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn auras(&self) -> impl Iterator<Item = &(ActorId, ItemId)> {
        self.auras.iter()
    }

    pub fn is_sorted(&self) -> bool {
        self.effects
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }

    /// Tracks, re-sorts, or drops an effect according to its duration unit.
    ///
    /// Returns the computed remaining duration. The list is only re-spliced
    /// when the effect's position could have changed.
    pub fn register(
        &mut self,
        actor: &ActorId,
        item: &ItemSource,
        world_time: i64,
        combat: Option<&Encounter>,
    ) -> Option<RemainingDuration> {
        let effect = item.as_effect()?;
        let key = (actor.clone(), item.id.clone());
        if effect.from_aura {
            self.auras.insert(key);
        } else {
            self.auras.remove(&key);
        }

        let existing = self.effects.iter().position(|e| e.is(actor, &item.id));
        if matches!(
            effect.duration.unit,
            DurationUnit::Unlimited | DurationUnit::Encounter
        ) {
            if let Some(index) = existing {
                self.effects.remove(index);
            }
            return Some(effect.remaining_duration(world_time, combat));
        }

        let remaining = effect.remaining_duration(world_time, combat);
        let tracked = TrackedEffect {
            actor: actor.clone(),
            item: item.id.clone(),
            effect: effect.clone(),
            expired: remaining.expired,
        };
        match existing {
            Some(index) if self.effects[index].sort_key() == tracked.sort_key() => {
                self.effects[index] = tracked;
            }
            Some(index) => {
                self.effects.remove(index);
                self.insert(tracked);
            }
            None => self.insert(tracked),
        }
        Some(remaining)
    }

    /// Registers every effect of an actor and forgets effects it no longer owns.
    pub fn register_actor(
        &mut self,
        actor: &ActorSource,
        world_time: i64,
        combat: Option<&Encounter>,
    ) {
        self.effects
            .retain(|e| e.actor != actor.id || actor.item(&e.item).is_some());
        self.auras
            .retain(|(owner, item)| owner != &actor.id || actor.item(item).is_some());
        for item in &actor.items {
            self.register(&actor.id, item, world_time, combat);
        }
    }

    fn insert(&mut self, tracked: TrackedEffect) {
        let key = tracked.sort_key();
        let index = self.effects.partition_point(|e| e.sort_key() <= key);
        self.effects.insert(index, tracked);
    }

    pub fn unregister(&mut self, actor: &ActorId, item: &ItemId) {
        self.effects.retain(|e| !e.is(actor, item));
        self.auras.remove(&(actor.clone(), item.clone()));
    }

    pub fn unregister_actor(&mut self, actor: &ActorId) {
        self.effects.retain(|e| &e.actor != actor);
        self.auras.retain(|(owner, _)| owner != actor);
    }

    /// Re-evaluates expiry from the front of the list.
    ///
    /// Stops at the first unexpired effect whose state did not change. Returns
    /// each actor with a changed effect once, in list order.
    pub fn refresh(&mut self, world_time: i64, combat: Option<&Encounter>) -> Vec<ActorId> {
        let mut changed: Vec<ActorId> = Vec::new();
        for tracked in &mut self.effects {
            let expired = tracked.remaining(world_time, combat).expired;
            if tracked.expired != expired {
                tracked.expired = expired;
                if !changed.contains(&tracked.actor) {
                    changed.push(tracked.actor.clone());
                }
            } else if !expired {
                break;
            }
        }
        changed
    }

    /// Expired effects at the front of the list, optionally for one actor.
    pub fn expired(
        &self,
        actor: Option<&ActorId>,
        world_time: i64,
        combat: Option<&Encounter>,
    ) -> Vec<(ActorId, ItemId)> {
        self.effects
            .iter()
            .take_while(|e| e.remaining(world_time, combat).expired)
            .filter(|e| actor.is_none_or(|id| &e.actor == id))
            .map(|e| (e.actor.clone(), e.item.clone()))
            .collect()
    }
}

/// What happens to encounter-length effects when their encounter ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterEndAction {
    Delete,
    Expire,
}

impl EncounterEndAction {
    pub fn from_config(config: &RulesConfig) -> Option<Self> {
        if config.remove_expired_effects {
            Some(Self::Delete)
        } else if config.effect_expiration {
            Some(Self::Expire)
        } else {
            None
        }
    }
}

/// Changes ending an actor's encounter-length effects, if it has any.
pub fn encounter_end_changes(actor: &ActorSource, action: EncounterEndAction) -> Option<ActorChanges> {
    let mut changes = ActorChanges::default();
    for item in &actor.items {
        let ItemData::Effect(effect) = &item.data else {
            continue;
        };
        if effect.duration.unit != DurationUnit::Encounter {
            continue;
        }
        match action {
            EncounterEndAction::Delete => changes.delete_items.push(item.id.clone()),
            EncounterEndAction::Expire if !effect.expired => {
                let mut expired = item.clone();
                expired.data = ItemData::Effect(EffectSource {
                    expired: true,
                    ..effect.clone()
                });
                changes.update_items.push(expired);
            }
            EncounterEndAction::Expire => {}
        }
    }
    (!changes.is_empty()).then_some(changes)
}
