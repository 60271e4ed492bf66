//! Rest and refocus.
use crate::actor::{ActorChanges, ActorPatch, ActorSource, ItemData, ItemSource};

use super::entry::SpellcastingEntrySource;
use super::error::SpellcastingError;
use super::types::Uses;

/// Changes produced by a full rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RechargeUpdates {
    /// Innate spells with their uses refilled.
    pub spells: Vec<ItemSource>,
    /// Every entry; prepared and spontaneous ones restored.
    pub entries: Vec<SpellcastingEntrySource>,
    /// Restored focus value, when the pool was not full.
    pub focus: Option<u32>,
}

impl RechargeUpdates {
    pub fn into_changes(self) -> ActorChanges {
        ActorChanges {
            actor: ActorPatch {
                focus: self.focus,
                spellcasting: Some(self.entries),
                ..ActorPatch::default()
            },
            update_items: self.spells,
            ..ActorChanges::default()
        }
    }
}

fn refilled_focus(actor: &ActorSource) -> Option<u32> {
    actor
        .focus
        .filter(|focus| focus.max > 0 && focus.value < focus.max)
        .map(|focus| focus.max)
}

/// Refills every entry of `actor`.
///
/// Innate spells get their uses back (a spell without a counter gets one
/// use). Prepared slots are un-expended and level counters restored; focus
/// and innate entries keep their slot tables. The focus pool is refilled.
pub fn recharge(actor: &ActorSource) -> RechargeUpdates {
    let spells = actor
        .spellcasting
        .iter()
        .filter(|entry| entry.is_innate())
        .flat_map(|entry| actor.spells_in(&entry.id))
        .map(|item| {
            let mut updated = item.clone();
            if let ItemData::Spell(spell) = &mut updated.data {
                let max = spell.uses.map_or(1, |uses| uses.max);
                spell.uses = Some(Uses::full(max));
            }
            updated
        })
        .collect();

    let entries = actor
        .spellcasting
        .iter()
        .map(|entry| {
            if entry.is_focus_pool() || entry.is_innate() {
                entry.clone()
            } else {
                entry.recharged()
            }
        })
        .collect();

    RechargeUpdates {
        spells,
        entries,
        focus: refilled_focus(actor),
    }
}

/// Refills the focus pool. Only a full refocus is supported.
pub fn refocus(actor: &ActorSource, all: bool) -> Result<Option<ActorPatch>, SpellcastingError> {
    if !all {
        return Err(SpellcastingError::RefocusRequiresAll);
    }
    Ok(refilled_focus(actor).map(ActorPatch::focus_points))
}
