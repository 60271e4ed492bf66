//! Casting spells stored in scrolls and wands.
use crate::actor::{ActorChanges, ConsumableKind, ItemData, ItemSource, PreparedActor};
use crate::ids::ItemId;
use crate::stats::Skill;

use super::cast::{CastOptions, CastOutcome, cast_item, cast_with_trick};
use super::error::SpellcastingError;
use super::spell::SpellMessage;
use super::trick::TrickMagicItemEntry;

/// Feat that lets a character activate items outside its traditions.
pub const TRICK_MAGIC_ITEM_FEAT: &str = "trick-magic-item";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumableCast {
    Cast {
        message: SpellMessage,
        changes: ActorChanges,
    },
    /// No matching entry, but the actor may pick a trick magic item skill.
    NeedsTrickMagicItem,
    /// No matching entry and no way to trick the item.
    Incapable,
    /// The consumable has no uses left.
    Depleted,
}

fn embedded_spell(item: &ItemSource) -> Result<&ItemSource, SpellcastingError> {
    item.as_consumable()
        .and_then(|consumable| consumable.embedded_spell())
        .filter(|spell| spell.as_spell().is_some())
        .ok_or_else(|| SpellcastingError::NotACastableConsumable(item.id.clone()))
}

/// Spends one use; scrolls and potions are deleted when emptied.
fn use_up(item: &ItemSource) -> Option<ActorChanges> {
    let consumable = item.as_consumable()?;
    let uses = consumable.uses;
    if uses.max > 0 && uses.value == 0 {
        return None;
    }
    let remaining = uses.value.saturating_sub(1);
    if remaining == 0 && consumable.kind != ConsumableKind::Wand {
        return Some(ActorChanges {
            delete_items: vec![item.id.clone()],
            ..ActorChanges::default()
        });
    }
    let mut updated = item.clone();
    if let ItemData::Consumable(data) = &mut updated.data {
        data.uses.value = remaining;
    }
    Some(ActorChanges {
        update_items: vec![updated],
        ..ActorChanges::default()
    })
}

fn find_consumable<'a>(actor: &'a PreparedActor, id: &ItemId) -> Result<&'a ItemSource, SpellcastingError> {
    actor
        .source
        .item(id)
        .ok_or_else(|| SpellcastingError::ItemNotFound(id.clone()))
}

/// Casts the consumable's spell through the actor's best matching entry
/// without spending a slot.
pub fn cast_consumable(actor: &PreparedActor, consumable: &ItemId) -> Result<ConsumableCast, SpellcastingError> {
    let item = find_consumable(actor, consumable)?;
    let spell = embedded_spell(item)?;

    let Some(entry) = actor.spellcasting.best_entry_for(item) else {
        return Ok(if actor.source.has_feat(TRICK_MAGIC_ITEM_FEAT) {
            ConsumableCast::NeedsTrickMagicItem
        } else {
            ConsumableCast::Incapable
        });
    };
    let Some(mut changes) = use_up(item) else {
        return Ok(ConsumableCast::Depleted);
    };

    let mut located = spell.clone();
    if let ItemData::Spell(data) = &mut located.data {
        data.location = Some(entry.id().clone());
    }
    match cast_item(actor, entry.id(), &located, CastOptions::default().without_consuming())? {
        CastOutcome::Cast {
            message: Some(message),
            changes: cast_changes,
        } => {
            changes.merge(cast_changes);
            Ok(ConsumableCast::Cast { message, changes })
        }
        CastOutcome::Cast { message: None, .. } | CastOutcome::Blocked(_) => Ok(ConsumableCast::Incapable),
    }
}

/// Casts the consumable's spell through a trick magic item entry for `skill`.
pub fn cast_consumable_with_trick(
    actor: &PreparedActor,
    consumable: &ItemId,
    skill: Skill,
) -> Result<ConsumableCast, SpellcastingError> {
    let item = find_consumable(actor, consumable)?;
    let spell = embedded_spell(item)?;
    let trick = TrickMagicItemEntry::new(actor, skill)?;
    let Some(changes) = use_up(item) else {
        return Ok(ConsumableCast::Depleted);
    };
    let message = cast_with_trick(trick, spell, actor.source.level, None)?;
    Ok(ConsumableCast::Cast { message, changes })
}
