//! Resource consumption and casting.
use crate::actor::{ActorChanges, ActorPatch, ActorSource, ItemData, ItemSource, PreparedActor};
use crate::config::RulesConfig;
use crate::ids::{EntryId, ItemId};

use super::entry::SpellcastingEntrySource;
use super::error::SpellcastingError;
use super::spell::{SpellInstance, SpellMessage};
use super::trick::TrickMagicItemEntry;

/// Why a cast could not spend its resource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsumeFailure {
    NotEnoughFocus,
    /// No non-expended prepared slot holds the spell.
    SlotNotFound { spell: String },
    SlotExpended { spell: String },
    NoUsesRemaining { spell: String },
    NotEnoughSlots { spell: String, level: u8 },
}

impl ConsumeFailure {
    /// Localization key of the user-facing warning.
    pub const fn notice_key(&self) -> &'static str {
        match self {
            Self::NotEnoughFocus => "spellcasting.focus.not-enough-points",
            Self::SlotNotFound { .. } => "spellcasting.slot.not-found",
            Self::SlotExpended { .. } | Self::NoUsesRemaining { .. } => "spellcasting.slot.expended",
            Self::NotEnoughSlots { .. } => "spellcasting.slot.not-enough",
        }
    }
}

/// Result of spending a casting resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Persist these changes; empty for rituals.
    Consumed(ActorChanges),
    Failed(ConsumeFailure),
}

impl ConsumeOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Consumed(_))
    }
}

/// Spends the resource `entry` uses to cast `spell` at `level`.
///
/// Prepared (non-flexible) entries mark a slot expended: the given `slot`, or
/// the first non-expended one holding the spell. Innate entries spend the
/// spell's own uses. Spontaneous and flexible entries spend the level counter.
pub fn consume(
    actor: &ActorSource,
    entry: &SpellcastingEntrySource,
    spell: &ItemSource,
    level: u8,
    slot: Option<usize>,
) -> Result<ConsumeOutcome, SpellcastingError> {
    if entry.is_ritual() {
        return Ok(ConsumeOutcome::Consumed(ActorChanges::default()));
    }

    if entry.is_focus_pool() {
        let points = actor.focus.map_or(0, |focus| focus.value);
        return Ok(if points > 0 {
            ConsumeOutcome::Consumed(ActorChanges::from_patch(ActorPatch::focus_points(points - 1)))
        } else {
            ConsumeOutcome::Failed(ConsumeFailure::NotEnoughFocus)
        });
    }

    if level > RulesConfig::MAX_SPELL_LEVEL {
        return Err(SpellcastingError::InvalidLevel(level));
    }
    let slots = entry
        .slots
        .get(level)
        .ok_or(SpellcastingError::InvalidLevel(level))?;

    if entry.is_prepared() && !entry.is_flexible() {
        let index = match slot.or_else(|| slots.find_prepared(&spell.id)) {
            Some(index) if slots.prepared.contains_key(&index) => index,
            _ => {
                return Ok(ConsumeOutcome::Failed(ConsumeFailure::SlotNotFound {
                    spell: spell.name.clone(),
                }));
            }
        };
        if slots.prepared[&index].expended {
            return Ok(ConsumeOutcome::Failed(ConsumeFailure::SlotExpended {
                spell: spell.name.clone(),
            }));
        }
        let updated = entry.set_slot_expended(level, index, true)?;
        return Ok(ConsumeOutcome::Consumed(ActorChanges::from_patch(
            ActorPatch::with_entry(actor, updated),
        )));
    }

    if entry.is_innate() {
        let ItemData::Spell(data) = &spell.data else {
            return Err(SpellcastingError::NotASpell(spell.id.clone()));
        };
        let remaining = data.remaining_uses();
        if remaining == 0 {
            return Ok(ConsumeOutcome::Failed(ConsumeFailure::NoUsesRemaining {
                spell: spell.name.clone(),
            }));
        }
        let mut updated = spell.clone();
        if let ItemData::Spell(data) = &mut updated.data {
            if let Some(uses) = data.uses.as_mut() {
                uses.value = remaining - 1;
            }
        }
        return Ok(ConsumeOutcome::Consumed(ActorChanges {
            update_items: vec![updated],
            ..ActorChanges::default()
        }));
    }

    Ok(match entry.spend_slot(level)? {
        Some(updated) => {
            ConsumeOutcome::Consumed(ActorChanges::from_patch(ActorPatch::with_entry(actor, updated)))
        }
        None => ConsumeOutcome::Failed(ConsumeFailure::NotEnoughSlots {
            spell: spell.name.clone(),
            level,
        }),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastOptions {
    pub slot: Option<usize>,
    /// Defaults to the spell's effective level.
    pub level: Option<u8>,
    pub consume: bool,
    pub message: bool,
}

impl Default for CastOptions {
    fn default() -> Self {
        Self {
            slot: None,
            level: None,
            consume: true,
            message: true,
        }
    }
}

impl CastOptions {
    pub fn at(level: u8) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    #[must_use]
    pub fn without_consuming(mut self) -> Self {
        self.consume = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    Cast {
        message: Option<SpellMessage>,
        changes: ActorChanges,
    },
    /// The resource could not be spent; nothing was cast.
    Blocked(ConsumeFailure),
}

/// Casts `spell` through the real entry `entry`.
///
/// Cantrips and casts with `consume == false` skip resource consumption.
pub fn cast(
    actor: &PreparedActor,
    entry: &EntryId,
    spell: &ItemId,
    options: CastOptions,
) -> Result<CastOutcome, SpellcastingError> {
    let item = actor
        .source
        .item(spell)
        .ok_or_else(|| SpellcastingError::ItemNotFound(spell.clone()))?;
    cast_item(actor, entry, item, options)
}

pub(crate) fn cast_item(
    actor: &PreparedActor,
    entry: &EntryId,
    item: &ItemSource,
    options: CastOptions,
) -> Result<CastOutcome, SpellcastingError> {
    let prepared = actor
        .spellcasting
        .get(entry)
        .ok_or_else(|| SpellcastingError::EntryNotFound(entry.clone()))?;
    let data = item
        .as_spell()
        .ok_or_else(|| SpellcastingError::NotASpell(item.id.clone()))?;
    let level = options.level.unwrap_or_else(|| {
        data.level(actor.source.level, prepared.source.auto_heighten_level)
    });

    let changes = if options.consume && !data.is_cantrip() {
        match consume(&actor.source, &prepared.source, item, level, options.slot)? {
            ConsumeOutcome::Consumed(changes) => changes,
            ConsumeOutcome::Failed(failure) => return Ok(CastOutcome::Blocked(failure)),
        }
    } else {
        ActorChanges::default()
    };

    let message = options.message.then(|| {
        SpellInstance::new(item).to_message(
            level,
            Some(prepared.id().to_string()),
            Some(prepared.dc()),
            Some(prepared.attack()),
        )
    });
    Ok(CastOutcome::Cast { message, changes })
}

/// Casts `spell` through a trick magic item entry. Never consumes.
///
/// The entry is attached to the spell only while the message is built.
pub fn cast_with_trick(
    trick: TrickMagicItemEntry,
    spell: &ItemSource,
    actor_level: i32,
    level: Option<u8>,
) -> Result<SpellMessage, SpellcastingError> {
    let data = spell
        .as_spell()
        .ok_or_else(|| SpellcastingError::NotASpell(spell.id.clone()))?;
    let level = level.unwrap_or_else(|| data.level(actor_level, None));

    let mut instance = SpellInstance::new(spell);
    let message = {
        let attached = instance.attach_trick(trick);
        attached.to_message(level, None, None, None)
    };
    debug_assert!(instance.trick().is_none());
    Ok(message)
}
