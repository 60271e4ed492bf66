//! Entry and spell-list management on the persisted actor.
use crate::actor::{ActorPatch, ActorSource, ItemData, ItemSource};
use crate::ids::EntryId;

use super::entry::{EntryOptions, SpellcastingEntrySource};
use super::error::SpellcastingError;

fn require_creature(actor: &ActorSource) -> Result<(), SpellcastingError> {
    if actor.kind().is_creature() {
        Ok(())
    } else {
        Err(SpellcastingError::NotACreature(actor.id.clone()))
    }
}

fn require_entry<'a>(
    actor: &'a ActorSource,
    id: &EntryId,
) -> Result<&'a SpellcastingEntrySource, SpellcastingError> {
    actor
        .entry(id)
        .ok_or_else(|| SpellcastingError::EntryNotFound(id.clone()))
}

/// Result of [`add_spell`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddSpell {
    /// The actor's own spell, re-pointed at the entry.
    Moved(ItemSource),
    /// A copy of a foreign spell to create on the actor.
    Created(ItemSource),
}

impl AddSpell {
    pub fn item(&self) -> &ItemSource {
        match self {
            Self::Moved(item) | Self::Created(item) => item,
        }
    }
}

/// Adds `spell` to `entry` at `target_level` (default: the spell's level).
///
/// Returns `Ok(None)` when the spell is already in the entry at that level.
/// Standard spells added to spontaneous or innate entries are heightened to
/// `max(base, target_level)`.
pub fn add_spell(
    actor: &ActorSource,
    entry: &EntryId,
    spell: &ItemSource,
    target_level: Option<u8>,
) -> Result<Option<AddSpell>, SpellcastingError> {
    require_creature(actor)?;
    let target = require_entry(actor, entry)?;
    let data = spell
        .as_spell()
        .ok_or_else(|| SpellcastingError::NotASpell(spell.id.clone()))?;

    let level = data.level(actor.level, target.auto_heighten_level);
    let target_level = target_level.unwrap_or(level);
    if data.location.as_ref() == Some(entry) && level == target_level {
        return Ok(None);
    }

    let mut updated = spell.clone();
    if let ItemData::Spell(updated_data) = &mut updated.data {
        updated_data.location = Some(entry.clone());
        if data.is_standard() && (target.is_spontaneous() || target.is_innate()) {
            updated_data.heightened_level = Some(data.base_level.max(target_level));
        }
    }

    let owned = actor.item(&spell.id).is_some_and(|own| own.as_spell().is_some());
    Ok(Some(if owned {
        AddSpell::Moved(updated)
    } else {
        AddSpell::Created(updated)
    }))
}

/// Appends `entry`. An empty id is replaced with the first free `entry-<n>`.
pub fn create_entry(
    actor: &ActorSource,
    mut entry: SpellcastingEntrySource,
) -> Result<ActorPatch, SpellcastingError> {
    require_creature(actor)?;
    if entry.id.as_str().is_empty() {
        entry.id = (1..)
            .map(|n| EntryId::new(format!("entry-{n}")))
            .find(|id| actor.entry(id).is_none())
            .unwrap_or_default();
    }
    let mut entries = actor.spellcasting.clone();
    entries.push(entry);
    Ok(ActorPatch::entries(entries))
}

pub fn edit_entry(
    actor: &ActorSource,
    id: &EntryId,
    options: &EntryOptions,
) -> Result<ActorPatch, SpellcastingError> {
    let edited = require_entry(actor, id)?.with_options(options);
    Ok(ActorPatch::with_entry(actor, edited))
}

pub fn delete_entry(actor: &ActorSource, id: &EntryId) -> Result<ActorPatch, SpellcastingError> {
    require_entry(actor, id)?;
    Ok(ActorPatch::entries(
        actor
            .spellcasting
            .iter()
            .filter(|entry| &entry.id != id)
            .cloned()
            .collect(),
    ))
}

pub fn delete_all() -> ActorPatch {
    ActorPatch::entries(Vec::new())
}

/// Renumbers entry sort values so `id` lands at the position of `target`.
///
/// Returns `None` when either entry is missing.
pub fn sort_entry_before(actor: &ActorSource, id: &EntryId, target: &EntryId) -> Option<ActorPatch> {
    let entries = &actor.spellcasting;
    let current = entries.iter().position(|entry| &entry.id == id)?;
    let destination = entries
        .iter()
        .position(|entry| &entry.id == target)?
        .min(entries.len().saturating_sub(1));

    let sorted = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let sort = if &entry.id == id {
                destination
            } else if current > destination && index >= destination {
                index + 1
            } else if current < destination && index <= destination {
                index.saturating_sub(1)
            } else {
                index
            };
            SpellcastingEntrySource {
                sort: i64::try_from(sort).unwrap_or(i64::MAX),
                ..entry.clone()
            }
        })
        .collect();
    Some(ActorPatch::entries(sorted))
}
