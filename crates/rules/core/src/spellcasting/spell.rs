//! Spell payloads and the per-cast spell instance.
use std::ops::Deref;

use crate::actor::ItemSource;
use crate::config::RulesConfig;
use crate::ids::{EntryId, ItemId};

use super::trick::TrickMagicItemEntry;
use super::types::{SpellCategory, Tradition, Uses};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellSource {
    pub base_level: u8,
    pub category: SpellCategory,
    pub traditions: Vec<Tradition>,
    /// Owning spellcasting entry.
    pub location: Option<EntryId>,
    /// Level a standard spell is known at in a spontaneous or innate entry.
    pub heightened_level: Option<u8>,
    /// Per-item uses of innate spells, refilled on rest.
    pub uses: Option<Uses>,
    /// Signature spells can be cast from any slot at or above their level.
    pub signature: bool,
}

impl Default for SpellSource {
    fn default() -> Self {
        Self {
            base_level: 1,
            category: SpellCategory::Standard,
            traditions: Vec::new(),
            location: None,
            heightened_level: None,
            uses: None,
            signature: false,
        }
    }
}

impl SpellSource {
    pub fn new(base_level: u8, category: SpellCategory) -> Self {
        Self {
            base_level,
            category,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_entry(mut self, entry: impl Into<EntryId>) -> Self {
        self.location = Some(entry.into());
        self
    }

    #[must_use]
    pub fn with_traditions(mut self, traditions: impl IntoIterator<Item = Tradition>) -> Self {
        self.traditions = traditions.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_uses(mut self, uses: Uses) -> Self {
        self.uses = Some(uses);
        self
    }

    pub fn is_cantrip(&self) -> bool {
        self.category == SpellCategory::Cantrip
    }

    pub fn is_focus(&self) -> bool {
        self.category == SpellCategory::Focus
    }

    pub fn is_ritual(&self) -> bool {
        self.category == SpellCategory::Ritual
    }

    /// Neither cantrip, focus spell nor ritual.
    pub fn is_standard(&self) -> bool {
        self.category == SpellCategory::Standard
    }

    /// Effective level for an actor of `actor_level`.
    ///
    /// Cantrips and focus spells heighten automatically to half the actor's
    /// level rounded up (or the entry's override); other spells use their
    /// heightened level when it is not below the base level.
    pub fn level(&self, actor_level: i32, auto_heighten: Option<u8>) -> u8 {
        if self.is_cantrip() || self.is_focus() {
            let level = auto_heighten
                .map(i32::from)
                .unwrap_or_else(|| (actor_level + 1).div_euclid(2));
            return level.clamp(1, i32::from(RulesConfig::MAX_SPELL_LEVEL)) as u8;
        }
        self.heightened_level
            .map_or(self.base_level, |level| level.max(self.base_level))
    }

    /// Remaining innate uses; an absent counter has none left.
    pub fn remaining_uses(&self) -> u32 {
        self.uses.map_or(0, |uses| uses.value)
    }
}

/// Observable result of a cast, consumed by chat or log renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellMessage {
    pub spell: ItemId,
    pub name: String,
    /// Entry (or trick entry) the spell was cast through.
    pub entry: Option<String>,
    pub level: u8,
    pub dc: Option<i32>,
    pub attack: Option<i32>,
}

/// A spell item as it is being cast.
///
/// The trick magic item entry is only attached for the duration of one
/// message; see [`SpellInstance::attach_trick`].
#[derive(Debug)]
pub struct SpellInstance<'a> {
    item: &'a ItemSource,
    trick: Option<TrickMagicItemEntry>,
}

impl<'a> SpellInstance<'a> {
    pub fn new(item: &'a ItemSource) -> Self {
        Self { item, trick: None }
    }

    pub fn item(&self) -> &ItemSource {
        self.item
    }

    pub fn trick(&self) -> Option<&TrickMagicItemEntry> {
        self.trick.as_ref()
    }

    /// Attaches `trick` until the returned guard is dropped.
    pub fn attach_trick(&mut self, trick: TrickMagicItemEntry) -> TrickAttachment<'_, 'a> {
        self.trick = Some(trick);
        TrickAttachment { spell: self }
    }

    /// Message for a cast at `level`, reading DCs from the attached trick entry.
    pub fn to_message(&self, level: u8, entry: Option<String>, dc: Option<i32>, attack: Option<i32>) -> SpellMessage {
        let (entry, dc, attack) = match &self.trick {
            Some(trick) => (
                Some(trick.id()),
                Some(trick.statistic.dc_value()),
                Some(trick.statistic.total()),
            ),
            None => (entry, dc, attack),
        };
        SpellMessage {
            spell: self.item.id.clone(),
            name: self.item.name.clone(),
            entry,
            level,
            dc,
            attack,
        }
    }
}

/// Scope guard that detaches the trick entry on drop, including early returns.
pub struct TrickAttachment<'s, 'a> {
    spell: &'s mut SpellInstance<'a>,
}

impl<'a> Deref for TrickAttachment<'_, 'a> {
    type Target = SpellInstance<'a>;

    fn deref(&self) -> &Self::Target {
        self.spell
    }
}

impl Drop for TrickAttachment<'_, '_> {
    fn drop(&mut self) {
        self.spell.trick = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cantrips_auto_heighten() {
        let cantrip = SpellSource::new(1, SpellCategory::Cantrip);
        assert_eq!(cantrip.level(1, None), 1);
        assert_eq!(cantrip.level(5, None), 3);
        assert_eq!(cantrip.level(6, None), 3);
        assert_eq!(cantrip.level(20, None), 10);
        assert_eq!(cantrip.level(9, Some(2)), 2);
    }

    #[test]
    fn heightened_level_never_below_base() {
        let mut spell = SpellSource::new(3, SpellCategory::Standard);
        assert_eq!(spell.level(10, None), 3);
        spell.heightened_level = Some(5);
        assert_eq!(spell.level(10, None), 5);
        spell.heightened_level = Some(1);
        assert_eq!(spell.level(10, None), 3);
    }
}
