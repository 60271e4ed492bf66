//! Per-level slot table of a spellcasting entry.
use std::collections::BTreeMap;

use crate::config::RulesConfig;
use crate::ids::ItemId;

/// One prepared position in a slot level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellPrepData {
    /// `None` is an empty placeholder.
    pub id: Option<ItemId>,
    pub expended: bool,
}

impl SpellPrepData {
    pub fn spell(id: ItemId) -> Self {
        Self {
            id: Some(id),
            expended: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Slots of one spell level.
///
/// `value` counts remaining casts and is only meaningful for spontaneous and
/// flexible entries. Prepared entries track `expended` per index instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellSlot {
    pub max: u32,
    pub value: u32,
    pub prepared: BTreeMap<usize, SpellPrepData>,
}

impl SpellSlot {
    /// A full slot level.
    pub fn new(max: u32) -> Self {
        Self {
            max,
            value: max,
            prepared: BTreeMap::new(),
        }
    }

    /// First non-expended index holding `spell`.
    pub fn find_prepared(&self, spell: &ItemId) -> Option<usize> {
        self.prepared
            .iter()
            .find(|(_, data)| data.id.as_ref() == Some(spell) && !data.expended)
            .map(|(index, _)| *index)
    }
}

/// Slots `0..=MAX_SPELL_LEVEL`; level 0 holds cantrips.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlotTable([SpellSlot; RulesConfig::SLOT_LEVELS]);

impl SlotTable {
    pub fn get(&self, level: u8) -> Option<&SpellSlot> {
        self.0.get(usize::from(level))
    }

    pub fn get_mut(&mut self, level: u8) -> Option<&mut SpellSlot> {
        self.0.get_mut(usize::from(level))
    }

    /// `(level, slot)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &SpellSlot)> {
        (0u8..).zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SpellSlot> {
        self.0.iter_mut()
    }

    /// Highest level with at least one slot, 0 when there are none.
    pub fn highest_level(&self) -> u8 {
        self.iter()
            .filter(|(_, slot)| slot.max > 0)
            .map(|(level, _)| level)
            .last()
            .unwrap_or(0)
    }
}
