//! Persisted spellcasting entry options and their immutable edits.
//!
//! Every edit returns a new [`SpellcastingEntrySource`]; the caller persists
//! the value and a new preparation pass picks it up.
use crate::actor::{ActorDetails, ActorSource, ItemSource};
use crate::config::RulesConfig;
use crate::ids::EntryId;
use crate::stats::{Ability, ProficiencyRank};

use super::error::SpellcastingError;
use super::slots::{SlotTable, SpellPrepData, SpellSlot};
use super::types::{PreparationType, Tradition};

/// Spell attack and DC authored on NPC entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellDc {
    /// Spell attack modifier.
    pub value: i32,
    pub dc: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellcastingEntrySource {
    pub id: EntryId,
    pub name: String,
    pub ability: Ability,
    pub tradition: Tradition,
    pub preparation: PreparationType,
    pub flexible: bool,
    pub slots: SlotTable,
    /// Overrides the rank derived from the actor's tradition proficiency.
    pub proficiency: Option<ProficiencyRank>,
    pub show_slotless_levels: bool,
    pub sort: i64,
    /// Only read for NPCs.
    pub spell_dc: Option<SpellDc>,
    pub auto_heighten_level: Option<u8>,
}

impl Default for SpellcastingEntrySource {
    fn default() -> Self {
        Self {
            id: EntryId::default(),
            name: String::new(),
            ability: Ability::Int,
            tradition: Tradition::Arcane,
            preparation: PreparationType::Innate,
            flexible: false,
            slots: SlotTable::default(),
            proficiency: None,
            show_slotless_levels: true,
            sort: Self::DEFAULT_SORT,
            spell_dc: None,
            auto_heighten_level: None,
        }
    }
}

/// Partial update of an entry. `None` fields keep their value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntryOptions {
    pub name: Option<String>,
    pub ability: Option<Ability>,
    pub tradition: Option<Tradition>,
    pub preparation: Option<PreparationType>,
    pub flexible: Option<bool>,
    pub proficiency: Option<ProficiencyRank>,
    pub show_slotless_levels: Option<bool>,
    pub sort: Option<i64>,
    pub spell_dc: Option<SpellDc>,
    pub auto_heighten_level: Option<u8>,
}

impl SpellcastingEntrySource {
    pub const DEFAULT_SORT: i64 = 1_000_000;

    /// Entry named `<tradition>-<preparation>-spells`.
    pub fn new(id: impl Into<EntryId>, tradition: Tradition, preparation: PreparationType) -> Self {
        Self {
            id: id.into(),
            name: format!("{tradition}-{preparation}-spells"),
            tradition,
            preparation,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = ability;
        self
    }

    /// Sets `max` slots at `level`, full.
    #[must_use]
    pub fn with_slots(mut self, level: u8, max: u32) -> Self {
        if let Some(slot) = self.slots.get_mut(level) {
            *slot = SpellSlot {
                prepared: core::mem::take(&mut slot.prepared),
                ..SpellSlot::new(max)
            };
        }
        self
    }

    pub fn is_prepared(&self) -> bool {
        self.preparation == PreparationType::Prepared
    }

    pub fn is_flexible(&self) -> bool {
        self.is_prepared() && self.flexible
    }

    pub fn is_spontaneous(&self) -> bool {
        self.preparation == PreparationType::Spontaneous
    }

    pub fn is_innate(&self) -> bool {
        self.preparation == PreparationType::Innate
    }

    pub fn is_focus_pool(&self) -> bool {
        self.preparation == PreparationType::Focus
    }

    pub fn is_ritual(&self) -> bool {
        self.preparation == PreparationType::Ritual
    }

    /// `spellcasting:<ability>`, `spellcasting:<tradition>`, `spellcasting:<preparation>`
    pub fn roll_options(&self) -> [String; 3] {
        [
            format!("spellcasting:{}", self.ability),
            format!("spellcasting:{}", self.tradition),
            format!("spellcasting:{}", self.preparation),
        ]
    }

    /// Proficiency rank used by the entry statistic.
    pub fn rank_for(&self, actor: &ActorSource) -> ProficiencyRank {
        if let Some(rank) = self.proficiency {
            return rank;
        }
        let ActorDetails::Character(details) = &actor.details else {
            return ProficiencyRank::Trained;
        };
        let rank = if self.is_innate() {
            details.traditions.values().copied().max().unwrap_or_default()
        } else {
            details.tradition_rank(self.tradition)
        };
        rank.max(ProficiencyRank::Trained)
    }

    fn slot_mut(&mut self, level: u8) -> Result<&mut SpellSlot, SpellcastingError> {
        self.slots
            .get_mut(level)
            .ok_or(SpellcastingError::InvalidLevel(level))
    }

    /// Writes `spell` into `slots[level].prepared[index]`.
    ///
    /// Fails when the spell's base level exceeds `level`, unless a cantrip is
    /// prepared into the cantrip slot.
    pub fn prepare_spell(
        &self,
        spell: &ItemSource,
        level: u8,
        index: usize,
    ) -> Result<Self, SpellcastingError> {
        let data = spell
            .as_spell()
            .ok_or_else(|| SpellcastingError::NotASpell(spell.id.clone()))?;
        if data.base_level > level && !(level == 0 && data.is_cantrip()) {
            return Err(SpellcastingError::LevelTooLow {
                spell: spell.id.clone(),
                base: data.base_level,
                level,
            });
        }

        let mut entry = self.clone();
        entry
            .slot_mut(level)?
            .prepared
            .insert(index, SpellPrepData::spell(spell.id.clone()));
        Ok(entry)
    }

    /// Resets `slots[level].prepared[index]` to an empty placeholder.
    pub fn unprepare_spell(&self, level: u8, index: usize) -> Result<Self, SpellcastingError> {
        let mut entry = self.clone();
        entry
            .slot_mut(level)?
            .prepared
            .insert(index, SpellPrepData::empty());
        Ok(entry)
    }

    pub fn set_slot_expended(
        &self,
        level: u8,
        index: usize,
        expended: bool,
    ) -> Result<Self, SpellcastingError> {
        let mut entry = self.clone();
        entry
            .slot_mut(level)?
            .prepared
            .entry(index)
            .or_default()
            .expended = expended;
        Ok(entry)
    }

    /// Spends one cast from the level-wide counter. `None` when it is empty.
    pub(crate) fn spend_slot(&self, level: u8) -> Result<Option<Self>, SpellcastingError> {
        let mut entry = self.clone();
        let slot = entry.slot_mut(level)?;
        if slot.value == 0 {
            return Ok(None);
        }
        slot.value -= 1;
        Ok(Some(entry))
    }

    /// Entry restored after a rest: prepared slots un-expended, counters full.
    pub fn recharged(&self) -> Self {
        let mut entry = self.clone();
        let per_index = entry.is_prepared() && !entry.is_flexible();
        for slot in entry.slots.iter_mut() {
            if per_index {
                for prepared in slot.prepared.values_mut() {
                    prepared.expended = false;
                }
            } else if slot.value < slot.max {
                slot.value = slot.max;
            }
        }
        entry
    }

    #[must_use]
    pub fn with_options(&self, options: &EntryOptions) -> Self {
        let mut entry = self.clone();
        let options = options.clone();
        if let Some(name) = options.name {
            entry.name = name;
        }
        if let Some(ability) = options.ability {
            entry.ability = ability;
        }
        if let Some(tradition) = options.tradition {
            entry.tradition = tradition;
        }
        if let Some(preparation) = options.preparation {
            entry.preparation = preparation;
        }
        if let Some(flexible) = options.flexible {
            entry.flexible = flexible;
        }
        if let Some(rank) = options.proficiency {
            entry.proficiency = Some(rank);
        }
        if let Some(show) = options.show_slotless_levels {
            entry.show_slotless_levels = show;
        }
        if let Some(sort) = options.sort {
            entry.sort = sort;
        }
        if let Some(spell_dc) = options.spell_dc {
            entry.spell_dc = Some(spell_dc);
        }
        if let Some(level) = options.auto_heighten_level {
            entry.auto_heighten_level = Some(level.min(RulesConfig::MAX_SPELL_LEVEL));
        }
        entry
    }
}
