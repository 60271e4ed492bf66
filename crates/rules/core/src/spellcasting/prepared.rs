//! Per-pass spellcasting entries with their statistic and spell list.
use std::collections::BTreeMap;

use crate::actor::{ActorDetails, ActorSource, ItemSource};
use crate::config::RulesConfig;
use crate::ids::{EntryId, ItemId};
use crate::options::{ALL_DOMAIN, RollOptionRegistry, sluggify};
use crate::rules::Synthetics;
use crate::stats::{
    CheckConfig, DcConfig, Modifier, ModifierType, ProficiencyRank, Statistic, StatisticData,
};

use super::entry::SpellcastingEntrySource;
use super::types::{Tradition, Uses};

pub(crate) fn base_selectors(entry: &SpellcastingEntrySource) -> Vec<String> {
    vec![
        ALL_DOMAIN.to_owned(),
        format!("{}-based", entry.ability),
        "spell-attack-dc".to_owned(),
    ]
}

pub(crate) fn attack_selectors(tradition: Tradition) -> Vec<String> {
    vec![
        format!("{tradition}-spell-attack"),
        "spell-attack".to_owned(),
        "spell-attack-roll".to_owned(),
        "attack".to_owned(),
        "attack-roll".to_owned(),
    ]
}

pub(crate) fn dc_selectors(tradition: Tradition) -> Vec<String> {
    vec![format!("{tradition}-spell-dc"), "spell-dc".to_owned()]
}

/// A spellcasting entry after one preparation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreparedEntry {
    pub source: SpellcastingEntrySource,
    pub rank: ProficiencyRank,
    pub statistic: Statistic,
    /// Spells located in this entry, ordered by item sort value.
    pub spells: Vec<ItemId>,
}

impl PreparedEntry {
    pub fn prepare(
        source: &SpellcastingEntrySource,
        actor: &ActorSource,
        options: &RollOptionRegistry,
        synthetics: &Synthetics,
    ) -> Self {
        let rank = source.rank_for(actor);
        let ability = source.ability;
        let ability_modifier = actor.abilities.modifier(ability);
        let label = source.tradition.as_ref().to_owned();

        let base = StatisticData::new(sluggify(&source.name), label).with_domains(base_selectors(source));
        let data = match (&actor.details, source.spell_dc) {
            (ActorDetails::Npc(_), spell_dc) => {
                let spell_dc = spell_dc.unwrap_or_default();
                let ability_mod = Modifier::new(
                    ability.as_ref(),
                    ability.as_ref().to_uppercase(),
                    ability_modifier,
                    ModifierType::Ability,
                );
                let mut data = base
                    .with_check(CheckConfig {
                        domains: attack_selectors(source.tradition),
                        modifiers: vec![
                            Modifier::untyped("base", "Base", spell_dc.value - ability_modifier),
                            ability_mod.clone(),
                        ],
                    })
                    .with_dc(DcConfig {
                        domains: dc_selectors(source.tradition),
                        modifiers: vec![
                            Modifier::untyped(
                                "base",
                                "Base",
                                spell_dc.dc - RulesConfig::DC_BASE - ability_modifier,
                            ),
                            ability_mod,
                        ],
                        value: None,
                    });
                data.ability = Some(ability);
                data
            }
            _ => base
                .with_ability(ability, ability_modifier)
                .with_rank(rank, actor.level)
                .with_check(CheckConfig {
                    domains: attack_selectors(source.tradition),
                    modifiers: Vec::new(),
                })
                .with_dc(DcConfig {
                    domains: dc_selectors(source.tradition),
                    ..DcConfig::default()
                }),
        };

        let mut entry_options = options.clone();
        for option in source.roll_options() {
            entry_options.set(ALL_DOMAIN, option, true);
        }

        Self {
            source: source.clone(),
            rank,
            statistic: Statistic::build(data, &entry_options, synthetics),
            spells: actor
                .spells_in(&source.id)
                .into_iter()
                .map(|spell| spell.id.clone())
                .collect(),
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.source.id
    }

    pub fn dc(&self) -> i32 {
        self.statistic.dc_value()
    }

    pub fn attack(&self) -> i32 {
        self.statistic.total()
    }

    /// Display data per spell level.
    pub fn spell_levels(&self, actor: &ActorSource) -> Vec<SpellLevelView> {
        let spells: Vec<&ItemSource> = self
            .spells
            .iter()
            .filter_map(|id| actor.item(id))
            .collect();
        SpellLevelBuilder {
            entry: &self.source,
            actor,
            spells,
        }
        .build()
    }
}

/// All entries of an actor, in authored order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellcastingCollection {
    entries: Vec<PreparedEntry>,
}

impl SpellcastingCollection {
    pub fn prepare(actor: &ActorSource, options: &RollOptionRegistry, synthetics: &Synthetics) -> Self {
        Self {
            entries: actor
                .spellcasting
                .iter()
                .map(|entry| PreparedEntry::prepare(entry, actor, options, synthetics))
                .collect(),
        }
    }

    pub fn get(&self, id: &EntryId) -> Option<&PreparedEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepared and spontaneous entries: full spellcasting features that
    /// qualify for casting from scrolls and wands.
    pub fn spellcasting_features(&self) -> impl Iterator<Item = &PreparedEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.source.is_prepared() || entry.source.is_spontaneous())
    }

    /// True when a spellcasting feature shares a tradition with the
    /// consumable's embedded spell.
    pub fn can_cast_consumable(&self, consumable: &ItemSource) -> bool {
        self.best_entry_for(consumable).is_some()
    }

    /// Feature with the highest spell DC among those sharing a tradition
    /// with the consumable's spell. The first wins ties.
    pub fn best_entry_for(&self, consumable: &ItemSource) -> Option<&PreparedEntry> {
        let spell = consumable.as_consumable()?.embedded_spell()?.as_spell()?;
        self.spellcasting_features()
            .filter(|entry| spell.traditions.contains(&entry.source.tradition))
            .fold(None, |best: Option<&PreparedEntry>, entry| match best {
                Some(current) if current.dc() >= entry.dc() => Some(current),
                _ => Some(entry),
            })
    }
}

/// One spell shown at a level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSpell {
    pub spell: ItemId,
    pub expended: bool,
    pub signature: bool,
    /// Signature spell shown at a level it is not prepared or known at.
    pub virtual_copy: bool,
    pub uses: Option<Uses>,
}

impl ActiveSpell {
    fn new(spell: ItemId) -> Self {
        Self {
            spell,
            expended: false,
            signature: false,
            virtual_copy: false,
            uses: None,
        }
    }
}

/// Remaining and maximum casts; `value` is `None` when only the count of
/// known spells is meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUses {
    pub value: Option<u32>,
    pub max: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellLevelView {
    pub level: u8,
    pub is_cantrip: bool,
    pub uses: Option<LevelUses>,
    /// Prepared entries keep empty positions as `None`.
    pub active: Vec<Option<ActiveSpell>>,
}

struct SpellLevelBuilder<'a> {
    entry: &'a SpellcastingEntrySource,
    actor: &'a ActorSource,
    spells: Vec<&'a ItemSource>,
}

impl SpellLevelBuilder<'_> {
    fn spell_level(&self, item: &ItemSource) -> u8 {
        item.as_spell().map_or(0, |spell| {
            if spell.is_cantrip() {
                0
            } else {
                spell.level(self.actor.level, self.entry.auto_heighten_level)
            }
        })
    }

    fn highest_level(&self) -> u8 {
        self.spells
            .iter()
            .map(|item| self.spell_level(item))
            .chain(core::iter::once(self.entry.slots.highest_level()))
            .max()
            .unwrap_or(0)
    }

    fn build(self) -> Vec<SpellLevelView> {
        let entry = self.entry;
        let mut levels = if entry.is_prepared() {
            self.prepared_levels()
        } else if entry.is_focus_pool() {
            self.focus_levels()
        } else {
            self.known_levels()
        };

        if entry.is_spontaneous() || entry.is_flexible() {
            for item in self.spells.iter().filter(|item| {
                item.as_spell().is_some_and(|spell| spell.signature)
            }) {
                let base = item.as_spell().map_or(0, |spell| spell.base_level);
                for view in levels.iter_mut() {
                    if base > view.level {
                        continue;
                    }
                    if !entry.show_slotless_levels && view.uses.is_some_and(|uses| uses.max == 0) {
                        continue;
                    }
                    let existing = view
                        .active
                        .iter_mut()
                        .flatten()
                        .find(|active| active.spell == item.id);
                    match existing {
                        Some(active) => active.signature = true,
                        None => view.active.push(Some(ActiveSpell {
                            signature: true,
                            virtual_copy: true,
                            ..ActiveSpell::new(item.id.clone())
                        })),
                    }
                }
            }
        }
        levels
    }

    fn prepared_levels(&self) -> Vec<SpellLevelView> {
        let entry = self.entry;
        (0..=self.highest_level())
            .filter_map(|level| entry.slots.get(level).map(|slot| (level, slot)))
            .map(|(level, slot)| {
                let mut active: Vec<Option<ActiveSpell>> = Vec::new();
                let shown = entry.show_slotless_levels || slot.max > 0;
                if shown && (level == 0 || !entry.is_flexible()) {
                    active.resize(slot.max as usize, None);
                    for (index, data) in &slot.prepared {
                        let Some(id) = data.id.as_ref().filter(|id| self.spells.iter().any(|s| &s.id == *id))
                        else {
                            continue;
                        };
                        if *index >= active.len() {
                            active.resize(*index + 1, None);
                        }
                        active[*index] = Some(ActiveSpell {
                            expended: data.expended,
                            ..ActiveSpell::new(id.clone())
                        });
                    }
                }
                SpellLevelView {
                    level,
                    is_cantrip: level == 0,
                    uses: Some(LevelUses {
                        value: (level > 0 && entry.is_flexible()).then_some(slot.value),
                        max: slot.max,
                    }),
                    active,
                }
            })
            .collect()
    }

    fn focus_levels(&self) -> Vec<SpellLevelView> {
        let (cantrips, leveled): (Vec<&ItemSource>, Vec<&ItemSource>) = self
            .spells
            .iter()
            .copied()
            .partition(|item| item.as_spell().is_some_and(|spell| spell.is_cantrip()));

        let mut levels = Vec::new();
        if !cantrips.is_empty() {
            levels.push(SpellLevelView {
                level: 0,
                is_cantrip: true,
                uses: None,
                active: cantrips
                    .iter()
                    .map(|item| Some(ActiveSpell::new(item.id.clone())))
                    .collect(),
            });
        }
        if !leveled.is_empty() {
            let focus = self.actor.focus.unwrap_or_default();
            let level = (self.actor.level + 1)
                .div_euclid(2)
                .clamp(1, i32::from(RulesConfig::MAX_SPELL_LEVEL)) as u8;
            levels.push(SpellLevelView {
                level,
                is_cantrip: false,
                uses: Some(LevelUses {
                    value: Some(focus.value),
                    max: focus.max,
                }),
                active: leveled
                    .iter()
                    .map(|item| Some(ActiveSpell::new(item.id.clone())))
                    .collect(),
            });
        }
        levels
    }

    fn known_levels(&self) -> Vec<SpellLevelView> {
        let entry = self.entry;
        let mut by_level: BTreeMap<u8, Vec<&ItemSource>> = BTreeMap::new();
        for item in &self.spells {
            by_level.entry(self.spell_level(item)).or_default().push(*item);
        }

        let mut levels = Vec::new();
        for level in 0..=self.highest_level() {
            let Some(slot) = entry.slots.get(level) else {
                continue;
            };
            let spells = by_level.remove(&level).unwrap_or_default();
            if entry.is_ritual() && spells.is_empty() {
                continue;
            }
            let uses = (entry.is_spontaneous() && level != 0).then_some(LevelUses {
                value: Some(slot.value),
                max: slot.max,
            });
            let active: Vec<Option<ActiveSpell>> = spells
                .iter()
                .map(|item| {
                    let innate_uses = item.as_spell().and_then(|spell| spell.uses);
                    Some(ActiveSpell {
                        expended: entry.is_innate() && innate_uses.is_none_or(|uses| uses.value == 0),
                        uses: if entry.is_innate() { innate_uses } else { None },
                        ..ActiveSpell::new(item.id.clone())
                    })
                })
                .collect();

            let hide_spontaneous =
                entry.is_spontaneous() && uses.is_some_and(|uses| uses.max == 0) && active.is_empty();
            let hide_innate = entry.is_innate() && active.is_empty();
            if !entry.show_slotless_levels && (hide_spontaneous || hide_innate) {
                continue;
            }
            levels.push(SpellLevelView {
                level,
                is_cantrip: level == 0,
                uses,
                active,
            });
        }
        levels
    }
}
