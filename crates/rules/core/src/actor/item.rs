//! Authored items owned by an actor.
use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumString};

use crate::effects::EffectSource;
use crate::ids::ItemId;
use crate::options::sluggify;
use crate::rules::RuleElementSource;
use crate::spellcasting::{SpellSource, Uses};
use crate::stats::{Ability, ProficiencyRank, Save, Skill};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ItemKind {
    Spell,
    Effect,
    Consumable,
    Class,
    Feat,
    Equipment,
}

/// Class features that raise the owning character's proficiencies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassSource {
    pub key_ability: Option<Ability>,
    pub perception: ProficiencyRank,
    pub class_dc: ProficiencyRank,
    pub defense: ProficiencyRank,
    pub saves: BTreeMap<Save, ProficiencyRank>,
    pub trained_skills: Vec<Skill>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConsumableKind {
    Scroll,
    Wand,
    Potion,
    #[default]
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsumableSource {
    pub kind: ConsumableKind,
    pub uses: Uses,
    /// Spell stored in a scroll or wand.
    pub spell: Option<Box<ItemSource>>,
}

impl ConsumableSource {
    /// Scrolls and wands carrying a spell can be cast from.
    pub fn embedded_spell(&self) -> Option<&ItemSource> {
        match self.kind {
            ConsumableKind::Scroll | ConsumableKind::Wand => self.spell.as_deref(),
            _ => None,
        }
    }
}

/// Type-specific payload of an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemData {
    Spell(SpellSource),
    Effect(EffectSource),
    Consumable(ConsumableSource),
    Class(ClassSource),
    Feat,
    Equipment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSource {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slug: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Vec<RuleElementSource>,
    pub data: ItemData,
}

impl ItemSource {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, data: ItemData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            level: 0,
            traits: Vec::new(),
            sort: 0,
            rules: Vec::new(),
            data,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<RuleElementSource>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn kind(&self) -> ItemKind {
        match self.data {
            ItemData::Spell(_) => ItemKind::Spell,
            ItemData::Effect(_) => ItemKind::Effect,
            ItemData::Consumable(_) => ItemKind::Consumable,
            ItemData::Class(_) => ItemKind::Class,
            ItemData::Feat => ItemKind::Feat,
            ItemData::Equipment => ItemKind::Equipment,
        }
    }

    /// Authored slug, falling back to the sluggified name.
    pub fn slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| sluggify(&self.name))
    }

    pub fn as_spell(&self) -> Option<&SpellSource> {
        match &self.data {
            ItemData::Spell(spell) => Some(spell),
            _ => None,
        }
    }

    pub fn as_effect(&self) -> Option<&EffectSource> {
        match &self.data {
            ItemData::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn as_consumable(&self) -> Option<&ConsumableSource> {
        match &self.data {
            ItemData::Consumable(consumable) => Some(consumable),
            _ => None,
        }
    }
}
