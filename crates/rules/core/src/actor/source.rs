//! Authored (persisted) actor data.
use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumString};

use crate::ids::{ActorId, EntryId, ItemId, UserId};
use crate::spellcasting::{SpellcastingEntrySource, Tradition};
use crate::stats::{Ability, AbilityScores, ProficiencyRank, Save, Skill};

use super::item::{ItemData, ItemKind, ItemSource};

/// Closed set of actor kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActorKind {
    Character,
    Npc,
    Hazard,
    Vehicle,
    Loot,
}

impl ActorKind {
    pub const fn is_creature(self) -> bool {
        matches!(self, Self::Character | Self::Npc)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitPoints {
    pub value: i32,
    pub max: i32,
}

/// Focus point pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FocusPool {
    pub value: u32,
    pub max: u32,
}

/// Proficiencies authored on a character. Class items may raise them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterDetails {
    pub key_ability: Option<Ability>,
    pub perception: ProficiencyRank,
    pub defense: ProficiencyRank,
    pub class_dc: ProficiencyRank,
    pub saves: BTreeMap<Save, ProficiencyRank>,
    pub skills: BTreeMap<Skill, ProficiencyRank>,
    pub traditions: BTreeMap<Tradition, ProficiencyRank>,
}

impl CharacterDetails {
    pub fn save_rank(&self, save: Save) -> ProficiencyRank {
        self.saves.get(&save).copied().unwrap_or_default()
    }

    pub fn skill_rank(&self, skill: Skill) -> ProficiencyRank {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    pub fn tradition_rank(&self, tradition: Tradition) -> ProficiencyRank {
        self.traditions.get(&tradition).copied().unwrap_or_default()
    }
}

/// Final values authored on an NPC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NpcDetails {
    pub perception: i32,
    pub ac: i32,
    pub saves: BTreeMap<Save, i32>,
    pub skills: BTreeMap<Skill, i32>,
}

/// Hazards have authored defenses. A save authored as 0 does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HazardDetails {
    pub ac: Option<i32>,
    pub stealth: Option<i32>,
    pub saves: BTreeMap<Save, i32>,
}

/// Vehicles only roll Fortitude.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleDetails {
    pub ac: i32,
    pub fortitude: i32,
}

/// Kind-specific authored data. The variant decides the actor kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorDetails {
    Character(CharacterDetails),
    Npc(NpcDetails),
    Hazard(HazardDetails),
    Vehicle(VehicleDetails),
    Loot,
}

impl ActorDetails {
    pub fn kind(&self) -> ActorKind {
        match self {
            Self::Character(_) => ActorKind::Character,
            Self::Npc(_) => ActorKind::Npc,
            Self::Hazard(_) => ActorKind::Hazard,
            Self::Vehicle(_) => ActorKind::Vehicle,
            Self::Loot => ActorKind::Loot,
        }
    }
}

/// Persisted actor record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSource {
    pub id: ActorId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: AbilityScores,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: HitPoints,
    #[cfg_attr(feature = "serde", serde(default))]
    pub focus: Option<FocusPool>,
    pub details: ActorDetails,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spellcasting: Vec<SpellcastingEntrySource>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<ItemSource>,
    /// Persisted options of the `all` domain.
    #[cfg_attr(feature = "serde", serde(default))]
    pub roll_options: BTreeMap<String, bool>,
    /// Users allowed to update this actor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub owners: Vec<UserId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub player_owned: bool,
}

impl ActorSource {
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>, details: ActorDetails) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: 1,
            traits: Vec::new(),
            abilities: AbilityScores::default(),
            hp: HitPoints::default(),
            focus: None,
            details,
            spellcasting: Vec::new(),
            items: Vec::new(),
            roll_options: BTreeMap::new(),
            owners: Vec::new(),
            player_owned: false,
        }
    }

    pub fn kind(&self) -> ActorKind {
        self.details.kind()
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemSource> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn entry(&self, id: &EntryId) -> Option<&SpellcastingEntrySource> {
        self.spellcasting.iter().find(|entry| &entry.id == id)
    }

    pub fn has_trait(&self, trait_slug: &str) -> bool {
        self.traits.iter().any(|t| t == trait_slug)
    }

    /// Spells whose location is `entry`, ordered by item sort value.
    pub fn spells_in(&self, entry: &EntryId) -> Vec<&ItemSource> {
        let mut spells: Vec<&ItemSource> = self
            .items
            .iter()
            .filter(|item| match &item.data {
                ItemData::Spell(spell) => spell.location.as_ref() == Some(entry),
                _ => false,
            })
            .collect();
        spells.sort_by_key(|item| item.sort);
        spells
    }

    /// Items of a given kind in authored order.
    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &ItemSource> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    pub fn has_feat(&self, slug: &str) -> bool {
        self.items_of(ItemKind::Feat)
            .any(|item| item.slug() == slug)
    }
}
