//! Ability scores, proficiency ranks, saves and skills.
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::spellcasting::Tradition;

/// The six abilities.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

/// Authored ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityScores {
    pub str: i32,
    pub dex: i32,
    pub con: i32,
    pub int: i32,
    pub wis: i32,
    pub cha: i32,
}

impl AbilityScores {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    /// `floor((score - 10) / 2)`
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10).div_euclid(2)
    }

    /// The ability with the highest modifier among `candidates`. First wins ties.
    pub fn best_of(&self, candidates: &[Ability]) -> Option<Ability> {
        candidates.iter().copied().fold(None, |best, ability| match best {
            Some(current) if self.modifier(current) >= self.modifier(ability) => Some(current),
            _ => Some(ability),
        })
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            con: 10,
            int: 10,
            wis: 10,
            cha: 10,
        }
    }
}

/// Proficiency rank, 0 (untrained) through 4 (legendary).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProficiencyRank {
    #[default]
    Untrained,
    Trained,
    Expert,
    Master,
    Legendary,
}

impl ProficiencyRank {
    pub const fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Self {
        match value {
            i32::MIN..=0 => Self::Untrained,
            1 => Self::Trained,
            2 => Self::Expert,
            3 => Self::Master,
            _ => Self::Legendary,
        }
    }

    /// Untrained adds nothing; otherwise `2 * rank + level`.
    pub const fn modifier(self, level: i32) -> i32 {
        match self {
            Self::Untrained => 0,
            rank => rank.value() * 2 + level,
        }
    }
}

/// Saving throws.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Save {
    Fortitude,
    Reflex,
    Will,
}

impl Save {
    pub const fn ability(self) -> Ability {
        match self {
            Self::Fortitude => Ability::Con,
            Self::Reflex => Ability::Dex,
            Self::Will => Ability::Wis,
        }
    }
}

/// Skills, keyed by their three-letter abbreviation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Skill {
    Acr,
    Arc,
    Ath,
    Cra,
    Dec,
    Dip,
    Itm,
    Med,
    Nat,
    Occ,
    Prf,
    Rel,
    Soc,
    Ste,
    Sur,
    Thi,
}

impl Skill {
    pub const fn ability(self) -> Ability {
        match self {
            Self::Acr | Self::Ste | Self::Thi => Ability::Dex,
            Self::Ath => Ability::Str,
            Self::Arc | Self::Cra | Self::Occ | Self::Soc => Ability::Int,
            Self::Med | Self::Nat | Self::Rel | Self::Sur => Ability::Wis,
            Self::Dec | Self::Dip | Self::Itm | Self::Prf => Ability::Cha,
        }
    }

    /// Full slug used as the statistic domain.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Acr => "acrobatics",
            Self::Arc => "arcana",
            Self::Ath => "athletics",
            Self::Cra => "crafting",
            Self::Dec => "deception",
            Self::Dip => "diplomacy",
            Self::Itm => "intimidation",
            Self::Med => "medicine",
            Self::Nat => "nature",
            Self::Occ => "occultism",
            Self::Prf => "performance",
            Self::Rel => "religion",
            Self::Soc => "society",
            Self::Ste => "stealth",
            Self::Sur => "survival",
            Self::Thi => "thievery",
        }
    }

    /// Tradition a skill can stand in for when activating magic items.
    pub const fn tradition(self) -> Option<Tradition> {
        match self {
            Self::Arc => Some(Tradition::Arcane),
            Self::Nat => Some(Tradition::Primal),
            Self::Occ => Some(Tradition::Occult),
            Self::Rel => Some(Tradition::Divine),
            _ => None,
        }
    }
}
