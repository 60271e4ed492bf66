//! Enumerations shared by spells and spellcasting entries.
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::stats::Skill;

/// Magic traditions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tradition {
    #[default]
    Arcane,
    Divine,
    Occult,
    Primal,
}

impl Tradition {
    /// Skill used to trick magic items of this tradition.
    pub const fn skill(self) -> Skill {
        match self {
            Self::Arcane => Skill::Arc,
            Self::Divine => Skill::Rel,
            Self::Occult => Skill::Occ,
            Self::Primal => Skill::Nat,
        }
    }
}

/// How an entry spends its resources. Mutually exclusive.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PreparationType {
    Prepared,
    Spontaneous,
    #[default]
    Innate,
    Focus,
    Ritual,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpellCategory {
    #[default]
    Standard,
    Cantrip,
    Focus,
    Ritual,
}

/// Limited uses (innate spells, wands, scrolls).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Uses {
    pub value: u32,
    pub max: u32,
}

impl Uses {
    pub const fn new(value: u32, max: u32) -> Self {
        Self { value, max }
    }

    pub const fn full(max: u32) -> Self {
        Self { value: max, max }
    }
}
