//! Statistic synthesis: typed modifiers, stacking, checks and DCs.
//!
//! A [`Statistic`] is a per-pass snapshot. It is rebuilt from authored data,
//! rule-element synthetics and the actor's roll options on every pass and
//! never patched in place.
pub mod abilities;
pub mod modifiers;
pub mod statistic;

pub use abilities::{Ability, AbilityScores, ProficiencyRank, Save, Skill};
pub use modifiers::{Modifier, ModifierType, RollNote, apply_stacking_rules};
pub use statistic::{
    CheckConfig, DcConfig, Statistic, StatisticCheck, StatisticData, StatisticDifficultyClass,
};
