//! Spellcasting precondition errors.
use thiserror::Error;

use crate::error::{ErrorSeverity, RulesError};
use crate::ids::{ActorId, EntryId, ItemId};
use crate::stats::Skill;

/// Misuse of a spellcasting operation. Resource exhaustion is reported
/// through [`super::ConsumeOutcome`] instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpellcastingError {
    #[error("spellcasting entries can only exist on creatures (actor {0})")]
    NotACreature(ActorId),

    #[error("spellcasting entry {0} not found")]
    EntryNotFound(EntryId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("item {0} is not a spell")]
    NotASpell(ItemId),

    #[error("item {0} is not a consumable with an embedded spell")]
    NotACastableConsumable(ItemId),

    #[error("attempted to add level {base} spell {spell} to level {level} spell slot")]
    LevelTooLow { spell: ItemId, base: u8, level: u8 },

    #[error("spell level {0} is out of range")]
    InvalidLevel(u8),

    #[error("actors do not support regular refocusing")]
    RefocusRequiresAll,

    #[error("only characters can trick magic items")]
    TrickRequiresCharacter,

    #[error("{0} cannot be used to trick magic items")]
    InvalidTrickSkill(Skill),
}

impl RulesError for SpellcastingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EntryNotFound(_) | Self::ItemNotFound(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotACreature(_) => "SPELLCASTING_NOT_A_CREATURE",
            Self::EntryNotFound(_) => "SPELLCASTING_ENTRY_NOT_FOUND",
            Self::ItemNotFound(_) => "SPELLCASTING_ITEM_NOT_FOUND",
            Self::NotASpell(_) => "SPELLCASTING_NOT_A_SPELL",
            Self::NotACastableConsumable(_) => "SPELLCASTING_NOT_CASTABLE",
            Self::LevelTooLow { .. } => "SPELLCASTING_LEVEL_TOO_LOW",
            Self::InvalidLevel(_) => "SPELLCASTING_INVALID_LEVEL",
            Self::RefocusRequiresAll => "SPELLCASTING_REFOCUS_REQUIRES_ALL",
            Self::TrickRequiresCharacter => "SPELLCASTING_TRICK_REQUIRES_CHARACTER",
            Self::InvalidTrickSkill(_) => "SPELLCASTING_INVALID_TRICK_SKILL",
        }
    }
}
