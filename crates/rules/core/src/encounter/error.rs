use crate::error::{ErrorSeverity, RulesError};
use crate::ids::{ActorId, CombatantId};

/// Why an actor cannot take part in an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Exclusion {
    Loot,
    Minion,
    Eidolon,
}

impl Exclusion {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loot => "loot",
            Self::Minion => "minion",
            Self::Eidolon => "eidolon",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("{actor} is excluded from initiative ({})", reason.as_str())]
    Excluded { actor: ActorId, reason: Exclusion },

    #[error("combatant {0} is not part of the encounter")]
    CombatantNotFound(CombatantId),

    #[error("the encounter has no combatants")]
    NoCombatants,
}

impl RulesError for EncounterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Excluded { .. } => ErrorSeverity::Recoverable,
            Self::CombatantNotFound(_) | Self::NoCombatants => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Excluded { .. } => "ENCOUNTER_EXCLUDED",
            Self::CombatantNotFound(_) => "ENCOUNTER_COMBATANT_NOT_FOUND",
            Self::NoCombatants => "ENCOUNTER_NO_COMBATANTS",
        }
    }
}
