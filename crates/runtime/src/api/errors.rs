//! Unified error types surfaced by the runtime API.
//!
//! Wraps precondition failures from the rules core, repository failures and
//! hook failures so clients can bubble them up with consistent context.
//! Resource exhaustion is not an error; it is reported as a
//! [`crate::events::Notification`].
use thiserror::Error;

use rules_core::encounter::EncounterError;
use rules_core::rules::ToggleError;
use rules_core::{ActorId, ErrorSeverity, RulesError, SpellcastingError, UserId};

use crate::hooks::HookError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Spellcasting(#[from] SpellcastingError),

    #[error(transparent)]
    Toggle(#[from] ToggleError),

    #[error(transparent)]
    Encounter(#[from] EncounterError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("no encounter is running")]
    NoEncounter,

    #[error("an encounter is already running")]
    EncounterRunning,

    #[error("user {user} cannot update actor {actor}")]
    PermissionDenied { user: UserId, actor: ActorId },
}

impl RuntimeError {
    /// Severity of the underlying rules error, if the failure came from the core.
    pub fn severity(&self) -> Option<ErrorSeverity> {
        match self {
            RuntimeError::Spellcasting(e) => Some(e.severity()),
            RuntimeError::Toggle(e) => Some(e.severity()),
            RuntimeError::Encounter(e) => Some(e.severity()),
            _ => None,
        }
    }

    /// Stable identifier for logs and clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Repository(_) => "RUNTIME_REPOSITORY",
            RuntimeError::Spellcasting(e) => e.error_code(),
            RuntimeError::Toggle(e) => e.error_code(),
            RuntimeError::Encounter(e) => e.error_code(),
            RuntimeError::Hook(_) => "RUNTIME_HOOK_FAILED",
            RuntimeError::NoEncounter => "RUNTIME_NO_ENCOUNTER",
            RuntimeError::EncounterRunning => "RUNTIME_ENCOUNTER_RUNNING",
            RuntimeError::PermissionDenied { .. } => "RUNTIME_PERMISSION_DENIED",
        }
    }
}
