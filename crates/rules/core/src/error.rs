//! Shared error classification.
//!
//! Each module owns its error type ([`crate::spellcasting::SpellcastingError`],
//! [`crate::rules::ToggleError`], [`crate::encounter::EncounterError`], ...).
//! Running out of slots, uses or focus points is not an error: consuming
//! yields a [`crate::spellcasting::ConsumeOutcome`] and the caller notifies
//! the user.
use strum::{AsRefStr, Display};

/// How the caller should treat a failed rules operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ErrorSeverity {
    /// The referenced document is gone or not applicable; another target
    /// may succeed (a toggle no item provides, a deleted entry).
    Recoverable,

    /// Authored data or arguments are wrong and retrying unchanged fails
    /// again (a spell prepared above its slot level).
    Validation,

    /// Stored state contradicts itself, e.g. a spell located in a missing
    /// entry.
    Internal,

    /// The actor cannot be prepared at all.
    Fatal,
}

impl ErrorSeverity {
    /// Whether the failure is worth a user-facing notice rather than a bug
    /// report.
    pub const fn is_user_facing(self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }
}

/// Implemented by every error enum of this crate.
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable, upper snake case identifier of the variant.
    fn error_code(&self) -> &'static str;
}
