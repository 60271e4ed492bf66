//! Rule element errors.
use thiserror::Error;

use crate::error::{ErrorSeverity, RulesError};
use crate::ids::ItemId;

/// Schema validation failure detected while instantiating a rule element.
///
/// The element is excluded from the pass and the message reported to the
/// [`super::DiagnosticSink`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unrecognized rule element key \"{0}\"")]
    UnknownKey(String),

    #[error("the \"{field}\" property {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("cannot resolve injected property \"{0}\"")]
    UnresolvedProperty(String),

    #[error("the predicate is malformed")]
    InvalidPredicate,
}

impl ValidationError {
    pub(crate) const fn field(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }
}

impl RulesError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKey(_) => "RULE_UNKNOWN_KEY",
            Self::InvalidField { .. } => "RULE_INVALID_FIELD",
            Self::UnresolvedProperty(_) => "RULE_UNRESOLVED_PROPERTY",
            Self::InvalidPredicate => "RULE_INVALID_PREDICATE",
        }
    }
}

/// Failure of a rule element callback during a pass. Reported and skipped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleFailure {
    #[error("value \"{0}\" does not resolve to a number")]
    NonNumericValue(String),
}

impl RulesError for RuleFailure {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "RULE_NON_NUMERIC_VALUE"
    }
}

/// Precondition failure of a toggle request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("item {0} not found on actor")]
    ItemNotFound(ItemId),
}

impl RulesError for ToggleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "TOGGLE_ITEM_NOT_FOUND"
    }
}
