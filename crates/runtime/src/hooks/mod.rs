//! Start-of-turn hook system for encounter orchestration.
//!
//! When a combatant starts its turn (once per round), the runtime prepares
//! its actor and evaluates every registered [`TurnStartHook`] in priority
//! order. Hooks never write; each returns an [`ActorChanges`] request, and the
//! registry folds them into one all-or-nothing write that the runtime
//! persists through the actor's primary updater.

mod context;
mod expired_effects;
mod registry;
mod rule_elements;

pub use context::HookContext;
pub use expired_effects::ExpiredEffectHook;
pub use registry::HookRegistry;
pub use rule_elements::RuleElementHook;

use rules_core::ActorChanges;
use thiserror::Error;

/// Defines the criticality level of a hook for error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure aborts the turn-start write.
    Critical,

    /// Hook failure is logged as an error; other hooks still run. The default.
    Important,

    /// Hook failure is logged at debug level.
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hook {hook} failed: {reason}")]
pub struct HookError {
    pub hook: &'static str,
    pub reason: String,
}

impl HookError {
    pub fn new(hook: &'static str, reason: impl Into<String>) -> Self {
        Self {
            hook,
            reason: reason.into(),
        }
    }
}

/// Start-of-turn hook that may request changes to the acting actor.
///
/// Hooks are sorted by priority (lower values execute first).
pub trait TurnStartHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging).
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Whether this hook has anything to do for the context.
    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool;

    /// Changes to persist, or `None` for nothing.
    fn on_turn_start(&self, ctx: &HookContext<'_>) -> Result<Option<ActorChanges>, HookError>;
}
