//! Deterministic rules engine shared by the runtime and offline tools.
//!
//! `rules-core` turns authored actor data and the rule elements carried by
//! their items into derived statistics, and runs the spellcasting resource
//! state machine on top of them. Every operation is pure: preparation passes
//! are functions of `(ActorSource, PrepareContext)`, and every change is
//! returned as an [`ActorChanges`] request for the persistence layer to apply.
pub mod actor;
pub mod config;
pub mod context;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod ids;
pub mod options;
pub mod rules;
pub mod spellcasting;
pub mod stats;
pub mod users;

pub use actor::{
    ActorChanges, ActorDetails, ActorKind, ActorPatch, ActorPreparer, ActorSource, ItemData,
    ItemSource, PreparedActor,
};
pub use config::RulesConfig;
pub use context::PrepareContext;
pub use effects::{EffectSource, EffectTracker};
pub use encounter::{Combatant, Encounter, EncounterError};
pub use error::{ErrorSeverity, RulesError};
pub use ids::{ActorId, CombatantId, EntryId, ItemId, UserId};
pub use options::{Predicate, PredicateStatement, RollOptionRegistry};
pub use rules::{DiagnosticReport, DiagnosticSink, RuleElementSource, RuleRegistry, ToggleRequest};
pub use spellcasting::{SpellcastingEntrySource, SpellcastingError};
pub use stats::{Modifier, ModifierType, Statistic};
pub use users::{UserInfo, primary_updater};
