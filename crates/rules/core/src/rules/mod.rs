//! Rule elements: small data-authored logic units attached to items.
//!
//! Every preparation pass re-instantiates rule elements from their item's
//! [`RuleElementSource`] list through a [`RuleRegistry`], which maps the `key`
//! discriminator to a validating constructor. Each variant implements the
//! subset of [`RuleBehavior`] it needs; the default methods are no-ops.
//!
//! # Phases
//!
//! 1. Collection: instantiate, drop ignored and invalid elements, sort by priority
//! 2. [`RuleBehavior::apply_roll_options`]
//! 3. [`RuleBehavior::before_prepare_data`] (failures are reported, never fatal)
//! 4. Derived data reads the synthetics produced above
//!
//! [`RuleBehavior::before_roll`] and [`RuleBehavior::on_turn_start`] run outside the pass.
mod diagnostics;
mod error;
mod fast_healing;
mod flat_modifier;
mod injection;
mod note;
mod registry;
mod roll_option;
mod source;
mod synthetics;
mod toggle;

use std::collections::BTreeSet;

pub use diagnostics::{Diagnostic, DiagnosticReport, DiagnosticSink};
pub use error::{RuleFailure, ToggleError, ValidationError};
pub use fast_healing::FastHealingRule;
pub use flat_modifier::FlatModifierRule;
pub use injection::InjectionScope;
pub use note::NoteRule;
pub use registry::{RuleConstructor, RuleRegistry};
pub use roll_option::{RollOptionRule, RollToggle};
pub use source::{DisabledValue, RuleElementSource, RuleValue};
pub use synthetics::Synthetics;
pub use toggle::{ToggleRequest, TogglePlan, plan_toggle};

use crate::actor::{ActorPatch, PreparedActor};
use crate::ids::ItemId;
use crate::options::{Predicate, RollOptionRegistry};

/// Fields shared by every rule element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleBase {
    pub key: String,
    pub label: String,
    pub slug: Option<String>,
    pub priority: i32,
    pub predicate: Predicate,
    /// Owning item.
    pub item: ItemId,
    /// Position in the owning item's source list.
    pub index: usize,
}

impl RuleBase {
    pub fn test(&self, options: &BTreeSet<String>) -> bool {
        self.predicate.test(options)
    }
}

/// Closed set of rule element variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleKind {
    RollOption(RollOptionRule),
    FlatModifier(FlatModifierRule),
    Note(NoteRule),
    FastHealing(FastHealingRule),
}

/// Mutable state shared by the rule elements of one pass.
pub struct RulePass<'a> {
    pub options: &'a mut RollOptionRegistry,
    pub synthetics: &'a mut Synthetics,
    pub toggles: &'a mut Vec<RollToggle>,
    pub diagnostics: &'a mut DiagnosticSink,
}

/// Optional capabilities of a rule element.
pub trait RuleBehavior {
    /// Sets or clears roll options.
    fn apply_roll_options(&self, _base: &RuleBase, _pass: &mut RulePass<'_>) {}

    /// Contributes modifiers and notes to the synthetics.
    fn before_prepare_data(
        &self,
        _base: &RuleBase,
        _pass: &mut RulePass<'_>,
    ) -> Result<(), RuleFailure> {
        Ok(())
    }

    /// Adjusts the option list of a roll in `domains`.
    fn before_roll(
        &self,
        _base: &RuleBase,
        _domains: &[&str],
        _roll_options: &mut Vec<String>,
        _actor_options: &RollOptionRegistry,
    ) {
    }

    /// Persisted changes to make when the owning actor starts its turn.
    fn on_turn_start(&self, _base: &RuleBase, _actor: &PreparedActor) -> Option<ActorPatch> {
        None
    }
}

/// A rule element bound to one item for one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleElement {
    pub base: RuleBase,
    pub kind: RuleKind,
}

impl RuleElement {
    fn behavior(&self) -> &dyn RuleBehavior {
        match &self.kind {
            RuleKind::RollOption(rule) => rule,
            RuleKind::FlatModifier(rule) => rule,
            RuleKind::Note(rule) => rule,
            RuleKind::FastHealing(rule) => rule,
        }
    }

    pub fn priority(&self) -> i32 {
        self.base.priority
    }

    pub fn as_roll_option(&self) -> Option<&RollOptionRule> {
        match &self.kind {
            RuleKind::RollOption(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn apply_roll_options(&self, pass: &mut RulePass<'_>) {
        self.behavior().apply_roll_options(&self.base, pass);
    }

    pub fn before_prepare_data(&self, pass: &mut RulePass<'_>) -> Result<(), RuleFailure> {
        self.behavior().before_prepare_data(&self.base, pass)
    }

    pub fn before_roll(
        &self,
        domains: &[&str],
        roll_options: &mut Vec<String>,
        actor_options: &RollOptionRegistry,
    ) {
        self.behavior()
            .before_roll(&self.base, domains, roll_options, actor_options);
    }

    pub fn on_turn_start(&self, actor: &PreparedActor) -> Option<ActorPatch> {
        self.behavior().on_turn_start(&self.base, actor)
    }
}
