//! Rule-element output shared by the statistics of one pass.
use std::collections::BTreeMap;

use crate::stats::{Modifier, RollNote};

/// Modifiers and notes keyed by selector (domain).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synthetics {
    modifiers: BTreeMap<String, Vec<Modifier>>,
    notes: BTreeMap<String, Vec<RollNote>>,
}

impl Synthetics {
    pub fn add_modifier(&mut self, selector: impl Into<String>, modifier: Modifier) {
        self.modifiers.entry(selector.into()).or_default().push(modifier);
    }

    pub fn add_note(&mut self, note: RollNote) {
        self.notes.entry(note.selector.clone()).or_default().push(note);
    }

    /// Modifiers registered under any of `domains`, in domain order.
    pub fn modifiers_for(&self, domains: &[&str]) -> Vec<Modifier> {
        domains
            .iter()
            .filter_map(|domain| self.modifiers.get(*domain))
            .flatten()
            .cloned()
            .collect()
    }

    /// Notes registered under any of `domains`, in domain order.
    pub fn notes_for(&self, domains: &[&str]) -> Vec<RollNote> {
        domains
            .iter()
            .filter_map(|domain| self.notes.get(*domain))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.notes.is_empty()
    }
}
